use std::collections::HashMap;

use serde_json::Value;

/// Supplies the quote corpus of an entity.
///
/// # Contract
/// - `Some(vec![])` means the entity exists but has no quotes yet; `None`
///   means the entity is unknown. The two must stay distinguishable.
/// - Iteration order of the returned quotes is stable; duplicates are
///   allowed.
/// - No side effects.
pub trait CorpusSource {
	fn get_corpus(&self, entity: &str) -> Option<Vec<String>>;
}

/// Owns the stored model blobs.
///
/// The engine only produces and consumes the blob document; where it lives
/// (database column, object store, file) is this trait's concern.
pub trait BlobStore {
	/// The cached blob for an entity, if one was stored.
	fn load_blob(&self, entity: &str) -> Option<Value>;

	/// Stores a blob, wholesale replacing any prior one for the entity.
	fn save_blob(&mut self, entity: &str, blob: Value);

	/// Drops the cached blob so the next request rebuilds from the corpus.
	fn drop_blob(&mut self, entity: &str);
}

/// In-memory quote store backing the demo binary and the tests.
///
/// Adding a quote drops the entity's cached blob, since the stored model no
/// longer reflects the corpus.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	quotes: HashMap<String, Vec<String>>,
	blobs: HashMap<String, Value>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an entity with no quotes yet.
	pub fn add_entity(&mut self, entity: &str) {
		self.quotes.entry(entity.to_owned()).or_default();
	}

	/// Appends a quote to an entity, creating the entity if needed.
	pub fn add_quote(&mut self, entity: &str, quote: &str) {
		self.quotes
			.entry(entity.to_owned())
			.or_default()
			.push(quote.to_owned());
		self.blobs.remove(entity);
	}

	pub fn quote_count(&self, entity: &str) -> usize {
		self.quotes.get(entity).map_or(0, Vec::len)
	}
}

impl CorpusSource for MemoryStore {
	fn get_corpus(&self, entity: &str) -> Option<Vec<String>> {
		self.quotes.get(entity).cloned()
	}
}

impl BlobStore for MemoryStore {
	fn load_blob(&self, entity: &str) -> Option<Value> {
		self.blobs.get(entity).cloned()
	}

	fn save_blob(&mut self, entity: &str, blob: Value) {
		self.blobs.insert(entity.to_owned(), blob);
	}

	fn drop_blob(&mut self, entity: &str) {
		self.blobs.remove(entity);
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn empty_corpus_differs_from_unknown_entity() {
		let mut store = MemoryStore::new();
		store.add_entity("ada");
		assert_eq!(store.get_corpus("ada"), Some(vec![]));
		assert_eq!(store.get_corpus("ghost"), None);
	}

	#[test]
	fn quotes_keep_insertion_order() {
		let mut store = MemoryStore::new();
		store.add_quote("ada", "First.");
		store.add_quote("ada", "Second.");
		assert_eq!(
			store.get_corpus("ada"),
			Some(vec!["First.".to_owned(), "Second.".to_owned()])
		);
	}

	#[test]
	fn adding_a_quote_drops_the_cached_blob() {
		let mut store = MemoryStore::new();
		store.add_quote("ada", "First.");
		store.save_blob("ada", json!({ "order": 2, "chains": [] }));
		assert!(store.load_blob("ada").is_some());

		store.add_quote("ada", "Second.");
		assert!(store.load_blob("ada").is_none());
	}
}
