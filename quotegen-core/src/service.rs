use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::corpus::{BlobStore, CorpusSource};
use crate::error::{ModelError, Result};
use crate::model::builder::{self, DEFAULT_ORDER};
use crate::model::compiled::CompiledModel;
use crate::model::pos::{PosTagger, RuleTagger};
use crate::model::sampler;

/// Ceiling on how many least-used quotes are considered by a random pick.
pub const MAX_QUOTES_TO_PROCESS: usize = 50;

/// Minimum corpus size before a model is worth compiling.
pub const MIN_QUOTES_FOR_MODEL: usize = 2;

/// Conventional sentence bound: quotes are kept tweetable.
pub const DEFAULT_MAX_CHARACTERS: usize = 280;

/// Per-entity usage counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsageStats {
	/// Number of stored quotes served by `random_quote`.
	pub quotes_requested: u64,
	/// Number of sentences produced by `generate_sentence`.
	pub sentences_generated: u64,
}

/// High-level orchestration over a quote store.
///
/// # Responsibilities
/// - Decide between the cached model blob and a fresh build
///   (absent or corrupt blob -> rebuild from the corpus, then store)
/// - Serve generated sentences and biased random quotes
/// - Track per-entity usage counters
///
/// # Notes
/// - The engine underneath stays pure; all storage access goes through the
///   [`CorpusSource`] and [`BlobStore`] collaborator traits.
/// - A corrupt cached blob is logged and treated as "no model cached", never
///   surfaced to the caller.
#[derive(Debug)]
pub struct QuoteService<S, T = RuleTagger> {
	store: S,
	tagger: T,
	order: usize,
	stats: HashMap<String, UsageStats>,
	times_used: HashMap<String, Vec<u64>>,
}

impl<S: CorpusSource + BlobStore> QuoteService<S> {
	/// Wraps a store with the default tagger and chain order.
	pub fn new(store: S) -> Self {
		Self::with_tagger(store, RuleTagger, DEFAULT_ORDER)
	}
}

impl<S: CorpusSource + BlobStore, T: PosTagger> QuoteService<S, T> {
	/// Wraps a store with a custom tagger and chain order.
	pub fn with_tagger(store: S, tagger: T, order: usize) -> Self {
		Self {
			store,
			tagger,
			order,
			stats: HashMap::new(),
			times_used: HashMap::new(),
		}
	}

	/// Generates a sentence for an entity, building and caching the model on
	/// first use.
	///
	/// # Returns
	/// - `Ok(Some(sentence))` on success.
	/// - `Ok(None)` when no sentence is available: unknown entity, fewer than
	///   [`MIN_QUOTES_FOR_MODEL`] quotes, a corpus with no usable sentences,
	///   or sampling that exhausted its attempts.
	///
	/// # Errors
	/// Only genuine build failures propagate (e.g. a zero order configured
	/// through [`with_tagger`](Self::with_tagger)).
	pub fn generate_sentence<R: Rng + ?Sized>(
		&mut self,
		entity: &str,
		max_characters: usize,
		rng: &mut R,
	) -> Result<Option<String>> {
		let model = match self.cached_model(entity) {
			Some(model) => model,
			None => match self.rebuild(entity)? {
				Some(model) => model,
				None => return Ok(None),
			},
		};

		let sentence = sampler::sample(&model, max_characters, rng);
		if sentence.is_some() {
			self.stats.entry(entity.to_owned()).or_default().sentences_generated += 1;
		}
		Ok(sentence)
	}

	/// Returns a quote biased toward the least-served ones.
	///
	/// The quotes are ordered by how rarely they have been served, the first
	/// [`MAX_QUOTES_TO_PROCESS`] of them are kept, and one is picked
	/// uniformly from that slice. Not very random, but fair over time.
	///
	/// Returns `None` for an unknown entity or an empty corpus.
	pub fn random_quote<R: Rng + ?Sized>(
		&mut self,
		entity: &str,
		rng: &mut R,
	) -> Option<String> {
		let quotes = self.store.get_corpus(entity)?;
		if quotes.is_empty() {
			return None;
		}

		let used = self
			.times_used
			.entry(entity.to_owned())
			.or_insert_with(|| vec![0; quotes.len()]);
		// The corpus may have grown since the counters were created.
		used.resize(quotes.len(), 0);

		let mut by_usage: Vec<usize> = (0..quotes.len()).collect();
		by_usage.sort_by_key(|&index| used[index]);
		by_usage.truncate(MAX_QUOTES_TO_PROCESS);

		let index = by_usage[rng.random_range(0..by_usage.len())];
		used[index] += 1;

		self.stats.entry(entity.to_owned()).or_default().quotes_requested += 1;
		Some(quotes[index].clone())
	}

	/// Drops the cached model so the next request rebuilds from the corpus.
	pub fn invalidate(&mut self, entity: &str) {
		self.store.drop_blob(entity);
		debug!(entity, "cached model invalidated");
	}

	/// The usage counters collected for an entity so far.
	pub fn stats(&self, entity: &str) -> UsageStats {
		self.stats.get(entity).copied().unwrap_or_default()
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn store_mut(&mut self) -> &mut S {
		&mut self.store
	}

	/// Decodes the cached blob, treating a corrupt one as absent.
	fn cached_model(&self, entity: &str) -> Option<CompiledModel> {
		let blob = self.store.load_blob(entity)?;
		match CompiledModel::from_blob(&blob) {
			Ok(model) => Some(model),
			Err(error) => {
				warn!(entity, %error, "cached model blob failed validation, rebuilding");
				None
			}
		}
	}

	/// Compiles a fresh model from the corpus and stores its blob.
	///
	/// `Ok(None)` when the entity is unknown, below the quote floor, or its
	/// corpus has no usable sentences.
	fn rebuild(&mut self, entity: &str) -> Result<Option<CompiledModel>> {
		let Some(quotes) = self.store.get_corpus(entity) else {
			debug!(entity, "unknown entity, nothing to build");
			return Ok(None);
		};
		if quotes.len() < MIN_QUOTES_FOR_MODEL {
			debug!(entity, quotes = quotes.len(), "too few quotes for a model");
			return Ok(None);
		}

		match builder::build(&quotes, self.order, &self.tagger) {
			Ok(model) => {
				self.store.save_blob(entity, model.to_blob());
				info!(entity, states = model.len(), "model compiled and cached");
				Ok(Some(model))
			}
			Err(ModelError::InsufficientData) => {
				debug!(entity, "corpus yielded no usable sentences");
				Ok(None)
			}
			Err(error) => Err(error),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use serde_json::json;

	use crate::corpus::MemoryStore;
	use super::*;

	fn seeded_service() -> QuoteService<MemoryStore> {
		let mut store = MemoryStore::new();
		store.add_quote("ada", "The cat sat.");
		store.add_quote("ada", "The cat ran.");
		QuoteService::new(store)
	}

	#[test]
	fn first_request_builds_and_caches_the_model() {
		let mut service = seeded_service();
		assert!(service.store().load_blob("ada").is_none());

		let mut rng = StdRng::seed_from_u64(1);
		let sentence = service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();
		assert!(sentence.is_some());

		let blob = service.store().load_blob("ada").expect("blob cached");
		assert!(CompiledModel::from_blob(&blob).is_ok());
	}

	#[test]
	fn cached_blob_is_reused() {
		let mut service = seeded_service();
		let mut rng = StdRng::seed_from_u64(2);
		service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();
		let first = service.store().load_blob("ada").unwrap();

		service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();
		let second = service.store().load_blob("ada").unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn corrupt_cached_blob_triggers_a_rebuild() {
		let mut service = seeded_service();
		service
			.store_mut()
			.save_blob("ada", json!({ "order": 0, "chains": [] }));

		let mut rng = StdRng::seed_from_u64(3);
		let sentence = service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();
		assert!(sentence.is_some());

		let blob = service.store().load_blob("ada").unwrap();
		assert!(CompiledModel::from_blob(&blob).is_ok());
	}

	#[test]
	fn unknown_entity_and_thin_corpus_yield_none() {
		let mut store = MemoryStore::new();
		store.add_quote("solo", "Only one quote.");
		let mut service = QuoteService::new(store);

		let mut rng = StdRng::seed_from_u64(4);
		assert_eq!(
			service
				.generate_sentence("ghost", DEFAULT_MAX_CHARACTERS, &mut rng)
				.unwrap(),
			None
		);
		assert_eq!(
			service
				.generate_sentence("solo", DEFAULT_MAX_CHARACTERS, &mut rng)
				.unwrap(),
			None
		);
	}

	#[test]
	fn invalidate_forces_a_fresh_build() {
		let mut service = seeded_service();
		let mut rng = StdRng::seed_from_u64(5);
		service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();
		assert!(service.store().load_blob("ada").is_some());

		service.invalidate("ada");
		assert!(service.store().load_blob("ada").is_none());

		service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();
		assert!(service.store().load_blob("ada").is_some());
	}

	#[test]
	fn random_quote_draws_from_the_whole_corpus() {
		let mut store = MemoryStore::new();
		store.add_quote("ada", "Alpha.");
		store.add_quote("ada", "Beta.");
		let mut service = QuoteService::new(store);

		// Below the processing ceiling both quotes stay candidates, so the
		// pick is uniform over the pair.
		let mut rng = StdRng::seed_from_u64(6);
		let mut alpha = 0;
		let mut beta = 0;
		for _ in 0..100 {
			match service.random_quote("ada", &mut rng).unwrap().as_str() {
				"Alpha." => alpha += 1,
				"Beta." => beta += 1,
				other => panic!("unexpected quote {other:?}"),
			}
		}
		assert!(alpha >= 25 && beta >= 25, "{alpha} vs {beta}");
	}

	#[test]
	fn random_quote_excludes_the_most_used_past_the_ceiling() {
		let mut store = MemoryStore::new();
		// One quote more than the ceiling, so the most-used one is dropped
		// from the candidate slice.
		for i in 0..=MAX_QUOTES_TO_PROCESS {
			store.add_quote("ada", &format!("Quote number {i}."));
		}
		let mut service = QuoteService::new(store);

		let mut rng = StdRng::seed_from_u64(9);
		let first = service.random_quote("ada", &mut rng).unwrap();
		// The freshly served quote is now the unique most-used and cannot be
		// drawn again immediately.
		let second = service.random_quote("ada", &mut rng).unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn random_quote_handles_missing_and_empty() {
		let mut store = MemoryStore::new();
		store.add_entity("quiet");
		let mut service = QuoteService::new(store);
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(service.random_quote("ghost", &mut rng), None);
		assert_eq!(service.random_quote("quiet", &mut rng), None);
	}

	#[test]
	fn usage_counters_advance() {
		let mut service = seeded_service();
		let mut rng = StdRng::seed_from_u64(8);

		service.random_quote("ada", &mut rng);
		service
			.generate_sentence("ada", DEFAULT_MAX_CHARACTERS, &mut rng)
			.unwrap();

		let stats = service.stats("ada");
		assert_eq!(stats.quotes_requested, 1);
		assert_eq!(stats.sentences_generated, 1);
		assert_eq!(service.stats("ghost"), UsageStats::default());
	}
}
