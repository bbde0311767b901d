use rand::Rng;

use super::chain::ChainState;
use super::compiled::CompiledModel;

/// Retry budget used by [`sample`]. Each abandoned walk (dead end or length
/// overflow) consumes one attempt.
pub const DEFAULT_MAX_ATTEMPTS: usize = 25;

/// Samples a sentence from a compiled model, bounded by `max_characters`.
///
/// Shorthand for [`sample_with_attempts`] with [`DEFAULT_MAX_ATTEMPTS`].
pub fn sample<R: Rng + ?Sized>(
	model: &CompiledModel,
	max_characters: usize,
	rng: &mut R,
) -> Option<String> {
	sample_with_attempts(model, max_characters, DEFAULT_MAX_ATTEMPTS, rng)
}

/// Samples a sentence by repeated random walks through the transition table.
///
/// # Behavior
/// - Each attempt starts from the all-begin state and repeatedly picks the
///   next token at random, weighted by occurrence count.
/// - Drawing the end sentinel completes the walk; the words collected so far
///   (space-joined) are the sentence.
/// - A walk is abandoned, never truncated, when the current state has no
///   continuations or when appending the next word would push the sentence
///   past `max_characters`. Abandoning consumes one attempt.
/// - Once the budget is exhausted the call returns `None`: a normal negative
///   result meaning "no conforming sentence available", not an error.
///
/// # Guarantees
/// - A returned sentence is never empty and never longer than
///   `max_characters` (counted in characters, not bytes).
/// - Work is bounded: at most `max_attempts` walks, each of at most
///   `max_characters` growth steps.
///
/// # Notes
/// The random source is injected so callers can make generation
/// deterministic with a seeded generator.
pub fn sample_with_attempts<R: Rng + ?Sized>(
	model: &CompiledModel,
	max_characters: usize,
	max_attempts: usize,
	rng: &mut R,
) -> Option<String> {
	for _ in 0..max_attempts {
		if let Some(sentence) = walk(model, max_characters, rng) {
			return Some(sentence);
		}
	}
	None
}

/// One sampling attempt: `START -> WALKING -> accepted | rejected`.
///
/// Returns the accepted sentence, or `None` for a rejected walk
/// (dead end, would-be overflow, or an end sentinel before any word).
fn walk<R: Rng + ?Sized>(
	model: &CompiledModel,
	max_characters: usize,
	rng: &mut R,
) -> Option<String> {
	let mut state = ChainState::begin(model.order());
	let mut sentence = String::new();
	let mut length = 0usize;

	loop {
		let next = model.transitions(&state)?.pick(rng)?.clone();

		if next.is_end() {
			// An end sentinel with nothing emitted cannot happen on a table
			// produced by `build`, but a hand-made one could encode it.
			return if sentence.is_empty() { None } else { Some(sentence) };
		}

		let word_length = next.word().chars().count();
		let separator = usize::from(!sentence.is_empty());
		if length + separator + word_length > max_characters {
			// Too long: discard the whole walk.
			return None;
		}

		if !sentence.is_empty() {
			sentence.push(' ');
		}
		sentence.push_str(next.word());
		length += separator + word_length;

		state = state.advance(next);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use serde_json::json;

	use crate::model::builder::build;
	use crate::model::pos::RuleTagger;
	use super::*;

	fn cat_model() -> CompiledModel {
		build(&["The cat sat.", "The cat ran."], 2, &RuleTagger).unwrap()
	}

	#[test]
	fn sampled_sentences_follow_the_corpus() {
		let model = cat_model();
		let mut rng = StdRng::seed_from_u64(1);
		for _ in 0..50 {
			let sentence = sample(&model, 280, &mut rng).unwrap();
			assert!(sentence.starts_with("The cat"), "got {sentence:?}");
			assert!(
				sentence.ends_with("sat.") || sentence.ends_with("ran."),
				"got {sentence:?}"
			);
			assert!(sentence.chars().count() <= 280);
		}
	}

	#[test]
	fn result_is_never_empty() {
		let model = cat_model();
		let mut rng = StdRng::seed_from_u64(2);
		for _ in 0..100 {
			if let Some(sentence) = sample(&model, 280, &mut rng) {
				assert!(!sentence.is_empty());
			}
		}
	}

	#[test]
	fn single_sentence_corpus_yields_it_or_nothing() {
		let model = build(&["Hi."], 2, &RuleTagger).unwrap();
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..50 {
			match sample(&model, 280, &mut rng) {
				Some(sentence) => assert_eq!(sentence, "Hi."),
				None => {}
			}
		}
	}

	#[test]
	fn too_small_budget_discards_not_truncates() {
		let model = cat_model();
		let mut rng = StdRng::seed_from_u64(4);
		// Every corpus sentence is 12 characters; a walk can never fit in 5.
		assert_eq!(sample(&model, 5, &mut rng), None);
	}

	#[test]
	fn empty_table_exhausts_attempts() {
		let blob = json!({ "order": 2, "chains": [] });
		let model = CompiledModel::from_blob(&blob).unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		assert_eq!(sample(&model, 100, &mut rng), None);
	}

	#[test]
	fn dead_end_table_exhausts_attempts() {
		// A start state whose only continuation leads nowhere: the second
		// state is never listed, so every walk hits a dead end.
		let blob = json!({
			"order": 1,
			"chains": [[["___BEGIN__::___BEGIN__"], [["lone::NOUN", 1]]]]
		});
		let model = CompiledModel::from_blob(&blob).unwrap();
		let mut rng = StdRng::seed_from_u64(6);
		assert_eq!(sample(&model, 100, &mut rng), None);
	}

	#[test]
	fn length_bound_holds_for_tight_limits() {
		let model = build(
			&["One two three four five six seven.", "One two."],
			2,
			&RuleTagger,
		)
		.unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..200 {
			if let Some(sentence) = sample(&model, 8, &mut rng) {
				assert!(sentence.chars().count() <= 8, "got {sentence:?}");
			}
		}
	}

	#[test]
	fn seeded_generation_is_reproducible() {
		let model = cat_model();
		let mut a = StdRng::seed_from_u64(99);
		let mut b = StdRng::seed_from_u64(99);
		for _ in 0..20 {
			assert_eq!(sample(&model, 280, &mut a), sample(&model, 280, &mut b));
		}
	}
}
