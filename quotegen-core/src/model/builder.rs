use std::collections::HashMap;

use tracing::debug;

use crate::error::{ModelError, Result};
use super::chain::{ChainState, Transitions};
use super::compiled::CompiledModel;
use super::pos::PosTagger;
use super::token::Token;

/// Conventional chain order: two trailing tokens of memory.
pub const DEFAULT_ORDER: usize = 2;

/// Compiles a corpus of quote texts into a transition model.
///
/// # Parameters
/// - `corpus`: The quote texts of one entity, in stable iteration order.
/// - `order`: Number of tokens retained in a chain state (positive).
/// - `tagger`: Deterministic part-of-speech tagger, one tag per word.
///
/// # Behavior
/// - Each corpus entry is split into sentences on terminal punctuation, each
///   sentence into whitespace-separated words, and each word is paired with
///   its tag.
/// - `order` begin sentinels are prepended and one end sentinel appended, so
///   generated walks start and stop at natural sentence boundaries.
/// - A window of `order + 1` tokens slides across each sequence,
///   incrementing the `(state -> next token)` occurrence count.
///
/// # Determinism
/// No randomness is involved: an identical corpus and order always produce
/// an identical table, count for count.
///
/// # Errors
/// - `ModelError::InvalidOrder` if `order` is zero.
/// - `ModelError::InsufficientData` if the corpus is empty or yields no
///   usable sentence (e.g. all-whitespace input).
pub fn build<S: AsRef<str>>(
	corpus: &[S],
	order: usize,
	tagger: &impl PosTagger,
) -> Result<CompiledModel> {
	if order == 0 {
		return Err(ModelError::InvalidOrder(order));
	}

	let mut chains: HashMap<ChainState, Transitions> = HashMap::new();
	let mut sentences = 0usize;

	for text in corpus {
		for sentence in split_sentences(text.as_ref()) {
			let words: Vec<&str> = sentence.split_whitespace().collect();
			if words.is_empty() {
				continue;
			}
			let tags = tagger.tag(&words);

			// <BEGIN> * order, the tagged words, then <END>.
			let mut sequence: Vec<Token> = Vec::with_capacity(words.len() + order + 1);
			sequence.extend(std::iter::repeat_with(Token::begin).take(order));
			for (word, tag) in words.iter().zip(&tags) {
				sequence.push(Token::new(*word, tag));
			}
			sequence.push(Token::end());

			for window in sequence.windows(order + 1) {
				let state = ChainState::new(window[..order].to_vec());
				let next = window[order].clone();
				chains.entry(state).or_default().record(next);
			}
			sentences += 1;
		}
	}

	if chains.is_empty() {
		return Err(ModelError::InsufficientData);
	}

	debug!(sentences, states = chains.len(), order, "compiled transition table");
	Ok(CompiledModel::new(order, chains))
}

/// Splits text into sentences on terminal punctuation (`.`, `!`, `?`)
/// followed by whitespace or end of input.
///
/// Runs of terminal punctuation (`?!`) stay attached to one sentence, and
/// a trailing fragment without terminal punctuation is kept as a sentence
/// of its own.
fn split_sentences(text: &str) -> Vec<String> {
	let mut sentences = Vec::new();
	let mut current = String::new();
	let mut chars = text.chars().peekable();

	while let Some(c) = chars.next() {
		current.push(c);
		if matches!(c, '.' | '!' | '?') {
			let at_boundary = match chars.peek() {
				None => true,
				Some(next) => next.is_whitespace(),
			};
			if at_boundary {
				let sentence = current.trim();
				if !sentence.is_empty() {
					sentences.push(sentence.to_owned());
				}
				current.clear();
			}
		}
	}

	let sentence = current.trim();
	if !sentence.is_empty() {
		sentences.push(sentence.to_owned());
	}
	sentences
}
