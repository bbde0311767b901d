use std::collections::HashMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::token::Token;

/// The Markov "memory": the window of the last `order` tokens, used as the
/// lookup key into the transition table.
///
/// # Invariants
/// - The window width is fixed at build time and equals the model order.
/// - A fresh walk starts from a window filled with begin sentinels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainState(Vec<Token>);

impl ChainState {
	/// The starting state of a walk: `order` begin sentinels.
	pub fn begin(order: usize) -> Self {
		Self(vec![Token::begin(); order])
	}

	pub(crate) fn new(window: Vec<Token>) -> Self {
		Self(window)
	}

	/// The tokens of the window, oldest first.
	pub fn tokens(&self) -> &[Token] {
		&self.0
	}

	pub fn width(&self) -> usize {
		self.0.len()
	}

	/// Slides the window forward: drops the oldest token, appends `next`.
	pub fn advance(&self, next: Token) -> Self {
		let mut window = Vec::with_capacity(self.0.len());
		window.extend_from_slice(&self.0[1..]);
		window.push(next);
		Self(window)
	}
}

/// All observed continuations of one chain state.
///
/// Conceptually a node in the Markov chain whose outgoing edges are weighted
/// by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Pick the next token using weighted random sampling
///
/// ## Invariants
/// - Each occurrence count is strictly positive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transitions {
	/// Outgoing transitions indexed by the next token.
	/// The value is how many times the transition was observed.
	counts: HashMap<Token, u64>,
}

impl Transitions {
	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub(crate) fn record(&mut self, next: Token) {
		*self.counts.entry(next).or_insert(0) += 1;
	}

	pub(crate) fn from_counts(counts: HashMap<Token, u64>) -> Self {
		Self { counts }
	}

	/// Picks the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its occurrence
	/// count, not uniform over distinct continuations.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the node has no transitions.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Token> {
		if self.counts.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total: u64 = self.counts.values().sum();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		// Randomly select a token
		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&Token> = None;
		for (next, occurrence) in &self.counts {
			if r < *occurrence {
				return Some(next);
			}
			r -= occurrence;
			fallback = Some(next);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// The occurrence count observed for `next`, 0 if never observed.
	pub fn count(&self, next: &Token) -> u64 {
		self.counts.get(next).copied().unwrap_or(0)
	}

	/// Total number of observations across all continuations.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Number of distinct continuations.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(next token, occurrence count)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&Token, u64)> {
		self.counts.iter().map(|(token, count)| (token, *count))
	}
}
