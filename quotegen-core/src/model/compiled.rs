use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ModelError, Result};
use super::chain::{ChainState, Transitions};
use super::token::Token;

/// The finalized, immutable transition model: the order parameter plus the
/// full table of observed `state -> next token` counts.
///
/// # Responsibilities
/// - Answer transition lookups for the sampler
/// - Encode to / decode from the stored blob format (JSON document)
/// - Encode to / decode from a compact binary snapshot (postcard)
///
/// # Invariants
/// - Never mutated after compilation; rebuilding a corpus produces a fresh
///   value, so concurrent readers never observe a partial update.
/// - Every stored state is exactly `order` tokens wide.
/// - Every occurrence count is strictly positive.
///
/// # Blob format
/// ```json
/// {"order": 2, "chains": [[["___BEGIN__::___BEGIN__", "The::DET"],
///                          [["cat::NOUN", 2]]], ...]}
/// ```
/// States and continuations are emitted in sorted order, so equal models
/// produce byte-identical blobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompiledModel {
	order: usize,
	chains: HashMap<ChainState, Transitions>,
}

impl CompiledModel {
	pub(crate) fn new(order: usize, chains: HashMap<ChainState, Transitions>) -> Self {
		Self { order, chains }
	}

	/// The number of tokens retained in a chain state.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Looks up the continuations observed for `state`.
	pub fn transitions(&self, state: &ChainState) -> Option<&Transitions> {
		self.chains.get(state)
	}

	/// Number of distinct chain states.
	pub fn len(&self) -> usize {
		self.chains.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chains.is_empty()
	}

	/// Iterates over the table, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&ChainState, &Transitions)> {
		self.chains.iter()
	}

	/// Encodes the model as the stored blob document.
	///
	/// Pure and total on any model produced by `build`; sorted emission makes
	/// the output reproducible for identical models.
	pub fn to_blob(&self) -> Value {
		let mut states: Vec<(&ChainState, &Transitions)> = self.chains.iter().collect();
		states.sort_by(|a, b| a.0.cmp(b.0));

		let chains: Vec<Value> = states
			.into_iter()
			.map(|(state, transitions)| {
				let key: Vec<Value> = state
					.tokens()
					.iter()
					.map(|token| Value::String(token.to_string()))
					.collect();

				let mut continuations: Vec<(&Token, u64)> = transitions.iter().collect();
				continuations.sort_by(|a, b| a.0.cmp(b.0));
				let continuations: Vec<Value> = continuations
					.into_iter()
					.map(|(token, count)| json!([token.to_string(), count]))
					.collect();

				json!([key, continuations])
			})
			.collect();

		json!({ "order": self.order, "chains": chains })
	}

	/// Decodes a stored blob document back into a model.
	///
	/// Inverse of [`to_blob`](Self::to_blob): decoding an encoded model
	/// yields a table equal state-for-state and count-for-count.
	///
	/// # Errors
	/// Returns `ModelError::Corrupt` if required fields are missing or
	/// mistyped, the order is not a positive integer, a state's width does
	/// not match the order, a token string is malformed, a state is listed
	/// twice or carries no continuations, or any count is non-positive.
	pub fn from_blob(blob: &Value) -> Result<Self> {
		let order = blob
			.get("order")
			.and_then(Value::as_u64)
			.ok_or_else(|| ModelError::corrupt("missing or non-integer \"order\""))?;
		if order == 0 {
			return Err(ModelError::corrupt("\"order\" must be positive"));
		}
		let order = order as usize;

		let entries = blob
			.get("chains")
			.and_then(Value::as_array)
			.ok_or_else(|| ModelError::corrupt("missing or non-array \"chains\""))?;

		let mut chains: HashMap<ChainState, Transitions> = HashMap::with_capacity(entries.len());
		for entry in entries {
			let pair = entry
				.as_array()
				.filter(|pair| pair.len() == 2)
				.ok_or_else(|| ModelError::corrupt("chain entry is not a [state, continuations] pair"))?;

			let state = Self::decode_state(&pair[0], order)?;
			let transitions = Self::decode_transitions(&pair[1])?;
			if transitions.is_empty() {
				return Err(ModelError::corrupt(format!(
					"state {:?} has no continuations",
					pair[0]
				)));
			}
			if chains.insert(state, transitions).is_some() {
				return Err(ModelError::corrupt(format!("duplicate state {:?}", pair[0])));
			}
		}

		Ok(Self { order, chains })
	}

	fn decode_state(value: &Value, order: usize) -> Result<ChainState> {
		let tokens = value
			.as_array()
			.ok_or_else(|| ModelError::corrupt("state key is not an array of tokens"))?
			.iter()
			.map(|token| {
				token
					.as_str()
					.ok_or_else(|| ModelError::corrupt("state token is not a string"))?
					.parse::<Token>()
			})
			.collect::<Result<Vec<Token>>>()?;
		if tokens.len() != order {
			return Err(ModelError::corrupt(format!(
				"state width {} does not match order {order}",
				tokens.len()
			)));
		}
		Ok(ChainState::new(tokens))
	}

	fn decode_transitions(value: &Value) -> Result<Transitions> {
		let entries = value
			.as_array()
			.ok_or_else(|| ModelError::corrupt("continuations are not an array"))?;

		let mut counts = HashMap::with_capacity(entries.len());
		for entry in entries {
			let pair = entry
				.as_array()
				.filter(|pair| pair.len() == 2)
				.ok_or_else(|| ModelError::corrupt("continuation is not a [token, count] pair"))?;
			let token = pair[0]
				.as_str()
				.ok_or_else(|| ModelError::corrupt("continuation token is not a string"))?
				.parse::<Token>()?;
			let count = pair[1]
				.as_u64()
				.filter(|count| *count > 0)
				.ok_or_else(|| ModelError::corrupt("continuation count is not a positive integer"))?;
			counts.insert(token, count);
		}
		Ok(Transitions::from_counts(counts))
	}

	/// Encodes the blob as a JSON string, for persistence layers that store
	/// text rather than documents.
	pub fn to_json(&self) -> String {
		self.to_blob().to_string()
	}

	/// Decodes a model from a JSON string.
	///
	/// # Errors
	/// `ModelError::Corrupt` on invalid JSON or on any structural failure
	/// reported by [`from_blob`](Self::from_blob).
	pub fn from_json(json: &str) -> Result<Self> {
		let blob: Value = serde_json::from_str(json)
			.map_err(|e| ModelError::corrupt(format!("invalid JSON: {e}")))?;
		Self::from_blob(&blob)
	}

	/// Encodes the model as a compact binary snapshot.
	///
	/// The snapshot is a local cache format; the JSON blob remains the
	/// interchange representation.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes a model from a binary snapshot produced by
	/// [`to_bytes`](Self::to_bytes).
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}
}
