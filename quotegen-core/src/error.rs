use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Failure taxonomy for building, encoding and decoding models.
///
/// # Notes
/// - Sampling never produces an error: a walk that cannot be completed is
///   reported as `None` by the sampler, not as a `ModelError`.
/// - `Corrupt` is recoverable by design: a caller holding a corpus should
///   treat it as "no model cached" and rebuild.
#[derive(Debug, Error)]
pub enum ModelError {
	/// The corpus was empty or produced no usable sentence after tokenization.
	#[error("corpus has no usable sentences")]
	InsufficientData,

	/// The requested chain order is not a positive integer.
	#[error("chain order must be at least 1, got {0}")]
	InvalidOrder(usize),

	/// A stored model blob failed structural validation.
	#[error("corrupt model blob: {0}")]
	Corrupt(String),

	/// A binary model snapshot could not be encoded or decoded.
	#[error("snapshot codec error: {0}")]
	Snapshot(#[from] postcard::Error),
}

impl ModelError {
	/// Shorthand used by the blob decoder.
	pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
		Self::Corrupt(reason.into())
	}
}
