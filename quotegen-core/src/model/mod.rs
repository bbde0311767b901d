//! Top-level module for the POS-aware Markov engine.
//!
//! This module provides the full build-and-sample pipeline:
//! - Tokens and sentence sentinels (`Token`)
//! - Chain states and weighted transition nodes (`ChainState`, `Transitions`)
//! - Part-of-speech tagging seam (`PosTagger`, `RuleTagger`)
//! - Corpus compilation (`builder`)
//! - The immutable compiled model and its codecs (`CompiledModel`)
//! - Bounded rejection sampling (`sampler`)

/// Word/tag token pairs and the begin/end sentence sentinels.
pub mod token;

/// Chain-state windows and weighted transition nodes.
///
/// Tracks outgoing transitions per state and supports weighted random
/// sampling over occurrence counts.
pub mod chain;

/// Part-of-speech tagging seam and the default rule-based tagger.
pub mod pos;

/// Corpus compilation: sentence splitting, tagging, sentinel padding and
/// sliding-window count accumulation.
pub mod builder;

/// The finalized transition model plus its blob and snapshot codecs.
pub mod compiled;

/// Bounded rejection sampling of sentences from a compiled model.
pub mod sampler;
