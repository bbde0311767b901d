//! Statistical sentence generation from collected quotes.
//!
//! This crate builds a part-of-speech-aware Markov model from the quotes of
//! one entity and samples new, bounded-length sentences from it:
//! - Token-level n-gram chains with POS tags in the state identity
//! - A compact JSON blob format for persisting compiled models
//! - Weighted, bounded rejection sampling with an injected random source
//! - Collaborator traits for the surrounding persistence layer, plus an
//!   orchestration service implementing its cache-or-build policy
//!
//! Everything is synchronous and free of internal I/O: a compiled model is
//! an immutable value, safe to read from any number of sampling calls.

/// Error taxonomy shared across the crate.
pub mod error;

/// Core model pipeline: tokens, chains, tagging, building and sampling.
pub mod model;

/// Corpus collection and persistence collaborator contracts.
pub mod corpus;

/// Cache-or-build orchestration over a quote store.
pub mod service;
