//! Peel codecs: the reversible/guessable text transformations.
//!
//! This crate is the pure transformation layer. It knows nothing about
//! search order, caching, or plaintext scoring — it only answers two
//! questions per codec: "could this text plausibly be in my format?"
//! (`can_apply`, cheap and side-effect-free) and "what does it decode to?"
//! (`decode`, total and deterministic).
//!
//! # Crate dependency graph
//!
//! ```text
//! peel_codecs  ←  peel_search  ←  peel_cli
//! peel_analysis ↗
//! ```
//!
//! # Key types
//!
//! - [`Decoder`] — the codec capability trait
//! - [`DecodeOutcome`] — success with one or more tagged variants, or failure
//! - [`DecoderParams`] — string-keyed tunables with typed accessors
//! - [`DecoderCatalog`] — the ordered static registry consumed by the engine

#![forbid(unsafe_code)]

pub mod catalog;
pub mod codecs;
pub mod decoder;
pub mod params;

pub use catalog::{builtin_catalog, CatalogError, DecoderCatalog, DecoderDescriptor};
pub use decoder::{DecodeOutcome, DecodedVariant, Decoder};
pub use params::DecoderParams;
