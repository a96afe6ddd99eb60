//! # CoVidA Core
//!
//! Shared, I/O-free logic for CoVidA: the annotation data model, the
//! annotation store, handwriting-candidate match strategies, and the
//! annotation search engine.
//!
//! This crate performs no filesystem access and installs no logging
//! subscriber. Persistence and presentation live in the `covida`
//! application crate.

pub mod error;
pub mod levenshtein;
pub mod models;
pub mod search;
pub mod store;
pub mod strategy;
pub mod tokenize;
