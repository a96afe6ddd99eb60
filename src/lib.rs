//! # CoVidA
//!
//! Search for annotated video segments using handwriting-recognition
//! output.
//!
//! Users annotate videos by drawing shapes and writing a description. A
//! handwriting recognizer later turns a written query into a ranked list of
//! candidate strings; CoVidA matches those candidates against every stored
//! description with four passes of increasing looseness (exact,
//! case-insensitive, substring, edit distance) and reports which segments
//! of which videos matched.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │ corpus files │──▶│ AnnotationStore  │──▶│ search engine │
//! │ (JSON/video) │   │ (covida-core)    │   │ (covida-core) │
//! └──────────────┘   └──────────────────┘   └───────┬───────┘
//!                                                   ▼
//!                                            ┌─────────────┐
//!                                            │ CLI (covida)│
//!                                            └─────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`corpus`] | Loading and saving per-video annotation files |
//! | [`search`] | `covida search` |
//! | [`get`] | `covida get` |
//! | [`videos`] | `covida videos` |
//! | [`annotate`] | `covida add` / `covida remove` |
//! | [`export`] | `covida export` (Anvil XML) |
//! | [`logging`] | Tracing subscriber setup |

pub mod annotate;
pub mod config;
pub mod corpus;
pub mod export;
pub mod get;
pub mod logging;
pub mod search;
pub mod videos;

pub use covida_core::{models, store};
