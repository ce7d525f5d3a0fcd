//! # Ontomatch-RS: Concept/Method Matching Engine
//!
//! A library for linking source-code methods to domain-ontology concepts by
//! comparing the term vocabulary of their names, and for projecting the
//! resulting links over recorded execution traces. This library provides:
//!
//! - **Stem extraction**: identifier and concept names decomposed into
//!   normalized, stemmed term forests
//! - **Vector-space matching**: tf-idf weighting over the shared term
//!   vocabulary with cosine and overlap scoring strategies
//! - **Trace analysis**: concept activity as a time series over an
//!   execution trace, compressible into fixed-size segments
//!
//! All computation is synchronous, deterministic and free of global state;
//! external storage sits behind the narrow [`io::store::ProjectStore`]
//! boundary.
//!
//! ## Architecture
//!
//! ```text
//! names ──► stem forests ──► inverted indexes
//!                                  │
//!                                  ▼
//!               term-document matrices (tf, idf, tf-idf)
//!                                  │
//!                                  ▼
//!              cosine matcher ──► method↔concept edges
//!                                  │
//!                                  ▼
//!         trace time series ──► threshold segmentation
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ontomatch_rs::core::model::{Concept, ConceptId, Method, MethodId, ProjectId};
//! use ontomatch_rs::io::store::MemoryStore;
//! use ontomatch_rs::{EngineConfig, MatchingEngine};
//!
//! fn main() -> ontomatch_rs::Result<()> {
//!     let project = ProjectId(1);
//!     let mut store = MemoryStore::new();
//!     store.add_concept(Concept::new(ConceptId(1), project, "Bank Account"));
//!     store.add_method(Method::new(MethodId(1), project, "openAccount"));
//!
//!     let engine = MatchingEngine::new(EngineConfig::default())?;
//!     let matches = engine.compute_matches(&mut store, project)?;
//!
//!     println!("matching produced {} edges", matches.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core data model and numeric kernels
pub mod core {
    //! Core data structures and the tf-idf arithmetic.

    pub mod config;
    pub mod errors;
    pub mod matrix;
    pub mod model;
    pub mod stems;
    pub mod vocabulary;
}

// Name-to-term extraction and stem-forest construction
pub mod stemming;

// Pipeline stages over the core model
pub mod analyzers {
    //! Pipeline stages: indexing, matching, trace analysis.

    pub mod matcher;
    pub mod stem_index;
    pub mod timeseries;
}

// Storage boundary and export
pub mod io {
    //! The store boundary and match-edge export.

    pub mod export;
    pub mod store;
}

// Public facade
pub mod api {
    //! High-level engine API.

    pub mod engine;
}

// Re-export the main public API at the crate root
pub use api::engine::MatchingEngine;
pub use core::config::{EngineConfig, MatchingConfig, SegmentationConfig};
pub use core::errors::{OntomatchError, Result};
pub use core::model::{MatchEdge, MatchSet, SegmentedTimeSeries, TimeSeries};

/// Current version of the ontomatch library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
