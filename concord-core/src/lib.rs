//! # concord-core
//!
//! Core data types shared by the concord crates:
//!
//! - [`Correspondence`]: a `(source, target, relation, confidence)` link
//! - [`CorrespondenceRelation`]: `=`, `<`, `>`, `%`, ...
//! - [`Alignment`]: an indexed set of correspondences
//! - [`Ontology`]: the read-only view of an ontology the evaluation needs,
//!   with [`TripleOntology`] as in-memory implementation
//!
//! Evaluation and refinement live in the `concord` crate; hierarchy
//! utilities in `concord-hierarchy`.

#![warn(missing_docs)]

pub mod alignment;
pub mod correspondence;
pub mod error;
pub mod ontology;
pub mod relation;

pub use alignment::Alignment;
pub use correspondence::Correspondence;
pub use error::{Error, Result};
pub use ontology::{Object, Ontology, ResourceType, TripleOntology};
pub use relation::CorrespondenceRelation;
