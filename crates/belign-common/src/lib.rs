//! belign-common — Shared types, errors, and configuration used across all
//! Belign crates.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::{CompareConfig, ModificationMap, SolverKind};
pub use error::{BelignError, ParseError, Result};
pub use model::{
    Entity, EvidenceGroup, FuncTag, Modifier, MolecularActivity, ParseFailure, Polarity,
    Relationship, Source, Statement, Term,
};
