//! belign-compare — Statement comparison engine.
//!
//! Pairwise scoring, optimal bipartite matching, classification, and
//! corpus-level aggregation of BEL statements produced by two independent
//! extraction systems.

pub mod aggregate;
pub mod classify;
pub mod matcher;
pub mod pipeline;
pub mod score;
pub mod solver;

pub use aggregate::{Metrics, Tally};
pub use classify::MatchLabel;
pub use matcher::{match_group, GroupReport, MatchRecord};
pub use pipeline::{compare_corpus, compare_groups, CorpusReport, RawCorpus, RawGroup};
pub use score::{score_pair, PairScore, ScoreBreakdown};
pub use solver::{select_solver, AssignmentSolver, ExactSolver, GreedySolver, ScoreMatrix};
