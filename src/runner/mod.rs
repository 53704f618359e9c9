//! Reconciliation orchestration.
//!
//! - [`dependency`] - Dependency graph and stable ordering
//! - [`engine`] - The check, remediate, re-check loop
//! - [`options`] - Run policy
//! - [`report`] - Per-requirement records and summaries
//! - [`cancel`] - Cooperative cancellation

pub mod cancel;
pub mod dependency;
pub mod engine;
pub mod options;
pub mod report;

pub use cancel::CancellationToken;
pub use dependency::{DependencyGraph, DependencyGraphBuilder};
pub use engine::{Reconciler, RunObserver};
pub use options::RunOptions;
pub use report::{ReconciliationReport, ReportSummary, RequirementRecord};
