//! Slidecast Orchestrator
//!
//! Sequences a single run:
//!
//! ```text
//! Init ──► DryRunCheck ──► [dry run] Discovery ──► Planning ──► summary
//!                │
//!                └──► Discovery ──► Planning ──► Selection ──► Delegation ──► Cleanup ──► Done
//! ```
//!
//! Any stage may end the run as `Failed`. Only cleanup errors are swallowed.

pub mod pipeline;
pub mod summary;

pub use pipeline::*;
pub use summary::PlanSummary;
