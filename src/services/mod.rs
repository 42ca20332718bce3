pub mod branch_protection;
pub mod outcome_sink;

pub use branch_protection::{ApiResponse, BranchProtectionService};
pub use outcome_sink::OutcomeSink;
