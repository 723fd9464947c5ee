//! Ranking reset: payout policy, planning, the once-per-day guard, the
//! reset engine and its scheduler

pub mod engine;
pub mod guard;
pub mod plan;
pub mod policy;
pub mod scheduler;

pub use engine::{ResetError, ResetOutcome, ResetReport, execute_daily_reset};
pub use guard::{GuardState, ResetGuard};
pub use policy::ResetPolicy;
pub use scheduler::ResetScheduler;
