//! Reconciliation plans: what to change, in which order, and how to apply it.

pub mod executor;
pub mod operation;
pub mod planner;

pub use executor::{execute, ExecutionReport};
pub use operation::{AssetRef, Bindings, GroupRef, Operation, Plan, PlanAction, PlanSummary, Stage};
pub use planner::{is_managed_group, plan, plan_prune};
