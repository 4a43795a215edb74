//! Plan execution.
//!
//! Stages run in order and operations one at a time. The first failure
//! stops the run; operations already applied stay applied.

use serde::Serialize;

use super::operation::{Bindings, Plan};
use crate::api::Remote;
use crate::error::{CliError, CliResult};

/// Outcome of running a plan.
#[derive(Debug, Default, Serialize)]
pub struct ExecutionReport {
    /// Descriptions of the operations that succeeded, in order.
    pub applied: Vec<String>,
    /// The operation that failed and why.
    pub failed: Option<FailedOperation>,
}

#[derive(Debug, Serialize)]
pub struct FailedOperation {
    pub operation: String,
    pub error: String,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }

    /// Turn a failed run into `CliError::ApplyFailed`.
    pub fn into_result(self) -> CliResult<Self> {
        match self.failed {
            None => Ok(self),
            Some(failed) => Err(CliError::ApplyFailed {
                applied: self.applied.len(),
                operation: failed.operation,
                message: failed.error,
            }),
        }
    }
}

pub async fn execute(plan: &Plan, remote: &dyn Remote) -> ExecutionReport {
    let mut bindings = Bindings::default();
    let mut report = ExecutionReport::default();

    for operation in plan.operations() {
        let description = operation.to_string();
        match operation.apply(remote, plan.team_id, &mut bindings).await {
            Ok(()) => {
                tracing::info!(
                    team = %plan.team_name,
                    stage = %operation.stage(),
                    operation = %description,
                    "Applied operation"
                );
                report.applied.push(description);
            }
            Err(e) => {
                tracing::error!(
                    team = %plan.team_name,
                    stage = %operation.stage(),
                    operation = %description,
                    error = %e,
                    applied = report.applied.len(),
                    "Operation failed, aborting"
                );
                report.failed = Some(FailedOperation {
                    operation: description,
                    error: e.to_string(),
                });
                break;
            }
        }
    }
    report
}
