//! Task aggregation engine.
//!
//! Folds an ordered list of task samples (already scoped to a project, and
//! optionally to a single employee) into an overall hour summary plus
//! per-employee breakdowns. Pure function of its input: no I/O, no clock,
//! re-running on the same input yields identical output.
//!
//! Summary-level figures are formatted as fixed two-decimal strings for
//! transport; per-employee figures stay numeric.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::status::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use crate::types::DbId;

/// One task's contribution to the aggregation, flattened with its
/// employee's display fields.
#[derive(Debug, Clone)]
pub struct TaskSample {
    pub employee_id: DbId,
    pub employee_name: String,
    pub employee_email: String,
    /// `None` counts as zero hours.
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Decimal,
    pub status: String,
}

/// Project-level totals. Hour fields are fixed two-decimal strings;
/// `variance_percentage` is the literal string `"0"` when no expected hours
/// were logged (division by zero never occurs).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total_tasks: i64,
    pub total_expected_hours: String,
    pub total_actual_hours: String,
    /// Actual minus expected. Positive = over budget.
    pub variance: String,
    pub variance_percentage: String,
}

/// Per-employee totals, grouped by `employee_id` in first-seen order.
/// The first task's name/email win for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub employee_id: DbId,
    pub employee_name: String,
    pub employee_email: String,
    pub total_tasks: i64,
    pub total_expected_hours: f64,
    pub total_actual_hours: f64,
    pub pending_tasks: i64,
    pub approved_tasks: i64,
    pub rejected_tasks: i64,
}

/// Fold task samples into a [`TaskSummary`] and per-employee breakdowns.
///
/// Per task, exactly one of the pending/approved/rejected counters is
/// incremented; a status outside the known vocabulary contributes hours but
/// is not counted in any status bucket.
pub fn summarize(tasks: &[TaskSample]) -> (TaskSummary, Vec<EmployeeSummary>) {
    let mut total_expected = Decimal::ZERO;
    let mut total_actual = Decimal::ZERO;
    let mut employees: Vec<EmployeeState> = Vec::new();

    for task in tasks {
        let expected = task.expected_hours.unwrap_or(Decimal::ZERO);
        total_expected += expected;
        total_actual += task.actual_hours;

        let entry = match employees.iter_mut().find(|e| e.id == task.employee_id) {
            Some(entry) => entry,
            None => {
                employees.push(EmployeeState::new(task));
                employees.last_mut().unwrap()
            }
        };

        entry.total_tasks += 1;
        entry.expected += expected;
        entry.actual += task.actual_hours;
        match task.status.as_str() {
            STATUS_PENDING => entry.pending += 1,
            STATUS_APPROVED => entry.approved += 1,
            STATUS_REJECTED => entry.rejected += 1,
            _ => {}
        }
    }

    let variance = total_actual - total_expected;
    let variance_percentage = if total_expected > Decimal::ZERO {
        format!("{:.2}", (variance / total_expected) * Decimal::from(100))
    } else {
        "0".to_string()
    };

    let summary = TaskSummary {
        total_tasks: tasks.len() as i64,
        total_expected_hours: format!("{total_expected:.2}"),
        total_actual_hours: format!("{total_actual:.2}"),
        variance: format!("{variance:.2}"),
        variance_percentage,
    };

    (summary, employees.into_iter().map(EmployeeState::finish).collect())
}

/// Mutable accumulator for one employee, converted to [`EmployeeSummary`]
/// once the fold completes.
struct EmployeeState {
    id: DbId,
    name: String,
    email: String,
    total_tasks: i64,
    expected: Decimal,
    actual: Decimal,
    pending: i64,
    approved: i64,
    rejected: i64,
}

impl EmployeeState {
    fn new(task: &TaskSample) -> Self {
        Self {
            id: task.employee_id,
            name: task.employee_name.clone(),
            email: task.employee_email.clone(),
            total_tasks: 0,
            expected: Decimal::ZERO,
            actual: Decimal::ZERO,
            pending: 0,
            approved: 0,
            rejected: 0,
        }
    }

    fn finish(self) -> EmployeeSummary {
        EmployeeSummary {
            employee_id: self.id,
            employee_name: self.name,
            employee_email: self.email,
            total_tasks: self.total_tasks,
            total_expected_hours: self.expected.to_f64().unwrap_or(0.0),
            total_actual_hours: self.actual.to_f64().unwrap_or(0.0),
            pending_tasks: self.pending,
            approved_tasks: self.approved,
            rejected_tasks: self.rejected,
        }
    }
}
