//! Department summary with approved-prompt counts.

use std::collections::HashMap;

use serde::Serialize;

use crate::taxonomy::Department;

/// One row of the department overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub id: Department,
    pub name: &'static str,
    pub count: i64,
}

/// Build the summary for every department, in display order.
///
/// Departments missing from `counts` are reported with 0.
pub fn department_summaries(counts: &HashMap<Department, i64>) -> Vec<DepartmentSummary> {
    Department::all()
        .iter()
        .map(|dept| DepartmentSummary {
            id: *dept,
            name: dept.name(),
            count: counts.get(dept).copied().unwrap_or(0),
        })
        .collect()
}
