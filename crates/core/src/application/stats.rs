// Queue statistics (analytics roll-up)

use crate::domain::{Department, QueueState, TicketStatus};
use serde::Serialize;

/// Per-department counters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub department: Department,
    pub waiting: usize,
    pub in_service: usize,
    pub completed: usize,
    pub no_show: usize,
    /// Mean wait of completed tickets, `None` until one completes
    pub average_wait_minutes: Option<f64>,
}

/// Whole-queue statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub waiting: usize,
    pub in_service: usize,
    pub completed: usize,
    pub no_show: usize,
    pub average_wait_minutes: Option<f64>,
    pub departments: Vec<DepartmentStats>,
}

impl QueueStats {
    pub fn from_state(state: &QueueState) -> Self {
        let departments: Vec<DepartmentStats> = Department::ALL
            .iter()
            .map(|dept| department_stats(state, *dept))
            .collect();

        let waits: Vec<i64> = state
            .history()
            .iter()
            .filter_map(|t| t.wait_duration_ms)
            .collect();

        Self {
            waiting: departments.iter().map(|d| d.waiting).sum(),
            in_service: departments.iter().map(|d| d.in_service).sum(),
            completed: departments.iter().map(|d| d.completed).sum(),
            no_show: departments.iter().map(|d| d.no_show).sum(),
            average_wait_minutes: average_minutes(&waits),
            departments,
        }
    }

    pub fn department(&self, department: Department) -> Option<&DepartmentStats> {
        self.departments.iter().find(|d| d.department == department)
    }
}

fn department_stats(state: &QueueState, department: Department) -> DepartmentStats {
    let history = state
        .history()
        .iter()
        .filter(|t| t.department == department);

    let mut completed = 0;
    let mut no_show = 0;
    let mut waits = Vec::new();
    for ticket in history {
        match ticket.status {
            TicketStatus::Completed => {
                completed += 1;
                if let Some(wait) = ticket.wait_duration_ms {
                    waits.push(wait);
                }
            }
            TicketStatus::NoShow => no_show += 1,
            _ => {}
        }
    }

    DepartmentStats {
        department,
        waiting: state.pending_for(department).count(),
        in_service: state
            .in_service()
            .filter(|t| t.department == department)
            .count(),
        completed,
        no_show,
        average_wait_minutes: average_minutes(&waits),
    }
}

fn average_minutes(waits_ms: &[i64]) -> Option<f64> {
    if waits_ms.is_empty() {
        return None;
    }
    let total: i64 = waits_ms.iter().sum();
    Some(total as f64 / waits_ms.len() as f64 / 60_000.0)
}
