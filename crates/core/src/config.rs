// Queue Configuration

use crate::domain::Department;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minutes each waiting ticket ahead adds to an estimate
pub const DEFAULT_PER_TICKET_ESTIMATE_MINUTES: u32 = 15;

/// Counter definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    pub id: String,
    pub name: String,
    pub department: Department,
}

/// Queue manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub per_ticket_estimate_minutes: u32,
    pub counters: Vec<CounterConfig>,
}

impl Default for QueueConfig {
    /// One counter per department, `counter-1` through `counter-5`
    fn default() -> Self {
        let counters = Department::ALL
            .iter()
            .enumerate()
            .map(|(i, dept)| CounterConfig {
                id: format!("counter-{}", i + 1),
                name: format!("Counter {}", i + 1),
                department: *dept,
            })
            .collect();

        Self {
            per_ticket_estimate_minutes: DEFAULT_PER_TICKET_ESTIMATE_MINUTES,
            counters,
        }
    }
}

impl QueueConfig {
    /// Reject configurations the manager cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.per_ticket_estimate_minutes == 0 {
            return Err(AppError::Config(
                "per_ticket_estimate_minutes must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for counter in &self.counters {
            if counter.id.trim().is_empty() {
                return Err(AppError::Config("counter id cannot be empty".to_string()));
            }
            if !seen.insert(counter.id.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate counter id: {}",
                    counter.id
                )));
            }
        }
        Ok(())
    }
}
