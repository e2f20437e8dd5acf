// Ticket Domain Model

use crate::domain::department::Department;
use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Public ticket identifier (department prefix + sequence, e.g. `A07`)
pub type Token = String;

/// Counter identifier
pub type CounterId = String;

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Waiting,
    InProgress,
    Completed,
    NoShow,
}

impl TicketStatus {
    /// Completed and no-show tickets never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::NoShow)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Waiting => write!(f, "waiting"),
            TicketStatus::InProgress => write!(f, "in-progress"),
            TicketStatus::Completed => write!(f, "completed"),
            TicketStatus::NoShow => write!(f, "no-show"),
        }
    }
}

/// Ticket Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub token: Token,
    pub department: Department,
    pub service: String,
    pub status: TicketStatus,

    pub issued_at: i64, // epoch ms
    pub called_at: Option<i64>,
    pub completed_at: Option<i64>,

    /// Counter that called the ticket
    pub counter_id: Option<CounterId>,

    /// `completed_at - issued_at`, only for completed tickets
    pub wait_duration_ms: Option<i64>,
}

impl Ticket {
    /// Create a new waiting ticket
    ///
    /// # Arguments
    ///
    /// * `token` - Token allocated by the queue (not generated here)
    /// * `issued_at` - Issuance timestamp in epoch ms (injected, not system time)
    /// * `department` - Owning department
    /// * `service` - Human-readable service name
    pub fn new(
        token: impl Into<String>,
        issued_at: i64,
        department: Department,
        service: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            department,
            service: service.into(),
            status: TicketStatus::Waiting,
            issued_at,
            called_at: None,
            completed_at: None,
            counter_id: None,
            wait_duration_ms: None,
        }
    }

    /// Transition to InProgress at the given counter
    pub fn call(&mut self, counter_id: impl Into<String>, now_millis: i64) -> Result<()> {
        self.transition(TicketStatus::Waiting, TicketStatus::InProgress)?;
        self.called_at = Some(now_millis);
        self.counter_id = Some(counter_id.into());
        Ok(())
    }

    /// Transition to Completed, recording the wait duration
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        self.transition(TicketStatus::InProgress, TicketStatus::Completed)?;
        self.completed_at = Some(now_millis);
        self.wait_duration_ms = Some(now_millis - self.issued_at);
        Ok(())
    }

    /// Transition to NoShow (no wait duration, service never rendered)
    pub fn mark_no_show(&mut self, now_millis: i64) -> Result<()> {
        self.transition(TicketStatus::InProgress, TicketStatus::NoShow)?;
        self.completed_at = Some(now_millis);
        Ok(())
    }

    /// Wait duration in whole minutes, if completed
    pub fn wait_minutes(&self) -> Option<i64> {
        self.wait_duration_ms.map(|ms| ms / 60_000)
    }

    fn transition(&mut self, expected: TicketStatus, to: TicketStatus) -> Result<()> {
        if self.status != expected {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}
