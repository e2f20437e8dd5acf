// Queue State Domain Model

use crate::domain::counter::Counter;
use crate::domain::department::Department;
use crate::domain::error::{DomainError, Result};
use crate::domain::ticket::{CounterId, Ticket, TicketStatus, Token};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Canonical queue state
///
/// - `pending`: waiting tickets in issuance order (FIFO across all departments)
/// - `in_service`: in-progress tickets, each referenced by one counter
/// - `counters`: service points keyed by id
/// - `history`: append-only log of terminal tickets
///
/// Tokens are unique among `pending` and `in_service`. A token may reappear in
/// `history` once the allocator has cycled back to it; history entries are
/// distinct tickets.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueState {
    pub(crate) pending: VecDeque<Ticket>,
    pub(crate) in_service: BTreeMap<Token, Ticket>,
    pub(crate) counters: BTreeMap<CounterId, Counter>,
    pub(crate) history: Vec<Ticket>,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Ticket> {
        self.pending.iter()
    }

    /// Waiting tickets for one department, oldest first
    pub fn pending_for(&self, department: Department) -> impl Iterator<Item = &Ticket> {
        self.pending
            .iter()
            .filter(move |t| t.department == department)
    }

    pub fn in_service(&self) -> impl Iterator<Item = &Ticket> {
        self.in_service.values()
    }

    pub fn counters(&self) -> impl Iterator<Item = &Counter> {
        self.counters.values()
    }

    pub fn counter(&self, id: &str) -> Option<&Counter> {
        self.counters.get(id)
    }

    pub fn history(&self) -> &[Ticket] {
        &self.history
    }

    /// Whether the token belongs to a waiting or in-progress ticket
    pub fn is_active(&self, token: &str) -> bool {
        self.in_service.contains_key(token) || self.pending.iter().any(|t| t.token == token)
    }

    /// Verify every structural invariant, returning the first violation
    pub fn check_invariants(&self) -> Result<()> {
        let mut active: HashSet<&str> = HashSet::new();

        let mut last_issued = i64::MIN;
        for ticket in &self.pending {
            if ticket.status != TicketStatus::Waiting {
                return Err(violation(format!(
                    "pending ticket {} has status {}",
                    ticket.token, ticket.status
                )));
            }
            if ticket.issued_at < last_issued {
                return Err(violation(format!(
                    "pending ticket {} is out of issuance order",
                    ticket.token
                )));
            }
            last_issued = ticket.issued_at;
            if !active.insert(&ticket.token) {
                return Err(violation(format!("token {} is duplicated", ticket.token)));
            }
        }

        for (token, ticket) in &self.in_service {
            if ticket.status != TicketStatus::InProgress {
                return Err(violation(format!(
                    "in-service ticket {} has status {}",
                    token, ticket.status
                )));
            }
            if !active.insert(token) {
                return Err(violation(format!("token {} is duplicated", token)));
            }
            let referenced = self
                .counters
                .values()
                .filter(|c| c.current_token.as_deref() == Some(token.as_str()))
                .count();
            if referenced != 1 {
                return Err(violation(format!(
                    "in-service ticket {} is referenced by {} counters",
                    token, referenced
                )));
            }
        }

        for counter in self.counters.values() {
            if let Some(token) = &counter.current_token {
                match self.in_service.get(token) {
                    Some(t) if t.counter_id.as_deref() == Some(counter.id.as_str()) => {}
                    Some(_) => {
                        return Err(violation(format!(
                            "counter {} serves {} but ticket names another counter",
                            counter.id, token
                        )))
                    }
                    None => {
                        return Err(violation(format!(
                            "counter {} references {} which is not in progress",
                            counter.id, token
                        )))
                    }
                }
            }
        }

        if let Some(t) = self.history.iter().find(|t| !t.status.is_terminal()) {
            return Err(violation(format!(
                "history ticket {} has status {}",
                t.token, t.status
            )));
        }

        Ok(())
    }
}

fn violation(msg: String) -> DomainError {
    DomainError::InvariantViolation(msg)
}
