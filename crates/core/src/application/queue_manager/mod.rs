// Queue Manager - Core use cases for the ticket lifecycle

pub mod error;
pub mod token;

#[cfg(test)]
mod manager_test;

pub use error::QueueError;
pub use token::TokenAllocator;

use crate::application::stats::QueueStats;
use crate::config::QueueConfig;
use crate::domain::{
    Counter, CounterId, Department, DomainError, QueueState, Ticket, TicketStatus, Token,
};
use crate::port::TimeProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Where a ticket stands from the citizen's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum TicketPosition {
    /// 1-based place among the department's waiting tickets
    #[serde(rename_all = "camelCase")]
    Waiting {
        position: usize,
        estimated_wait_minutes: u64,
    },
    /// Currently at a counter
    #[serde(rename_all = "camelCase")]
    BeingServed { counter_id: CounterId },
}

impl TicketPosition {
    /// Numeric position, 0 while being served
    pub fn position(&self) -> usize {
        match self {
            TicketPosition::Waiting { position, .. } => *position,
            TicketPosition::BeingServed { .. } => 0,
        }
    }
}

/// Consistent copy of the whole queue for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub taken_at: i64, // epoch ms
    pub state: QueueState,
}

/// Owns the canonical `QueueState` and applies every lifecycle transition.
///
/// All operations are synchronous and either succeed completely or return a
/// `QueueError` without touching the state. Wrap in
/// [`SharedQueueManager`](crate::application::SharedQueueManager) for
/// concurrent callers.
pub struct QueueManager {
    state: QueueState,
    tokens: TokenAllocator,
    time_provider: Arc<dyn TimeProvider>,
    per_ticket_estimate_minutes: u32,
}

impl QueueManager {
    pub fn new(time_provider: Arc<dyn TimeProvider>, per_ticket_estimate_minutes: u32) -> Self {
        Self::with_state(QueueState::new(), time_provider, per_ticket_estimate_minutes)
    }

    /// Take ownership of an existing state
    pub fn with_state(
        state: QueueState,
        time_provider: Arc<dyn TimeProvider>,
        per_ticket_estimate_minutes: u32,
    ) -> Self {
        Self {
            state,
            tokens: TokenAllocator::new(),
            time_provider,
            per_ticket_estimate_minutes,
        }
    }

    /// Build a manager with the configured counters registered
    pub fn from_config(
        config: &QueueConfig,
        time_provider: Arc<dyn TimeProvider>,
    ) -> crate::error::Result<Self> {
        config.validate()?;

        let mut manager = Self::new(time_provider, config.per_ticket_estimate_minutes);
        for counter in &config.counters {
            manager.add_counter(&counter.id, &counter.name, counter.department)?;
        }
        Ok(manager)
    }

    pub fn state(&self) -> &QueueState {
        &self.state
    }

    pub fn into_state(self) -> QueueState {
        self.state
    }

    pub fn per_ticket_estimate_minutes(&self) -> u32 {
        self.per_ticket_estimate_minutes
    }

    pub fn counter(&self, counter_id: &str) -> Option<&Counter> {
        self.state.counter(counter_id)
    }

    /// Register a counter
    pub fn add_counter(
        &mut self,
        id: &str,
        name: &str,
        department: Department,
    ) -> Result<(), QueueError> {
        if self.state.counters.contains_key(id) {
            return Err(QueueError::DuplicateCounter(id.to_string()));
        }
        self.state
            .counters
            .insert(id.to_string(), Counter::new(id, name, department));
        debug!(counter_id = %id, department = %department, "Counter registered");
        Ok(())
    }

    /// Issue a new waiting ticket for a department id such as `civil-registration`
    pub fn enqueue(
        &mut self,
        department: &str,
        service: impl Into<String>,
    ) -> Result<Ticket, QueueError> {
        let department: Department = department
            .parse()
            .map_err(|_| QueueError::InvalidDepartment(department.to_string()))?;
        self.enqueue_for(department, service)
    }

    /// Issue a new waiting ticket
    pub fn enqueue_for(
        &mut self,
        department: Department,
        service: impl Into<String>,
    ) -> Result<Ticket, QueueError> {
        let token = self.tokens.allocate(department, &self.state)?;

        // Issuance never goes backwards so pending stays sorted
        let now = self.time_provider.now_millis();
        let issued_at = self
            .state
            .pending
            .back()
            .map_or(now, |last| now.max(last.issued_at));

        let ticket = Ticket::new(token, issued_at, department, service);
        self.state.pending.push_back(ticket.clone());

        debug!(
            token = %ticket.token,
            department = %department,
            service = %ticket.service,
            "Ticket enqueued"
        );
        Ok(ticket)
    }

    /// Call the oldest waiting ticket of the counter's department
    pub fn call_next(&mut self, counter_id: &str) -> Result<Ticket, QueueError> {
        let counter = self
            .state
            .counters
            .get(counter_id)
            .ok_or_else(|| QueueError::UnknownCounter(counter_id.to_string()))?;

        if let Some(token) = &counter.current_token {
            return Err(QueueError::CounterBusy {
                counter_id: counter_id.to_string(),
                token: token.clone(),
            });
        }

        let department = counter.department;
        let index = self
            .state
            .pending
            .iter()
            .position(|t| t.department == department)
            .ok_or(QueueError::QueueEmpty(department))?;

        let now = self.time_provider.now_millis();
        self.state.pending[index].call(counter_id, now)?;

        let ticket = self
            .state
            .pending
            .remove(index)
            .ok_or_else(|| invariant("pending index vanished"))?;
        self.state
            .in_service
            .insert(ticket.token.clone(), ticket.clone());
        if let Some(counter) = self.state.counters.get_mut(counter_id) {
            counter.current_token = Some(ticket.token.clone());
        }

        debug!(token = %ticket.token, counter_id = %counter_id, "Ticket called");
        Ok(ticket)
    }

    /// Finish the counter's current ticket as completed
    pub fn complete_service(&mut self, counter_id: &str) -> Result<Ticket, QueueError> {
        self.finish(counter_id, Ticket::complete)
    }

    /// Finish the counter's current ticket as a no-show
    pub fn mark_no_show(&mut self, counter_id: &str) -> Result<Ticket, QueueError> {
        self.finish(counter_id, Ticket::mark_no_show)
    }

    fn finish(
        &mut self,
        counter_id: &str,
        transition: fn(&mut Ticket, i64) -> crate::domain::error::Result<()>,
    ) -> Result<Ticket, QueueError> {
        let counter = self
            .state
            .counters
            .get(counter_id)
            .ok_or_else(|| QueueError::UnknownCounter(counter_id.to_string()))?;
        let token = counter
            .current_token
            .clone()
            .ok_or_else(|| QueueError::NoActiveService(counter_id.to_string()))?;

        let now = self.time_provider.now_millis();
        let ticket = self
            .state
            .in_service
            .get_mut(&token)
            .ok_or_else(|| invariant(format!("counter {} references {}", counter_id, token)))?;
        transition(ticket, now)?;

        let ticket = self
            .state
            .in_service
            .remove(&token)
            .ok_or_else(|| invariant(format!("{} left service early", token)))?;
        if let Some(counter) = self.state.counters.get_mut(counter_id) {
            counter.current_token = None;
        }
        self.state.history.push(ticket.clone());

        debug!(
            token = %ticket.token,
            counter_id = %counter_id,
            status = %ticket.status,
            wait_ms = ?ticket.wait_duration_ms,
            "Service finished"
        );
        Ok(ticket)
    }

    /// Position and estimated wait of a waiting ticket, or where it is served
    pub fn position_of(&self, token: &str) -> Result<TicketPosition, QueueError> {
        if let Some(ticket) = self.state.in_service.get(token) {
            let counter_id = ticket
                .counter_id
                .clone()
                .ok_or_else(|| invariant(format!("{} has no counter", token)))?;
            return Ok(TicketPosition::BeingServed { counter_id });
        }

        let department = self
            .state
            .pending
            .iter()
            .find(|t| t.token == token)
            .map(|t| t.department)
            .ok_or_else(|| QueueError::NotFound(token.to_string()))?;

        let index = self
            .state
            .pending_for(department)
            .position(|t| t.token == token)
            .ok_or_else(|| QueueError::NotFound(token.to_string()))?;

        let position = index + 1;
        Ok(TicketPosition::Waiting {
            position,
            estimated_wait_minutes: position as u64 * u64::from(self.per_ticket_estimate_minutes),
        })
    }

    /// Waiting tickets for one department, oldest first
    pub fn pending_for(&self, department: Department) -> Vec<Ticket> {
        self.state.pending_for(department).cloned().collect()
    }

    /// Look a token up among active tickets, then the most recent history entry
    pub fn find_ticket(&self, token: &str) -> Option<Ticket> {
        self.state
            .in_service
            .get(token)
            .or_else(|| self.state.pending.iter().find(|t| t.token == token))
            .or_else(|| self.state.history.iter().rev().find(|t| t.token == token))
            .cloned()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            taken_at: self.time_provider.now_millis(),
            state: self.state.clone(),
        }
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats::from_state(&self.state)
    }

    /// Count of tickets with the given status
    pub fn count(&self, status: TicketStatus) -> usize {
        match status {
            TicketStatus::Waiting => self.state.pending.len(),
            TicketStatus::InProgress => self.state.in_service.len(),
            _ => self
                .state
                .history
                .iter()
                .filter(|t| t.status == status)
                .count(),
        }
    }

    /// Tokens currently waiting or being served
    pub fn active_tokens(&self) -> Vec<Token> {
        self.state
            .pending
            .iter()
            .chain(self.state.in_service.values())
            .map(|t| t.token.clone())
            .collect()
    }
}

fn invariant(msg: impl Into<String>) -> QueueError {
    QueueError::Domain(DomainError::InvariantViolation(msg.into()))
}
