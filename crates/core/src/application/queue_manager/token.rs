// Token allocation

use super::error::QueueError;
use crate::domain::{Department, QueueState, Token};
use std::collections::{BTreeMap, HashSet};

/// Highest sequence number of a two-digit token
pub const TOKEN_SEQUENCE_LIMIT: u32 = 99;

/// Sequential per-department token allocator.
///
/// Each department cycles through `01..=99`, continuing after the last
/// issued sequence and skipping any token that is still waiting or being
/// served.
#[derive(Debug, Default, Clone)]
pub struct TokenAllocator {
    last_issued: BTreeMap<Department, u32>,
}

impl TokenAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free token for `department`
    pub fn allocate(
        &mut self,
        department: Department,
        state: &QueueState,
    ) -> Result<Token, QueueError> {
        let active: HashSet<&str> = state
            .pending_for(department)
            .chain(state.in_service().filter(|t| t.department == department))
            .map(|t| t.token.as_str())
            .collect();

        let mut sequence = self.last_issued.get(&department).copied().unwrap_or(0);
        for _ in 0..TOKEN_SEQUENCE_LIMIT {
            sequence = sequence % TOKEN_SEQUENCE_LIMIT + 1;
            let token = format_token(department, sequence);
            if !active.contains(token.as_str()) {
                self.last_issued.insert(department, sequence);
                return Ok(token);
            }
        }

        Err(QueueError::TokenSpaceExhausted(department))
    }
}

pub fn format_token(department: Department, sequence: u32) -> Token {
    format!("{}{:02}", department.prefix(), sequence)
}
