// Counter Domain Model

use crate::domain::department::Department;
use crate::domain::ticket::{CounterId, Token};
use serde::{Deserialize, Serialize};

/// Service point staffed by one operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub department: Department,
    /// Token currently being served (a reference, the queue owns the ticket)
    pub current_token: Option<Token>,
}

impl Counter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, department: Department) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department,
            current_token: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current_token.is_some()
    }
}
