// Queuedesk Core - Queue & Ticket Lifecycle Logic
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{QueueError, QueueManager, SharedQueueManager, TicketPosition};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
