// Domain Layer - Pure business logic and entities

pub mod counter;
pub mod department;
pub mod error;
pub mod queue;
pub mod ticket;

// Re-exports
pub use counter::Counter;
pub use department::Department;
pub use error::DomainError;
pub use queue::QueueState;
pub use ticket::{CounterId, Ticket, TicketStatus, Token};
