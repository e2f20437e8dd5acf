// Application Layer - Use Cases and Business Logic

pub mod queue_manager;
pub mod shared;
pub mod shutdown;
pub mod stats;

// Re-exports
pub use queue_manager::{QueueError, QueueManager, QueueSnapshot, TicketPosition};
pub use shared::SharedQueueManager;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use stats::{DepartmentStats, QueueStats};
