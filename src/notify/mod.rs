//! Notifications: pipeline events, their rendering, and the best-effort sink.

pub mod event;
pub mod format;
pub mod sink;
pub mod transport;

pub use event::PipelineEvent;
pub use format::format_event;
pub use sink::{FallbackLog, LogFallback, Notifier, QueueEntry};
pub use transport::{FnTransport, Transport};
