//! Ports connecting the core to its collaborators.

pub mod outbound;

pub use outbound::{EventPublisher, ProbeError, PublishError, SystemTimeSource, TimeSource};
