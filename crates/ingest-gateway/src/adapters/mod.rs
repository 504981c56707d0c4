//! Bus adapters implementing the outbound ports.

pub mod kafka;
pub mod memory;

pub use kafka::KafkaEventBus;
pub use memory::InMemoryEventBus;
