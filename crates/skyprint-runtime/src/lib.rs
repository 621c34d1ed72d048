//! Skyprint Runtime - Host loop infrastructure
//!
//! Provides the building blocks a host uses to drive fireworks:
//! - `FrameClock`: fixed-step or wall-clock frame timing
//! - `EventBus`: typed event queue for handing simulation events to consumers
//! - `RuntimeSystem`: trait for systems ticked by the host loop

mod clock;
mod event_bus;
mod system;

pub use clock::FrameClock;
pub use event_bus::EventBus;
pub use system::RuntimeSystem;
