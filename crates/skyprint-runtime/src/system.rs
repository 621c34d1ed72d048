//! Runtime system trait

use skyprint_core::Result;

/// A system that can be ticked by the host loop
///
/// The host calls `update` once per frame on a single thread. Systems never
/// block and never spawn work of their own.
pub trait RuntimeSystem {
    /// Called once before the first frame
    fn initialize(&mut self) -> Result<()>;

    /// Called once per frame with the frame's delta time in seconds
    fn update(&mut self, dt: f64) -> Result<()>;

    /// Called when the host tears the system down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
