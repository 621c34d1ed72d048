//! Skyprint Fireworks - pattern-reforming firework simulation
//!
//! Turns a sparse painted pattern into a cloud of particles that:
//! - bursts outward from a spawn point (Burst)
//! - steers back into the painted pattern (Steer)
//! - sparkles in formation (Hold)
//! - drifts down and shrinks away (Fade)
//!
//! Phases are configured per firework and run strictly in order. Simulation
//! is single-threaded and tick-driven: the host calls `update` once per frame.

pub mod config;
pub mod curves;
pub mod formation;
pub mod instance;
pub mod kinematics;
pub mod particle;
pub mod pattern;
pub mod phase;
pub mod rand;
pub mod registry;
pub mod show;

use skyprint_core::Result;
use skyprint_runtime::RuntimeSystem;
use std::sync::Arc;

pub use config::{DebrisHoldMode, FireworkConfig, Phase, PhaseCarryover, PhaseKind};
pub use curves::ProgressCurve;
pub use instance::FireworkInstance;
pub use particle::{Particle, ParticleCategory, ParticleInstance, ParticleKind, RenderParticle};
pub use pattern::{Pattern, PixelCell};
pub use phase::{PhaseSequencer, PhaseStep};
pub use registry::ActiveInstanceRegistry;
pub use show::{FireworkEvent, FireworkShow, ParticleDrawData};

/// The firework system: implements RuntimeSystem for integration with the host loop.
pub struct FireworkSystem {
    pub show: FireworkShow,
}

impl FireworkSystem {
    pub fn new(config: Arc<FireworkConfig>, seed: u64) -> Self {
        Self {
            show: FireworkShow::new(config, seed),
        }
    }
}

impl Default for FireworkSystem {
    fn default() -> Self {
        Self::new(Arc::new(FireworkConfig::default()), 0xDEAD_BEEF)
    }
}

impl RuntimeSystem for FireworkSystem {
    fn initialize(&mut self) -> Result<()> {
        let config = self.show.config();
        log::info!(
            "firework system ready: {} phase(s), {:.2}s per show, {} debris per launch",
            config.phases.len(),
            config.total_duration(),
            config.debris_particle_count
        );
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        self.show.update(dt as f32);
        self.show.pack_instances();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.show.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "fireworks"
    }
}
