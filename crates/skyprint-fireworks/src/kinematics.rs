//! Per-phase particle update rules: Burst, Steer, Hold, Fade
//!
//! Each rule runs once per live particle per tick and never allocates.

use crate::config::{DebrisHoldMode, FireworkConfig, PhaseKind};
use crate::curves::lerp_f32;
use crate::particle::{Particle, ParticleKind};
use crate::rand::ParticleRng;
use skyprint_core::Vec3;

/// Everything a phase rule needs to know about the current tick
#[derive(Debug, Clone, Copy)]
pub struct PhaseTick {
    pub kind: PhaseKind,
    /// Curve-mapped progress through the phase, in [0, 1]
    pub progress: f32,
    /// True on the first tick spent in this phase
    pub entered: bool,
    pub dt: f32,
}

/// Apply the active phase's rule to every live particle
pub fn apply_phase(
    tick: &PhaseTick,
    config: &FireworkConfig,
    particles: &mut [Particle],
    rng: &mut ParticleRng,
) {
    match tick.kind {
        PhaseKind::Burst => burst(tick, config, particles, rng),
        PhaseKind::Steer => steer(tick, config, particles),
        PhaseKind::Hold => hold(tick, config, particles, rng),
        PhaseKind::Fade => fade(tick, config, particles),
    }
}

/// Acceleration pulling a particle toward its formation target.
///
/// A spring toward the target: proportional to the offset, scaled by
/// `strength * influence`. Negative scales are treated as zero, so the
/// result never points away from the target.
pub fn steering_acceleration(position: Vec3, target: Vec3, strength: f32, influence: f32) -> Vec3 {
    let gain = strength.max(0.0) * influence.max(0.0);
    (target - position) * gain
}

/// Random outward velocity for a particle entering Burst
pub fn burst_velocity(particle: &Particle, config: &FireworkConfig, rng: &mut ParticleRng) -> Vec3 {
    let dir = rng.random_direction();
    let [lo, hi] = config.burst_speed_jitter;
    let mut speed = config.burst_radius * rng.range(lo, hi);
    if particle.kind == ParticleKind::Debris {
        speed *= config.debris_speed_multiplier;
    }
    dir * speed
}

fn burst(tick: &PhaseTick, config: &FireworkConfig, particles: &mut [Particle], rng: &mut ParticleRng) {
    for p in particles.iter_mut().filter(|p| p.alive) {
        if tick.entered {
            p.velocity = burst_velocity(p, config, rng);
        }
        p.size = config.particle_size;
        p.position += p.velocity * tick.dt;
        p.velocity *= config.burst_drag;
    }
}

fn steer(tick: &PhaseTick, config: &FireworkConfig, particles: &mut [Particle]) {
    let influence = config.steer_progress_curve.evaluate(tick.progress);
    for p in particles.iter_mut().filter(|p| p.alive) {
        p.size = config.particle_size;
        match p.kind {
            ParticleKind::Pattern { target } => {
                let accel =
                    steering_acceleration(p.position, target, config.steer_strength, influence);
                p.velocity += accel * tick.dt;
                p.velocity *= config.steer_damping;
            }
            ParticleKind::Debris => {
                p.velocity *= config.steer_debris_drag;
            }
        }
        p.position += p.velocity * tick.dt;
    }
}

fn hold(tick: &PhaseTick, config: &FireworkConfig, particles: &mut [Particle], rng: &mut ParticleRng) {
    let jitter = config.hold_jitter_scale * config.hold_sparkle_intensity;
    for p in particles.iter_mut().filter(|p| p.alive) {
        p.size = config.particle_size;
        match p.kind {
            ParticleKind::Pattern { target } => {
                p.velocity = Vec3::ZERO;
                p.position = target + rng.random_in_unit_sphere() * jitter;
            }
            ParticleKind::Debris => match config.debris_hold {
                DebrisHoldMode::Drift => {
                    p.velocity *= config.steer_debris_drag;
                    p.position += p.velocity * tick.dt;
                }
                DebrisHoldMode::Freeze => {
                    p.velocity = Vec3::ZERO;
                }
            },
        }
    }
}

fn fade(tick: &PhaseTick, config: &FireworkConfig, particles: &mut [Particle]) {
    let size = config.particle_size
        * lerp_f32(1.0, config.particle_size_fade_multiplier, tick.progress);
    for p in particles.iter_mut().filter(|p| p.alive) {
        p.position.y -= config.fade_gravity * tick.dt;
        p.size = size;
    }
}
