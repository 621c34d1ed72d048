//! Firework configuration (parsed from TOML), phase definitions, and load-time validation

use crate::curves::ProgressCurve;
use serde::{Deserialize, Serialize};
use skyprint_core::{Result, Rgba8, SkyprintError};
use std::path::Path;

/// Shortest phase a config may declare. Shorter or non-positive durations are
/// raised to this so progress never divides by zero.
pub const MIN_PHASE_DURATION: f32 = 1e-3;

/// Floor for parameters that must be strictly positive
pub const MIN_POSITIVE: f32 = 1e-4;

/// Which kinematic rule a phase applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Burst,
    Steer,
    Hold,
    Fade,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Burst => "burst",
            PhaseKind::Steer => "steer",
            PhaseKind::Hold => "hold",
            PhaseKind::Fade => "fade",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One timed segment of a firework's life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Display label only
    #[serde(default)]
    pub name: String,
    pub kind: PhaseKind,
    /// Seconds
    pub duration: f32,
    #[serde(default)]
    pub curve: ProgressCurve,
}

impl Phase {
    pub fn new(kind: PhaseKind, duration: f32, curve: ProgressCurve) -> Self {
        Self {
            name: kind.as_str().to_string(),
            kind,
            duration,
            curve,
        }
    }

    /// Curve-mapped progress after `elapsed` seconds in this phase
    pub fn progress(&self, elapsed: f32) -> f32 {
        self.curve.evaluate(elapsed / self.duration)
    }
}

/// What to do with time left over when a phase runs out mid-tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseCarryover {
    /// Start the next phase at zero
    #[default]
    Drop,
    /// Start the next phase with the overshoot already elapsed
    Carry,
}

/// How debris behaves while pattern particles hold their formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebrisHoldMode {
    /// Keep drifting, decaying by `steer_debris_drag` every tick
    #[default]
    Drift,
    /// Stop in place
    Freeze,
}

/// Immutable parameters shared by every firework launched with them.
///
/// Build one with [`FireworkConfig::from_toml_str`] or [`FireworkConfig::load`],
/// or fill in the fields and call [`FireworkConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkConfig {
    /// Outward burst speed scale (world units per second)
    pub burst_radius: f32,
    /// Per-tick velocity retention during Burst, in (0, 1]
    pub burst_drag: f32,
    /// Range of the per-particle random factor applied to burst speed
    pub burst_speed_jitter: [f32; 2],
    pub steer_strength: f32,
    /// Ramps steering influence in over the Steer phase
    pub steer_progress_curve: ProgressCurve,
    /// Per-tick velocity retention for pattern particles during Steer
    pub steer_damping: f32,
    /// Per-tick velocity retention for debris during Steer (and drifting Hold)
    pub steer_debris_drag: f32,
    pub hold_sparkle_intensity: f32,
    pub hold_jitter_scale: f32,
    /// Downward drift speed during Fade (world units per second)
    pub fade_gravity: f32,
    pub debris_particle_count: usize,
    pub debris_speed_multiplier: f32,
    pub debris_colors: Vec<Rgba8>,
    pub debris_hold: DebrisHoldMode,
    pub particle_size: f32,
    /// Size fraction left at the end of Fade, in [0, 1]
    pub particle_size_fade_multiplier: f32,
    /// World units per pattern cell
    pub formation_scale: f32,
    pub phase_carryover: PhaseCarryover,
    pub phases: Vec<Phase>,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            burst_radius: 6.0,
            burst_drag: 0.94,
            burst_speed_jitter: [0.5, 1.0],
            steer_strength: 8.0,
            steer_progress_curve: ProgressCurve::EaseIn,
            steer_damping: 0.9,
            steer_debris_drag: 0.96,
            hold_sparkle_intensity: 1.0,
            hold_jitter_scale: 0.04,
            fade_gravity: 1.5,
            debris_particle_count: 64,
            debris_speed_multiplier: 1.5,
            debris_colors: vec![Rgba8::GOLD, Rgba8::WHITE],
            debris_hold: DebrisHoldMode::Drift,
            particle_size: 0.12,
            particle_size_fade_multiplier: 0.2,
            formation_scale: 0.25,
            phase_carryover: PhaseCarryover::Drop,
            phases: vec![
                Phase::new(PhaseKind::Burst, 0.8, ProgressCurve::EaseOut),
                Phase::new(PhaseKind::Steer, 1.6, ProgressCurve::SmoothStep),
                Phase::new(PhaseKind::Hold, 1.2, ProgressCurve::Linear),
                Phase::new(PhaseKind::Fade, 1.0, ProgressCurve::EaseIn),
            ],
        }
    }
}

impl FireworkConfig {
    /// Parse and validate a config from TOML
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: FireworkConfig = toml::from_str(s)?;
        config.validate()
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject unusable configs and clamp out-of-range values into range.
    /// Every clamp is logged as a warning.
    pub fn validate(mut self) -> Result<Self> {
        if self.phases.is_empty() {
            return Err(SkyprintError::EmptyPhaseList);
        }
        if self.debris_colors.is_empty() {
            return Err(SkyprintError::EmptyDebrisPalette);
        }

        let finite = [
            ("burst_radius", self.burst_radius),
            ("burst_drag", self.burst_drag),
            ("steer_strength", self.steer_strength),
            ("steer_damping", self.steer_damping),
            ("steer_debris_drag", self.steer_debris_drag),
            ("hold_sparkle_intensity", self.hold_sparkle_intensity),
            ("hold_jitter_scale", self.hold_jitter_scale),
            ("fade_gravity", self.fade_gravity),
            ("debris_speed_multiplier", self.debris_speed_multiplier),
            ("particle_size", self.particle_size),
            ("particle_size_fade_multiplier", self.particle_size_fade_multiplier),
            ("formation_scale", self.formation_scale),
        ];
        if let Some((field, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SkyprintError::InvalidConfig(format!(
                "{field} must be a finite number, got {value}"
            )));
        }

        clamp_min("burst_radius", &mut self.burst_radius, MIN_POSITIVE);
        clamp_unit_open("burst_drag", &mut self.burst_drag);
        clamp_unit_open("steer_damping", &mut self.steer_damping);
        clamp_unit_open("steer_debris_drag", &mut self.steer_debris_drag);
        clamp_min("steer_strength", &mut self.steer_strength, 0.0);
        clamp_min("hold_sparkle_intensity", &mut self.hold_sparkle_intensity, 0.0);
        clamp_min("hold_jitter_scale", &mut self.hold_jitter_scale, 0.0);
        clamp_min("debris_speed_multiplier", &mut self.debris_speed_multiplier, 0.0);
        clamp_min("particle_size", &mut self.particle_size, MIN_POSITIVE);
        clamp_min("formation_scale", &mut self.formation_scale, MIN_POSITIVE);
        clamp_range(
            "particle_size_fade_multiplier",
            &mut self.particle_size_fade_multiplier,
            0.0,
            1.0,
        );

        let [mut lo, mut hi] = self.burst_speed_jitter;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(SkyprintError::InvalidConfig(
                "burst_speed_jitter must be finite".to_string(),
            ));
        }
        if lo > hi {
            log::warn!("burst_speed_jitter [{lo}, {hi}] is reversed; swapping");
            std::mem::swap(&mut lo, &mut hi);
        }
        clamp_min("burst_speed_jitter.min", &mut lo, MIN_POSITIVE);
        clamp_min("burst_speed_jitter.max", &mut hi, lo);
        self.burst_speed_jitter = [lo, hi];

        if self.steer_progress_curve.normalize() {
            log::warn!("steer_progress_curve keyframes were reordered or flattened to stay monotone");
        }

        for (i, phase) in self.phases.iter_mut().enumerate() {
            if phase.name.is_empty() {
                phase.name = phase.kind.as_str().to_string();
            }
            if phase.duration.is_nan() || phase.duration < MIN_PHASE_DURATION {
                log::warn!(
                    "phase {i} ('{}') duration {} raised to {MIN_PHASE_DURATION}",
                    phase.name,
                    phase.duration
                );
                phase.duration = MIN_PHASE_DURATION;
            }
            if phase.curve.normalize() {
                log::warn!("phase {i} ('{}') curve keyframes adjusted to stay monotone", phase.name);
            }
        }

        Ok(self)
    }

    /// Sum of all phase durations: the shortest possible show length
    pub fn total_duration(&self) -> f32 {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

fn clamp_min(field: &str, value: &mut f32, min: f32) {
    if *value < min {
        log::warn!("{field} {} raised to {min}", *value);
        *value = min;
    }
}

fn clamp_range(field: &str, value: &mut f32, min: f32, max: f32) {
    let clamped = value.clamp(min, max);
    if clamped != *value {
        log::warn!("{field} {} clamped into [{min}, {max}]", *value);
        *value = clamped;
    }
}

/// Clamp into (0, 1]
fn clamp_unit_open(field: &str, value: &mut f32) {
    clamp_range(field, value, MIN_POSITIVE, 1.0);
}
