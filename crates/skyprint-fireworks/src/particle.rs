//! Particle types: CPU simulation state and GPU instance data

use bytemuck::{Pod, Zeroable};
use serde::Serialize;
use skyprint_core::{Rgba8, Vec3};

/// Coarse particle category, as seen by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleCategory {
    Pattern,
    Debris,
}

/// Whether a particle belongs to the painted pattern or is filler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Born from a painted cell; converges on `target`
    Pattern { target: Vec3 },
    /// Visual filler with no target; never steers
    Debris,
}

/// CPU-side particle state
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub base_color: Rgba8,
    pub size: f32,
    pub alive: bool,
}

impl Particle {
    /// A pattern particle collapsed at `spawn`, waiting to burst
    pub fn pattern(spawn: Vec3, target: Vec3, color: Rgba8, size: f32) -> Self {
        Self {
            kind: ParticleKind::Pattern { target },
            position: spawn,
            velocity: Vec3::ZERO,
            base_color: color,
            size,
            alive: true,
        }
    }

    /// A debris particle at `spawn`, waiting to burst
    pub fn debris(spawn: Vec3, color: Rgba8, size: f32) -> Self {
        Self {
            kind: ParticleKind::Debris,
            position: spawn,
            velocity: Vec3::ZERO,
            base_color: color,
            size,
            alive: true,
        }
    }

    pub fn category(&self) -> ParticleCategory {
        match self.kind {
            ParticleKind::Pattern { .. } => ParticleCategory::Pattern,
            ParticleKind::Debris => ParticleCategory::Debris,
        }
    }

    /// Formation target, for pattern particles only
    pub fn formation_target(&self) -> Option<Vec3> {
        match self.kind {
            ParticleKind::Pattern { target } => Some(target),
            ParticleKind::Debris => None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// What a renderer needs to draw one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderParticle {
    pub position: Vec3,
    pub color: Rgba8,
    pub size: f32,
}

impl From<&Particle> for RenderParticle {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position,
            color: p.base_color,
            size: p.size,
        }
    }
}

/// GPU instance data, one row per live particle.
/// 48 bytes, 16-byte aligned (3 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position + size packed into vec4
    pub pos_size: [f32; 4], // xyz = position, w = size
    /// Base color; the renderer scales alpha from `params.x` during Fade
    pub color: [f32; 4], // rgba
    /// x = phase progress, y = category (0 pattern, 1 debris), z = fade flag, w unused
    pub params: [f32; 4],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle, progress: f32, fading: bool) -> Self {
        let category = match p.category() {
            ParticleCategory::Pattern => 0.0,
            ParticleCategory::Debris => 1.0,
        };
        Self {
            pos_size: [p.position.x, p.position.y, p.position.z, p.size],
            color: p.base_color.to_f32_array(),
            params: [progress, category, if fading { 1.0 } else { 0.0 }, 0.0],
        }
    }
}

/// Fixed-size particle storage for one firework.
///
/// Pattern particles occupy the front of the pool in cell order, debris the
/// back. The pool is sized once at construction and never grows or shrinks;
/// particles are only ever marked dead.
pub struct ParticlePool {
    particles: Vec<Particle>,
    pattern_count: usize,
}

impl ParticlePool {
    pub fn new(pattern: Vec<Particle>, debris: Vec<Particle>) -> Self {
        let pattern_count = pattern.len();
        let mut particles = pattern;
        particles.extend(debris);
        Self {
            particles,
            pattern_count,
        }
    }

    /// Total particle slots (live or dead)
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub fn debris_count(&self) -> usize {
        self.particles.len() - self.pattern_count
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Iterate live particles
    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.alive)
    }

    /// Mark every particle dead. Slots are kept.
    pub fn kill_all(&mut self) {
        for p in &mut self.particles {
            p.alive = false;
        }
    }
}
