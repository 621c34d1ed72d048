//! One launched firework: owns its particles and walks the configured phases

use crate::config::{FireworkConfig, Phase};
use crate::formation::map_pattern;
use crate::kinematics::{apply_phase, PhaseTick};
use crate::particle::{Particle, ParticlePool, RenderParticle};
use crate::pattern::Pattern;
use crate::phase::{PhaseSequencer, PhaseStep};
use crate::rand::ParticleRng;
use skyprint_core::{Result, Rgba8, Vec3};
use std::sync::Arc;

/// A single firework, from launch until its last phase runs out.
///
/// The particle pool is sized once (`pattern cells + debris count`) and never
/// resized. Once complete, every particle is dead and further updates are
/// no-ops; a new launch always means a new instance.
pub struct FireworkInstance {
    spawn_position: Vec3,
    config: Arc<FireworkConfig>,
    pool: ParticlePool,
    sequencer: PhaseSequencer,
    rng: ParticleRng,
}

impl FireworkInstance {
    /// Build a firework at `spawn` that will reform into `pattern`.
    ///
    /// The config is run through [`FireworkConfig::validate`]; an already
    /// valid config is shared as-is, anything else is replaced by its clamped
    /// copy. Fails for no phases, no debris colors, or non-finite tunables.
    /// An empty pattern is fine and yields a debris-only firework.
    pub fn new(
        spawn: Vec3,
        pattern: &Pattern,
        config: Arc<FireworkConfig>,
        seed: u64,
    ) -> Result<Self> {
        let checked = config.as_ref().clone().validate()?;
        let config = if checked == *config {
            config
        } else {
            Arc::new(checked)
        };

        let mut rng = ParticleRng::new(seed);
        let size = config.particle_size;

        let pattern_particles: Vec<Particle> = map_pattern(pattern, config.formation_scale, spawn)
            .into_iter()
            .map(|point| Particle::pattern(spawn, point.position, point.color, size))
            .collect();

        let debris_particles: Vec<Particle> = (0..config.debris_particle_count)
            .map(|_| {
                let color = rng
                    .pick(&config.debris_colors)
                    .copied()
                    .unwrap_or(Rgba8::WHITE);
                Particle::debris(spawn, color, size)
            })
            .collect();

        let sequencer = PhaseSequencer::new(config.phase_carryover);

        Ok(Self {
            spawn_position: spawn,
            pool: ParticlePool::new(pattern_particles, debris_particles),
            sequencer,
            config,
            rng,
        })
    }

    /// Advance the firework by `dt` seconds.
    ///
    /// Updates the sequencer first, then applies the active phase's rule to
    /// every live particle. On the tick the last phase ends no particle moves;
    /// all particles are marked dead instead.
    pub fn update(&mut self, dt: f32) -> PhaseStep {
        // Negative or non-finite ticks advance nothing
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let step = self.sequencer.advance(&self.config.phases, dt);
        match step {
            PhaseStep::Active { index, entered } => {
                let phase = &self.config.phases[index];
                if entered {
                    log::debug!(
                        "firework phase {index} '{}' ({}) started, {:.3}s",
                        phase.name,
                        phase.kind,
                        phase.duration
                    );
                }
                let tick = PhaseTick {
                    kind: phase.kind,
                    progress: phase.progress(self.sequencer.elapsed()),
                    entered,
                    dt,
                };
                apply_phase(&tick, &self.config, self.pool.as_mut_slice(), &mut self.rng);
            }
            PhaseStep::Completed => {
                self.pool.kill_all();
            }
            PhaseStep::Idle => {}
        }
        step
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    pub fn current_phase_index(&self) -> usize {
        self.sequencer.current_index()
    }

    /// Active phase, or None once complete
    pub fn current_phase(&self) -> Option<&Phase> {
        self.sequencer.current(&self.config.phases)
    }

    /// Seconds spent in the active phase
    pub fn phase_elapsed(&self) -> f32 {
        self.sequencer.elapsed()
    }

    /// Curve-mapped progress through the active phase; 1.0 once complete
    pub fn phase_progress(&self) -> f32 {
        self.sequencer.progress(&self.config.phases)
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    pub fn config(&self) -> &Arc<FireworkConfig> {
        &self.config
    }

    /// Total particles, live or dead
    pub fn particle_count(&self) -> usize {
        self.pool.len()
    }

    pub fn pattern_particle_count(&self) -> usize {
        self.pool.pattern_count()
    }

    pub fn debris_particle_count(&self) -> usize {
        self.pool.debris_count()
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub(crate) fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Position, color and size of every live particle
    pub fn render_particles(&self) -> impl Iterator<Item = RenderParticle> + '_ {
        self.pool.alive().map(RenderParticle::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseKind;
    use crate::curves::ProgressCurve;
    use crate::particle::ParticleCategory;
    use crate::pattern::PixelCell;
    use skyprint_core::SkyprintError;

    fn two_cell_pattern() -> Pattern {
        Pattern::new(
            8,
            8,
            [
                PixelCell::new(2, 2, Rgba8::RED),
                PixelCell::new(5, 5, Rgba8::GREEN),
            ],
        )
        .unwrap()
    }

    fn short_config(debris: usize) -> Arc<FireworkConfig> {
        Arc::new(
            FireworkConfig {
                debris_particle_count: debris,
                formation_scale: 0.5,
                phases: vec![
                    Phase::new(PhaseKind::Burst, 0.05, ProgressCurve::Linear),
                    Phase::new(PhaseKind::Steer, 0.05, ProgressCurve::Linear),
                    Phase::new(PhaseKind::Hold, 0.05, ProgressCurve::Linear),
                    Phase::new(PhaseKind::Fade, 0.05, ProgressCurve::Linear),
                ],
                ..Default::default()
            }
            .validate()
            .unwrap(),
        )
    }

    #[test]
    fn builds_pattern_then_debris() {
        let spawn = Vec3::new(10.0, 20.0, 0.0);
        let fw = FireworkInstance::new(spawn, &two_cell_pattern(), short_config(5), 1).unwrap();

        assert_eq!(fw.particle_count(), 7);
        assert_eq!(fw.pattern_particle_count(), 2);
        assert_eq!(fw.debris_particle_count(), 5);

        let first = &fw.particles()[0];
        assert_eq!(first.category(), ParticleCategory::Pattern);
        assert_eq!(first.position, spawn);
        assert_eq!(first.velocity, Vec3::ZERO);
        assert_eq!(first.base_color, Rgba8::RED);
        assert_eq!(first.formation_target(), Some(spawn + Vec3::new(-1.0, -1.0, 0.0)));

        for debris in &fw.particles()[2..] {
            assert_eq!(debris.category(), ParticleCategory::Debris);
            assert!(fw.config().debris_colors.contains(&debris.base_color));
            assert_eq!(debris.position, spawn);
        }
    }

    #[test]
    fn empty_pattern_runs_debris_only() {
        let mut fw =
            FireworkInstance::new(Vec3::ZERO, &Pattern::empty(8, 8), short_config(3), 2).unwrap();
        assert_eq!(fw.particle_count(), 3);
        assert_eq!(fw.pattern_particle_count(), 0);
        fw.update(0.02);
        assert_eq!(fw.render_particles().count(), 3);
    }

    #[test]
    fn empty_phase_list_is_rejected() {
        let config = Arc::new(FireworkConfig {
            phases: vec![],
            ..Default::default()
        });
        let result = FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), config, 0);
        assert!(matches!(result, Err(SkyprintError::EmptyPhaseList)));
    }

    #[test]
    fn unchecked_config_is_clamped_on_construction() {
        let raw = Arc::new(FireworkConfig {
            burst_drag: 1.5,
            phases: vec![Phase::new(PhaseKind::Burst, f32::NAN, ProgressCurve::Linear)],
            ..Default::default()
        });
        let mut fw = FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), raw, 1).unwrap();
        assert!(fw.config().burst_drag <= 1.0);
        assert!(fw.config().phases[0].duration > 0.0);

        let mut ticks = 0;
        while !fw.is_complete() {
            fw.update(0.016);
            for p in fw.particles() {
                assert!(p.speed().is_finite());
            }
            ticks += 1;
            assert!(ticks < 2000, "firework never completed");
        }
    }

    #[test]
    fn valid_config_is_shared_not_copied() {
        let config = short_config(2);
        let fw = FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), Arc::clone(&config), 1)
            .unwrap();
        assert!(Arc::ptr_eq(fw.config(), &config));
    }

    #[test]
    fn non_finite_tunable_is_rejected() {
        let config = Arc::new(FireworkConfig {
            steer_strength: f32::INFINITY,
            ..Default::default()
        });
        let result = FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), config, 0);
        assert!(matches!(result, Err(SkyprintError::InvalidConfig(_))));
    }

    #[test]
    fn negative_or_nan_dt_moves_nothing() {
        let mut fw =
            FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), short_config(3), 6).unwrap();
        fw.update(0.01);
        let before: Vec<Vec3> = fw.particles().iter().map(|p| p.position).collect();
        let elapsed = fw.phase_elapsed();

        fw.update(-0.5);
        fw.update(f32::NAN);

        let after: Vec<Vec3> = fw.particles().iter().map(|p| p.position).collect();
        // Burst drag still applies, but no time passes so nothing moves
        assert_eq!(before, after);
        assert!((fw.phase_elapsed() - elapsed).abs() < 1e-9);
    }

    #[test]
    fn completes_after_all_phases() {
        let mut fw =
            FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), short_config(5), 3).unwrap();
        let mut total = 0.0f32;
        let mut last_index = 0;
        while !fw.is_complete() {
            fw.update(0.02);
            total += 0.02;
            assert!(fw.current_phase_index() >= last_index);
            last_index = fw.current_phase_index();
            assert!(total < 1.0, "firework never completed");
        }
        assert!(total >= 0.2 - 1e-6);
        assert_eq!(fw.particle_count(), 7);
        assert_eq!(fw.alive_count(), 0);
        assert_eq!(fw.render_particles().count(), 0);
        assert!(fw.current_phase().is_none());
        assert_eq!(fw.update(0.02), PhaseStep::Idle);
    }

    #[test]
    fn particles_burst_outward_on_first_tick() {
        let spawn = Vec3::new(0.0, 10.0, 0.0);
        let mut fw = FireworkInstance::new(spawn, &two_cell_pattern(), short_config(5), 4).unwrap();
        fw.update(0.01);
        for p in fw.particles() {
            assert!(p.position.distance(&spawn) > 0.0);
            assert!(p.speed() > 0.0);
        }
    }

    #[test]
    fn same_seed_is_reproducible() {
        let run = |seed| {
            let mut fw =
                FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), short_config(4), seed)
                    .unwrap();
            for _ in 0..5 {
                fw.update(0.01);
            }
            fw.particles().iter().map(|p| p.position).collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn phase_progress_reports_active_phase() {
        let mut fw =
            FireworkInstance::new(Vec3::ZERO, &two_cell_pattern(), short_config(0), 5).unwrap();
        fw.update(0.025);
        assert_eq!(fw.current_phase().map(|p| p.kind), Some(PhaseKind::Burst));
        assert!((fw.phase_progress() - 0.5).abs() < 1e-5);
        assert!((fw.phase_elapsed() - 0.025).abs() < 1e-6);
    }
}
