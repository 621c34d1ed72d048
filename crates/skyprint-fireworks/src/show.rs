//! Owns every live firework: launches, ticks, retires, and packs them for drawing

use crate::config::{FireworkConfig, PhaseKind};
use crate::instance::FireworkInstance;
use crate::particle::ParticleInstance;
use crate::pattern::Pattern;
use crate::phase::PhaseStep;
use crate::registry::ActiveInstanceRegistry;
use serde::Serialize;
use skyprint_core::{InstanceId, Result, Vec3};
use skyprint_runtime::EventBus;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Undrained lifecycle events kept before the oldest are dropped
pub const EVENT_BACKLOG: usize = 4096;

/// Lifecycle notifications for session/mode controllers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FireworkEvent {
    Launched { id: InstanceId, particles: usize },
    PhaseStarted { id: InstanceId, index: usize, kind: PhaseKind },
    Completed { id: InstanceId },
    /// The last playing firework finished or was removed
    AllFinished,
}

/// Draw data for one firework, consumed by the renderer
pub struct ParticleDrawData<'a> {
    pub instance_id: InstanceId,
    pub instances: &'a [ParticleInstance],
    pub phase: Option<PhaseKind>,
    pub phase_progress: f32,
}

/// Per-firework slice of the packed instance buffer
struct InstanceRange {
    id: InstanceId,
    start: usize,
    count: usize,
    phase: Option<PhaseKind>,
    progress: f32,
}

/// The launch trigger and owner of all fireworks in a scene.
///
/// Every launch gets an id, is registered in the [`ActiveInstanceRegistry`],
/// and is unregistered before it is dropped, whether it completed or was
/// removed early.
pub struct FireworkShow {
    config: Arc<FireworkConfig>,
    instances: BTreeMap<InstanceId, FireworkInstance>,
    registry: ActiveInstanceRegistry,
    events: EventBus<FireworkEvent>,
    next_id: InstanceId,
    seed: u64,
    /// Pre-allocated instance buffer for packing live particles
    instance_buffer: Vec<ParticleInstance>,
    instance_ranges: Vec<InstanceRange>,
}

impl FireworkShow {
    pub fn new(config: Arc<FireworkConfig>, seed: u64) -> Self {
        Self {
            config,
            instances: BTreeMap::new(),
            registry: ActiveInstanceRegistry::new(),
            events: EventBus::bounded(EVENT_BACKLOG),
            next_id: InstanceId(1),
            seed,
            instance_buffer: Vec::new(),
            instance_ranges: Vec::new(),
        }
    }

    /// Default config used by [`FireworkShow::launch`]
    pub fn config(&self) -> &Arc<FireworkConfig> {
        &self.config
    }

    /// Launch a firework with the show's default config
    pub fn launch(&mut self, spawn: Vec3, pattern: &Pattern) -> Result<InstanceId> {
        let config = Arc::clone(&self.config);
        self.launch_with(spawn, pattern, config)
    }

    /// Launch a firework with a specific config.
    ///
    /// On a config error nothing is created and the registry is untouched.
    pub fn launch_with(
        &mut self,
        spawn: Vec3,
        pattern: &Pattern,
        config: Arc<FireworkConfig>,
    ) -> Result<InstanceId> {
        let id = self.next_id;
        let instance = FireworkInstance::new(spawn, pattern, config, self.seed_for(id))?;
        self.next_id = id.next();

        let particles = instance.particle_count();
        log::info!(
            "firework {id} launched at ({:.2}, {:.2}, {:.2}) with {particles} particles",
            spawn.x,
            spawn.y,
            spawn.z
        );
        self.registry.register(id);
        self.instances.insert(id, instance);
        self.events.push(FireworkEvent::Launched { id, particles });
        Ok(id)
    }

    fn seed_for(&self, id: InstanceId) -> u64 {
        self.seed ^ id.raw().wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Tick every firework, then retire the ones that completed
    pub fn update(&mut self, dt: f32) {
        let was_playing = !self.registry.is_empty();
        let registry = &mut self.registry;
        let events = &mut self.events;

        self.instances.retain(|&id, firework| {
            if let PhaseStep::Active {
                index,
                entered: true,
            } = firework.update(dt)
            {
                let kind = firework.config().phases[index].kind;
                events.push(FireworkEvent::PhaseStarted { id, index, kind });
            }

            if !firework.is_complete() {
                return true;
            }
            registry.unregister(id);
            log::info!("firework {id} completed");
            events.push(FireworkEvent::Completed { id });
            false
        });

        if was_playing && self.registry.is_empty() {
            log::info!("all fireworks finished");
            self.events.push(FireworkEvent::AllFinished);
        }
    }

    /// Tear down one firework mid-flight. Returns false if it wasn't live.
    pub fn remove(&mut self, id: InstanceId) -> bool {
        let was_registered = self.registry.unregister(id);
        let removed = self.instances.remove(&id).is_some();
        if was_registered && self.registry.is_empty() {
            self.events.push(FireworkEvent::AllFinished);
        }
        removed
    }

    /// Tear down every firework (scene reset). Pending events are kept, and
    /// `AllFinished` is raised if anything was still playing.
    pub fn clear(&mut self) {
        let was_playing = !self.registry.is_empty();
        let ids: Vec<InstanceId> = self.instances.keys().copied().collect();
        for id in ids {
            self.registry.unregister(id);
            self.instances.remove(&id);
        }
        if was_playing {
            log::info!("show cleared");
            self.events.push(FireworkEvent::AllFinished);
        }
        self.instance_buffer.clear();
        self.instance_ranges.clear();
    }

    /// True while any firework is still playing
    pub fn is_playing(&self) -> bool {
        !self.registry.is_empty()
    }

    pub fn registry(&self) -> &ActiveInstanceRegistry {
        &self.registry
    }

    pub fn instance(&self, id: InstanceId) -> Option<&FireworkInstance> {
        self.instances.get(&id)
    }

    /// Live fireworks in launch order
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &FireworkInstance)> {
        self.instances.iter().map(|(id, fw)| (*id, fw))
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Total live particles across all fireworks
    pub fn total_alive(&self) -> usize {
        self.instances.values().map(FireworkInstance::alive_count).sum()
    }

    /// Hand pending lifecycle events to the caller
    pub fn drain_events(&mut self) -> Vec<FireworkEvent> {
        self.events.drain()
    }

    /// Pack live particles into the instance buffer for GPU upload.
    /// Call this after `update()`.
    pub fn pack_instances(&mut self) {
        self.instance_buffer.clear();
        self.instance_ranges.clear();

        for (&id, firework) in &self.instances {
            let start = self.instance_buffer.len();
            let phase = firework.current_phase().map(|p| p.kind);
            let progress = firework.phase_progress();
            let fading = phase == Some(PhaseKind::Fade);
            self.instance_buffer.extend(
                firework
                    .pool()
                    .alive()
                    .map(|p| ParticleInstance::from_particle(p, progress, fading)),
            );
            let count = self.instance_buffer.len() - start;
            if count == 0 {
                continue;
            }
            self.instance_ranges.push(InstanceRange {
                id,
                start,
                count,
                phase,
                progress,
            });
        }
    }

    /// Get the packed instance data
    pub fn instance_data(&self) -> &[ParticleInstance] {
        &self.instance_buffer
    }

    /// Draw data for each firework that has live particles
    pub fn draw_data(&self) -> Vec<ParticleDrawData<'_>> {
        self.instance_ranges
            .iter()
            .map(|range| ParticleDrawData {
                instance_id: range.id,
                instances: &self.instance_buffer[range.start..range.start + range.count],
                phase: range.phase,
                phase_progress: range.progress,
            })
            .collect()
    }
}
