//! Headless simulation command

use anyhow::{Context, Result};
use serde::Serialize;
use skyprint_core::Vec3;
use skyprint_fireworks::{
    FireworkConfig, FireworkEvent, FireworkSystem, Pattern, PhaseKind, RenderParticle,
};
use skyprint_runtime::{FrameClock, RuntimeSystem};
use std::sync::Arc;
use std::time::Duration;

pub struct SimulateArgs {
    pub pattern: String,
    pub config: Option<String>,
    pub spawn: [f32; 3],
    pub fps: f64,
    pub seed: u64,
    pub every: u64,
    pub format: String,
    pub realtime: bool,
}

/// A lifecycle event stamped with the step it was raised on
#[derive(Debug, Serialize)]
pub struct TimedEvent {
    pub frame: u64,
    pub time: f64,
    pub event: FireworkEvent,
}

/// Snapshot of the firework at one sampled step
#[derive(Debug, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub time: f64,
    pub phase: Option<PhaseKind>,
    pub progress: f32,
    pub alive: usize,
    pub particles: Vec<RenderParticle>,
}

impl FrameSample {
    fn centroid(&self) -> Vec3 {
        if self.particles.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self
            .particles
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + p.position);
        sum * (1.0 / self.particles.len() as f32)
    }
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub fps: f64,
    pub particles: usize,
    pub frames: u64,
    pub duration: f64,
    pub events: Vec<TimedEvent>,
    pub samples: Vec<FrameSample>,
}

struct Runner {
    system: FireworkSystem,
    clock: FrameClock,
    every: u64,
    max_frames: u64,
    events: Vec<TimedEvent>,
    samples: Vec<FrameSample>,
}

impl Runner {
    fn step(&mut self, dt: f64) -> Result<()> {
        self.system.update(dt)?;

        let frame = self.clock.frames;
        let time = self.clock.total_time;
        self.events.extend(
            self.system
                .show
                .drain_events()
                .into_iter()
                .map(|event| TimedEvent { frame, time, event }),
        );

        if frame % self.every == 0 {
            if let Some((_, firework)) = self.system.show.instances().next() {
                self.samples.push(FrameSample {
                    frame,
                    time,
                    phase: firework.current_phase().map(|p| p.kind),
                    progress: firework.phase_progress(),
                    alive: firework.alive_count(),
                    particles: firework.render_particles().collect(),
                });
            }
        }

        if frame >= self.max_frames {
            anyhow::bail!("Firework still playing after {} steps", frame);
        }
        Ok(())
    }
}

/// Launch one firework and run it to completion
pub fn simulate(
    config: FireworkConfig,
    pattern: &Pattern,
    spawn: Vec3,
    fps: f64,
    seed: u64,
    every: u64,
    realtime: bool,
) -> Result<SimulationReport> {
    let clock = FrameClock::with_rate(fps);
    let max_frames = ((f64::from(config.total_duration()) + 1.0) / clock.timestep) as u64
        + 2 * config.phases.len() as u64;

    let mut system = FireworkSystem::new(Arc::new(config), seed);
    system.initialize()?;
    let id = system.show.launch(spawn, pattern)?;
    let particles = system
        .show
        .instance(id)
        .map(|fw| fw.particle_count())
        .unwrap_or(0);

    let mut runner = Runner {
        system,
        clock,
        every: every.max(1),
        max_frames,
        events: Vec::new(),
        samples: Vec::new(),
    };

    // Launch events are raised before the first step
    runner.events.extend(
        runner
            .system
            .show
            .drain_events()
            .into_iter()
            .map(|event| TimedEvent {
                frame: 0,
                time: 0.0,
                event,
            }),
    );

    if realtime {
        let pause = Duration::from_secs_f64(runner.clock.timestep / 4.0);
        while runner.system.show.is_playing() {
            runner.clock.tick();
            while runner.clock.should_step() && runner.system.show.is_playing() {
                let dt = runner.clock.consume_step();
                runner.step(dt)?;
            }
            std::thread::sleep(pause);
        }
    } else {
        while runner.system.show.is_playing() {
            let dt = runner.clock.step();
            runner.step(dt)?;
        }
    }

    runner.system.shutdown()?;
    Ok(SimulationReport {
        seed,
        fps,
        particles,
        frames: runner.clock.frames,
        duration: runner.clock.total_time,
        events: runner.events,
        samples: runner.samples,
    })
}

fn print_text(report: &SimulationReport) {
    println!(
        "{} particles, seed {}, {} steps at {} fps",
        report.particles, report.seed, report.frames, report.fps
    );

    let mut samples = report.samples.iter().peekable();
    for timed in &report.events {
        while let Some(sample) = samples.next_if(|s| s.frame < timed.frame) {
            print_sample(sample);
        }
        let line = match &timed.event {
            FireworkEvent::Launched { id, particles } => {
                format!("launched {} ({} particles)", id, particles)
            }
            FireworkEvent::PhaseStarted { id, index, kind } => {
                format!("{} entered phase {} ({})", id, index, kind)
            }
            FireworkEvent::Completed { id } => format!("{} completed", id),
            FireworkEvent::AllFinished => "all fireworks finished".to_string(),
        };
        println!("[{:>8.3}s] {}", timed.time, line);
    }
    for sample in samples {
        print_sample(sample);
    }

    println!("Finished after {:.3}s", report.duration);
}

fn print_sample(sample: &FrameSample) {
    let c = sample.centroid();
    let phase = sample
        .phase
        .map(|k| k.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  frame {:>5}  t={:.3}s  {:<5} {:>5.1}%  alive {:>4}  centroid ({:.2}, {:.2}, {:.2})",
        sample.frame,
        sample.time,
        phase,
        sample.progress * 100.0,
        sample.alive,
        c.x,
        c.y,
        c.z
    );
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => FireworkConfig::load(path)
            .with_context(|| format!("Failed to load firework config '{}'", path))?,
        None => FireworkConfig::default(),
    };
    let pattern = Pattern::load(&args.pattern)
        .with_context(|| format!("Failed to load pattern '{}'", args.pattern))?;
    log::info!(
        "pattern {}: {}x{} grid, {} painted cell(s)",
        args.pattern,
        pattern.width(),
        pattern.height(),
        pattern.len()
    );

    let report = simulate(
        config,
        &pattern,
        Vec3::from_array(args.spawn),
        args.fps,
        args.seed,
        args.every,
        args.realtime,
    )?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report),
        other => anyhow::bail!("Unknown format: {}", other),
    }
    Ok(())
}
