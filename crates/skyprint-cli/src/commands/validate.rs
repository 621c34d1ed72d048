//! Config validation command

use anyhow::{Context, Result};
use skyprint_fireworks::FireworkConfig;

/// Human-readable summary of a validated config
fn describe(config: &FireworkConfig) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} phase(s), {:.3}s total, carryover {:?}",
        config.phases.len(),
        config.total_duration(),
        config.phase_carryover
    ));

    let mut start = 0.0f32;
    for (i, phase) in config.phases.iter().enumerate() {
        lines.push(format!(
            "  [{i}] {:<10} {:<6} {:>7.3}s  starts {:>7.3}s  curve {:?}",
            phase.name, phase.kind, phase.duration, start, phase.curve
        ));
        start += phase.duration;
    }

    lines.push(format!(
        "burst: radius {} drag {} jitter [{}, {}]",
        config.burst_radius,
        config.burst_drag,
        config.burst_speed_jitter[0],
        config.burst_speed_jitter[1]
    ));
    lines.push(format!(
        "steer: strength {} damping {} debris drag {} curve {:?}",
        config.steer_strength,
        config.steer_damping,
        config.steer_debris_drag,
        config.steer_progress_curve
    ));
    lines.push(format!(
        "hold: sparkle {} jitter {} debris {:?}",
        config.hold_sparkle_intensity, config.hold_jitter_scale, config.debris_hold
    ));
    lines.push(format!(
        "fade: gravity {} size x{}",
        config.fade_gravity, config.particle_size_fade_multiplier
    ));
    let palette: Vec<String> = config.debris_colors.iter().map(|c| c.to_string()).collect();
    lines.push(format!(
        "debris: {} per launch, speed x{}, colors {}",
        config.debris_particle_count,
        config.debris_speed_multiplier,
        palette.join(" ")
    ));
    lines.push(format!(
        "particles: size {} formation scale {}",
        config.particle_size, config.formation_scale
    ));
    lines
}

pub fn run(path: &str) -> Result<()> {
    let config = FireworkConfig::load(path)
        .with_context(|| format!("Failed to load firework config '{}'", path))?;

    println!("{}: ok", path);
    for line in describe(&config) {
        println!("{}", line);
    }
    Ok(())
}
