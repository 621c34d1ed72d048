//! Sample project command

use anyhow::{Context, Result};
use serde::Serialize;
use skyprint_core::Rgba8;
use skyprint_fireworks::{Pattern, PixelCell};
use std::fs;
use std::path::Path;

const HEART: &[&str] = &[
    ".rr...rr.",
    "rrrr.rrrr",
    "rrrrrrrrr",
    "rrrrprrrr",
    ".rrrrrrr.",
    "..rrrrr..",
    "...rrr...",
    "....r....",
];

const SAMPLE_CONFIG: &str = r##"# Firework tuning. Every field is optional; omitted ones take built-in defaults.
# Check it with `skyprint validate firework.toml`.

burst_radius = 6.0
burst_drag = 0.94
burst_speed_jitter = [0.5, 1.0]

steer_strength = 8.0
steer_progress_curve = "ease_in"
steer_damping = 0.9
steer_debris_drag = 0.96

hold_sparkle_intensity = 1.0
hold_jitter_scale = 0.04
debris_hold = "drift"

fade_gravity = 1.5

debris_particle_count = 64
debris_speed_multiplier = 1.5
debris_colors = ["#ffd700", "#ffffff", "#ff8c00"]

particle_size = 0.12
particle_size_fade_multiplier = 0.2
formation_scale = 0.25

# "drop" starts each phase at zero; "carry" keeps the overshoot
phase_carryover = "drop"

[[phases]]
name = "launch"
kind = "burst"
duration = 0.8
curve = "ease_out"

[[phases]]
name = "reform"
kind = "steer"
duration = 1.6
curve = "smooth_step"

[[phases]]
name = "shine"
kind = "hold"
duration = 1.2

[[phases]]
name = "fall"
kind = "fade"
duration = 1.0
curve = "ease_in"
"##;

#[derive(Serialize)]
struct PatternFile<'a> {
    width: u16,
    height: u16,
    cells: &'a [PixelCell],
}

/// Render the sample heart as a pattern file
fn sample_pattern() -> Result<String> {
    let pattern = Pattern::from_ascii(
        HEART,
        &[('r', Rgba8::from_hex(0xe0245e)), ('p', Rgba8::from_hex(0xff9ec8))],
    )?;
    let file = PatternFile {
        width: pattern.width(),
        height: pattern.height(),
        cells: pattern.cells(),
    };
    let body = toml::to_string(&file).context("Failed to serialize sample pattern")?;
    Ok(format!(
        "# Painted cells; y = 0 is the bottom row. Simulate with\n# `skyprint simulate pattern.toml --config firework.toml`\n\n{body}"
    ))
}

pub fn run(dir: &str) -> Result<()> {
    let project_dir = Path::new(dir);

    if project_dir.exists() {
        anyhow::bail!("Directory '{}' already exists", dir);
    }

    fs::create_dir_all(project_dir)?;
    fs::write(project_dir.join("firework.toml"), SAMPLE_CONFIG)?;
    fs::write(project_dir.join("pattern.toml"), sample_pattern()?)?;

    println!("Created firework project '{}'", dir);
    println!();
    println!("  {}/firework.toml   phase timings and tunables", dir);
    println!("  {}/pattern.toml    sample heart pattern", dir);
    println!();
    println!("Next steps:");
    println!("  skyprint validate {}/firework.toml", dir);
    println!(
        "  skyprint simulate {0}/pattern.toml --config {0}/firework.toml",
        dir
    );

    Ok(())
}
