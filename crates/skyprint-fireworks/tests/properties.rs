//! Invariants of the firework lifecycle, checked over generated configs and patterns

use proptest::prelude::*;
use skyprint_core::{Rgba8, SkyprintError, Vec3};
use skyprint_fireworks::kinematics::steering_acceleration;
use skyprint_fireworks::{
    FireworkConfig, FireworkInstance, FireworkShow, Pattern, Phase, PhaseKind, PixelCell,
    ProgressCurve,
};
use std::sync::Arc;

fn kind_strategy() -> impl Strategy<Value = PhaseKind> {
    prop_oneof![
        Just(PhaseKind::Burst),
        Just(PhaseKind::Steer),
        Just(PhaseKind::Hold),
        Just(PhaseKind::Fade),
    ]
}

fn phases_strategy() -> impl Strategy<Value = Vec<Phase>> {
    prop::collection::vec(
        (kind_strategy(), 0.01f32..0.5).prop_map(|(kind, d)| Phase::new(kind, d, ProgressCurve::Linear)),
        1..6,
    )
}

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    (1u16..32, 1u16..32).prop_flat_map(|(w, h)| {
        prop::collection::vec((0..w as u8, 0..h as u8), 0..40).prop_map(move |coords| {
            let cells = coords
                .into_iter()
                .map(|(x, y)| PixelCell::new(x, y, Rgba8::BLUE));
            Pattern::new(w, h, cells).unwrap()
        })
    })
}

fn config_with(phases: Vec<Phase>, debris: usize) -> Arc<FireworkConfig> {
    Arc::new(
        FireworkConfig {
            phases,
            debris_particle_count: debris,
            ..Default::default()
        }
        .validate()
        .unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn particle_count_is_cells_plus_debris(pattern in pattern_strategy(), debris in 0usize..50) {
        let config = config_with(vec![Phase::new(PhaseKind::Burst, 0.1, ProgressCurve::Linear)], debris);
        let mut fw = FireworkInstance::new(Vec3::ZERO, &pattern, config, 1).unwrap();
        prop_assert_eq!(fw.particle_count(), pattern.len() + debris);
        for _ in 0..10 {
            fw.update(0.03);
            prop_assert_eq!(fw.particle_count(), pattern.len() + debris);
        }
    }

    #[test]
    fn completes_at_or_after_total_duration(phases in phases_strategy(), dt in 0.005f32..0.1) {
        let total: f32 = phases.iter().map(|p| p.duration).sum();
        let config = config_with(phases, 3);
        let mut fw = FireworkInstance::new(Vec3::ZERO, &Pattern::empty(1, 1), config, 2).unwrap();

        let mut elapsed = 0.0f64;
        let mut last_index = 0;
        while !fw.is_complete() {
            fw.update(dt);
            elapsed += dt as f64;
            prop_assert!(fw.current_phase_index() >= last_index);
            last_index = fw.current_phase_index();
            prop_assert!(elapsed < total as f64 + 10.0, "never completed");
        }
        prop_assert!(elapsed >= total as f64 - 1e-3);
    }

    #[test]
    fn steering_accel_faces_target(
        px in -50f32..50.0, py in -50f32..50.0, pz in -50f32..50.0,
        tx in -50f32..50.0, ty in -50f32..50.0,
        strength in 0f32..40.0, influence in 0f32..1.0,
    ) {
        let pos = Vec3::new(px, py, pz);
        let target = Vec3::new(tx, ty, 0.0);
        let accel = steering_acceleration(pos, target, strength, influence);
        prop_assert!(accel.dot(&(target - pos)) >= 0.0);
    }

    #[test]
    fn burst_speed_strictly_decays(seed in any::<u64>(), drag in 0.5f32..0.99) {
        let config = Arc::new(
            FireworkConfig {
                burst_drag: drag,
                debris_particle_count: 8,
                phases: vec![Phase::new(PhaseKind::Burst, 10.0, ProgressCurve::Linear)],
                ..Default::default()
            }
            .validate()
            .unwrap(),
        );
        let pattern = Pattern::new(4, 4, [PixelCell::new(0, 0, Rgba8::RED)]).unwrap();
        let mut fw = FireworkInstance::new(Vec3::ZERO, &pattern, config, seed).unwrap();
        fw.update(0.016);
        let mut prev: Vec<f32> = fw.particles().iter().map(|p| p.speed()).collect();
        for _ in 0..20 {
            fw.update(0.016);
            for (p, before) in fw.particles().iter().zip(prev.iter_mut()) {
                prop_assert!(p.speed() < *before);
                *before = p.speed();
            }
        }
    }

    #[test]
    fn registry_tracks_launches_and_teardown(launches in 1usize..8) {
        let config = config_with(vec![Phase::new(PhaseKind::Hold, 1.0, ProgressCurve::Linear)], 2);
        let mut show = FireworkShow::new(config, 5);
        let mut ids = Vec::new();
        for i in 0..launches {
            let before = show.registry().count();
            ids.push(show.launch(Vec3::new(i as f32, 0.0, 0.0), &Pattern::empty(2, 2)).unwrap());
            prop_assert_eq!(show.registry().count(), before + 1);
        }
        for id in ids {
            let before = show.registry().count();
            prop_assert!(show.remove(id));
            prop_assert_eq!(show.registry().count(), before - 1);
            prop_assert!(!show.remove(id));
            prop_assert_eq!(show.registry().count(), before - 1);
        }
        prop_assert!(!show.is_playing());
    }
}

#[test]
fn scenario_two_cells_five_debris() {
    let spawn = Vec3::new(3.0, 7.0, -2.0);
    let pattern = Pattern::new(
        8,
        8,
        [
            PixelCell::new(2, 2, Rgba8::RED),
            PixelCell::new(5, 5, Rgba8::GREEN),
        ],
    )
    .unwrap();
    let config = Arc::new(
        FireworkConfig {
            debris_particle_count: 5,
            formation_scale: 0.5,
            ..Default::default()
        }
        .validate()
        .unwrap(),
    );
    let fw = FireworkInstance::new(spawn, &pattern, config, 0).unwrap();
    assert_eq!(fw.particle_count(), 7);
    assert_eq!(
        fw.particles()[0].formation_target(),
        Some(spawn + Vec3::new(-1.0, -1.0, 0.0))
    );
}

#[test]
fn scenario_four_short_phases() {
    let phases = vec![
        Phase::new(PhaseKind::Burst, 0.05, ProgressCurve::Linear),
        Phase::new(PhaseKind::Steer, 0.05, ProgressCurve::Linear),
        Phase::new(PhaseKind::Hold, 0.05, ProgressCurve::Linear),
        Phase::new(PhaseKind::Fade, 0.05, ProgressCurve::Linear),
    ];
    let mut fw =
        FireworkInstance::new(Vec3::ZERO, &Pattern::empty(1, 1), config_with(phases, 5), 0).unwrap();
    let mut elapsed = 0.0f32;
    while !fw.is_complete() {
        fw.update(0.02);
        elapsed += 0.02;
        assert!(elapsed < 1.0);
    }
    assert!(elapsed >= 0.2);
}

#[test]
fn scenario_empty_phase_list() {
    let err = FireworkConfig::from_toml_str("phases = []").unwrap_err();
    assert!(matches!(err, SkyprintError::EmptyPhaseList));

    let unchecked = Arc::new(FireworkConfig {
        phases: Vec::new(),
        ..Default::default()
    });
    assert!(FireworkInstance::new(Vec3::ZERO, &Pattern::empty(1, 1), unchecked, 0).is_err());
}

#[test]
fn zero_length_burst_never_pushes_particles_out() {
    let spawn = Vec3::new(0.0, 5.0, 0.0);
    let config = config_with(
        vec![
            Phase::new(PhaseKind::Burst, 0.0, ProgressCurve::Linear),
            Phase::new(PhaseKind::Steer, 1.0, ProgressCurve::Linear),
        ],
        6,
    );
    let pattern = Pattern::new(4, 4, [PixelCell::new(3, 3, Rgba8::RED)]).unwrap();
    let mut fw = FireworkInstance::new(spawn, &pattern, config, 13).unwrap();

    fw.update(0.016);
    assert_eq!(fw.current_phase().map(|p| p.kind), Some(PhaseKind::Steer));
    for p in fw.particles() {
        assert_eq!(p.position, spawn);
        assert_eq!(p.velocity, Vec3::ZERO);
    }
}

#[test]
fn steer_and_hold_reform_the_pattern() {
    let pattern = Pattern::from_ascii(
        &["#..#", ".##.", "#..#"],
        &[('#', Rgba8::from_hex(0xff66cc))],
    )
    .unwrap();
    let config = Arc::new(
        FireworkConfig {
            phases: vec![
                Phase::new(PhaseKind::Burst, 0.4, ProgressCurve::EaseOut),
                Phase::new(PhaseKind::Steer, 2.0, ProgressCurve::Linear),
                Phase::new(PhaseKind::Hold, 0.5, ProgressCurve::Linear),
            ],
            ..Default::default()
        }
        .validate()
        .unwrap(),
    );
    let jitter = config.hold_jitter_scale * config.hold_sparkle_intensity;
    let mut fw = FireworkInstance::new(Vec3::new(0.0, 10.0, 0.0), &pattern, config, 8).unwrap();

    while fw.current_phase().map(|p| p.kind) != Some(PhaseKind::Hold) {
        fw.update(1.0 / 60.0);
    }
    fw.update(1.0 / 60.0);
    for p in &fw.particles()[..fw.pattern_particle_count()] {
        let target = p.formation_target().unwrap();
        assert!(p.position.distance(&target) <= jitter + 1e-4);
    }
}
