//! Loading and running scenes written in the command language

use glam::DVec3;
use springweb_core::tests::test_helpers::{
    approx_eq, load_scene_file, results_approx_equal, run_scene_file,
};
use springweb_core::{
    build_simulation_context_from_source, load_scene, run_scene, ConfigError, ParticleId,
    RuntimeError, SimError,
};
use std::path::PathBuf;

fn test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

#[test]
fn test_hanging_pair_keeps_anchor() {
    let result = run_scene_file(test_data_path("hanging_pair.scene"), 60, 1.0 / 60.0).unwrap();
    assert_eq!(result.frames, 60);
    assert_eq!(result.particles.len(), 2);

    let anchor = &result.particles[0];
    assert!(approx_eq(anchor.pos.y, 3.0, 1e-3), "anchor drifted to {}", anchor.pos.y);
    // The free end hangs below the pin.
    assert!(result.particles[1].pos.y < 3.0);
}

#[test]
fn test_small_web_catches_projectile() {
    let scene = load_scene_file(test_data_path("small_web.scene")).unwrap();
    assert_eq!(scene.sim.particle_count(), 20);
    assert_eq!(scene.sim.spring_count(), 30);
    assert_eq!(scene.anchors.len(), 6);

    let result = run_scene_file(test_data_path("small_web.scene"), 10, 1.0 / 60.0).unwrap();
    assert_eq!(result.springs_stuck, 1);
    assert!(result.spring_count >= 31);
    assert!(result.particles.iter().all(|p| p.pos.is_finite()));
}

#[test]
fn test_runs_are_deterministic() {
    for name in ["hanging_pair.scene", "small_web.scene"] {
        let path = test_data_path(name);
        let first = run_scene_file(&path, 30, 1.0 / 60.0).unwrap();
        let second = run_scene_file(&path, 30, 1.0 / 60.0).unwrap();
        assert!(results_approx_equal(&first, &second, 0.0), "{} is not deterministic", name);
    }
}

#[test]
fn test_incomplete_scene_loads_but_does_not_run() {
    let source = std::fs::read_to_string(test_data_path("incomplete.scene")).unwrap();
    let scene = load_scene(&source).unwrap();
    assert!(!scene.sim.is_particle_complete(ParticleId(1)));

    let err = run_scene(&source, 1, 1.0 / 60.0).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Sim(SimError::IncompleteParticle { id: ParticleId(1) })
    );

    let (_, diagnostics) = build_simulation_context_from_source(&source).unwrap();
    assert!(diagnostics.has_errors());
}

#[test]
fn test_broken_inputs_report_the_line() {
    let cases = [
        ("gravity\n", 1),
        ("create particles 1\nparticle 0 1 0 0 0 0 0\n", 2),
        ("create springs 1\nlink 0 0 1 10 1 1\n", 2),
        ("create particles 2\nlink 0 0 1 10 1 1\n", 2),
        ("ground 500 0.1\nintegration leapfrog 0.001\n", 2),
        ("create particles 1\nanchor 0\n", 2),
        ("web 0 1 0 0 6 2 100 1 0.9\n", 1),
        ("\n\n# fine so far\nteleport 1 2 3\n", 4),
        ("gravity 9.81\ncreate particles 18446744073709551615\n", 2),
    ];
    for (source, line) in cases {
        let err = load_scene(source).unwrap_err();
        assert_eq!(err.line(), line, "wrong line for {:?}: {}", source, err);
    }
}

#[test]
fn test_parse_and_apply_errors_are_distinguished() {
    assert!(matches!(
        load_scene("gravity up\n").unwrap_err(),
        ConfigError::Parse { .. }
    ));
    assert!(matches!(
        load_scene("particle 3 1 0 0 0 0 0 0\n").unwrap_err(),
        ConfigError::Apply { .. }
    ));
}

#[test]
fn test_later_lines_override_earlier_ones() {
    let scene = load_scene(
        "create particles 1\nparticle 0 1 0 1 0 0 0 0\nparticle 0 2 0 4 0 1 0 0\ngravity 1\ngravity 3\n",
    )
    .unwrap();
    let p = scene.sim.particle(ParticleId(0)).unwrap();
    assert_eq!(p.mass, 2.0);
    assert_eq!(p.pos, DVec3::new(0.0, 4.0, 0.0));
    assert_eq!(p.prev_pos, p.pos);
    assert_eq!(scene.sim.g_acc, DVec3::new(0.0, -3.0, 0.0));
}
