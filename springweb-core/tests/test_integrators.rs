//! Behaviour of the four integration schemes on single particles

use glam::DVec3;
use springweb_core::tests::test_helpers::{approx_eq, approx_eq_vec, single_particle};
use springweb_core::{IntegrationMethod, Simulation};

#[test]
fn test_rest_is_a_fixed_point() {
    for method in IntegrationMethod::ALL {
        let start = DVec3::new(0.5, 2.0, -1.0);
        let (mut sim, id) = single_particle(2.0, start);
        sim.integration_method = method;
        for _ in 0..100 {
            sim.step().unwrap();
        }
        let p = sim.particle(id).unwrap();
        assert_eq!(p.pos, start, "{} moved a particle at rest", method);
        assert_eq!(p.vel, DVec3::ZERO, "{} gave a particle at rest velocity", method);
    }
}

#[test]
fn test_velocity_verlet_tracks_free_fall() {
    let g = -9.81;
    let (mut sim, id) = single_particle(1.0, DVec3::new(0.0, 100.0, 0.0));
    sim.g_acc = DVec3::new(0.0, g, 0.0);
    sim.integration_method = IntegrationMethod::VelocityVerlet;

    let dt = 0.001;
    for _ in 0..1000 {
        sim.update(dt).unwrap();
    }

    // The position update uses acc * dt^2, so the drift from the closed
    // form grows like g * dt * t.
    let p = sim.particle(id).unwrap();
    let t = 1.0;
    assert!(approx_eq(p.pos.y, 100.0 + 0.5 * g * t * t, 2e-2), "pos.y = {}", p.pos.y);
    assert!(approx_eq(p.vel.y, g * t, 1e-2), "vel.y = {}", p.vel.y);
    assert_eq!(p.pos.x, 0.0);
}

#[test]
fn test_symplectic_and_verlet_agree_on_free_fall() {
    let mut results = Vec::new();
    for method in [IntegrationMethod::Symplectic, IntegrationMethod::Verlet] {
        let (mut sim, id) = single_particle(1.0, DVec3::new(0.0, 50.0, 0.0));
        sim.g_acc = DVec3::new(0.0, -9.81, 0.0);
        sim.integration_method = method;
        for _ in 0..500 {
            sim.step().unwrap();
        }
        results.push(sim.particle(id).unwrap().pos);
    }
    assert!(approx_eq_vec(results[0], results[1], 1e-2));
}

#[test]
fn test_euler_lags_one_step() {
    let (mut sim, id) = single_particle(1.0, DVec3::new(0.0, 10.0, 0.0));
    sim.g_acc = DVec3::new(0.0, -10.0, 0.0);
    sim.integration_method = IntegrationMethod::Euler;

    sim.update(0.1).unwrap();
    let p = sim.particle(id).unwrap();
    assert_eq!(p.pos.y, 10.0);
    assert_eq!(p.vel.y, 0.0);
    assert_eq!(p.acc.y, -10.0);

    sim.update(0.1).unwrap();
    let p = sim.particle(id).unwrap();
    assert!(approx_eq(p.vel.y, -1.0, 1e-12));
}

#[test]
fn test_invalid_timestep_is_rejected() {
    let mut sim = Simulation::new();
    assert!(sim.update(0.0).is_err());
    assert!(sim.update(-0.01).is_err());
    assert!(sim.update(f64::NAN).is_err());
}
