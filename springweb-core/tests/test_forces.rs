//! Spring and ground force models

use glam::DVec3;
use springweb_core::forces::{ground_force, viscoelastic_force};
use springweb_core::tests::test_helpers::{approx_eq, approx_eq_vec};
use springweb_core::{Particle, Simulation, Spring};

fn at(x: f64, y: f64) -> Particle {
    Particle::new(1.0, DVec3::new(x, y, 0.0), DVec3::ZERO)
}

#[test]
fn test_ground_force_is_proportional_to_depth() {
    let ks = 500.0;
    let shallow = ground_force(DVec3::new(0.0, -0.01, 0.0), DVec3::ZERO, ks, 0.0);
    let deep = ground_force(DVec3::new(0.0, -0.04, 0.0), DVec3::ZERO, ks, 0.0);
    assert!(approx_eq(shallow.y, 5.0, 1e-12));
    assert!(approx_eq(deep.y, 4.0 * shallow.y, 1e-12));
    assert_eq!(deep.x, 0.0);
}

#[test]
fn test_ground_force_vanishes_on_and_above_plane() {
    let vel = DVec3::new(1.0, -3.0, 0.5);
    assert_eq!(ground_force(DVec3::new(2.0, 0.0, 1.0), vel, 500.0, 10.0), DVec3::ZERO);
    assert_eq!(ground_force(DVec3::new(2.0, 0.3, 1.0), vel, 500.0, 10.0), DVec3::ZERO);
}

#[test]
fn test_ground_damping_opposes_motion() {
    let vel = DVec3::new(2.0, 0.0, 0.0);
    let force = ground_force(DVec3::new(0.0, -0.1, 0.0), vel, 0.0, 3.0);
    assert!(approx_eq_vec(force, DVec3::new(-6.0, 0.0, 0.0), 1e-12));
}

#[test]
fn test_stretched_spring_pulls_together() {
    let (a, b) = (at(0.0, 1.0), at(3.0, 1.0));
    let on_a = viscoelastic_force(&a, &b, 10.0, 0.0, 2.0);
    assert!(approx_eq_vec(on_a, DVec3::new(10.0, 0.0, 0.0), 1e-12));
}

#[test]
fn test_compressed_spring_pushes_apart() {
    let (a, b) = (at(0.0, 1.0), at(1.0, 1.0));
    let on_a = viscoelastic_force(&a, &b, 10.0, 0.0, 2.0);
    assert!(on_a.x < 0.0);
}

#[test]
fn test_spring_damping_uses_relative_velocity() {
    let a = at(0.0, 1.0);
    let b = Particle::new(1.0, DVec3::new(1.0, 1.0, 0.0), DVec3::new(2.0, 5.0, 0.0));
    // At rest length only the axial part of the relative velocity counts.
    let on_a = viscoelastic_force(&a, &b, 10.0, 0.5, 1.0);
    assert!(approx_eq_vec(on_a, DVec3::new(1.0, 0.0, 0.0), 1e-12));
}

#[test]
fn test_spring_forces_are_equal_and_opposite() {
    let mut sim = Simulation::new();
    let a = sim.push_particle(Particle::new(1.0, DVec3::new(0.1, 2.0, 0.3), DVec3::new(0.2, 0.0, 0.0)));
    let b = sim.push_particle(Particle::new(3.0, DVec3::new(1.7, 3.1, -0.4), DVec3::new(0.0, -1.0, 0.5)));
    sim.push_spring(Spring::new(a, b, 120.0, 4.0, 1.0)).unwrap();
    sim.update(0.001).unwrap();

    let fa = sim.particle(a).unwrap().ext_force;
    let fb = sim.particle(b).unwrap().ext_force;
    assert_ne!(fa, DVec3::ZERO);
    assert_eq!(fa, -fb);
}

#[test]
fn test_gravity_scales_with_mass() {
    let mut sim = Simulation::new();
    sim.g_acc = DVec3::new(0.0, -9.81, 0.0);
    let light = sim.push_particle(at(0.0, 5.0));
    let heavy = sim.push_particle(Particle::new(4.0, DVec3::new(2.0, 5.0, 0.0), DVec3::ZERO));
    sim.step().unwrap();
    assert!(approx_eq(sim.particle(light).unwrap().ext_force.y, -9.81, 1e-12));
    assert!(approx_eq(sim.particle(heavy).unwrap().ext_force.y, -39.24, 1e-12));
    assert_eq!(sim.particle(light).unwrap().acc, sim.particle(heavy).unwrap().acc);
}
