use nalgebra::{Point3, Vector3};

use crate::particle::{BhState, Particle, Payload};
use crate::ptype::ParticleType;

#[test]
fn gas_particle_has_sph_state() {
    let p = Particle::gas(
        1,
        0.5,
        Point3::new(1.0, 2.0, 3.0),
        Vector3::zeros(),
        0.1,
        2.0,
    );

    assert_eq!(p.ptype, ParticleType::Gas);
    let sph = p.sph().expect("gas particle should carry SPH state");
    assert_eq!(sph.entropy, 2.0);
    assert_eq!(sph.entropy_rate, 0.0);
    assert!(p.bh().is_none());
}

#[test]
fn collisionless_particle_has_no_payload() {
    let p = Particle::collisionless(2, ParticleType::Halo, 1.0, Point3::origin(), Vector3::zeros());
    assert_eq!(p.payload, Payload::None);
    assert!(p.sph().is_none());
    assert!(p.bh().is_none());
}

#[test]
fn black_hole_is_a_boundary_particle() {
    let bh = BhState {
        mass: 1e-3,
        mdot: 1e-6,
        min_time_bin: 0,
    };
    let p = Particle::black_hole(3, 1e-3, Point3::origin(), Vector3::zeros(), bh);

    assert_eq!(p.ptype, ParticleType::Boundary);
    assert_eq!(p.bh().unwrap().mdot, 1e-6);
}

#[test]
fn step_ticks_follows_the_bin() {
    let mut p = Particle::collisionless(4, ParticleType::Disk, 1.0, Point3::origin(), Vector3::zeros());

    assert_eq!(p.step_ticks(), 0); // bin 0: no step assigned yet
    p.time_bin = 5;
    assert_eq!(p.step_ticks(), 32);
    p.time_bin = 12;
    assert_eq!(p.step_ticks(), 4096);
}

#[test]
fn serde_round_trip_preserves_integrator_state() {
    let mut p = Particle::gas(9, 0.25, Point3::new(4.0, 5.0, 6.0), Vector3::new(1.0, 0.0, 0.0), 0.05, 1.5);
    p.time_bin = 7;
    p.step_start = 384;
    p.drift_tick = 400;
    p.kick_tick = 448;
    p.sph_mut().unwrap().entropy_rate = -0.2;

    let json = serde_json::to_string(&p).unwrap();
    let back: Particle = serde_json::from_str(&json).unwrap();
    assert_eq!(p, back);
}
