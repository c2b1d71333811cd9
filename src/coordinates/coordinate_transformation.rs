use crate::models::OrbitalElements;
use nalgebra as na;
use rayon::prelude::*;

/// Converts a position on a Keplerian orbit to the inertial (ECI) frame.
///   a: semi-major axis [m]
///   e: eccentricity [-]
///   omega: argument of periapsis [rad]
///   nu: true anomaly [rad]
///   i: inclination [rad]
///   omega_cap: right ascension of ascending node [rad]
/// Returns: position [m]
pub fn to_cartesian(
    a: f64,
    e: f64,
    omega: f64,
    nu: f64,
    i: f64,
    omega_cap: f64,
) -> na::Vector3<f64> {
    let p = a * (1.0 - e * e);
    let r = p / (1.0 + e * nu.cos());

    // Argument of latitude
    let (sin_u, cos_u) = (omega + nu).sin_cos();
    let (sin_raan, cos_raan) = omega_cap.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();

    na::Vector3::new(
        r * (cos_raan * cos_u - sin_raan * sin_u * cos_i),
        r * (sin_raan * cos_u + cos_raan * sin_u * cos_i),
        r * sin_i * sin_u,
    )
}

pub fn elements_to_cartesian(elements: &OrbitalElements, nu: f64) -> na::Vector3<f64> {
    to_cartesian(
        elements.a,
        elements.e,
        elements.arg_periapsis,
        nu,
        elements.i,
        elements.raan,
    )
}

/// Evaluates [`elements_to_cartesian`] for every (elements, true anomaly) pair. Output order
/// matches input order.
pub fn batch_to_cartesian(orbits: &[(OrbitalElements, f64)]) -> Vec<na::Vector3<f64>> {
    orbits
        .par_iter()
        .map(|(elements, nu)| elements_to_cartesian(elements, *nu))
        .collect()
}
