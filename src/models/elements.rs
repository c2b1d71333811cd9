use crate::constants::R_EARTH;
use serde::{Deserialize, Serialize};

/// Classical Keplerian elements at epoch.
///   a: semi-major axis [m]
///   e: eccentricity [-]
///   i: inclination [rad]
///   raan: right ascension of ascending node [rad]
///   arg_periapsis: argument of periapsis [rad]
///   mean_anomaly: mean anomaly at epoch, M0 [rad]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub a: f64,
    pub e: f64,
    pub i: f64,
    pub raan: f64,
    pub arg_periapsis: f64,
    pub mean_anomaly: f64,
}

impl OrbitalElements {
    pub fn new(a: f64, e: f64, i: f64, raan: f64, arg_periapsis: f64, mean_anomaly: f64) -> Self {
        Self {
            a,
            e,
            i,
            raan,
            arg_periapsis,
            mean_anomaly,
        }
    }

    /// Circular orbit with periapsis and epoch anomaly both at the ascending node.
    pub fn circular(a: f64, i: f64, raan: f64) -> Self {
        Self::new(a, 0.0, i, raan, 0.0, 0.0)
    }

    pub fn is_elliptical(&self) -> bool {
        (0.0..1.0).contains(&self.e)
    }

    pub fn is_finite(&self) -> bool {
        [
            self.a,
            self.e,
            self.i,
            self.raan,
            self.arg_periapsis,
            self.mean_anomaly,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Orbit of the sweeping spacecraft, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacecraftElements {
    elements: OrbitalElements,
}

impl SpacecraftElements {
    pub fn new(elements: OrbitalElements) -> Self {
        Self { elements }
    }

    /// Circular orbit `altitude_offset` above `collision_altitude`, in the mean plane of the
    /// given fragment orbits (arithmetic mean of inclination and RAAN).
    ///
    /// Returns `None` for an empty population.
    pub fn above_collision<'a, I>(
        fragments: I,
        collision_altitude: f64,
        altitude_offset: f64,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = &'a OrbitalElements>,
    {
        let (count, sum_i, sum_raan) = fragments
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, i, raan), el| {
                (n + 1, i + el.i, raan + el.raan)
            });
        if count == 0 {
            return None;
        }

        let a = R_EARTH + collision_altitude + altitude_offset;
        let n = count as f64;
        Some(Self::new(OrbitalElements::circular(a, sum_i / n, sum_raan / n)))
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn altitude(&self) -> f64 {
        self.elements.a - R_EARTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::H_COLLISION;
    use approx::assert_abs_diff_eq;

    #[test]
    fn spacecraft_sits_in_mean_plane_above_collision() {
        let fragments = [
            OrbitalElements::new(7.2e6, 0.01, 1.30, 0.40, 0.1, 0.2),
            OrbitalElements::new(7.3e6, 0.02, 1.50, 0.60, 0.3, 0.4),
        ];
        let sc = SpacecraftElements::above_collision(&fragments, H_COLLISION, 40_000.0).unwrap();
        let el = sc.elements();

        assert_abs_diff_eq!(el.a, R_EARTH + H_COLLISION + 40_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(el.i, 1.40, epsilon = 1e-12);
        assert_abs_diff_eq!(el.raan, 0.50, epsilon = 1e-12);
        assert_eq!(el.e, 0.0);
        assert_eq!(el.arg_periapsis, 0.0);
        assert_eq!(el.mean_anomaly, 0.0);
        assert_abs_diff_eq!(sc.altitude(), 829_000.0, epsilon = 1e-6);
    }

    #[test]
    fn empty_population_has_no_mean_plane() {
        let none: [OrbitalElements; 0] = [];
        assert!(SpacecraftElements::above_collision(&none, H_COLLISION, 0.0).is_none());
    }

    #[test]
    fn elliptical_range_is_half_open() {
        assert!(OrbitalElements::new(7e6, 0.0, 0.0, 0.0, 0.0, 0.0).is_elliptical());
        assert!(OrbitalElements::new(7e6, 0.99, 0.0, 0.0, 0.0, 0.0).is_elliptical());
        assert!(!OrbitalElements::new(7e6, 1.0, 0.0, 0.0, 0.0, 0.0).is_elliptical());
        assert!(!OrbitalElements::new(7e6, -0.1, 0.0, 0.0, 0.0, 0.0).is_elliptical());
    }
}
