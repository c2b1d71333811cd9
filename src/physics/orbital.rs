use crate::constants::{MU_EARTH, PI, TWO_PI};
use crate::errors::KeplerError;
use crate::models::OrbitalElements;

/// Bounded Newton-Raphson solver for Kepler's equation, elliptical orbits only.
///
/// Convergence is judged on the residual `|E - e·sin(E) - M|`, never on the step size, so a
/// returned eccentric anomaly always satisfies the equation to within `tolerance` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    tolerance: f64,
    max_iterations: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 50,
        }
    }
}

#[allow(non_snake_case)]
impl KeplerSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn mean_motion(a: f64) -> f64 {
        (MU_EARTH / a.powi(3)).sqrt()
    }

    pub fn orbital_period(a: f64) -> f64 {
        TWO_PI / Self::mean_motion(a)
    }

    /// M = n·t − M0, with t in seconds since the reference epoch.
    pub fn mean_anomaly_at(a: f64, t: f64, M0: f64) -> f64 {
        Self::mean_motion(a) * t - M0
    }

    pub fn eccentric_to_mean_anomaly(E: f64, e: f64) -> f64 {
        E - e * E.sin()
    }

    pub fn eccentric_to_true_anomaly(E: f64, e: f64) -> f64 {
        2.0 * ((1.0 + e).sqrt() * (E / 2.0).sin()).atan2((1.0 - e).sqrt() * (E / 2.0).cos())
    }

    /// Solves M = E − e·sin(E) for E. The result lies near M wrapped into (−π, π].
    pub fn mean_to_eccentric_anomaly(&self, M: f64, e: f64) -> Result<f64, KeplerError> {
        if !(0.0..1.0).contains(&e) {
            return Err(KeplerError::UnsupportedEccentricity(e));
        }
        let M = wrap_to_pi(M);
        if e == 0.0 {
            return Ok(M);
        }

        // Danby's starter
        let mut E = M + 0.85 * e * M.sin().signum();
        let residual = |E: f64| E - e * E.sin() - M;

        for _ in 0..self.max_iterations {
            let f = residual(E);
            if f.abs() <= self.tolerance {
                return Ok(E);
            }
            E -= f / (1.0 - e * E.cos());
        }

        let f = residual(E);
        if f.abs() <= self.tolerance {
            Ok(E)
        } else {
            Err(KeplerError::NotConverged {
                iterations: self.max_iterations,
                residual: f.abs(),
            })
        }
    }

    /// True anomaly at time `t` for an orbit with semi-major axis `a`, eccentricity `e` and
    /// mean anomaly offset `M0`. The result lies in (−π, π].
    pub fn true_anomaly_at(&self, a: f64, e: f64, t: f64, M0: f64) -> Result<f64, KeplerError> {
        if !(a.is_finite() && a > 0.0 && t.is_finite() && M0.is_finite()) {
            return Err(KeplerError::InvalidInput { a, t, m0: M0 });
        }
        let M = Self::mean_anomaly_at(a, t, M0);
        let E = self.mean_to_eccentric_anomaly(M, e)?;
        Ok(Self::eccentric_to_true_anomaly(E, e))
    }

    pub fn true_anomaly_of(&self, elements: &OrbitalElements, t: f64) -> Result<f64, KeplerError> {
        self.true_anomaly_at(elements.a, elements.e, t, elements.mean_anomaly)
    }
}

/// Wraps an angle into (−π, π].
pub fn wrap_to_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TWO_PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
