use nalgebra as na;
use rayon::prelude::*;

/// Instantaneous-capture proximity test.
///
/// Any fragment strictly closer than the capture radius is captured at that tick. There is no
/// dwell time and no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterDetector {
    capture_radius: f64,
}

impl EncounterDetector {
    pub fn new(capture_radius: f64) -> Self {
        Self { capture_radius }
    }

    pub fn capture_radius(&self) -> f64 {
        self.capture_radius
    }

    pub fn is_captured(&self, spacecraft: &na::Vector3<f64>, fragment: &na::Vector3<f64>) -> bool {
        (fragment - spacecraft).norm() < self.capture_radius
    }

    /// Returns the catalog indices of the captured fragments, in input order.
    ///
    /// `active` must only hold fragments that are still in orbit; removed fragments are never
    /// passed back in.
    pub fn detect(
        &self,
        spacecraft: &na::Vector3<f64>,
        active: &[(usize, na::Vector3<f64>)],
    ) -> Vec<usize> {
        active
            .par_iter()
            .filter(|(_, position)| self.is_captured(spacecraft, position))
            .map(|(index, _)| *index)
            .collect()
    }
}
