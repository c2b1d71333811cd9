pub const MU_EARTH: f64 = 3.986004418e14; // Earth's gravitational parameter (m³/s²)
pub const WGS84_A: f64 = 6378137.0; // Semi-major axis [m]
pub const R_EARTH: f64 = WGS84_A; // Equatorial radius used for altitudes (m)

// Iridium 33 / Kosmos 2251 collision
pub const H_COLLISION: f64 = 789_000.0; // Collision altitude (m)
pub const KOSMOS_FAMILY: &str = "Kosmos 2251-Collision-Fragment";

// Math
pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * PI;
