pub mod coordinate_transformation;

pub use coordinate_transformation::{batch_to_cartesian, elements_to_cartesian, to_cartesian};
