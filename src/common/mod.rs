//! Common utilities and types for the go-to behavior

/// Common types and utilities used across the codebase
pub mod types {
    use nalgebra::{UnitQuaternion, Vector3};

    /// A 3D position or velocity in the shared reference frame
    pub type Vec3 = Vector3<f64>;

    /// Vehicle attitude
    pub type Attitude = UnitQuaternion<f64>;

    /// Yaw angle (rotation about z) of an attitude, in radians
    pub fn yaw_of(attitude: &Attitude) -> f64 {
        attitude.euler_angles().2
    }

    /// Horizontal (xy) magnitude of a vector
    pub fn horizontal_norm(v: &Vec3) -> f64 {
        v.xy().norm()
    }
}

#[cfg(test)]
mod test {
    use super::types::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn yaw_from_attitude() {
        let q = Attitude::from_euler_angles(0.0, 0.0, FRAC_PI_2);
        assert!((yaw_of(&q) - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn horizontal_norm_ignores_z() {
        let v = Vec3::new(3.0, 4.0, 100.0);
        assert!((horizontal_norm(&v) - 5.0).abs() < 1e-12);
    }
}
