use std::ops::{Add, Mul, Sub};

#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec3([f32; 3]);

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3([x, y, z])
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    pub fn length(&self) -> f32 {
        (self.x().powi(2) + self.y().powi(2) + self.z().powi(2)).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self([0.0, 0.0, 0.0]);
        }

        Self([self.x() / length, self.y() / length, self.z() / length])
    }

    pub fn subtract(&self, other: &Self) -> Self {
        Vec3([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }

    /// Unsigned angle between two vectors, in radians within `[0, π]`.
    /// Zero-length inputs yield an angle of zero.
    pub fn angle_to(&self, other: &Self) -> f32 {
        let a = self.normalize();
        let b = other.normalize();
        a.dot(&b).clamp(-1.0, 1.0).acos()
    }

    pub fn as_array(&self) -> &[f32; 3] {
        &self.0
    }
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    pub fn z(&self) -> f32 {
        self.0[2]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(values: [f32; 3]) -> Self {
        Vec3(values)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> Self {
        vec.0
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        ])
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar, self.z() * scalar])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_between_perpendicular_vectors() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        let angle = a.angle_to(&b);
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_opposite_vectors() {
        let a = Vec3::new(0.0, 0.0, -1.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        let angle = a.angle_to(&b);
        assert!((angle - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_is_zero() {
        let zero = Vec3::new(0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), zero);
    }
}
