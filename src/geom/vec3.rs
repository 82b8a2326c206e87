use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// World-space vector in meters.
///
/// The host server uses a right-handed frame with `y` pointing up, so all
/// road-plane math in the core happens on the `x`/`z` components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Constructs a new vector from its components.
    ///
    /// # Example
    /// ```
    /// use traffic_ai_core::geom::Vec3;
    /// let pos = Vec3::new(120.0, 4.5, -300.0);
    /// println!("Position: {:?}", pos);
    /// ```
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Full 3D Euclidean length.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length of the projection onto the ground (XZ) plane.
    pub fn length_xz(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Vec3) -> f32 {
        (*other - *self).length()
    }

    /// Ground-plane distance to another point, ignoring elevation.
    pub fn distance_to_xz(&self, other: &Vec3) -> f32 {
        (*other - *self).length_xz()
    }

    /// Returns the vector normalized in the XZ plane with `y` zeroed.
    /// Returns `None` when the ground-plane length is (numerically) zero.
    pub fn normalized_xz(&self) -> Option<Vec3> {
        let len = self.length_xz();
        if len <= f32::EPSILON {
            return None;
        }
        Some(Vec3::new(self.x / len, 0.0, self.z / len))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
