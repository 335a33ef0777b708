use std::ops::{Add, Mul, Neg, Sub};

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Three-component vector used for positions, euler angles (degrees) and
/// velocities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const DOWN: Vec3 = Vec3::new(0.0, -1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    pub fn normalized(&self) -> Vec3 {
        let length = self.length();
        if length <= f32::EPSILON {
            return Vec3::ZERO;
        }
        *self * (1.0 / length)
    }

    /// Facing direction for euler angles given as (pitch, yaw, roll) in
    /// degrees, y-up, z-forward.
    pub fn forward_from_angles(angles: Vec3) -> Vec3 {
        let pitch = angles.x.to_radians();
        let yaw = angles.y.to_radians();
        Vec3::new(
            yaw.sin() * pitch.cos(),
            -pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
    }

    /// Right-hand direction for the same convention as
    /// [`Vec3::forward_from_angles`]. Roll is ignored.
    pub fn right_from_angles(angles: Vec3) -> Vec3 {
        let yaw = angles.y.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
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

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

// Floats travel as their raw bits so host and client hold identical values.
impl Serde for Vec3 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.x.to_bits().ser(writer);
        self.y.to_bits().ser(writer);
        self.z.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let x = f32::from_bits(u32::de(reader)?);
        let y = f32::from_bits(u32::de(reader)?);
        let z = f32::from_bits(u32::de(reader)?);
        Ok(Vec3::new(x, y, z))
    }

    fn bit_length(&self) -> u32 {
        96
    }
}
