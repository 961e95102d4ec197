use crate::data::DataType;

use super::matrix::Matrix;
use super::vector::{Vector2, float2};

/// Position, rotation and scale of a 2D object, composed as
/// `translation * rotation * scaling`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vector2,
    rotation: f32,
    scale: Vector2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: float2(0.0, 0.0),
            rotation: 0.0,
            scale: float2(1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vector2, rotation: f32, scale: Vector2) -> Self {
        Self { position, rotation, scale }
    }

    #[inline]
    pub fn position(&self) -> &Vector2 {
        &self.position
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotation in radians.
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    #[inline]
    pub fn scale(&self) -> &Vector2 {
        &self.scale
    }

    pub fn set_scale(&mut self, scale: Vector2) {
        self.scale = scale;
    }

    /// The composed 3x3 `f32` matrix.
    pub fn matrix(&self) -> Matrix {
        let t = Matrix::translation(&self.position);
        let r = Matrix::rotation(self.rotation);
        let s = Matrix::scaling(&self.scale);
        // All three are 3x3, so the products cannot fail on dimensions.
        let tr = mul3(&t, &r);
        mul3(&tr, &s)
    }
}

fn mul3(a: &Matrix, b: &Matrix) -> Matrix {
    a.checked_mul(b)
        .unwrap_or_else(|_| Matrix::identity(3, DataType::F32))
}
