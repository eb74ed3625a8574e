/// 3D transformation matrices, rotation state and axis alignment
use nalgebra::{Matrix4, Unit, Vector3};

use crate::geometry::Point;

/// Cross products shorter than this are treated as parallel vectors
const PARALLEL_EPSILON: f32 = 1e-6;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotation carrying the canonical +Z axis onto some direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZAlignment {
    pub axis: Unit<Vector3<f32>>,
    pub angle_degrees: f32,
}

impl ZAlignment {
    pub fn identity() -> Self {
        Self {
            axis: Vector3::z_axis(),
            angle_degrees: 0.0,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::axis_angle_matrix(&self.axis, self.angle_degrees)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Create a translation matrix moving the origin to `point`
    pub fn translation_matrix(point: &Point) -> Matrix4<f32> {
        Matrix4::new_translation(&point.coords)
    }

    /// Create a rotation of `degrees` around `axis`
    pub fn axis_angle_matrix(axis: &Unit<Vector3<f32>>, degrees: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(axis, degrees.to_radians())
    }

    /// Rotation that aligns +Z with `direction`.
    ///
    /// The rotation axis is `normalize(Z x dir)` and the angle `acos(dir.z)`.
    /// When `direction` is parallel to Z the cross product vanishes: the result
    /// is the identity for +Z and a half turn around +X for -Z. Zero-length or
    /// non-finite directions also yield the identity.
    pub fn align_z(direction: &Vector3<f32>) -> ZAlignment {
        let length = direction.norm();
        if !length.is_finite() || length <= f32::EPSILON {
            return ZAlignment::identity();
        }

        let axis = direction / length;
        let cos_angle = axis.z.clamp(-1.0, 1.0);

        match Unit::try_new(Vector3::z().cross(&axis), PARALLEL_EPSILON) {
            Some(rotation_axis) => ZAlignment {
                axis: rotation_axis,
                angle_degrees: cos_angle.acos().to_degrees(),
            },
            None if cos_angle > 0.0 => ZAlignment::identity(),
            None => ZAlignment {
                axis: Vector3::x_axis(),
                angle_degrees: 180.0,
            },
        }
    }
}
