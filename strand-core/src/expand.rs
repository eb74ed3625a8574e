//! Index-addressed expansion of segments into sphere and cylinder primitives.
//!
//! Index `2k` is the joint sphere at the start of segment `k`, index `2k + 1`
//! the cylinder running from that start point to the segment's end. The last
//! point of a strand gets no sphere of its own.

use std::iter::FusedIterator;

use nalgebra::{Matrix4, Vector3};

use crate::geometry::{Point, SegmentStore};
use crate::transform::Transform;

/// Kind of a concrete primitive a segment expands into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Sphere,
    Cylinder,
}

impl PrimitiveKind {
    /// Type name understood by primitive factories
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Cylinder => "cylinder",
        }
    }
}

/// Description of one expanded primitive in world space.
///
/// Cylinders extend along their local +Z axis from `z = 0` to `z = length`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveDescriptor {
    Sphere {
        to_world: Matrix4<f32>,
        radius: f32,
    },
    Cylinder {
        to_world: Matrix4<f32>,
        radius: f32,
        length: f32,
    },
}

impl PrimitiveDescriptor {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveDescriptor::Sphere { .. } => PrimitiveKind::Sphere,
            PrimitiveDescriptor::Cylinder { .. } => PrimitiveKind::Cylinder,
        }
    }

    pub fn to_world(&self) -> &Matrix4<f32> {
        match self {
            PrimitiveDescriptor::Sphere { to_world, .. }
            | PrimitiveDescriptor::Cylinder { to_world, .. } => to_world,
        }
    }

    pub fn radius(&self) -> f32 {
        match *self {
            PrimitiveDescriptor::Sphere { radius, .. }
            | PrimitiveDescriptor::Cylinder { radius, .. } => radius,
        }
    }

    /// Cylinder length, `None` for spheres
    pub fn length(&self) -> Option<f32> {
        match *self {
            PrimitiveDescriptor::Sphere { .. } => None,
            PrimitiveDescriptor::Cylinder { length, .. } => Some(length),
        }
    }

    /// World-space position of the local origin (sphere center, cylinder base)
    pub fn origin(&self) -> Point {
        self.to_world().transform_point(&Point::origin())
    }

    /// World-space direction of the local +Z axis
    pub fn axis(&self) -> Vector3<f32> {
        self.to_world().transform_vector(&Vector3::z())
    }
}

/// Expand primitive `index` of `store` under the shape transform `to_world`.
///
/// Returns `None` once `index / 2` runs past the last segment.
pub fn expand(
    to_world: &Matrix4<f32>,
    store: &SegmentStore,
    index: usize,
) -> Option<PrimitiveDescriptor> {
    let segment = store.segments().get(index / 2)?;

    let alignment = Transform::align_z(&segment.direction());
    let to_world =
        to_world * Transform::translation_matrix(&segment.start) * alignment.matrix();
    let radius = store.radius();

    if index % 2 == 0 {
        Some(PrimitiveDescriptor::Sphere { to_world, radius })
    } else {
        Some(PrimitiveDescriptor::Cylinder {
            to_world,
            radius,
            length: segment.length(),
        })
    }
}

/// Lazy sequence over every primitive of a segment store.
///
/// Cloning yields an independent sequence, so enumeration can be restarted
/// or split between workers.
#[derive(Debug, Clone)]
pub struct Primitives<'a> {
    store: &'a SegmentStore,
    to_world: Matrix4<f32>,
    front: usize,
    back: usize,
}

impl<'a> Primitives<'a> {
    pub fn new(store: &'a SegmentStore, to_world: Matrix4<f32>) -> Self {
        Self {
            store,
            to_world,
            front: 0,
            back: store.primitive_count(),
        }
    }
}

impl Iterator for Primitives<'_> {
    type Item = PrimitiveDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let primitive = expand(&self.to_world, self.store, self.front);
        self.front += 1;
        primitive
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for Primitives<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        expand(&self.to_world, self.store, self.back)
    }
}

impl ExactSizeIterator for Primitives<'_> {}

impl FusedIterator for Primitives<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;

    fn store() -> SegmentStore {
        SegmentStore::from_segments(
            vec![
                Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)),
                Segment::new(Point::new(1.0, 0.0, 0.0), Point::new(1.0, 2.0, 0.0)),
                Segment::new(Point::new(5.0, 5.0, 5.0), Point::new(5.0, 5.0, 8.0)),
            ],
            0.25,
        )
    }

    #[test]
    fn test_expand_alternates_kinds() {
        let store = store();
        let identity = Matrix4::identity();
        for index in 0..store.primitive_count() {
            let primitive = expand(&identity, &store, index).unwrap();
            let expected = if index % 2 == 0 {
                PrimitiveKind::Sphere
            } else {
                PrimitiveKind::Cylinder
            };
            assert_eq!(primitive.kind(), expected);
            assert_eq!(primitive.radius(), 0.25);
        }
    }

    #[test]
    fn test_expand_past_end_is_none() {
        let store = store();
        let identity = Matrix4::identity();
        assert!(expand(&identity, &store, 5).is_some());
        assert!(expand(&identity, &store, 6).is_none());
        assert!(expand(&identity, &store, 7).is_none());
        assert!(expand(&identity, &store, usize::MAX).is_none());
    }

    #[test]
    fn test_cylinder_spans_segment() {
        let store = store();
        let identity = Matrix4::identity();
        for (k, segment) in store.segments().iter().enumerate() {
            let cylinder = expand(&identity, &store, 2 * k + 1).unwrap();
            let length = cylinder.length().unwrap();
            assert!((length - segment.length()).abs() < 1e-5);

            let tip = cylinder
                .to_world()
                .transform_point(&Point::new(0.0, 0.0, length));
            assert!((tip - segment.end).norm() < 1e-5, "segment {k}: tip at {tip:?}");
        }
    }

    #[test]
    fn test_sphere_sits_at_segment_start() {
        let store = store();
        let to_world = Transform::translation_matrix(&Point::new(10.0, 0.0, -1.0));
        for (k, segment) in store.segments().iter().enumerate() {
            let sphere = expand(&to_world, &store, 2 * k).unwrap();
            assert_eq!(sphere.length(), None);
            let expected = segment.start + Vector3::new(10.0, 0.0, -1.0);
            assert!((sphere.origin() - expected).norm() < 1e-5);
        }
    }

    #[test]
    fn test_z_aligned_segment_has_finite_transform() {
        let store = SegmentStore::from_segments(
            vec![
                Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(0.0, 0.0, 1.0)),
                Segment::new(Point::new(0.0, 0.0, 1.0), Point::new(0.0, 0.0, -1.0)),
            ],
            0.05,
        );
        for primitive in Primitives::new(&store, Matrix4::identity()) {
            assert!(primitive.to_world().iter().all(|v| v.is_finite()));
        }
        let reversed = expand(&Matrix4::identity(), &store, 3).unwrap();
        assert!((reversed.axis() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
        assert!((reversed.length().unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_segment_is_finite() {
        let point = Point::new(3.0, 3.0, 3.0);
        let store = SegmentStore::from_segments(vec![Segment::new(point, point)], 0.05);
        let cylinder = expand(&Matrix4::identity(), &store, 1).unwrap();
        assert_eq!(cylinder.length(), Some(0.0));
        assert!(cylinder.to_world().iter().all(|v| v.is_finite()));
        assert_eq!(cylinder.origin(), point);
    }

    #[test]
    fn test_primitives_sequence() {
        let store = store();
        let primitives = Primitives::new(&store, Matrix4::identity());
        assert_eq!(primitives.len(), 6);

        let forward: Vec<_> = primitives.clone().collect();
        let mut backward: Vec<_> = primitives.clone().rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);

        // restartable: a clone taken before iteration sees everything again
        let mut partial = primitives.clone();
        partial.next();
        assert_eq!(partial.len(), 5);
        assert_eq!(primitives.count(), 6);

        let mut skipping = Primitives::new(&store, Matrix4::identity());
        assert_eq!(skipping.nth(4), expand(&Matrix4::identity(), &store, 4));
        assert_eq!(skipping.len(), 1);
        assert_eq!(skipping.nth(10), None);
        assert_eq!(skipping.next(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(PrimitiveKind::Sphere.type_name(), "sphere");
        assert_eq!(PrimitiveKind::Cylinder.type_name(), "cylinder");
    }
}
