/// Strand geometry: points, segments and the segment store owned by a hair shape
use nalgebra::{Point3, Vector3};

/// A strand vertex
pub type Point = Point3<f32>;

/// One edge of a strand polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction from start to end
    pub fn direction(&self) -> Vector3<f32> {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.direction().norm()
    }
}

/// Axis-aligned bounds of a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn from_point(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn expand(&mut self, point: &Point) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn center(&self) -> Point {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Ordered segments of every strand plus the radius shared by all of them.
///
/// Consecutive segments of a strand stay adjacent and in traversal order.
/// Strand boundaries are not stored: a boundary is simply a place where one
/// segment's end is not the next segment's start.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    radius: f32,
}

impl SegmentStore {
    pub fn new(radius: f32) -> Self {
        Self::from_segments(Vec::new(), radius)
    }

    pub fn from_segments(segments: Vec<Segment>, radius: f32) -> Self {
        Self { segments, radius }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of primitives the store expands into: a sphere and a cylinder per segment
    pub fn primitive_count(&self) -> usize {
        2 * self.segments.len()
    }

    /// Sum of all segment lengths
    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(Segment::length).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.segments.first()?;
        let mut bounds = Bounds::from_point(first.start);
        for segment in &self.segments {
            bounds.expand(&segment.start);
            bounds.expand(&segment.end);
        }
        Some(bounds)
    }
}
