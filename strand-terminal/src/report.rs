/// Plain-text summary of a loaded hair shape
use std::fmt;

use strand_core::{Bounds, HairShape, StrandStats};

/// Figures printed by `--stats`
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub segments: usize,
    pub primitives: usize,
    pub radius: f32,
    pub total_length: f32,
    pub bounds: Option<Bounds>,
    /// Only known when the shape came from a text strand file
    pub strands: Option<StrandStats>,
}

impl Report {
    pub fn new(shape: &HairShape, strands: Option<StrandStats>) -> Self {
        let store = shape.store();
        Self {
            segments: store.len(),
            primitives: shape.primitive_count(),
            radius: store.radius(),
            total_length: store.total_length(),
            bounds: store.bounds(),
            strands,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(stats) = &self.strands {
            writeln!(f, "strands:      {}", stats.strands)?;
            writeln!(f, "points:       {}", stats.points)?;
        }
        writeln!(f, "segments:     {}", self.segments)?;
        writeln!(f, "primitives:   {} (spheres + cylinders)", self.primitives)?;
        writeln!(f, "radius:       {}", self.radius)?;
        writeln!(f, "fibre length: {:.4}", self.total_length)?;
        match &self.bounds {
            Some(bounds) => write!(
                f,
                "bounds:       ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            ),
            None => write!(f, "bounds:       empty"),
        }
    }
}
