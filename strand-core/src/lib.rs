/// Strand Core Library - Hair strands as compound sphere/cylinder shapes
///
/// Reads polyline strand files into an ordered segment store, persists that
/// store in a compact binary form, and expands every segment on demand into a
/// joint sphere and a connecting cylinder for a host renderer to instantiate.

pub mod codec;
pub mod config;
pub mod error;
pub mod expand;
pub mod factory;
pub mod geometry;
pub mod projection;
pub mod shape;
pub mod strand;
pub mod transform;

// Re-export commonly used types
pub use config::{FileResolver, HairConfig, DEFAULT_RADIUS};
pub use error::{Error, Result};
pub use expand::{expand, PrimitiveDescriptor, PrimitiveKind, Primitives};
pub use factory::{build_primitive, MaterialRef, PrimitiveFactory, PrimitiveHandle, Serialized};
pub use geometry::{Bounds, Point, Segment, SegmentStore};
pub use projection::{Camera, ProjectionMode};
pub use shape::HairShape;
pub use strand::{load_strand_file, parse_strands, parse_strands_str, StrandStats};
pub use transform::{RotationState, Transform, ZAlignment};
