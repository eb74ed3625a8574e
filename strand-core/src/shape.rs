//! The hair shape: a compound shape that never renders itself and instead
//! expands into one sphere and one cylinder per strand segment.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use nalgebra::Matrix4;
use rayon::prelude::*;

use crate::codec;
use crate::config::{FileResolver, HairConfig};
use crate::error::Result;
use crate::expand::{expand, PrimitiveDescriptor, Primitives};
use crate::factory::{build_primitive, MaterialRef, PrimitiveFactory};
use crate::geometry::SegmentStore;
use crate::strand::{load_strand_file, StrandStats};

#[derive(Debug, Clone)]
pub struct HairShape {
    store: SegmentStore,
    to_world: Matrix4<f32>,
    material: Option<MaterialRef>,
    source: Option<PathBuf>,
}

impl HairShape {
    /// Load the strand file named by `config`; nothing is returned unless the whole file parses
    pub fn load(config: &HairConfig, resolver: &FileResolver) -> Result<Self> {
        Self::load_with_stats(config, resolver).map(|(shape, _)| shape)
    }

    /// Like [`HairShape::load`], also returning what the parser counted
    pub fn load_with_stats(
        config: &HairConfig,
        resolver: &FileResolver,
    ) -> Result<(Self, StrandStats)> {
        config.validate()?;
        let path = resolver.resolve(&config.filename);
        let (store, stats) = load_strand_file(&path, config.radius)?;
        let shape = Self {
            source: Some(path),
            ..Self::from_store(store)
        };
        Ok((shape, stats))
    }

    pub fn from_store(store: SegmentStore) -> Self {
        Self {
            store,
            to_world: Matrix4::identity(),
            material: None,
            source: None,
        }
    }

    pub fn with_to_world(mut self, to_world: Matrix4<f32>) -> Self {
        self.to_world = to_world;
        self
    }

    pub fn with_material(mut self, material: MaterialRef) -> Self {
        self.material = Some(material);
        self
    }

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    pub fn to_world(&self) -> &Matrix4<f32> {
        &self.to_world
    }

    pub fn material(&self) -> Option<&MaterialRef> {
        self.material.as_ref()
    }

    /// Resolved strand file this shape was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_compound(&self) -> bool {
        true
    }

    pub fn segment_count(&self) -> usize {
        self.store.len()
    }

    pub fn primitive_count(&self) -> usize {
        self.store.primitive_count()
    }

    /// Primitive `index`, or `None` past the last one
    pub fn element(&self, index: usize) -> Option<PrimitiveDescriptor> {
        expand(&self.to_world, &self.store, index)
    }

    pub fn primitives(&self) -> Primitives<'_> {
        Primitives::new(&self.store, self.to_world)
    }

    /// Instantiate primitive `index` through `factory`
    pub fn instantiate<F>(&self, factory: &F, index: usize) -> Result<Option<F::Handle>>
    where
        F: PrimitiveFactory + ?Sized,
    {
        self.element(index)
            .map(|descriptor| build_primitive(factory, &descriptor, self.material()))
            .transpose()
    }

    /// Instantiate every primitive in index order, stopping at the first failure
    pub fn instantiate_all<F>(&self, factory: &F) -> Result<Vec<F::Handle>>
    where
        F: PrimitiveFactory + ?Sized,
    {
        self.primitives()
            .map(|descriptor| build_primitive(factory, &descriptor, self.material()))
            .collect()
    }

    /// Instantiate every primitive on the rayon pool; handles come back in index order
    pub fn par_instantiate_all<F>(&self, factory: &F) -> Result<Vec<F::Handle>>
    where
        F: PrimitiveFactory + Sync + ?Sized,
        F::Handle: Send,
    {
        (0..self.primitive_count())
            .into_par_iter()
            .filter_map(|index| self.element(index))
            .map(|descriptor| build_primitive(factory, &descriptor, self.material()))
            .collect()
    }

    /// Persist the segment store
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        codec::encode(&self.store, writer)?;
        Ok(())
    }

    /// Restore a shape persisted with [`HairShape::write_to`]; transform and material start unset
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        codec::read_from(reader).map(Self::from_store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::expand::PrimitiveKind;
    use crate::factory::{PrimitiveHandle, Serialized};
    use crate::geometry::{Point, Segment};
    use crate::transform::Transform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Handle {
        descriptor: PrimitiveDescriptor,
        material: Option<MaterialRef>,
        configured: bool,
    }

    impl PrimitiveHandle for Handle {
        fn attach_material(&mut self, material: MaterialRef) {
            self.material = Some(material);
        }

        fn configure(&mut self) -> Result<()> {
            self.configured = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Registry {
        created: AtomicUsize,
        fail_on: Option<PrimitiveKind>,
    }

    impl PrimitiveFactory for Registry {
        type Handle = Handle;

        fn create(&self, descriptor: &PrimitiveDescriptor) -> Result<Handle> {
            self.created.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(descriptor.kind()) {
                return Err(Error::Factory(descriptor.kind().type_name().to_string()));
            }
            Ok(Handle {
                descriptor: *descriptor,
                material: None,
                configured: false,
            })
        }
    }

    fn shape() -> HairShape {
        let store = SegmentStore::from_segments(
            vec![
                Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)),
                Segment::new(Point::new(0.0, 1.0, 0.0), Point::new(0.0, 1.0, 1.0)),
                Segment::new(Point::new(4.0, 0.0, 0.0), Point::new(3.0, 0.0, 0.0)),
            ],
            0.1,
        );
        HairShape::from_store(store).with_material(MaterialRef::new("hair-bsdf"))
    }

    #[test]
    fn test_element_enumeration() {
        let shape = shape();
        assert!(shape.is_compound());
        assert_eq!(shape.primitive_count(), 6);
        let mut index = 0;
        while shape.element(index).is_some() {
            index += 1;
        }
        assert_eq!(index, shape.primitive_count());
        assert_eq!(shape.primitives().len(), index);
    }

    #[test]
    fn test_world_transform_applies() {
        let offset = Point::new(0.0, 0.0, 10.0);
        let shape = shape().with_to_world(Transform::translation_matrix(&offset));
        let sphere = shape.element(4).unwrap();
        assert!((sphere.origin() - Point::new(4.0, 0.0, 10.0)).norm() < 1e-5);
    }

    #[test]
    fn test_instantiate_propagates_material() {
        let shape = shape();
        let registry = Registry::default();
        let handle = shape.instantiate(&registry, 1).unwrap().unwrap();
        assert_eq!(handle.descriptor.kind(), PrimitiveKind::Cylinder);
        assert!(handle.configured);
        assert!(handle.material.unwrap().ptr_eq(shape.material().unwrap()));

        assert!(shape.instantiate(&registry, 6).unwrap().is_none());
        assert_eq!(registry.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_instantiate_all_matches_parallel() {
        let shape = shape();
        let sequential = shape.instantiate_all(&Registry::default()).unwrap();
        let parallel = shape.par_instantiate_all(&Registry::default()).unwrap();
        assert_eq!(sequential.len(), 6);
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.descriptor, b.descriptor);
            assert!(b.configured);
        }
    }

    #[test]
    fn test_parallel_through_serialized_factory() {
        let shape = shape();
        let factory = Serialized::new(Registry::default());
        let handles = shape.par_instantiate_all(&factory).unwrap();
        assert_eq!(handles.len(), 6);
        assert_eq!(factory.into_inner().created.into_inner(), 6);
    }

    #[test]
    fn test_factory_failure_aborts() {
        let registry = Registry {
            fail_on: Some(PrimitiveKind::Cylinder),
            ..Registry::default()
        };
        assert!(matches!(
            shape().instantiate_all(&registry),
            Err(Error::Factory(ref kind)) if kind == "cylinder"
        ));
        assert!(shape().par_instantiate_all(&registry).is_err());
    }

    #[test]
    fn test_persistence_round_trip() {
        let shape = shape();
        let mut data = Vec::new();
        shape.write_to(&mut data).unwrap();
        let restored = HairShape::read_from(&mut data.as_slice()).unwrap();
        assert_eq!(restored.store(), shape.store());
        assert!(restored.material().is_none());
    }
}
