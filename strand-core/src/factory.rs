//! Boundary to the host's primitive registry.
//!
//! The crate never builds renderable spheres or cylinders itself. A
//! [`PrimitiveFactory`] turns each [`PrimitiveDescriptor`] into a host handle,
//! which then receives the shape's material and is configured exactly once.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::expand::PrimitiveDescriptor;

/// Shared, immutable reference to a surface material owned by the host.
///
/// Cloning copies the reference; every primitive expanded from a shape points
/// at the same material.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MaterialRef(Arc<str>);

impl MaterialRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// True when both references point at the same material allocation
    pub fn ptr_eq(&self, other: &MaterialRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MaterialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MaterialRef").field(&self.name()).finish()
    }
}

/// A primitive object created by the host registry
pub trait PrimitiveHandle {
    /// Attach the surface material of the owning shape
    fn attach_material(&mut self, material: MaterialRef);

    /// Finalize derived state; called once, after the material is attached
    fn configure(&mut self) -> Result<()>;
}

/// Host registry able to instantiate spheres and cylinders.
///
/// Implementations are not required to be thread-safe; wrap them in
/// [`Serialized`] to share one across parallel callers.
pub trait PrimitiveFactory {
    type Handle: PrimitiveHandle;

    /// Create the object for `descriptor.kind().type_name()` with the
    /// descriptor's radius, length and world transform
    fn create(&self, descriptor: &PrimitiveDescriptor) -> Result<Self::Handle>;
}

/// Create, attach the material to, and configure one primitive
pub fn build_primitive<F>(
    factory: &F,
    descriptor: &PrimitiveDescriptor,
    material: Option<&MaterialRef>,
) -> Result<F::Handle>
where
    F: PrimitiveFactory + ?Sized,
{
    let mut handle = factory.create(descriptor)?;
    if let Some(material) = material {
        handle.attach_material(material.clone());
    }
    handle.configure()?;
    Ok(handle)
}

/// Serializes every call into a factory that is not itself thread-safe
pub struct Serialized<F> {
    inner: Mutex<F>,
}

impl<F> Serialized<F> {
    pub fn new(factory: F) -> Self {
        Self {
            inner: Mutex::new(factory),
        }
    }

    pub fn into_inner(self) -> F {
        self.inner.into_inner()
    }
}

impl<F: PrimitiveFactory> PrimitiveFactory for Serialized<F> {
    type Handle = F::Handle;

    fn create(&self, descriptor: &PrimitiveDescriptor) -> Result<Self::Handle> {
        self.inner.lock().create(descriptor)
    }
}
