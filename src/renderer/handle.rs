use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Opaque backend object id, typed by the kind of object it names.
pub struct Handle<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls so `T` needs none of these traits itself.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

impl<T> Handle<T> {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Marker for compiled shader programs.
#[derive(Debug)]
pub enum Program {}

/// Marker for vertex and index buffers.
#[derive(Debug)]
pub enum Buffer {}

/// Marker for textures.
#[derive(Debug)]
pub enum TextureObject {}

pub type ProgramId = Handle<Program>;
pub type BufferId = Handle<Buffer>;
pub type TextureId = Handle<TextureObject>;
