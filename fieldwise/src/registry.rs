//! Process-wide registry of declared record shapes.
//!
//! `#[derive(Record)]` submits one [`ShapeEntry`] per record type at link time; the registry is
//! read-only afterwards. It is the runtime counterpart of [`crate::names`]: lookups by name can
//! fail where the typed API can't.
use crate::{Error, Shape};

pub struct ShapeEntry {
    shape: fn() -> &'static Shape,
}

impl ShapeEntry {
    pub const fn new(shape: fn() -> &'static Shape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }
}

inventory::collect!(ShapeEntry);

/// Every registered record shape, in no particular order.
pub fn shapes() -> impl Iterator<Item = &'static Shape> {
    inventory::iter::<ShapeEntry>().map(ShapeEntry::shape)
}

/// Find the shape of a registered record type.
///
/// `type_name` is either the record's module-qualified path or its bare name; a bare name must
/// belong to exactly one registered record.
pub fn lookup(type_name: &str) -> Result<&'static Shape, Error> {
    if let Some(shape) = shapes().find(|shape| shape.path() == type_name) {
        return Ok(shape);
    }

    let mut candidates = shapes().filter(|shape| shape.name() == type_name);
    match (candidates.next(), candidates.next()) {
        (Some(shape), None) => Ok(shape),
        _ => Err(Error::UnsupportedType(type_name.to_string())),
    }
}

/// The ordered field names of the registered record type `type_name`.
pub fn names(type_name: &str) -> Result<&'static [&'static str], Error> {
    lookup(type_name).map(Shape::names)
}
