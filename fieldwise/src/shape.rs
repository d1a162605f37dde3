use std::fmt;

use indexmap::IndexSet;

use crate::{ConstructionFault, Error};

/// The ordered field-name list of a record type, plus where those names came from.
///
/// A shape is built once per record type and lives for the rest of the process. Record types
/// that extend a parent carry the parent's shape as data: their names are the parent's names
/// followed by their own newly declared fields.
///
/// ```rust
/// # use fieldwise::Shape;
/// # use std::sync::OnceLock;
/// fn point() -> &'static Shape {
///     static SHAPE: OnceLock<Shape> = OnceLock::new();
///     SHAPE.get_or_init(|| Shape::new("Point", "geometry::Point", &["x", "y"]))
/// }
///
/// let point3 = Shape::extend(point(), "Point3", "geometry::Point3", &["z", "x"]);
///
/// // inherited fields first, a redeclared field keeps its first position
/// assert_eq!(point3.names(), ["x", "y", "z"]);
/// assert_eq!(point3.to_string(), "Point3(x, y, z)");
/// ```
#[derive(Debug)]
pub struct Shape {
    name: &'static str,
    path: &'static str,
    parent: Option<&'static Shape>,
    own: &'static [&'static str],
    names: Vec<&'static str>,
}

impl Shape {
    /// Shape of a record type with no parent.
    pub fn new(name: &'static str, path: &'static str, own: &'static [&'static str]) -> Self {
        Self::build(name, path, None, own)
    }

    /// Shape of a record type extending `parent` with the fields in `own`.
    pub fn extend(
        parent: &'static Shape,
        name: &'static str,
        path: &'static str,
        own: &'static [&'static str],
    ) -> Self {
        Self::build(name, path, Some(parent), own)
    }

    fn build(
        name: &'static str,
        path: &'static str,
        parent: Option<&'static Shape>,
        own: &'static [&'static str],
    ) -> Self {
        // first declaration wins the position
        let inherited = parent.map(|p| p.names.iter().copied()).into_iter().flatten();
        let names: IndexSet<&'static str> = inherited.chain(own.iter().copied()).collect();

        Self {
            name,
            path,
            parent,
            own,
            names: names.into_iter().collect(),
        }
    }

    /// The record type's bare name, eg `Point`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The record type's module-qualified path, eg `geometry::Point`.
    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn parent(&self) -> Option<&'static Shape> {
        self.parent
    }

    /// Fields declared by this record type itself, in declaration order.
    pub fn own_fields(&self) -> &'static [&'static str] {
        self.own
    }

    /// Every field name, inherited ones first, without duplicates.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.names.iter().position(|name| *name == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Whether `other` has exactly the same field-name list. Record types need not be the same.
    pub fn conforms_to(&self, other: &Shape) -> bool {
        self.names == other.names
    }

    /// Fails with [`Error::ShapeMismatch`] unless `found` conforms to `self`.
    pub fn ensure_conforms(&self, found: &Shape) -> Result<(), Error> {
        if self.conforms_to(found) {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: self.name,
                expected_fields: self.names.clone(),
                found: found.name,
                found_fields: found.names.clone(),
            })
        }
    }

    /// Fails unless exactly one value per field was supplied.
    pub fn check_arity(&self, found: usize) -> Result<(), Error> {
        if found == self.len() {
            Ok(())
        } else {
            Err(self.arity_error(found))
        }
    }

    pub fn arity_error(&self, found: usize) -> Error {
        self.construction_error(ConstructionFault::Arity {
            expected: self.len(),
            found,
        })
    }

    /// A [`Error::Construction`] raised when the record's invariant rejects its values.
    pub fn rejected(&self, reason: impl Into<String>) -> Error {
        self.construction_error(ConstructionFault::Rejected(reason.into()))
    }

    pub fn construction_error(&self, fault: ConstructionFault) -> Error {
        Error::Construction {
            record: self.name,
            fault,
        }
    }

    pub fn no_such_field(&self, field: &str) -> Error {
        Error::NoSuchField {
            record: self.name,
            field: field.to_string(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.names.join(", "))
    }
}

/// The fields each record type in an extension chain stores itself, available at compile time.
///
/// Where [`Shape`] describes the merged name list, a lineage keeps one level per record type so
/// that a derived record can be checked during constant evaluation: a stored field may not repeat
/// a field its base already stores, and a redeclared name must belong to the base.
#[derive(Debug)]
pub struct Lineage {
    stored: &'static [&'static str],
    parent: Option<&'static Lineage>,
}

impl Lineage {
    /// Lineage of a record type with no parent.
    pub const fn root(stored: &'static [&'static str]) -> Self {
        Self {
            stored,
            parent: None,
        }
    }

    /// Lineage of a record type extending `parent`.
    ///
    /// # Panics
    ///
    /// During constant evaluation, if a stored field repeats one the parent chain stores, or if
    /// a redeclared name is not stored anywhere in the parent chain.
    pub const fn extend(
        parent: &'static Lineage,
        redeclared: &'static [&'static str],
        stored: &'static [&'static str],
    ) -> Self {
        if first_stored_by(parent, stored).is_some() {
            panic!("a record field repeats a field of its base record; list it with `#[record(redeclare(..))]` instead");
        }
        let mut i = 0;
        while i < redeclared.len() {
            if !parent.stores(redeclared[i]) {
                panic!("`#[record(redeclare(..))]` names a field its base record does not have");
            }
            i += 1;
        }
        Self {
            stored,
            parent: Some(parent),
        }
    }

    pub const fn parent(&self) -> Option<&'static Lineage> {
        self.parent
    }

    /// Whether this record type or one of its ancestors stores `field`.
    pub const fn stores(&self, field: &str) -> bool {
        let mut i = 0;
        while i < self.stored.len() {
            if str_eq(self.stored[i], field) {
                return true;
            }
            i += 1;
        }
        match self.parent {
            Some(parent) => parent.stores(field),
            None => false,
        }
    }
}

/// The first of `fields` already stored by `lineage`, if any.
const fn first_stored_by(
    lineage: &Lineage,
    fields: &'static [&'static str],
) -> Option<&'static str> {
    let mut i = 0;
    while i < fields.len() {
        if lineage.stores(fields[i]) {
            return Some(fields[i]);
        }
        i += 1;
    }
    None
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// An uninhabited type used to name a record's shape without choosing a field type.
///
/// Shapes belong to the record type, not to any one instantiation of it: `Point<i64>` and
/// `Point<String>` share a single shape, which can be reached as `Point<PartiallyApplied>`.
#[derive(Clone, Debug)]
pub enum PartiallyApplied {}
