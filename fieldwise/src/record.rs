use indexmap::{map::Entry, IndexMap};

use crate::{ConstructionFault, Error, Lineage, Shape};

/// A type with a statically known record shape.
///
/// Kept apart from [`Record`] so that a record's shape can be reached without picking a field
/// type, eg through `Point<PartiallyApplied>`, even when constructing `Point<X>` requires more
/// of `X`.
pub trait Shaped {
    /// The fields this record type and its ancestors store, checked at compile time by
    /// `#[derive(Record)]`.
    const LINEAGE: &'static Lineage;

    /// The shape shared by every instantiation of this record type.
    fn shape() -> &'static Shape;
}

/// A product-type record: a fixed, named set of fields all holding the same type of value.
///
/// # Implementing this trait
///
/// Usually via `#[derive(Record)]`, which requires a struct with named fields and a single,
/// unbounded type parameter. A parent record is embedded as the first field and marked with
/// `#[record(base)]`; its fields come first in the extended record's shape.
///
/// ```rust
/// use fieldwise::{fmap, names, Record};
///
/// #[derive(Record, Debug, PartialEq)]
/// struct Point<A> {
///     x: A,
///     y: A,
/// }
///
/// #[derive(Record, Debug, PartialEq)]
/// struct Point3<A> {
///     #[record(base)]
///     xy: Point<A>,
///     z: A,
/// }
///
/// assert_eq!(names::<Point3<i64>>(), ["x", "y", "z"]);
///
/// let p = Point3 { xy: Point { x: 1, y: 2 }, z: 3 };
/// let doubled = fmap(|v| v * 2, p).unwrap();
///
/// assert_eq!(doubled, Point3 { xy: Point { x: 2, y: 4 }, z: 6 });
/// ```
///
/// An extending record may list inherited fields again with `#[record(redeclare(..))]`. A
/// redeclared field keeps its inherited position and its value stays in the base record; it
/// is never stored twice. Storing a base field a second time is rejected at compile time:
///
/// ```compile_fail
/// use fieldwise::Record;
///
/// #[derive(Record)]
/// struct Point<A> {
///     x: A,
///     y: A,
/// }
///
/// #[derive(Record)]
/// struct Shifted<A> {
///     #[record(base)]
///     xy: Point<A>,
///     x: A,
/// }
/// ```
///
/// Implementations must list values in exactly the order given by [`Shaped::shape`], both when
/// taking a record apart and when building one.
pub trait Record: Shaped + Sized {
    /// the value held in each field
    type Field;

    /// the same record type, holding `X` in each field
    type Rebind<X>;

    /// Consume the record, returning its values in shape order
    fn into_values(self) -> Vec<Self::Field>;

    /// Borrow the record's values in shape order
    fn values(&self) -> Vec<&Self::Field>;

    /// Build a fresh record from values in shape order.
    ///
    /// Fails with [`Error::Construction`] if the number of values doesn't match the shape or
    /// the record's [`Validate`] implementation rejects them.
    fn from_values(values: Vec<Self::Field>) -> Result<Self, Error>;
}

/// A post-construction invariant, checked every time a record is built from values.
///
/// Opt in with `#[record(validate)]` on the derived struct.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Read the value held at `field`.
pub fn get<'a, R: Record>(record: &'a R, field: &str) -> Result<&'a R::Field, Error> {
    let shape = R::shape();
    let position = shape
        .position(field)
        .ok_or_else(|| shape.no_such_field(field))?;
    let values = record.values();
    let found = values.len();
    values
        .into_iter()
        .nth(position)
        .ok_or_else(|| shape.arity_error(found))
}

/// Build a fresh `R` from a complete mapping of field name to value.
///
/// Every field of `R`'s shape must be supplied exactly once and nothing else may be.
pub fn construct<'n, R, I>(fields: I) -> Result<R, Error>
where
    R: Record,
    I: IntoIterator<Item = (&'n str, R::Field)>,
{
    let shape = R::shape();

    let mut supplied: IndexMap<&str, R::Field> = IndexMap::new();
    for (name, value) in fields {
        if !shape.contains(name) {
            return Err(shape.construction_error(ConstructionFault::UnknownField(name.to_string())));
        }
        match supplied.entry(name) {
            Entry::Occupied(_) => {
                return Err(
                    shape.construction_error(ConstructionFault::DuplicateField(name.to_string()))
                )
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    let values = shape
        .names()
        .iter()
        .copied()
        .map(|name| {
            supplied
                .swap_remove(name)
                .ok_or_else(|| shape.construction_error(ConstructionFault::MissingField(name)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    R::from_values(values)
}

/// Equality across record types: true only if `x` and `y` are instances of the same concrete
/// record type holding equal values in order.
///
/// An extended record never equals its parent, even when the shared fields agree.
pub fn same_record<X, Y>(x: &X, y: &Y) -> bool
where
    X: Record,
    Y: Record,
    X::Field: PartialEq<Y::Field>,
{
    std::ptr::eq(X::shape(), Y::shape())
        && x.values()
            .into_iter()
            .zip(y.values())
            .all(|(a, b)| *a == *b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[derive(Record, Clone, Debug, PartialEq)]
    struct Pair<A> {
        left: A,
        right: A,
    }

    #[derive(Record, Clone, Debug, PartialEq)]
    struct Triple<A> {
        #[record(base)]
        pair: Pair<A>,
        third: A,
    }

    #[derive(Record, Clone, Debug, PartialEq)]
    #[record(redeclare(right))]
    struct Relabeled<A> {
        #[record(base)]
        pair: Pair<A>,
        extra: A,
    }

    #[derive(Record, Clone, Debug, PartialEq)]
    #[record(validate)]
    struct Interval<A> {
        lo: A,
        hi: A,
    }

    impl<A: PartialOrd> Validate for Interval<A> {
        fn validate(&self) -> Result<(), String> {
            if self.lo <= self.hi {
                Ok(())
            } else {
                Err("lo must not exceed hi".to_string())
            }
        }
    }

    #[test]
    fn get_reads_own_and_inherited_fields() {
        let t = Triple {
            pair: Pair { left: 1, right: 2 },
            third: 3,
        };
        assert_eq!(get(&t, "left"), Ok(&1));
        assert_eq!(get(&t, "third"), Ok(&3));
        assert_eq!(
            get(&t, "fourth"),
            Err(Error::NoSuchField {
                record: "Triple",
                field: "fourth".to_string()
            })
        );
    }

    #[test]
    fn redeclared_field_is_stored_once() {
        let r = Relabeled {
            pair: Pair { left: 1, right: 2 },
            extra: 3,
        };
        assert_eq!(Relabeled::<i32>::shape().names(), ["left", "right", "extra"]);
        assert_eq!(r.values().len(), Relabeled::<i32>::shape().len());
        assert_eq!(get(&r, "right"), Ok(&2));
        assert_eq!(Relabeled::from_values(r.clone().into_values()), Ok(r));

        let lineage = Relabeled::<i32>::LINEAGE;
        assert!(lineage.stores("right"));
        assert!(lineage.parent().is_some_and(|pair| !pair.stores("extra")));
    }

    #[test]
    fn construct_follows_shape_order() {
        let t: Triple<&str> = construct([("third", "c"), ("left", "a"), ("right", "b")]).unwrap();
        assert_eq!(
            t,
            Triple {
                pair: Pair {
                    left: "a",
                    right: "b"
                },
                third: "c",
            }
        );
    }

    #[test]
    fn construct_rejects_incomplete_or_unknown_fields() {
        let missing = construct::<Pair<i32>, _>([("left", 1)]);
        assert_eq!(
            missing,
            Err(Error::Construction {
                record: "Pair",
                fault: ConstructionFault::MissingField("right"),
            })
        );

        let unknown = construct::<Pair<i32>, _>([("left", 1), ("right", 2), ("middle", 3)]);
        assert_eq!(
            unknown,
            Err(Error::Construction {
                record: "Pair",
                fault: ConstructionFault::UnknownField("middle".to_string()),
            })
        );

        let twice = construct::<Pair<i32>, _>([("left", 1), ("left", 2)]);
        assert_eq!(
            twice,
            Err(Error::Construction {
                record: "Pair",
                fault: ConstructionFault::DuplicateField("left".to_string()),
            })
        );
    }

    #[test]
    fn validation_runs_on_construction() {
        assert!(Interval::from_values(vec![1, 2]).is_ok());
        assert_eq!(
            Interval::from_values(vec![2, 1]),
            Err(Error::Construction {
                record: "Interval",
                fault: ConstructionFault::Rejected("lo must not exceed hi".to_string()),
            })
        );
        assert!(construct::<Interval<i32>, _>([("lo", 5), ("hi", 0)]).is_err());
    }

    #[test]
    fn from_values_checks_arity() {
        assert_eq!(
            Triple::from_values(vec![1, 2]),
            Err(Error::Construction {
                record: "Triple",
                fault: ConstructionFault::Arity {
                    expected: 3,
                    found: 2
                },
            })
        );
    }

    #[test]
    fn extended_record_is_never_its_parent() {
        let pair = Pair { left: 1, right: 2 };
        let triple = Triple {
            pair: pair.clone(),
            third: 3,
        };
        assert!(same_record(&pair, &pair.clone()));
        assert!(!same_record(&pair, &triple));
        assert!(!same_record(&triple, &pair));
        assert!(same_record(&triple, &triple.clone()));
    }

    #[test]
    fn same_record_type_across_field_types() {
        let ints = Pair { left: 1, right: 2 };
        let other = Pair { left: 1, right: 3 };
        assert!(!same_record(&ints, &other));
    }
}
