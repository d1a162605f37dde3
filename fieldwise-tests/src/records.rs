use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::OnceLock;

use fieldwise::{construct, names, Error, Lineage, Record, Shape, Shaped};
use proptest::prelude::*;

/// A record without fields, implemented by hand since a derived struct must hold its parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct F0<A>(PhantomData<A>);

impl<A> Default for F0<A> {
    fn default() -> Self {
        F0(PhantomData)
    }
}

impl<A> Shaped for F0<A> {
    const LINEAGE: &'static Lineage = &Lineage::root(&[]);

    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| Shape::new("F0", concat!(module_path!(), "::F0"), &[]))
    }
}

impl<A> Record for F0<A> {
    type Field = A;
    type Rebind<X> = F0<X>;

    fn into_values(self) -> Vec<A> {
        Vec::new()
    }

    fn values(&self) -> Vec<&A> {
        Vec::new()
    }

    fn from_values(values: Vec<A>) -> Result<Self, Error> {
        Self::shape().check_arity(values.len())?;
        Ok(F0::default())
    }
}

#[derive(Record, Clone, Debug, PartialEq)]
pub struct F1<A> {
    pub x: A,
}

/// Also covers immutable records: instances are only ever rebuilt, never updated in place.
#[derive(Record, Clone, Debug, PartialEq)]
pub struct F2<A> {
    pub x: A,
    pub y: A,
}

#[derive(Record, Clone, Debug, PartialEq)]
pub struct F3<A> {
    pub x: A,
    pub y: A,
    pub z: A,
}

/// `F3` extended with a fourth field.
#[derive(Record, Clone, Debug, PartialEq)]
pub struct G4<A> {
    #[record(base)]
    pub base: F3<A>,
    pub w: A,
}

/// `F3` extended with `w`, listing `x` again. `x` keeps its first position and its value stays
/// in the base record.
#[derive(Record, Clone, Debug, PartialEq)]
#[record(redeclare(x))]
pub struct G4Redeclared<A> {
    #[record(base)]
    pub base: F3<A>,
    pub w: A,
}

/// `F2` extended with `z`: same field names as `F3`, but a different record type.
#[derive(Record, Clone, Debug, PartialEq)]
pub struct F2Ext<A> {
    #[record(base)]
    pub base: F2<A>,
    pub z: A,
}

/// A record whose type rejects some values.
#[derive(Record, Clone, Debug, PartialEq)]
#[record(validate)]
pub struct Span<A> {
    pub start: A,
    pub end: A,
}

impl<A: PartialOrd> fieldwise::Validate for Span<A> {
    fn validate(&self) -> Result<(), String> {
        if self.start <= self.end {
            Ok(())
        } else {
            Err("span ends before it starts".to_string())
        }
    }
}

/// Arbitrary instances of `R`, drawing one integer per field name.
pub fn arb_record<R>() -> impl Strategy<Value = R>
where
    R: Record<Field = i64> + Debug,
{
    proptest::collection::vec(any::<i64>(), names::<R>().len()).prop_map(|drawn| {
        construct(names::<R>().iter().copied().zip(drawn)).expect("one value per field")
    })
}
