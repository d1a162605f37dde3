//! Field-wise zipping of several records into one record of tuples.
use crate::{Error, Record};

/// The traversal shared by [`gather`] and [`crate::amap`]: both records' values in shape
/// order, paired up position by position.
pub(crate) fn zip_values<X: Record, Y: Record>(
    x: X,
    y: Y,
) -> Result<impl Iterator<Item = (X::Field, Y::Field)>, Error> {
    X::shape().ensure_conforms(Y::shape())?;
    Ok(x.into_values().into_iter().zip(y.into_values()))
}

/// A tuple of records that can be zipped field-wise.
///
/// Implemented for tuples of one to eight records. Every record must have the same field-name
/// list as the first one; the result has the first record's type.
pub trait Gather {
    type Output;

    fn gather(self) -> Result<Self::Output, Error>;
}

/// Zip a tuple of records field-wise: field `n` of the result holds the tuple of every
/// record's field `n`.
///
/// ```rust
/// use fieldwise::{gather, Record};
///
/// #[derive(Record, Debug, PartialEq)]
/// struct Pair<A> {
///     x: A,
///     y: A,
/// }
///
/// let zipped = gather((Pair { x: 1, y: 2 }, Pair { x: "a", y: "b" })).unwrap();
/// assert_eq!(zipped, Pair { x: (1, "a"), y: (2, "b") });
/// ```
pub fn gather<G: Gather>(records: G) -> Result<G::Output, Error> {
    records.gather()
}

macro_rules! impl_gather {
    ($head:ident $head_values:ident $(, $tail:ident $tail_values:ident)*) => {
        impl<$head: Record, $($tail: Record),*> Gather for ($head, $($tail,)*)
        where
            $head::Rebind<($head::Field, $($tail::Field,)*)>:
                Record<Field = ($head::Field, $($tail::Field,)*)>,
        {
            type Output = $head::Rebind<($head::Field, $($tail::Field,)*)>;

            fn gather(self) -> Result<Self::Output, Error> {
                let ($head_values, $($tail_values,)*) = self;
                $( $head::shape().ensure_conforms($tail::shape())?; )*

                let mut $head_values = $head_values.into_values().into_iter();
                $( let mut $tail_values = $tail_values.into_values().into_iter(); )*
                let tuples = std::iter::from_fn(|| {
                    Some(($head_values.next()?, $($tail_values.next()?,)*))
                })
                .collect();

                <Self::Output as Record>::from_values(tuples)
            }
        }
    };
}

impl_gather!(R0 r0);
impl_gather!(R0 r0, R1 r1);
impl_gather!(R0 r0, R1 r1, R2 r2);
impl_gather!(R0 r0, R1 r1, R2 r2, R3 r3);
impl_gather!(R0 r0, R1 r1, R2 r2, R3 r3, R4 r4);
impl_gather!(R0 r0, R1 r1, R2 r2, R3 r3, R4 r4, R5 r5);
impl_gather!(R0 r0, R1 r1, R2 r2, R3 r3, R4 r4, R5 r5, R6 r6);
impl_gather!(R0 r0, R1 r1, R2 r2, R3 r3, R4 r4, R5 r5, R6 r6, R7 r7);

/// Gather any number of records of one type: field `n` of the result holds every record's
/// field `n`, in iteration order.
pub fn gather_all<R, I>(records: I) -> Result<R::Rebind<Vec<R::Field>>, Error>
where
    R: Record,
    R::Rebind<Vec<R::Field>>: Record<Field = Vec<R::Field>>,
    I: IntoIterator<Item = R>,
{
    let shape = R::shape();
    let mut columns: Vec<Vec<R::Field>> = std::iter::repeat_with(Vec::new)
        .take(shape.len())
        .collect();

    for record in records {
        let values = record.into_values();
        shape.check_arity(values.len())?;
        for (column, value) in columns.iter_mut().zip(values) {
            column.push(value);
        }
    }

    <R::Rebind<Vec<R::Field>> as Record>::from_values(columns)
}
