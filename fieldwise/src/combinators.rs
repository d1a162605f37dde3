//! Functor and applicative combinators over records.
//!
//! Every record is treated as a fixed-size product: each field is an independent slot, `fmap`
//! and `amap` act position-wise and `pure` broadcasts a single value into every slot. All of
//! them consume their inputs and build a fresh record through [`Record::from_values`].
use crate::{Error, Record, Shaped};

/// The ordered field names of the record type `R`, inherited fields first.
pub fn names<R: Shaped>() -> &'static [&'static str] {
    R::shape().names()
}

/// The ordered field names of `record`'s type.
pub fn names_of<R: Shaped>(_record: &R) -> &'static [&'static str] {
    names::<R>()
}

/// The values held by `record`, in shape order.
pub fn values<R: Record>(record: &R) -> Vec<&R::Field> {
    record.values()
}

/// Owning variant of [`values`].
pub fn into_values<R: Record>(record: R) -> Vec<R::Field> {
    record.into_values()
}

/// Build an `R` whose every field holds `value`.
///
/// Every field receives a clone of `value`; for reference-counted payloads this means every
/// field shares the same reference.
pub fn broadcast<R>(value: R::Field) -> Result<R, Error>
where
    R: Record,
    R::Field: Clone,
{
    let values = vec![value; R::shape().len()];
    R::from_values(values)
}

/// Lift `value` into the record type of `template`, filling every field with it.
///
/// Only the template's type matters, its values are ignored.
pub fn pure<T, V>(_template: &T, value: V) -> Result<T::Rebind<V>, Error>
where
    T: Record,
    T::Rebind<V>: Record<Field = V>,
    V: Clone,
{
    broadcast(value)
}

/// Apply `f` to every field of `record`, in shape order, building a fresh record of the same
/// type from the results.
pub fn fmap<R, B, F>(f: F, record: R) -> Result<R::Rebind<B>, Error>
where
    R: Record,
    R::Rebind<B>: Record<Field = B>,
    F: FnMut(R::Field) -> B,
{
    let values = record.into_values().into_iter().map(f).collect();
    <R::Rebind<B> as Record>::from_values(values)
}

/// Like [`fmap`], but borrows `record` and hands `f` a reference to each field.
pub fn fmap_ref<R, B, F>(f: F, record: &R) -> Result<R::Rebind<B>, Error>
where
    R: Record,
    R::Rebind<B>: Record<Field = B>,
    F: FnMut(&R::Field) -> B,
{
    let values = record.values().into_iter().map(f).collect();
    <R::Rebind<B> as Record>::from_values(values)
}

/// Field-wise application: field `n` of the result is field `n` of `functions` applied to
/// field `n` of `record`.
///
/// `functions` may be any record type whose field-name list is identical to `record`'s; the
/// result has `record`'s type. Fails with [`Error::ShapeMismatch`] otherwise.
pub fn amap<U, X, B>(functions: U, record: X) -> Result<X::Rebind<B>, Error>
where
    U: Record,
    X: Record,
    X::Rebind<B>: Record<Field = B>,
    U::Field: FnOnce(X::Field) -> B,
{
    let values = crate::gather::zip_values(record, functions)?
        .map(|(value, f)| f(value))
        .collect();
    <X::Rebind<B> as Record>::from_values(values)
}
