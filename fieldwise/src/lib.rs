//! Functor and applicative combinators over product-type records.
//!
//! A record is a struct holding a fixed, named set of fields. Once a record type describes its
//! [`Shape`] (usually through `#[derive(Record)]`), the combinators here can map over it
//! ([`fmap`]), fill it from a single value ([`pure`]), apply a record of functions to it
//! ([`amap`]) or zip several records together ([`gather`]) without per-type code.
extern crate self as fieldwise;

mod combinators;
mod error;
mod gather;
mod record;
pub mod registry;
mod shape;

pub use combinators::{amap, broadcast, fmap, fmap_ref, into_values, names, names_of, pure, values};
pub use error::{ConstructionFault, Error};
pub use gather::{gather, gather_all, Gather};
pub use record::{construct, get, same_record, Record, Shaped, Validate};
pub use shape::{Lineage, PartiallyApplied, Shape};

#[cfg(feature = "derive")]
pub use fieldwise_derive::Record;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
