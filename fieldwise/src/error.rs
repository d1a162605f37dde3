use thiserror::Error;

/// Errors raised by the shape reflector, the accessor/constructor and the combinators.
///
/// All of these signal a defect in the calling code rather than a transient condition:
/// every operation is pure and deterministic, so retrying can't help.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The given name does not belong to a registered record type.
    #[error("`{0}` is not a registered record type")]
    UnsupportedType(String),

    /// A field name is absent from the record's shape.
    #[error("record `{record}` has no field `{field}`")]
    NoSuchField { record: &'static str, field: String },

    /// Records combined field-wise do not share an identical field-name list.
    #[error(
        "shape mismatch: `{expected}` has fields {expected_fields:?} but `{found}` has fields {found_fields:?}"
    )]
    ShapeMismatch {
        expected: &'static str,
        expected_fields: Vec<&'static str>,
        found: &'static str,
        found_fields: Vec<&'static str>,
    },

    /// Building a fresh instance failed.
    #[error("cannot construct `{record}`: {fault}")]
    Construction {
        record: &'static str,
        fault: ConstructionFault,
    },
}

/// The reason a record could not be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionFault {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` supplied more than once")]
    DuplicateField(String),

    #[error("expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    /// The record type's own invariant rejected the values.
    #[error("{0}")]
    Rejected(String),
}
