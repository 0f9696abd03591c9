//! Error types for schema construction and query parsing.

use crate::schema::kind::{Kind, Op};
use std::fmt;

/// Error raised while building a parser from a model description.
///
/// Schema errors indicate a defect in the host-supplied model or
/// configuration, not in client input, and always fail `Parser::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Two fields resolved to the same fully-qualified query name.
    DuplicateField(String),
    /// The `layout` tag option was set on a field that is not a time field.
    LayoutOnNonTime(String),
    /// The `layout` tag option named neither a preset nor a strftime pattern.
    UnknownLayout {
        /// The field carrying the option.
        field: String,
        /// The rejected layout value.
        layout: String,
    },
    /// A `column=` or `name=` override is not a valid SQL identifier.
    InvalidIdentifier {
        /// The field carrying the override.
        field: String,
        /// The rejected identifier.
        ident: String,
    },
    /// The statement override returned no token for an operator the
    /// field admits.
    MissingStatement {
        /// The field whose token table could not be resolved.
        field: String,
        /// The operator with no statement.
        op: Op,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField(name) => write!(f, "duplicate field `{name}`"),
            Self::LayoutOnNonTime(field) => {
                write!(f, "field `{field}`: layout is only valid on time fields")
            },
            Self::UnknownLayout { field, layout } => {
                write!(f, "field `{field}`: unknown layout `{layout}`")
            },
            Self::InvalidIdentifier { field, ident } => {
                write!(f, "field `{field}`: `{ident}` is not a valid SQL identifier")
            },
            Self::MissingStatement { field, op } => {
                write!(f, "field `{field}`: no statement for operator `{op}`")
            },
        }
    }
}

impl std::error::Error for SchemaError {}

/// Error raised while parsing a query document.
///
/// Parse errors are surfaced to the caller as-is; no partial `Params`
/// is produced. Messages name the offending field and operator but
/// never embed client-supplied values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Input is not well-formed JSON.
    InvalidJson,
    /// Input exceeds the configured size ceiling.
    InputTooLarge {
        /// Size of the rejected input in bytes.
        actual: usize,
        /// The configured ceiling in bytes.
        max: usize,
    },
    /// A JSON object was required (top level, `filter`, or a
    /// connective element) but another value was found.
    ExpectedObject,
    /// The named key requires a JSON array value.
    ExpectedArray(String),
    /// An element of the named array must be a string.
    ExpectedString(String),
    /// A connective (`$or`/`$and`) was given an empty array.
    EmptyConnective(String),
    /// An unrecognised top-level key.
    UnknownKey(String),
    /// The field does not exist in the catalogue.
    UnknownField(String),
    /// The field is not marked filterable.
    NotFilterable(String),
    /// The field is not marked sortable.
    NotSortable(String),
    /// A predicate object contained a key that is not an operator.
    UnknownOperator {
        /// The field whose predicate carried the key.
        field: String,
        /// The rejected key.
        op: String,
    },
    /// An operator or unknown prefixed key appeared where a field or
    /// connective was expected.
    MisplacedOperator(String),
    /// The operator is not permitted for the field's kind.
    OperatorNotAllowed {
        /// The field the operator was applied to.
        field: String,
        /// The rejected operator.
        op: Op,
    },
    /// A predicate object carried no operators.
    EmptyPredicate(String),
    /// The value does not validate against the field's kind.
    InvalidValue {
        /// The field the value was bound against.
        field: String,
        /// The kind the field expects.
        kind: Kind,
    },
    /// The filter tree exceeds the nesting ceiling.
    NestingTooDeep {
        /// The configured ceiling.
        max: usize,
    },
    /// `limit` is not a positive integer.
    InvalidLimit,
    /// `limit` exceeds the configured maximum.
    LimitOutOfRange {
        /// The configured maximum.
        max: u64,
    },
    /// `offset` is not a non-negative integer.
    InvalidOffset,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson => write!(f, "invalid JSON input"),
            Self::InputTooLarge { actual, max } => {
                write!(f, "input of {actual} bytes exceeds the {max} byte ceiling")
            },
            Self::ExpectedObject => write!(f, "expected a JSON object"),
            Self::ExpectedArray(key) => write!(f, "`{key}` must be an array"),
            Self::ExpectedString(key) => write!(f, "`{key}` elements must be strings"),
            Self::EmptyConnective(key) => write!(f, "`{key}` must not be empty"),
            Self::UnknownKey(key) => write!(f, "unknown key `{key}`"),
            Self::UnknownField(field) => write!(f, "unknown field `{field}`"),
            Self::NotFilterable(field) => write!(f, "field `{field}` is not filterable"),
            Self::NotSortable(field) => write!(f, "field `{field}` is not sortable"),
            Self::UnknownOperator { field, op } => {
                write!(f, "field `{field}`: unknown operator `{op}`")
            },
            Self::MisplacedOperator(key) => {
                write!(f, "operator `{key}` is not valid here")
            },
            Self::OperatorNotAllowed { field, op } => {
                write!(f, "operator `{op}` is not allowed on field `{field}`")
            },
            Self::EmptyPredicate(field) => {
                write!(f, "field `{field}`: predicate object is empty")
            },
            Self::InvalidValue { field, kind } => {
                write!(f, "field `{field}`: value does not match kind `{kind}`")
            },
            Self::NestingTooDeep { max } => {
                write!(f, "filter nesting exceeds the maximum depth of {max}")
            },
            Self::InvalidLimit => write!(f, "limit must be a positive integer"),
            Self::LimitOutOfRange { max } => write!(f, "limit exceeds the maximum of {max}"),
            Self::InvalidOffset => write!(f, "offset must be a non-negative integer"),
        }
    }
}

impl std::error::Error for ParseError {}
