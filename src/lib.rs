// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(rustdoc::broken_intra_doc_links)]
#![allow(clippy::doc_markdown)] // Code items in docs
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design

//! # rql - Resource Query Language
//!
//! Compile JSON query documents into the fragments of a safe,
//! parameterised SQL query: a filter expression with placeholder
//! arguments, a sort clause, a projection list, and limit/offset
//! values. Designed for HTTP-style data services that expose
//! filter/sort/paginate functionality without ever evaluating
//! untrusted SQL.
//!
//! Client values travel exclusively through the argument list; every
//! identifier in the output comes from the host-declared model, so a
//! query document can never smuggle SQL into the statement.
//!
//! ## Quick Start
//!
//! ```
//! use rql::{Config, FieldType, Model, Parser};
//!
//! let parser = Parser::new(Config::new(
//!     Model::new()
//!         .field("Age", FieldType::Int, "filter,sort")
//!         .field("Name", FieldType::String, "filter"),
//! ))?;
//!
//! let params = parser.parse(
//!     br#"{
//!         "filter": {"name": "foo", "age": {"$gte": 18}},
//!         "sort": ["-age"],
//!         "limit": 10
//!     }"#,
//! )?;
//!
//! assert_eq!(params.filter_exp, "name = ? AND age >= ?");
//! assert_eq!(params.sort, "age desc");
//! assert_eq!(params.limit, 10);
//! // filter_args holds "foo" and 18, in placeholder order.
//! assert_eq!(params.filter_args.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Filter documents
//!
//! A filter is a JSON object. Keys are field names or connectives;
//! field values are bare scalars (shorthand for equality) or operator
//! objects.
//!
//! | Syntax | Example | SQL |
//! |--------|---------|-----|
//! | Implicit `$eq` | `{"name": "foo"}` | `name = ?` |
//! | Explicit operator | `{"age": {"$gte": 18}}` | `age >= ?` |
//! | Multiple fields | `{"a": 1, "b": 2}` | `a = ? AND b = ?` |
//! | Multiple operators | `{"age": {"$gt": 1, "$lt": 9}}` | `(age > ? AND age < ?)` |
//! | `$or` | `{"$or": [{...}, {...}]}` | `(... OR ...)` |
//! | `$and` | `{"$and": [{...}, {...}]}` | `(... AND ...)` |
//!
//! ## Operators
//!
//! | Operator | SQL | Permitted on |
//! |----------|-----|--------------|
//! | `$eq` | `=` | all kinds |
//! | `$neq` | `<>` | all kinds |
//! | `$lt` `$lte` `$gt` `$gte` | `<` `<=` `>` `>=` | numbers, strings, times |
//! | `$like` | `LIKE` | strings |
//!
//! ## Placeholders
//!
//! The default placeholder is `?`. Configure `param_symbol` and
//! `positional_params` for numbered styles:
//!
//! ```
//! use rql::{Config, FieldType, Model, Parser};
//!
//! let parser = Parser::new(
//!     Config::new(Model::new().field("Age", FieldType::Int, "filter"))
//!         .param_symbol("$")
//!         .positional_params(true),
//! )?;
//! let params = parser.parse(br#"{"filter": {"age": {"$gt": 1, "$lt": 9}}}"#)?;
//! assert_eq!(params.filter_exp, "(age > $1 AND age < $2)");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod model;
mod query;
mod schema;
mod value;

pub use config::{Config, DirFn, LogFn, NameFn, StatementFn};
pub use error::{ParseError, SchemaError};
pub use model::{FieldType, Model};
pub use query::sort::Direction;
pub use query::{Params, Parser};
pub use schema::FieldMeta;
pub use schema::kind::{Kind, Op};
pub use schema::layout::Layout;
pub use value::Value;

/// Prelude module for convenient imports.
///
/// ```
/// use rql::prelude::*;
///
/// let parser = Parser::new(Config::new(
///     Model::new().field("Name", FieldType::String, "filter"),
/// ))
/// .unwrap();
/// # let _ = parser;
/// ```
pub mod prelude {
    pub use crate::{
        Config, Direction, FieldMeta, FieldType, Kind, Layout, Model, Op, Params, ParseError,
        Parser, SchemaError, Value,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
