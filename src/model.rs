//! Declarative model descriptions.
//!
//! A [`Model`] names the queryable fields of a resource: the declared
//! field name (spelled as the host record would spell it, e.g.
//! `FullName`), its [`FieldType`], and a tag string carrying the
//! per-field options.
//!
//! # Tag syntax
//!
//! A tag is a comma-separated option list. Recognised options:
//!
//! | Option | Effect |
//! |--------|--------|
//! | `filter` | The field may appear in `filter` |
//! | `sort` | The field may appear in `sort` |
//! | `column=<x>` | Override the backing column segment |
//! | `name=<x>` | Override the query-side name segment |
//! | `layout=<x>` | Time layout preset or strftime pattern (time fields only) |
//!
//! Unknown options are ignored. Order within the tag is insignificant.
//!
//! # Example
//!
//! ```
//! use rql::{FieldType, Model};
//!
//! let model = Model::new()
//!     .field("Age", FieldType::Int, "filter,sort")
//!     .field("Name", FieldType::String, "filter")
//!     .field(
//!         "Address",
//!         FieldType::Struct(Model::new().field("City", FieldType::String, "filter")),
//!         "",
//!     );
//! ```

/// The declared type of a model field.
///
/// `Nullable` collapses to the wrapped type during catalogue
/// construction; nullability never changes a field's scalar kind.
/// `Struct` declares a nested record whose leaves are prefixed with
/// the outer field name.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum FieldType {
    /// Boolean field.
    Bool,
    /// Signed integer field.
    Int,
    /// Unsigned integer field.
    Uint,
    /// Floating point field.
    Float,
    /// String field.
    String,
    /// Timestamp field, parsed under the field's layout.
    Time,
    /// A nullable wrapper around another type.
    Nullable(Box<FieldType>),
    /// A nested record.
    Struct(Model),
}

#[derive(Debug, Clone)]
pub(crate) enum ModelEntry {
    Field {
        name: String,
        ty: FieldType,
        tag: String,
    },
    /// An embedded record, flattened into the parent without a prefix.
    Embedded(Model),
}

/// An ordered description of a resource's queryable fields.
///
/// Stands in for the original runtime-reflection walk: the host builds
/// the description by hand and the schema walker derives the field
/// catalogue from it.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) entries: Vec<ModelEntry>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    ///
    /// `name` is the declared (CamelCase) field name; the query-side
    /// name is derived from it by the configured normaliser. `tag`
    /// carries the comma-separated field options.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType, tag: impl Into<String>) -> Self {
        self.entries.push(ModelEntry::Field {
            name: name.into(),
            ty,
            tag: tag.into(),
        });
        self
    }

    /// Embed another model, flattening its fields into this one with
    /// no name prefix.
    #[must_use]
    pub fn embed(mut self, model: Self) -> Self {
        self.entries.push(ModelEntry::Embedded(model));
        self
    }

    /// Whether the model declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
