//! Schema introspection: walking a model description into the field
//! catalogue the query compiler resolves against.

pub(crate) mod kind;
pub(crate) mod layout;
pub(crate) mod name;

use crate::config::Config;
use crate::error::SchemaError;
use crate::model::{FieldType, Model, ModelEntry};
use crate::value::Value;
use kind::{Kind, Op};
use layout::Layout;
use name::{is_identifier, snake_case};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Public descriptor of a queryable field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct FieldMeta {
    /// Query-side identifier: lowercased segments joined with the
    /// configured field separator.
    pub name: String,
    /// Backing column expression: segments joined with `_`.
    pub column: String,
    /// Scalar kind.
    pub kind: Kind,
    /// Whether the field may appear in `sort`.
    pub sortable: bool,
    /// Whether the field may appear in `filter`.
    pub filterable: bool,
    /// Parse layout; only meaningful for time fields.
    pub layout: Layout,
}

impl FieldMeta {
    /// The operators permitted on this field.
    #[must_use]
    pub fn allowed_ops(&self) -> &'static [Op] {
        self.kind.allowed_ops()
    }
}

/// A catalogue entry: the public descriptor plus the bound validator,
/// converter, and operator token table.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub(crate) meta: FieldMeta,
    /// SQL token per permitted operator, resolved at construction.
    statements: BTreeMap<Op, String>,
}

impl Field {
    /// Whether `value` has the JSON shape this field accepts.
    pub(crate) fn validate(&self, value: &JsonValue) -> bool {
        self.meta.kind.validate(value, &self.meta.layout)
    }

    /// Convert a validated JSON value into its SQL argument.
    pub(crate) fn convert(&self, value: &JsonValue) -> Option<Value> {
        self.meta.kind.convert(value, &self.meta.layout)
    }

    pub(crate) fn statement(&self, op: Op) -> Option<&str> {
        self.statements.get(&op).map(String::as_str)
    }
}

/// The field catalogue, keyed by fully-qualified query name.
pub(crate) type Catalogue = BTreeMap<String, Field>;

/// Walk the configured model into a catalogue.
pub(crate) fn build(config: &Config) -> Result<Catalogue, SchemaError> {
    let mut catalogue = Catalogue::new();
    walk(&config.model, "", "", config, &mut catalogue)?;
    Ok(catalogue)
}

fn walk(
    model: &Model,
    name_prefix: &str,
    col_prefix: &str,
    config: &Config,
    out: &mut Catalogue,
) -> Result<(), SchemaError> {
    for entry in &model.entries {
        match entry {
            ModelEntry::Embedded(embedded) => {
                walk(embedded, name_prefix, col_prefix, config, out)?;
            },
            ModelEntry::Field { name, ty, tag } => {
                walk_field(name, ty, tag, name_prefix, col_prefix, config, out)?;
            },
        }
    }
    Ok(())
}

fn walk_field(
    declared: &str,
    ty: &FieldType,
    tag: &str,
    name_prefix: &str,
    col_prefix: &str,
    config: &Config,
    out: &mut Catalogue,
) -> Result<(), SchemaError> {
    // Nullability never changes the underlying kind.
    let mut ty = ty;
    while let FieldType::Nullable(inner) = ty {
        ty = inner;
    }

    let opts = parse_tag(declared, tag, config);
    let name_seg = match &opts.name {
        Some(custom) => custom.clone(),
        None => match &config.name_fn {
            Some(f) => f(declared),
            None => snake_case(declared),
        },
    };
    let col_seg = opts.column.clone().unwrap_or_else(|| snake_case(declared));
    for seg in [&name_seg, &col_seg] {
        if !is_identifier(seg) {
            return Err(SchemaError::InvalidIdentifier {
                field: join(name_prefix, &name_seg, &config.field_sep),
                ident: seg.clone(),
            });
        }
    }

    let full_name = join(name_prefix, &name_seg, &config.field_sep);
    let full_column = join(col_prefix, &col_seg, "_");

    if let FieldType::Struct(nested) = ty {
        if opts.layout.is_some() {
            return Err(SchemaError::LayoutOnNonTime(full_name));
        }
        return walk(nested, &full_name, &full_column, config, out);
    }

    let kind = match ty {
        FieldType::Bool => Kind::Bool,
        FieldType::Int => Kind::Int,
        FieldType::Uint => Kind::Uint,
        FieldType::Float => Kind::Float,
        FieldType::String => Kind::String,
        FieldType::Time => Kind::Time,
        FieldType::Nullable(_) | FieldType::Struct(_) => unreachable!("unwrapped above"),
    };

    let layout = match &opts.layout {
        None => Layout::default(),
        Some(_) if kind != Kind::Time => return Err(SchemaError::LayoutOnNonTime(full_name)),
        Some(spec) => Layout::resolve(&full_name, spec)?,
    };

    let meta = FieldMeta {
        name: full_name,
        column: full_column,
        kind,
        sortable: opts.sortable,
        filterable: opts.filterable,
        layout,
    };

    let mut statements = BTreeMap::new();
    for &op in kind.allowed_ops() {
        let token = match &config.get_db_statement {
            Some(f) => f(op, &meta).ok_or_else(|| SchemaError::MissingStatement {
                field: meta.name.clone(),
                op,
            })?,
            None => op.sql().to_string(),
        };
        statements.insert(op, token);
    }

    let key = meta.name.clone();
    if out.contains_key(&key) {
        return Err(SchemaError::DuplicateField(key));
    }
    out.insert(key, Field { meta, statements });
    Ok(())
}

fn join(prefix: &str, seg: &str, sep: &str) -> String {
    if prefix.is_empty() {
        seg.to_string()
    } else {
        format!("{prefix}{sep}{seg}")
    }
}

#[derive(Debug, Default)]
struct TagOptions {
    filterable: bool,
    sortable: bool,
    column: Option<String>,
    name: Option<String>,
    layout: Option<String>,
}

fn parse_tag(declared: &str, tag: &str, config: &Config) -> TagOptions {
    let mut opts = TagOptions::default();
    if tag.is_empty() {
        return opts;
    }
    for opt in tag.split(',') {
        match opt {
            "filter" => opts.filterable = true,
            "sort" => opts.sortable = true,
            _ => {
                if let Some(v) = opt.strip_prefix("column=") {
                    opts.column = Some(v.to_string());
                } else if let Some(v) = opt.strip_prefix("name=") {
                    opts.name = Some(v.to_string());
                } else if let Some(v) = opt.strip_prefix("layout=") {
                    opts.layout = Some(v.to_string());
                } else {
                    config.diag(&format!(
                        "rql: field `{declared}`: ignoring unknown tag option `{opt}`"
                    ));
                }
            },
        }
    }
    opts
}
