//! Parser configuration.

use crate::model::Model;
use crate::query::sort::Direction;
use crate::schema::FieldMeta;
use crate::schema::kind::Op;
use std::fmt;

/// Overrides the query-side name computed for a declared field name.
pub type NameFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Overrides the SQL token emitted for an operator on a field.
///
/// Returning `None` for an operator the field admits fails parser
/// construction; hosts that only special-case some operators fall back
/// with [`Op::sql`].
pub type StatementFn = Box<dyn Fn(Op, &FieldMeta) -> Option<String> + Send + Sync>;

/// Overrides the direction text appended to signed sort fields.
pub type DirFn = Box<dyn Fn(Direction) -> String + Send + Sync>;

/// Construction-time diagnostic sink.
pub type LogFn = Box<dyn Fn(&str) + Send + Sync>;

pub(crate) const DEFAULT_LIMIT: u64 = 25;
pub(crate) const DEFAULT_MAX_DEPTH: usize = 16;
pub(crate) const DEFAULT_MAX_INPUT_SIZE: usize = 1 << 20;

/// Configuration for [`Parser::new`](crate::Parser::new).
///
/// Only the model is required; every other option has a default.
///
/// # Example
///
/// ```
/// use rql::{Config, FieldType, Model, Parser};
///
/// let config = Config::new(
///     Model::new()
///         .field("Age", FieldType::Int, "filter,sort")
///         .field("Name", FieldType::String, "filter"),
/// )
/// .field_sep(".")
/// .default_limit(50)
/// .limit_max_value(100);
///
/// let parser = Parser::new(config).unwrap();
/// # let _ = parser;
/// ```
pub struct Config {
    pub(crate) model: Model,
    pub(crate) field_sep: String,
    pub(crate) op_prefix: String,
    pub(crate) default_limit: u64,
    pub(crate) limit_max_value: u64,
    pub(crate) default_sort: Vec<String>,
    pub(crate) param_symbol: String,
    pub(crate) positional_params: bool,
    pub(crate) max_depth: usize,
    pub(crate) max_input_size: usize,
    pub(crate) name_fn: Option<NameFn>,
    pub(crate) get_db_statement: Option<StatementFn>,
    pub(crate) get_db_dir: Option<DirFn>,
    pub(crate) log: Option<LogFn>,
}

impl Config {
    /// Create a configuration for `model` with default options.
    #[must_use]
    pub fn new(model: Model) -> Self {
        Self {
            model,
            field_sep: "_".to_string(),
            op_prefix: "$".to_string(),
            default_limit: DEFAULT_LIMIT,
            limit_max_value: 0,
            default_sort: Vec::new(),
            param_symbol: "?".to_string(),
            positional_params: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            name_fn: None,
            get_db_statement: None,
            get_db_dir: None,
            log: None,
        }
    }

    /// Separator between nested field names on the query side
    /// (default `_`). Backing columns always join with `_`.
    #[must_use]
    pub fn field_sep(mut self, sep: impl Into<String>) -> Self {
        self.field_sep = sep.into();
        self
    }

    /// Prefix of operators and connectives in query documents
    /// (default `$`).
    #[must_use]
    pub fn op_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.op_prefix = prefix.into();
        self
    }

    /// Limit applied when the query omits one or sends zero
    /// (default 25).
    #[must_use]
    pub const fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Upper bound on client-supplied limits; zero means unbounded
    /// (the default).
    #[must_use]
    pub const fn limit_max_value(mut self, max: u64) -> Self {
        self.limit_max_value = max;
        self
    }

    /// Sort keys applied when the query's `sort` is absent or empty.
    #[must_use]
    pub fn default_sort(mut self, sort: &[&str]) -> Self {
        self.default_sort = sort.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Placeholder symbol (default `?`).
    #[must_use]
    pub fn param_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.param_symbol = symbol.into();
        self
    }

    /// Number placeholders (`$1`, `$2`, …) instead of repeating the
    /// bare symbol.
    #[must_use]
    pub const fn positional_params(mut self, positional: bool) -> Self {
        self.positional_params = positional;
        self
    }

    /// Maximum nesting depth of the filter tree (default 16).
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Maximum accepted input size in bytes (default 1 MiB).
    #[must_use]
    pub const fn max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Override the identifier normaliser used for query-side names.
    #[must_use]
    pub fn name_fn(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.name_fn = Some(Box::new(f));
        self
    }

    /// Override operator rendering per field. See [`StatementFn`].
    #[must_use]
    pub fn get_db_statement(
        mut self,
        f: impl Fn(Op, &FieldMeta) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.get_db_statement = Some(Box::new(f));
        self
    }

    /// Override sort direction text (default `asc`/`desc`).
    #[must_use]
    pub fn get_db_dir(mut self, f: impl Fn(Direction) -> String + Send + Sync + 'static) -> Self {
        self.get_db_dir = Some(Box::new(f));
        self
    }

    /// Install a construction-time diagnostic sink. It is never
    /// invoked after [`Parser::new`](crate::Parser::new) returns.
    #[must_use]
    pub fn log(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log = Some(Box::new(f));
        self
    }

    /// Re-apply defaults for options that were reset to their zero
    /// value, so a hand-assembled configuration behaves like a fresh
    /// one.
    pub(crate) fn normalize(&mut self) {
        if self.field_sep.is_empty() {
            self.field_sep = "_".to_string();
        }
        if self.op_prefix.is_empty() {
            self.op_prefix = "$".to_string();
        }
        if self.default_limit == 0 {
            self.default_limit = DEFAULT_LIMIT;
        }
        if self.param_symbol.is_empty() {
            self.param_symbol = "?".to_string();
        }
        if self.max_depth == 0 {
            self.max_depth = DEFAULT_MAX_DEPTH;
        }
        if self.max_input_size == 0 {
            self.max_input_size = DEFAULT_MAX_INPUT_SIZE;
        }
    }

    pub(crate) fn diag(&self, msg: &str) {
        if let Some(log) = &self.log {
            log(msg);
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("field_sep", &self.field_sep)
            .field("op_prefix", &self.op_prefix)
            .field("default_limit", &self.default_limit)
            .field("limit_max_value", &self.limit_max_value)
            .field("default_sort", &self.default_sort)
            .field("param_symbol", &self.param_symbol)
            .field("positional_params", &self.positional_params)
            .field("max_depth", &self.max_depth)
            .field("max_input_size", &self.max_input_size)
            .field("name_fn", &self.name_fn.as_ref().map(|_| ".."))
            .field("get_db_statement", &self.get_db_statement.as_ref().map(|_| ".."))
            .field("get_db_dir", &self.get_db_dir.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new(Model::new());
        assert_eq!(config.field_sep, "_");
        assert_eq!(config.op_prefix, "$");
        assert_eq!(config.default_limit, 25);
        assert_eq!(config.limit_max_value, 0);
        assert_eq!(config.param_symbol, "?");
        assert!(!config.positional_params);
    }

    #[test]
    fn normalize_restores_zeroed_options() {
        let mut config = Config::new(Model::new())
            .field_sep("")
            .op_prefix("")
            .default_limit(0)
            .param_symbol("")
            .max_depth(0)
            .max_input_size(0);
        config.normalize();
        assert_eq!(config.field_sep, "_");
        assert_eq!(config.op_prefix, "$");
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
        assert_eq!(config.param_symbol, "?");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_input_size, DEFAULT_MAX_INPUT_SIZE);
    }

    #[test]
    fn builder_chain() {
        let config = Config::new(Model::new())
            .field_sep(".")
            .op_prefix("@")
            .param_symbol("$")
            .positional_params(true)
            .default_sort(&["-name"]);
        assert_eq!(config.field_sep, ".");
        assert_eq!(config.op_prefix, "@");
        assert_eq!(config.param_symbol, "$");
        assert!(config.positional_params);
        assert_eq!(config.default_sort, ["-name"]);
    }

    #[test]
    fn debug_elides_callbacks() {
        let config = Config::new(Model::new()).name_fn(str::to_string);
        let s = format!("{config:?}");
        assert!(s.contains("field_sep"));
        assert!(!s.contains("closure"));
    }
}
