//! The parser facade: catalogue construction and query compilation.

pub(crate) mod filter;
pub(crate) mod sort;

use crate::config::Config;
use crate::error::{ParseError, SchemaError};
use crate::schema::{self, Catalogue, FieldMeta};
use crate::value::Value;
use serde_json::Value as JsonValue;
use sort::Direction;

/// The compiled output of one query document, ready to be spliced into
/// a SQL statement by the host.
///
/// `filter_exp`, `sort`, and `select` contain only identifiers drawn
/// from the catalogue and placeholder symbols; client-supplied values
/// travel exclusively through `filter_args`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Params {
    /// Row limit, defaulted when the query omits one.
    pub limit: u64,
    /// Row offset, zero when the query omits one.
    pub offset: u64,
    /// Filter expression with placeholders.
    pub filter_exp: String,
    /// Arguments bound to the placeholders, in emission order.
    pub filter_args: Vec<Value>,
    /// `ORDER BY` body, comma-separated.
    pub sort: String,
    /// Projection list, comma-separated.
    pub select: String,
    /// The placeholder symbol in use, echoed from the configuration.
    pub param_symbol: String,
    /// Whether placeholders are numbered, echoed from the
    /// configuration.
    pub positional_params: bool,
}

/// A query parser bound to one model.
///
/// The field catalogue is built once at construction and never changes
/// afterwards; [`parse`](Parser::parse) allocates per-call state only,
/// so one parser may serve concurrent callers.
///
/// # Example
///
/// ```
/// use rql::{Config, FieldType, Model, Parser};
///
/// let parser = Parser::new(Config::new(
///     Model::new()
///         .field("Age", FieldType::Int, "filter,sort")
///         .field("Name", FieldType::String, "filter"),
/// ))?;
///
/// let params = parser.parse(br#"{"filter": {"age": {"$gte": 18}}, "sort": ["-age"]}"#)?;
/// assert_eq!(params.filter_exp, "age >= ?");
/// assert_eq!(params.sort, "age desc");
/// assert_eq!(params.limit, 25);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Parser {
    pub(crate) catalogue: Catalogue,
    pub(crate) config: Config,
}

impl Parser {
    /// Build a parser by walking the configured model into a field
    /// catalogue.
    pub fn new(mut config: Config) -> Result<Self, SchemaError> {
        config.normalize();
        let catalogue = schema::build(&config)?;
        config.diag(&format!(
            "rql: catalogue ready with {} fields",
            catalogue.len()
        ));
        Ok(Self { catalogue, config })
    }

    /// Compile a JSON query document into [`Params`].
    ///
    /// Recognised top-level keys are `filter`, `sort`, `select`,
    /// `limit`, and `offset`, all optional; any other key is an error.
    pub fn parse(&self, input: &[u8]) -> Result<Params, ParseError> {
        if input.len() > self.config.max_input_size {
            return Err(ParseError::InputTooLarge {
                actual: input.len(),
                max: self.config.max_input_size,
            });
        }
        let doc: JsonValue = serde_json::from_slice(input).map_err(|_| ParseError::InvalidJson)?;
        let JsonValue::Object(obj) = doc else {
            return Err(ParseError::ExpectedObject);
        };

        let mut params = Params {
            limit: self.config.default_limit,
            offset: 0,
            filter_exp: String::new(),
            filter_args: Vec::new(),
            sort: String::new(),
            select: String::new(),
            param_symbol: self.config.param_symbol.clone(),
            positional_params: self.config.positional_params,
        };

        for (key, value) in &obj {
            match key.as_str() {
                "filter" => {
                    let nested = value.as_object().ok_or(ParseError::ExpectedObject)?;
                    let (exp, args) = filter::compile(self, nested)?;
                    params.filter_exp = exp;
                    params.filter_args = args;
                },
                "sort" => {
                    let items = sort::string_array("sort", value)?;
                    if !items.is_empty() {
                        params.sort = sort::compile_sort(self, &items)?;
                    }
                },
                "select" => {
                    let items = sort::string_array("select", value)?;
                    params.select = sort::compile_select(self, &items)?;
                },
                "limit" => params.limit = sort::compile_limit(self, value)?,
                "offset" => params.offset = sort::compile_offset(value)?,
                other => return Err(ParseError::UnknownKey(other.to_string())),
            }
        }

        if params.sort.is_empty() && !self.config.default_sort.is_empty() {
            let items: Vec<&str> = self.config.default_sort.iter().map(String::as_str).collect();
            params.sort = sort::compile_sort(self, &items)?;
        }

        Ok(params)
    }

    /// The catalogue's public field descriptors, ordered by query
    /// name.
    #[must_use]
    pub fn fields(&self) -> Vec<&FieldMeta> {
        self.catalogue.values().map(|f| &f.meta).collect()
    }

    pub(crate) fn dir_text(&self, dir: Direction) -> String {
        match &self.config.get_db_dir {
            Some(f) => f(dir),
            None => dir.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, Model};

    fn parser() -> Parser {
        Parser::new(Config::new(
            Model::new()
                .field("Age", FieldType::Int, "filter,sort")
                .field("Name", FieldType::String, "filter"),
        ))
        .unwrap()
    }

    #[test]
    fn empty_document_yields_defaults() {
        let params = parser().parse(b"{}").unwrap();
        assert_eq!(params.limit, 25);
        assert_eq!(params.offset, 0);
        assert_eq!(params.filter_exp, "");
        assert!(params.filter_args.is_empty());
        assert_eq!(params.sort, "");
        assert_eq!(params.select, "");
        assert_eq!(params.param_symbol, "?");
        assert!(!params.positional_params);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_eq!(
            parser().parse(b"{").unwrap_err(),
            ParseError::InvalidJson
        );
    }

    #[test]
    fn non_object_top_level_is_rejected() {
        assert_eq!(
            parser().parse(b"[1, 2]").unwrap_err(),
            ParseError::ExpectedObject
        );
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        assert_eq!(
            parser().parse(br#"{"group_by": ["age"]}"#).unwrap_err(),
            ParseError::UnknownKey("group_by".into())
        );
    }

    #[test]
    fn filter_must_be_an_object() {
        assert_eq!(
            parser().parse(br#"{"filter": [1]}"#).unwrap_err(),
            ParseError::ExpectedObject
        );
    }

    #[test]
    fn input_ceiling_applies_before_decoding() {
        let parser = Parser::new(
            Config::new(Model::new().field("Age", FieldType::Int, "filter")).max_input_size(16),
        )
        .unwrap();
        let err = parser
            .parse(br#"{"filter": {"age": 1}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InputTooLarge {
                actual: 22,
                max: 16
            }
        );
    }

    #[test]
    fn default_sort_applies_when_sort_is_absent_or_empty() {
        let parser = Parser::new(
            Config::new(
                Model::new()
                    .field("Age", FieldType::Int, "filter,sort")
                    .field("Name", FieldType::String, "filter,sort"),
            )
            .default_sort(&["-name"]),
        )
        .unwrap();
        assert_eq!(parser.parse(b"{}").unwrap().sort, "name desc");
        assert_eq!(parser.parse(br#"{"sort": []}"#).unwrap().sort, "name desc");
        assert_eq!(
            parser.parse(br#"{"sort": ["-age"]}"#).unwrap().sort,
            "age desc"
        );
    }

    #[test]
    fn fields_exposes_the_catalogue() {
        let parser = parser();
        let fields = parser.fields();
        assert_eq!(fields.len(), 2);
        let age = fields.iter().find(|f| f.name == "age").unwrap();
        assert!(age.filterable);
        assert!(age.sortable);
        let name = fields.iter().find(|f| f.name == "name").unwrap();
        assert!(name.filterable);
        assert!(!name.sortable);
    }

    #[test]
    fn parse_is_pure() {
        let parser = parser();
        let before: Vec<String> = parser.fields().iter().map(|f| f.name.clone()).collect();
        let _ = parser.parse(br#"{"filter": {"age": 1}}"#).unwrap();
        let _ = parser.parse(br#"{"filter": {"age": "bad"}}"#).unwrap_err();
        let after: Vec<String> = parser.fields().iter().map(|f| f.name.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn parse_is_deterministic() {
        let parser = parser();
        let input = br#"{"filter": {"name": "foo", "age": {"$gte": 1, "$lte": 9}}, "sort": ["-age"]}"#;
        let a = parser.parse(input).unwrap();
        let b = parser.parse(input).unwrap();
        assert_eq!(a, b);
    }
}
