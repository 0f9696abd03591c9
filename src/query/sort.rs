//! Sort, select, and paging compilation.

use crate::error::ParseError;
use crate::query::Parser;
use serde_json::Value as JsonValue;

/// Sort direction of a signed sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Direction {
    /// Ascending (`+` or no sign).
    Asc,
    /// Descending (`-`).
    Desc,
}

impl Direction {
    /// Default SQL direction text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Read the value of `key` as an array of strings.
pub(crate) fn string_array<'a>(
    key: &'static str,
    value: &'a JsonValue,
) -> Result<Vec<&'a str>, ParseError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ParseError::ExpectedArray(key.to_string()))?;
    arr.iter()
        .map(|v| v.as_str().ok_or_else(|| ParseError::ExpectedString(key.to_string())))
        .collect()
}

/// Compile `[+|-]<name>` sort keys into an `ORDER BY` body.
///
/// Unsigned keys emit the bare column; signed keys append the
/// direction text.
pub(crate) fn compile_sort(parser: &Parser, items: &[&str]) -> Result<String, ParseError> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let (dir, name) = match item.strip_prefix('-') {
            Some(rest) => (Some(Direction::Desc), rest),
            None => match item.strip_prefix('+') {
                Some(rest) => (Some(Direction::Asc), rest),
                None => (None, *item),
            },
        };
        let field = parser
            .catalogue
            .get(name)
            .ok_or_else(|| ParseError::UnknownField(name.to_string()))?;
        if !field.meta.sortable {
            return Err(ParseError::NotSortable(name.to_string()));
        }
        parts.push(match dir {
            None => field.meta.column.clone(),
            Some(dir) => format!("{} {}", field.meta.column, parser.dir_text(dir)),
        });
    }
    Ok(parts.join(", "))
}

/// Compile the projection list. Fields are emitted by query-side name
/// and only checked for existence.
pub(crate) fn compile_select(parser: &Parser, items: &[&str]) -> Result<String, ParseError> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let field = parser
            .catalogue
            .get(*item)
            .ok_or_else(|| ParseError::UnknownField((*item).to_string()))?;
        parts.push(field.meta.name.clone());
    }
    Ok(parts.join(", "))
}

/// Validate a client-supplied limit, substituting the default for zero
/// and enforcing the configured bound.
pub(crate) fn compile_limit(parser: &Parser, value: &JsonValue) -> Result<u64, ParseError> {
    let n = value.as_u64().ok_or(ParseError::InvalidLimit)?;
    if n == 0 {
        return Ok(parser.config.default_limit);
    }
    let max = parser.config.limit_max_value;
    if max > 0 && n > max {
        return Err(ParseError::LimitOutOfRange { max });
    }
    Ok(n)
}

pub(crate) fn compile_offset(value: &JsonValue) -> Result<u64, ParseError> {
    value.as_u64().ok_or(ParseError::InvalidOffset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, Model};
    use crate::{Config, Parser};

    fn parser() -> Parser {
        Parser::new(Config::new(
            Model::new()
                .field("Age", FieldType::Int, "filter,sort")
                .field("Name", FieldType::String, "filter"),
        ))
        .unwrap()
    }

    #[test]
    fn signs_control_direction() {
        let p = parser();
        assert_eq!(compile_sort(&p, &["age"]).unwrap(), "age");
        assert_eq!(compile_sort(&p, &["+age"]).unwrap(), "age asc");
        assert_eq!(compile_sort(&p, &["-age"]).unwrap(), "age desc");
    }

    #[test]
    fn unsortable_fields_are_rejected() {
        let err = compile_sort(&parser(), &["name"]).unwrap_err();
        assert_eq!(err, ParseError::NotSortable("name".into()));
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let err = compile_sort(&parser(), &["-height"]).unwrap_err();
        assert_eq!(err, ParseError::UnknownField("height".into()));
    }

    #[test]
    fn dir_override_changes_the_suffix_only() {
        let parser = Parser::new(
            Config::new(Model::new().field("Age", FieldType::Int, "sort"))
                .get_db_dir(|d| d.as_str().to_uppercase()),
        )
        .unwrap();
        assert_eq!(compile_sort(&parser, &["-age"]).unwrap(), "age DESC");
        // No sign still means no direction text.
        assert_eq!(compile_sort(&parser, &["age"]).unwrap(), "age");
    }

    #[test]
    fn select_emits_query_side_names() {
        let parser = Parser::new(Config::new(Model::new().field(
            "SomeName",
            FieldType::String,
            "filter,name=someName,column=some_name",
        )))
        .unwrap();
        assert_eq!(compile_select(&parser, &["someName"]).unwrap(), "someName");
        assert!(compile_select(&parser, &["missing"]).is_err());
    }

    #[test]
    fn limit_bounds() {
        let parser = Parser::new(
            Config::new(Model::new()).limit_max_value(100),
        )
        .unwrap();
        assert_eq!(compile_limit(&parser, &serde_json::json!(10)).unwrap(), 10);
        assert_eq!(compile_limit(&parser, &serde_json::json!(0)).unwrap(), 25);
        assert_eq!(
            compile_limit(&parser, &serde_json::json!(200)).unwrap_err(),
            ParseError::LimitOutOfRange { max: 100 }
        );
        assert_eq!(
            compile_limit(&parser, &serde_json::json!(-10)).unwrap_err(),
            ParseError::InvalidLimit
        );
        assert_eq!(
            compile_limit(&parser, &serde_json::json!(10.5)).unwrap_err(),
            ParseError::InvalidLimit
        );
    }

    #[test]
    fn offset_bounds() {
        assert_eq!(compile_offset(&serde_json::json!(4)).unwrap(), 4);
        assert_eq!(
            compile_offset(&serde_json::json!(-14)).unwrap_err(),
            ParseError::InvalidOffset
        );
    }

    #[test]
    fn string_array_shapes() {
        assert_eq!(
            string_array("sort", &serde_json::json!(["a", "b"])).unwrap(),
            ["a", "b"]
        );
        assert_eq!(
            string_array("sort", &serde_json::json!("a")).unwrap_err(),
            ParseError::ExpectedArray("sort".into())
        );
        assert_eq!(
            string_array("select", &serde_json::json!([1])).unwrap_err(),
            ParseError::ExpectedString("select".into())
        );
    }
}
