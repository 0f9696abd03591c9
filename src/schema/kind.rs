//! Scalar kinds, the operator vocabulary, and the per-kind binding of
//! permitted operators and JSON value validation/conversion.

use crate::schema::layout::Layout;
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::fmt;

/// A filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Op {
    /// Equal: `=`
    Eq,
    /// Not equal: `<>`
    Neq,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Pattern match: `LIKE`
    Like,
}

impl Op {
    /// The default SQL token for this operator.
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
        }
    }

    /// The operator name as it appears in query documents, without the
    /// configured prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Like => "like",
        }
    }

    pub(crate) fn from_name(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The scalar kind of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    Uint,
    /// 64-bit float.
    Float,
    /// UTF-8 string.
    String,
    /// Timestamp, parsed under the field's layout.
    Time,
}

const COMPARE: [Op; 6] = [Op::Eq, Op::Neq, Op::Lt, Op::Lte, Op::Gt, Op::Gte];
const ALL: [Op; 7] = [Op::Eq, Op::Neq, Op::Lt, Op::Lte, Op::Gt, Op::Gte, Op::Like];

impl Kind {
    /// The operators permitted on fields of this kind.
    ///
    /// `like` is permitted only on strings; booleans admit equality
    /// only.
    #[must_use]
    pub fn allowed_ops(self) -> &'static [Op] {
        match self {
            Self::Bool => &[Op::Eq, Op::Neq],
            Self::Int | Self::Uint | Self::Float | Self::Time => &COMPARE,
            Self::String => &ALL,
        }
    }

    /// Whether `value` has the JSON shape this kind accepts.
    ///
    /// Integer kinds reject fractional numbers, `uint` rejects
    /// negatives, and `time` rejects strings that fail to parse under
    /// `layout`.
    pub(crate) fn validate(self, value: &JsonValue, layout: &Layout) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Int => as_integral(value).is_some_and(|n| i64::try_from(n).is_ok()),
            Self::Uint => as_integral(value).is_some_and(|n| n >= 0),
            Self::Float => value.is_number(),
            Self::String => value.is_string(),
            Self::Time => value.as_str().is_some_and(|s| layout.parse(s).is_some()),
        }
    }

    /// Convert a validated JSON value into the SQL argument bound to
    /// the emitted placeholder.
    pub(crate) fn convert(self, value: &JsonValue, layout: &Layout) -> Option<Value> {
        match self {
            Self::Bool => value.as_bool().map(Value::Bool),
            Self::Int => as_integral(value)
                .and_then(|n| i64::try_from(n).ok())
                .map(Value::Int),
            Self::Uint => as_integral(value)
                .and_then(|n| u64::try_from(n).ok())
                .map(Value::Uint),
            Self::Float => value.as_f64().map(Value::Float),
            Self::String => value.as_str().map(Value::from),
            Self::Time => value.as_str().and_then(|s| layout.parse(s)).map(Value::Time),
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a JSON number as a mathematical integer, accepting floats with
/// a zero fraction (`12.0` counts as `12`).
fn as_integral(value: &JsonValue) -> Option<i128> {
    let JsonValue::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    // Beyond 2^53 a float no longer identifies one integer.
    if f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0 {
        #[allow(clippy::cast_possible_truncation)]
        return Some(f as i128);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn op_tokens() {
        assert_eq!(Op::Eq.sql(), "=");
        assert_eq!(Op::Neq.sql(), "<>");
        assert_eq!(Op::Like.sql(), "LIKE");
        assert_eq!(Op::from_name("gte"), Some(Op::Gte));
        assert_eq!(Op::from_name("regex"), None);
    }

    #[test]
    fn bool_admits_equality_only() {
        assert_eq!(Kind::Bool.allowed_ops(), &[Op::Eq, Op::Neq]);
    }

    #[test]
    fn like_is_string_only() {
        assert!(Kind::String.allowed_ops().contains(&Op::Like));
        assert!(!Kind::Int.allowed_ops().contains(&Op::Like));
        assert!(!Kind::Time.allowed_ops().contains(&Op::Like));
        assert!(!Kind::Float.allowed_ops().contains(&Op::Like));
    }

    #[test]
    fn int_validation() {
        let layout = Layout::default();
        assert!(Kind::Int.validate(&json!(12), &layout));
        assert!(Kind::Int.validate(&json!(-3), &layout));
        assert!(Kind::Int.validate(&json!(12.0), &layout));
        assert!(!Kind::Int.validate(&json!(1.1), &layout));
        assert!(!Kind::Int.validate(&json!("12"), &layout));
    }

    #[test]
    fn uint_rejects_negatives() {
        let layout = Layout::default();
        assert!(Kind::Uint.validate(&json!(1), &layout));
        assert!(!Kind::Uint.validate(&json!(-1), &layout));
        assert!(!Kind::Uint.validate(&json!(-1.0), &layout));
    }

    #[test]
    fn float_accepts_integers() {
        let layout = Layout::default();
        assert!(Kind::Float.validate(&json!(1), &layout));
        assert!(Kind::Float.validate(&json!(1.5), &layout));
        assert!(!Kind::Float.validate(&json!("1.5"), &layout));
        assert_eq!(
            Kind::Float.convert(&json!(1), &layout),
            Some(Value::Float(1.0))
        );
    }

    #[test]
    fn integers_remain_integers() {
        let layout = Layout::default();
        assert_eq!(Kind::Int.convert(&json!(12), &layout), Some(Value::Int(12)));
        assert_eq!(
            Kind::Uint.convert(&json!(12), &layout),
            Some(Value::Uint(12))
        );
    }

    #[test]
    fn time_rejects_numbers_and_garbage() {
        let layout = Layout::default();
        assert!(!Kind::Time.validate(&json!(12_736_186_894_u64), &layout));
        assert!(!Kind::Time.validate(&json!("Sunday?"), &layout));
        assert!(Kind::Time.validate(&json!("2018-01-14T06:05:48.839Z"), &layout));
    }
}
