//! Filter compilation: lowering the `filter` sub-document into a
//! placeholder-parameterised SQL expression and its argument list.
//!
//! The document is first parsed into a tagged tree separating
//! connectives from predicates, with every field reference, operator,
//! and value validated against the catalogue; the tree is then lowered
//! to text with monotonic placeholders. Because JSON objects are
//! decoded preserving insertion order, the emitted expression reflects
//! the order of keys in the input.

use crate::error::ParseError;
use crate::query::Parser;
use crate::schema::Field;
use crate::schema::kind::Op;
use crate::value::Value;
use serde_json::{Map, Value as JsonValue};

/// A validated filter node: the conjunction of one object's entries.
struct Group {
    terms: Vec<Term>,
}

enum Term {
    /// `$or` / `$and` over sub-objects.
    Connective { or: bool, children: Vec<Group> },
    /// One field with one or more operator/value pairs.
    Predicate { column: String, preds: Vec<Pred> },
}

struct Pred {
    token: String,
    value: Value,
}

/// Compile the top-level `filter` object.
pub(crate) fn compile(
    parser: &Parser,
    obj: &Map<String, JsonValue>,
) -> Result<(String, Vec<Value>), ParseError> {
    let group = parse_group(parser, obj, 0)?;
    let mut args = Vec::new();
    let mut counter = 0;
    let terms = lower_group(parser, group, &mut args, &mut counter);
    Ok((terms.join(" AND "), args))
}

fn parse_group(
    parser: &Parser,
    obj: &Map<String, JsonValue>,
    depth: usize,
) -> Result<Group, ParseError> {
    if depth > parser.config.max_depth {
        return Err(ParseError::NestingTooDeep {
            max: parser.config.max_depth,
        });
    }

    let prefix = parser.config.op_prefix.as_str();
    let mut terms = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        if let Some(rest) = key.strip_prefix(prefix) {
            let or = match rest {
                "or" => true,
                "and" => false,
                _ => return Err(ParseError::MisplacedOperator(key.clone())),
            };
            let elems = value
                .as_array()
                .ok_or_else(|| ParseError::ExpectedArray(key.clone()))?;
            if elems.is_empty() {
                return Err(ParseError::EmptyConnective(key.clone()));
            }
            let mut children = Vec::with_capacity(elems.len());
            for elem in elems {
                let child = elem.as_object().ok_or(ParseError::ExpectedObject)?;
                children.push(parse_group(parser, child, depth + 1)?);
            }
            terms.push(Term::Connective { or, children });
        } else {
            terms.push(parse_predicate(parser, key, value)?);
        }
    }
    Ok(Group { terms })
}

fn parse_predicate(parser: &Parser, name: &str, value: &JsonValue) -> Result<Term, ParseError> {
    let field = parser
        .catalogue
        .get(name)
        .ok_or_else(|| ParseError::UnknownField(name.to_string()))?;
    if !field.meta.filterable {
        return Err(ParseError::NotFilterable(name.to_string()));
    }

    let preds = match value {
        JsonValue::Object(ops) => {
            if ops.is_empty() {
                return Err(ParseError::EmptyPredicate(name.to_string()));
            }
            let prefix = parser.config.op_prefix.as_str();
            let mut preds = Vec::with_capacity(ops.len());
            for (op_key, op_value) in ops {
                let op = op_key
                    .strip_prefix(prefix)
                    .and_then(Op::from_name)
                    .ok_or_else(|| ParseError::UnknownOperator {
                        field: name.to_string(),
                        op: op_key.clone(),
                    })?;
                preds.push(bind(field, name, op, op_value)?);
            }
            preds
        },
        // A bare scalar is shorthand for equality.
        scalar => vec![bind(field, name, Op::Eq, scalar)?],
    };

    Ok(Term::Predicate {
        column: field.meta.column.clone(),
        preds,
    })
}

/// Check the operator against the field's table and the value against
/// its kind, producing the ready-to-emit pair.
fn bind(field: &Field, name: &str, op: Op, value: &JsonValue) -> Result<Pred, ParseError> {
    let token = field
        .statement(op)
        .ok_or(ParseError::OperatorNotAllowed {
            field: name.to_string(),
            op,
        })?
        .to_string();
    if !field.validate(value) {
        return Err(ParseError::InvalidValue {
            field: name.to_string(),
            kind: field.meta.kind,
        });
    }
    let value = field.convert(value).ok_or(ParseError::InvalidValue {
        field: name.to_string(),
        kind: field.meta.kind,
    })?;
    Ok(Pred { token, value })
}

/// Lower a group to one rendered string per term. The caller joins
/// with ` AND `: bare at the root, parenthesised when the group sits
/// inside a connective and carries more than one term.
fn lower_group(
    parser: &Parser,
    group: Group,
    args: &mut Vec<Value>,
    counter: &mut usize,
) -> Vec<String> {
    group
        .terms
        .into_iter()
        .map(|term| lower_term(parser, term, args, counter))
        .collect()
}

fn lower_term(parser: &Parser, term: Term, args: &mut Vec<Value>, counter: &mut usize) -> String {
    match term {
        Term::Predicate { column, preds } => {
            let many = preds.len() > 1;
            let parts: Vec<String> = preds
                .into_iter()
                .map(|pred| {
                    let ph = placeholder(parser, counter);
                    args.push(pred.value);
                    format!("{column} {} {ph}", pred.token)
                })
                .collect();
            if many {
                format!("({})", parts.join(" AND "))
            } else {
                parts.into_iter().next().unwrap_or_default()
            }
        },
        Term::Connective { or, children } => {
            let rendered: Vec<String> = children
                .into_iter()
                .map(|child| {
                    let terms = lower_group(parser, child, args, counter);
                    if terms.len() > 1 {
                        format!("({})", terms.join(" AND "))
                    } else {
                        terms.into_iter().next().unwrap_or_default()
                    }
                })
                .collect();
            let joiner = if or { " OR " } else { " AND " };
            format!("({})", rendered.join(joiner))
        },
    }
}

fn placeholder(parser: &Parser, counter: &mut usize) -> String {
    *counter += 1;
    if parser.config.positional_params {
        format!("{}{counter}", parser.config.param_symbol)
    } else {
        parser.config.param_symbol.clone()
    }
}
