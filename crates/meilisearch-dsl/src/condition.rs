//! Single filter conditions.
//!
//! A [`Condition`] is one field / operator / value triple. Conditions are
//! parsed from `field__op` keys, where any number of leading segments form a
//! dotted path to a nested attribute.

use crate::error::{DslError, Result};
use crate::op::Op;
use crate::value::FilterValue;

/// Separator between path segments and the operator suffix in a key.
pub const KEY_SEPARATOR: &str = "__";

/// A parsed, validated filter predicate.
///
/// # Example
///
/// ```
/// use meilisearch_dsl::{Condition, Op};
///
/// let cond = Condition::parse("author__name__neq", "Salinger").unwrap();
/// assert_eq!(cond.field, "author.name");
/// assert_eq!(cond.op, Op::Ne);
/// assert_eq!(cond.render(false), "author.name != Salinger");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Dotted field path.
    pub field: String,
    /// The comparison operator, before any negation.
    pub op: Op,
    /// The value; always `Empty` for existence operators.
    pub value: FilterValue,
}

impl Condition {
    /// Creates a condition, checking the value shape against the operator.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<FilterValue>) -> Result<Self> {
        let field = field.into();
        let value = check_value(&field, op, value.into())?;
        Ok(Condition { field, op, value })
    }

    /// Parses a `field[__segment...][__op]` key and validates its value.
    pub fn parse(key: &str, value: impl Into<FilterValue>) -> Result<Self> {
        let (field, op) = split_key(key)?;
        let value = check_value(key, op, value.into())?;
        Ok(Condition { field, op, value })
    }

    /// Renders as `<field> <op> <value>`, or `<field> <op>` for existence checks.
    pub fn render(&self, negate: bool) -> String {
        let op = self.op.effective(negate);
        if op.is_existence() {
            format!("{} {}", self.field, op.token())
        } else {
            format!("{} {} {}", self.field, op.token(), self.value.format())
        }
    }

    /// Human readable form, e.g. `field "age": is greater than 19`.
    pub fn explain(&self, negate: bool) -> String {
        let op = self.op.effective(negate);
        if op.is_existence() {
            format!("field \"{}\": {}", self.field, op.describe())
        } else {
            format!(
                "field \"{}\": {} {}",
                self.field,
                op.describe(),
                self.value.format()
            )
        }
    }
}

/// Splits a key into its dotted field path and operator.
///
/// Keys without a separator address the whole key as a field with `Eq`.
pub fn split_key(key: &str) -> Result<(String, Op)> {
    match key.rsplit_once(KEY_SEPARATOR) {
        None => Ok((key.to_string(), Op::Eq)),
        Some((path, suffix)) => {
            let op = Op::from_suffix(suffix).ok_or_else(|| DslError::InvalidOperator {
                key: key.to_string(),
                operator: suffix.to_string(),
            })?;
            let field = path.split(KEY_SEPARATOR).collect::<Vec<_>>().join(".");
            Ok((field, op))
        }
    }
}

fn check_value(target: &str, op: Op, value: FilterValue) -> Result<FilterValue> {
    let actual = value.kind();
    let mismatch = |expected| DslError::InvalidValueType {
        target: target.to_string(),
        expected,
        actual,
    };
    if op.is_existence() {
        // Existence checks carry no operand; whatever was given is dropped.
        Ok(FilterValue::Empty)
    } else if !value.is_finite() {
        Err(DslError::InvalidValueType {
            target: target.to_string(),
            expected: "finite number",
            actual: "non-finite number",
        })
    } else if op.is_membership() {
        if value.is_list() {
            Ok(value)
        } else {
            Err(mismatch("list"))
        }
    } else {
        match value {
            FilterValue::Scalar(_) => Ok(value),
            _ => Err(mismatch("scalar")),
        }
    }
}
