//! Filter values and their textual formatting.
//!
//! A condition's right-hand side is a [`FilterValue`]: a single [`Scalar`],
//! a list of scalars (for `IN` / `NOT IN`), or nothing (for `EXISTS`).

use std::fmt;

use crate::op::Op;

/// Numeric value, keeping integers exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            // Debug keeps the fractional part of whole floats (`10.0`)
            Number::F64(n) => write!(f, "{n:?}"),
        }
    }
}

impl Number {
    /// Returns `false` for NaN and infinite floats, which have no filter syntax.
    pub fn is_finite(self) -> bool {
        match self {
            Number::F64(n) => n.is_finite(),
            Number::I64(_) | Number::U64(_) => true,
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }

            impl From<$source> for Scalar {
                fn from(n: $source) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }

            impl From<$source> for FilterValue {
                fn from(n: $source) -> Self {
                    FilterValue::Scalar(Scalar::from(n))
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// A single string, number or boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    /// Formats the scalar as it appears on the right of a comparison.
    ///
    /// Strings containing a space are double-quoted, booleans are lowercase,
    /// numbers use their default textual form.
    pub fn format(&self) -> String {
        match self {
            Scalar::String(s) if s.contains(' ') => format!("\"{s}\""),
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    /// Formats the scalar as an element of an `IN [...]` list.
    ///
    /// On top of [`Scalar::format`], elements whose text collides with an
    /// operator word are quoted so the list stays unambiguous.
    pub fn format_element(&self) -> String {
        let text = self.format();
        if Op::is_reserved_word(&text) {
            format!("\"{text}\"")
        } else {
            text
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Number(_) => "number",
            Scalar::Bool(_) => "boolean",
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Scalar::Number(n) => n.is_finite(),
            Scalar::String(_) | Scalar::Bool(_) => true,
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// One scalar, for comparison operators.
    Scalar(Scalar),
    /// A sequence of scalars, for membership operators.
    List(Vec<Scalar>),
    /// No value, for existence operators.
    Empty,
}

impl FilterValue {
    /// Formats a list as `[a,b,"c d"]`; scalars as [`Scalar::format`].
    ///
    /// `Empty` formats as an empty string.
    pub fn format(&self) -> String {
        match self {
            FilterValue::Scalar(s) => s.format(),
            FilterValue::List(items) => {
                let parts: Vec<String> = items.iter().map(Scalar::format_element).collect();
                format!("[{}]", parts.join(","))
            }
            FilterValue::Empty => String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Scalar(s) => s.kind(),
            FilterValue::List(_) => "list",
            FilterValue::Empty => "nothing",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FilterValue::List(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FilterValue::Empty)
    }

    /// Returns `false` if the value or any list element is a NaN or
    /// infinite float.
    pub fn is_finite(&self) -> bool {
        match self {
            FilterValue::Scalar(s) => s.is_finite(),
            FilterValue::List(items) => items.iter().all(Scalar::is_finite),
            FilterValue::Empty => true,
        }
    }
}

impl From<Scalar> for FilterValue {
    fn from(s: Scalar) -> Self {
        FilterValue::Scalar(s)
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Scalar(Scalar::String(s))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Scalar(Scalar::from(s))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Scalar(Scalar::Bool(b))
    }
}

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Scalar(Scalar::Number(n))
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>, const N: usize> From<[T; N]> for FilterValue {
    fn from(items: [T; N]) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<()> for FilterValue {
    fn from(_: ()) -> Self {
        FilterValue::Empty
    }
}
