//! Comparison operators for filter conditions.
//!
//! The [`Op`] enum is the closed set of operators the engine's filter syntax
//! understands. Each operator has a key suffix (used in `field__suffix`
//! keys), a rendered token, and a negated counterpart.

/// Comparison operator for a filter condition.
///
/// Operators fall into three groups:
/// - **Comparison**: `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte` - take a scalar
/// - **Membership**: `In`, `NotIn` - take a list of scalars
/// - **Existence**: `Exists`, `NotExists` - take no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Equal. The default when a key has no suffix.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Value is one of the given list.
    In,
    /// Value is none of the given list.
    NotIn,
    /// Field is present on the document.
    Exists,
    /// Field is absent from the document.
    NotExists,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 10] = [
        Op::Eq,
        Op::Ne,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::In,
        Op::NotIn,
        Op::Exists,
        Op::NotExists,
    ];

    /// Looks up an operator by its key suffix.
    ///
    /// `not exists` is accepted as an alias of `not_exists`.
    pub fn from_suffix(suffix: &str) -> Option<Op> {
        match suffix {
            "eq" => Some(Op::Eq),
            "neq" => Some(Op::Ne),
            "gt" => Some(Op::Gt),
            "gte" => Some(Op::Gte),
            "lt" => Some(Op::Lt),
            "lte" => Some(Op::Lte),
            "in" => Some(Op::In),
            "nin" => Some(Op::NotIn),
            "exists" => Some(Op::Exists),
            "not_exists" | "not exists" => Some(Op::NotExists),
            _ => None,
        }
    }

    /// Returns the key suffix for this operator.
    pub fn suffix(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "neq",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::In => "in",
            Op::NotIn => "nin",
            Op::Exists => "exists",
            Op::NotExists => "not_exists",
        }
    }

    /// Returns the token emitted in the filter string.
    pub fn token(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Exists => "EXISTS",
            Op::NotExists => "NOT EXISTS",
        }
    }

    /// Returns the operator with the opposite meaning.
    ///
    /// Applying this twice yields the original operator.
    pub fn negated(self) -> Op {
        match self {
            Op::Eq => Op::Ne,
            Op::Ne => Op::Eq,
            Op::Gt => Op::Lte,
            Op::Gte => Op::Lt,
            Op::Lt => Op::Gte,
            Op::Lte => Op::Gt,
            Op::In => Op::NotIn,
            Op::NotIn => Op::In,
            Op::Exists => Op::NotExists,
            Op::NotExists => Op::Exists,
        }
    }

    /// Returns the operator after applying `negate` (if set).
    pub fn effective(self, negate: bool) -> Op {
        if negate {
            self.negated()
        } else {
            self
        }
    }

    /// Returns `true` for `In` and `NotIn`.
    pub fn is_membership(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// Returns `true` for `Exists` and `NotExists`.
    pub fn is_existence(self) -> bool {
        matches!(self, Op::Exists | Op::NotExists)
    }

    /// Returns a short English phrase for explanations.
    pub fn describe(self) -> &'static str {
        match self {
            Op::Eq => "is equal to",
            Op::Ne => "is not equal to",
            Op::Gt => "is greater than",
            Op::Gte => "is greater than or equal to",
            Op::Lt => "is less than",
            Op::Lte => "is less than or equal to",
            Op::In => "is in",
            Op::NotIn => "is not in",
            Op::Exists => "exists",
            Op::NotExists => "does not exist",
        }
    }

    /// Returns `true` if `text` is an operator suffix or token.
    ///
    /// Such words are ambiguous inside a list value and must be quoted.
    pub fn is_reserved_word(text: &str) -> bool {
        Op::ALL
            .iter()
            .any(|op| op.suffix() == text || op.token() == text)
            || text == "not exists"
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Boolean operator joining the two children of a combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    /// The De Morgan dual: `And` <-> `Or`.
    pub fn dual(self) -> BoolOp {
        match self {
            BoolOp::And => BoolOp::Or,
            BoolOp::Or => BoolOp::And,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

impl std::fmt::Display for BoolOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
