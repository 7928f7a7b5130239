//! Meilisearch DSL - composable filter expressions and search requests.
//!
//! The crate turns a small algebra of conditions into the engine's textual
//! filter syntax, and assembles multi-search requests around it:
//!
//! - Conditions written as `field__op` keys, with dotted paths for nested
//!   attributes (`author__name__neq`)
//! - `AND` / `OR` combinators and negation, with negation pushed down onto
//!   the operators instead of emitting `NOT`
//! - A structured (nested array) rendering with a configurable depth limit
//! - Pretty-printed and plain-English views for debugging
//! - A request builder that renders to the multi-search request shape
//!
//! # Quick Start
//!
//! ```rust
//! use meilisearch_dsl::{IndexSearch, Q, Scalar};
//!
//! let filter = Q::cond("name", "John")
//!     .or_(Q::cond("name", "John Simmons"))
//!     .or_(Q::cond("age__gt", 30).negate())
//!     .and_(Q::cond("number__gte", 10).and_(Q::cond("number__lte", 20)))
//!     .or_(Q::cond("category__in", vec![Scalar::from("a"), "b c".into(), 1.into()]));
//!
//! assert_eq!(
//!     filter.render().unwrap(),
//!     r#"((((name = John) OR (name = "John Simmons")) OR (age <= 30)) AND ((number >= 10) AND (number <= 20))) OR (category IN [a,"b c",1])"#
//! );
//!
//! let request = IndexSearch::new("people", "John")
//!     .filter(Q::cond("age__gt", 19))
//!     .limit(2)
//!     .query()
//!     .unwrap();
//! assert_eq!(request.filter.as_deref(), Some("age > 19"));
//! ```
//!
//! # Operators
//!
//! | Suffix | Token | Value |
//! |--------|-------|-------|
//! | `eq` (default) | `=` | scalar |
//! | `neq` | `!=` | scalar |
//! | `gt`, `gte`, `lt`, `lte` | `>`, `>=`, `<`, `<=` | scalar |
//! | `in`, `nin` | `IN`, `NOT IN` | list |
//! | `exists`, `not_exists` | `EXISTS`, `NOT EXISTS` | none |
//!
//! # Negation
//!
//! ```text
//! negate(a = 1)            -> a != 1
//! negate((A) AND (B))      -> (negate A) OR (negate B)
//! negate(negate(X))        -> X
//! ```
//!
//! Field names and values are not escaped beyond quoting values that
//! contain spaces; callers must not pass control characters or quotes.

mod client;
mod condition;
mod config;
mod error;
mod op;
mod query;
mod search;
mod value;

// Re-export public API
pub use client::{
    multi_search, wait_for_task, Index, SearchService, ServiceError, TaskInfo, TaskOutcome,
    TaskStatus,
};
pub use condition::{split_key, Condition, KEY_SEPARATOR};
pub use config::{DslConfig, TaskWaitConfig};
pub use error::{DslError, Result};
pub use op::{BoolOp, Op};
pub use query::{FilterTree, Q};
pub use search::{
    IndexQuery, IndexSearch, MatchingStrategy, OptionKind, OptionValue, SearchOption,
    SearchOptions, SearchRequest,
};
pub use value::{FilterValue, Number, Scalar};
