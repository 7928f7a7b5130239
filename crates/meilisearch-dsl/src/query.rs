//! The condition algebra.
//!
//! A [`Q`] is an immutable expression tree. Leaves hold one or more
//! `field__op = value` conditions (implicitly AND-ed); combinators join two
//! subtrees with `AND` or `OR`. Every node carries its own negation flag.
//!
//! Negation never emits a `NOT` token. It is pushed down at render time:
//! a negated combinator renders with the dual boolean operator and hands the
//! negation to both children (De Morgan), and a negated leaf maps each of
//! its condition operators through the negation table. The conditions of a
//! negated leaf are still joined with `AND`.
//!
//! Renderers walk the tree with an explicit stack, so long `or_` chains
//! (thousands of links) render without deep recursion.

use std::mem;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use tracing::trace;

use crate::condition::{Condition, KEY_SEPARATOR};
use crate::config::DslConfig;
use crate::error::{DslError, Result};
use crate::op::{BoolOp, Op};
use crate::value::FilterValue;

const INDENT: &str = "    ";

/// A composable filter expression.
///
/// # Example
///
/// ```
/// use meilisearch_dsl::Q;
///
/// let filter = Q::cond("name", "John")
///     .or_(Q::cond("name", "John Simmons"))
///     .and_(Q::cond("age__gt", 30).negate());
///
/// assert_eq!(
///     filter.render().unwrap(),
///     r#"((name = John) OR (name = "John Simmons")) AND (age <= 30)"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Q {
    node: Node,
    negated: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(Vec<(String, FilterValue)>),
    Combinator {
        op: BoolOp,
        left: Box<Q>,
        right: Box<Q>,
    },
}

impl Default for Node {
    fn default() -> Self {
        Node::Leaf(Vec::new())
    }
}

impl Drop for Node {
    // Detaches descendants onto a heap stack; a chain is dropped one link at a time.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let Node::Combinator { left, right, .. } = self {
            pending.push(mem::take(&mut left.node));
            pending.push(mem::take(&mut right.node));
        }
        while let Some(mut node) = pending.pop() {
            if let Node::Combinator { left, right, .. } = &mut node {
                pending.push(mem::take(&mut left.node));
                pending.push(mem::take(&mut right.node));
            }
        }
    }
}

/// One event of an in-order walk.
enum Visit<'a> {
    Enter { level: usize },
    Between { op: BoolOp, level: usize },
    Exit { level: usize },
    Leaf { leaf: &'a Q, negate: bool, level: usize },
}

enum Step<'a> {
    Node {
        q: &'a Q,
        inherited: bool,
        level: usize,
    },
    Between(BoolOp, usize),
    Exit(usize),
}

impl Q {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates an empty leaf. It renders as an empty string.
    pub fn new() -> Self {
        Q::default()
    }

    /// Creates a leaf with a single `field[__op]` condition.
    pub fn cond(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Q::new().with(key, value)
    }

    /// Creates a leaf from a typed field, operator and value.
    pub fn condition(field: &str, op: Op, value: impl Into<FilterValue>) -> Self {
        Q::cond(format!("{field}{KEY_SEPARATOR}{}", op.suffix()), value)
    }

    /// Creates a leaf from several conditions, kept in iteration order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FilterValue>,
    {
        pairs
            .into_iter()
            .fold(Q::new(), |q, (key, value)| q.with(key, value))
    }

    /// `field EXISTS`
    pub fn exists(field: &str) -> Self {
        Q::condition(field, Op::Exists, ())
    }

    /// `field NOT EXISTS`
    pub fn not_exists(field: &str) -> Self {
        Q::condition(field, Op::NotExists, ())
    }

    /// Adds another condition.
    ///
    /// On a leaf the condition joins the leaf's conjunction and shares its
    /// negation flag. On a combinator it is AND-ed as a new right-hand leaf.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        if let Node::Leaf(entries) = &mut self.node {
            entries.push((key.into(), value.into()));
            return self;
        }
        self.and_(Q::cond(key, value))
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// `(self) AND (other)`
    ///
    /// An empty operand is absorbed: `Q::new().and_(x)` is `x`.
    pub fn and_(self, other: Q) -> Q {
        self.combine(BoolOp::And, other)
    }

    /// `(self) OR (other)`
    ///
    /// An empty operand is absorbed, as with [`Q::and_`].
    pub fn or_(self, other: Q) -> Q {
        self.combine(BoolOp::Or, other)
    }

    /// Returns the same expression with its negation flag flipped.
    pub fn negate(mut self) -> Q {
        self.negated = !self.negated;
        self
    }

    fn combine(self, op: BoolOp, other: Q) -> Q {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Q {
            node: Node::Combinator {
                op,
                left: Box::new(self),
                right: Box::new(other),
            },
            negated: false,
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns this node's own negation flag.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node, Node::Leaf(_))
    }

    /// Returns `true` for a leaf with no conditions.
    pub fn is_empty(&self) -> bool {
        matches!(&self.node, Node::Leaf(entries) if entries.is_empty())
    }

    /// The boolean operator of a combinator, as stored (before negation).
    pub fn bool_op(&self) -> Option<BoolOp> {
        match &self.node {
            Node::Combinator { op, .. } => Some(*op),
            Node::Leaf(_) => None,
        }
    }

    /// The two children of a combinator.
    pub fn children(&self) -> Option<(&Q, &Q)> {
        match &self.node {
            Node::Combinator { left, right, .. } => Some((&**left, &**right)),
            Node::Leaf(_) => None,
        }
    }

    /// Combinator nesting depth: 0 for a leaf, 1 + the deeper child otherwise.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((q, level)) = stack.pop() {
            match &q.node {
                Node::Leaf(_) => deepest = deepest.max(level),
                Node::Combinator { left, right, .. } => {
                    stack.push((&**left, level + 1));
                    stack.push((&**right, level + 1));
                }
            }
        }
        deepest
    }

    /// Parses this leaf's conditions. Combinators have none of their own.
    pub fn conditions(&self) -> Result<Vec<Condition>> {
        match &self.node {
            Node::Leaf(entries) => entries
                .iter()
                .map(|(key, value)| Condition::parse(key, value.clone()))
                .collect(),
            Node::Combinator { .. } => Ok(Vec::new()),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Renders the engine's filter string.
    ///
    /// Fails on the first key with an unknown operator or a value of the
    /// wrong shape.
    pub fn render(&self) -> Result<String> {
        let mut filter = String::new();
        self.walk(|visit| {
            match visit {
                Visit::Enter { .. } => filter.push('('),
                Visit::Between { op, .. } => filter.push_str(&format!(") {op} (")),
                Visit::Exit { .. } => filter.push(')'),
                Visit::Leaf { leaf, negate, .. } => filter.push_str(&leaf.render_leaf(negate)?),
            }
            Ok(())
        })?;
        trace!(%filter, "rendered filter");
        Ok(filter)
    }

    fn render_leaf(&self, negate: bool) -> Result<String> {
        let parts: Vec<String> = self
            .conditions()?
            .iter()
            .map(|cond| cond.render(negate))
            .collect();
        Ok(parts.join(" AND "))
    }

    /// Walks the tree in order, resolving negation on the way down.
    ///
    /// Combinators report their effective (possibly dualized) operator;
    /// leaves report whether their conditions are negated.
    fn walk<'a>(&'a self, mut visit: impl FnMut(Visit<'a>) -> Result<()>) -> Result<()> {
        let mut stack = vec![Step::Node {
            q: self,
            inherited: false,
            level: 0,
        }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Node {
                    q,
                    inherited,
                    level,
                } => {
                    let negate = inherited ^ q.negated;
                    match &q.node {
                        Node::Combinator { op, left, right } => {
                            let op = if negate { op.dual() } else { *op };
                            visit(Visit::Enter { level })?;
                            stack.push(Step::Exit(level));
                            stack.push(Step::Node {
                                q: &**right,
                                inherited: negate,
                                level: level + 1,
                            });
                            stack.push(Step::Between(op, level));
                            stack.push(Step::Node {
                                q: &**left,
                                inherited: negate,
                                level: level + 1,
                            });
                        }
                        Node::Leaf(_) => visit(Visit::Leaf {
                            leaf: q,
                            negate,
                            level,
                        })?,
                    }
                }
                Step::Between(op, level) => visit(Visit::Between { op, level })?,
                Step::Exit(level) => visit(Visit::Exit { level })?,
            }
        }
        Ok(())
    }

    /// Renders the nested-array form, one two-element group per combinator.
    ///
    /// Fails with [`DslError::DepthExceeded`] when [`Q::depth`] is greater
    /// than `max_depth`.
    pub fn render_tree(&self, max_depth: usize) -> Result<FilterTree> {
        let depth = self.depth();
        if depth > max_depth {
            return Err(DslError::DepthExceeded {
                depth,
                max: max_depth,
            });
        }
        self.tree_with(false)
    }

    /// [`Q::render_tree`] with the limit taken from `config`.
    pub fn render_tree_with(&self, config: &DslConfig) -> Result<FilterTree> {
        self.render_tree(config.max_filter_depth)
    }

    fn tree_with(&self, inherited: bool) -> Result<FilterTree> {
        let negate = inherited ^ self.negated;
        match &self.node {
            Node::Combinator { op, left, right } => Ok(FilterTree::Group {
                op: if negate { op.dual() } else { *op },
                left: Box::new(left.tree_with(negate)?),
                right: Box::new(right.tree_with(negate)?),
            }),
            Node::Leaf(_) => self.render_leaf(negate).map(FilterTree::Leaf),
        }
    }

    /// Multi-line rendering with one indentation level per combinator.
    ///
    /// Collapsing the whitespace of the output gives back [`Q::render`]
    /// modulo the spaces next to parentheses.
    pub fn prettify(&self) -> Result<String> {
        let mut lines = Vec::new();
        self.walk(|visit| {
            match visit {
                Visit::Enter { level } => lines.push(format!("{}(", pad(level))),
                Visit::Between { op, level } => {
                    let pad = pad(level);
                    lines.push(format!("{pad})"));
                    lines.push(format!("{pad}{op}"));
                    lines.push(format!("{pad}("));
                }
                Visit::Exit { level } => lines.push(format!("{})", pad(level))),
                Visit::Leaf {
                    leaf,
                    negate,
                    level,
                } => lines.push(format!("{}{}", pad(level), leaf.render_leaf(negate)?)),
            }
            Ok(())
        })?;
        Ok(lines.join("\n"))
    }

    /// Describes the expression in plain English.
    ///
    /// ```
    /// use meilisearch_dsl::Q;
    ///
    /// let text = Q::cond("age__gt", 19).or_(Q::cond("name", "Bob")).explain().unwrap();
    /// assert_eq!(
    ///     text,
    ///     "BEGIN\n    field \"age\": is greater than 19\nOR\n    field \"name\": is equal to Bob"
    /// );
    /// ```
    pub fn explain(&self) -> Result<String> {
        let mut lines = Vec::new();
        self.walk(|visit| {
            match visit {
                Visit::Enter { level } => lines.push(format!("{}BEGIN", pad(level))),
                Visit::Between { op, level } => lines.push(format!("{}{op}", pad(level))),
                Visit::Exit { .. } => {}
                Visit::Leaf {
                    leaf,
                    negate,
                    level,
                } => {
                    let pad = pad(level);
                    for cond in leaf.conditions()? {
                        lines.push(format!("{pad}{}", cond.explain(negate)));
                    }
                }
            }
            Ok(())
        })?;
        Ok(lines.join("\n"))
    }
}

fn pad(level: usize) -> String {
    INDENT.repeat(level)
}

/// Structured filter: leaves as strings, combinators as two-element groups.
///
/// Serializes to nested JSON arrays, e.g. `[["a = 1", "b = 2"], "c = 3"]`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterTree {
    Leaf(String),
    Group {
        op: BoolOp,
        left: Box<FilterTree>,
        right: Box<FilterTree>,
    },
}

impl FilterTree {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FilterTree::Leaf(filter) => serde_json::Value::String(filter.clone()),
            FilterTree::Group { left, right, .. } => {
                serde_json::Value::Array(vec![left.to_json(), right.to_json()])
            }
        }
    }
}

impl Serialize for FilterTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FilterTree::Leaf(filter) => serializer.serialize_str(filter),
            FilterTree::Group { left, right, .. } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(left.as_ref())?;
                seq.serialize_element(right.as_ref())?;
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    fn sample() -> Q {
        Q::cond("name", "John")
            .or_(Q::cond("name", "John Simmons"))
            .or_(Q::cond("age__gt", 30).negate())
            .and_(Q::cond("number__gte", 10).and_(Q::cond("number__lte", 20)))
            .or_(Q::cond(
                "category__in",
                vec![Scalar::from("a"), "b c".into(), 1.into()],
            ))
    }

    #[test]
    fn single_condition() {
        assert_eq!(Q::cond("name__neq", "John").render().unwrap(), "name != John");
    }

    #[test]
    fn negated_equals_with_space() {
        let q = Q::cond("name", "John Simmons").negate();
        assert_eq!(q.render().unwrap(), "name != \"John Simmons\"");
    }

    #[test]
    fn not_in_list() {
        let q = Q::cond("category__nin", vec!["a", "b", "c d"]);
        assert_eq!(q.render().unwrap(), "category NOT IN [a,b,\"c d\"]");
    }

    #[test]
    fn leaf_conditions_are_conjoined_in_order() {
        let q = Q::cond("age__gte", 18).with("country", "NL");
        assert_eq!(q.render().unwrap(), "age >= 18 AND country = NL");

        let q = Q::from_pairs([("b", 1), ("a", 2)]);
        assert_eq!(q.render().unwrap(), "b = 1 AND a = 2");
    }

    #[test]
    fn negated_leaf_negates_each_condition() {
        let q = Q::cond("age__gte", 18).with("country", "NL").negate();
        assert_eq!(q.render().unwrap(), "age < 18 AND country != NL");
    }

    #[test]
    fn combinator_is_parenthesized_left_first() {
        let q = Q::cond("a", 1).and_(Q::cond("b", 2));
        assert_eq!(q.render().unwrap(), "(a = 1) AND (b = 2)");

        let q = Q::cond("b", 2).or_(Q::cond("a", 1));
        assert_eq!(q.render().unwrap(), "(b = 2) OR (a = 1)");
    }

    #[test]
    fn end_to_end_chain() {
        assert_eq!(
            sample().render().unwrap(),
            "((((name = John) OR (name = \"John Simmons\")) OR (age <= 30)) AND \
             ((number >= 10) AND (number <= 20))) OR (category IN [a,\"b c\",1])"
        );
    }

    #[test]
    fn composition_leaves_operands_untouched() {
        let a = Q::cond("a", 1);
        let b = Q::cond("b", 2);
        let combined = a.clone().and_(b.clone());
        let negated = a.clone().negate();

        assert_eq!(a.render().unwrap(), "a = 1");
        assert_eq!(b.render().unwrap(), "b = 2");
        assert!(!a.is_negated());
        assert!(negated.is_negated());
        assert_eq!(combined.children(), Some((&a, &b)));
    }

    #[test]
    fn double_negation_is_identity() {
        let q = sample();
        assert_eq!(
            q.clone().negate().negate().render().unwrap(),
            q.render().unwrap()
        );
    }

    #[test]
    fn negated_combinator_applies_de_morgan() {
        let q = Q::cond("a", 1).and_(Q::cond("b__gt", 2)).negate();
        assert_eq!(q.render().unwrap(), "(a != 1) OR (b <= 2)");

        // A child negated on its own cancels with the outer negation
        let q = Q::cond("a", 1).or_(Q::cond("b", 2).negate()).negate();
        assert_eq!(q.render().unwrap(), "(a != 1) AND (b = 2)");
    }

    #[test]
    fn negating_combinator_keeps_children_flags() {
        let q = Q::cond("a", 1).and_(Q::cond("b", 2)).negate();
        let (left, right) = q.children().unwrap();
        assert!(!left.is_negated());
        assert!(!right.is_negated());
        assert!(q.is_negated());
    }

    #[test]
    fn exists_conditions() {
        assert_eq!(Q::exists("poster").render().unwrap(), "poster EXISTS");
        assert_eq!(
            Q::not_exists("poster").render().unwrap(),
            "poster NOT EXISTS"
        );
        assert_eq!(
            Q::exists("poster").negate().render().unwrap(),
            "poster NOT EXISTS"
        );
    }

    #[test]
    fn typed_condition_constructor() {
        let q = Q::condition("author.name", Op::Ne, "Salinger");
        assert_eq!(q.render().unwrap(), "author.name != Salinger");

        let q = Q::condition("genre", Op::In, ["IN", "drama"]);
        assert_eq!(q.render().unwrap(), "genre IN [\"IN\",drama]");
    }

    #[test]
    fn with_on_combinator_adds_right_leaf() {
        let q = Q::cond("a", 1).or_(Q::cond("b", 2)).with("c", 3);
        assert_eq!(q.render().unwrap(), "((a = 1) OR (b = 2)) AND (c = 3)");
    }

    #[test]
    fn booleans_render_lowercase() {
        assert_eq!(Q::cond("active", true).render().unwrap(), "active = true");
    }

    #[test]
    fn invalid_operator_fails_at_render() {
        let q = Q::cond("a", 1).and_(Q::cond("age__around", 30));
        assert!(matches!(
            q.render(),
            Err(DslError::InvalidOperator { ref operator, .. }) if operator == "around"
        ));
    }

    #[test]
    fn membership_without_list_fails_at_render() {
        let q = Q::cond("category__in", "a");
        assert!(matches!(
            q.render(),
            Err(DslError::InvalidValueType { expected: "list", .. })
        ));
    }

    #[test]
    fn empty_leaf() {
        let q = Q::new();
        assert!(q.is_empty());
        assert_eq!(q.render().unwrap(), "");
        assert!(q.conditions().unwrap().is_empty());
    }

    #[test]
    fn empty_operands_are_absorbed() {
        let a = Q::cond("a", 1);
        assert_eq!(Q::new().and_(a.clone()), a);
        assert_eq!(a.clone().or_(Q::new().negate()), a);
        assert_eq!(Q::new().and_(a.clone()).render().unwrap(), "a = 1");

        // Folding from an empty start yields a well-formed filter
        let q = [1, 2].iter().fold(Q::new(), |acc, id| acc.or_(Q::cond("id", *id)));
        assert_eq!(q.render().unwrap(), "(id = 1) OR (id = 2)");
        assert_eq!(q.depth(), 1);
    }

    #[test]
    fn depth_counts_combinator_levels() {
        assert_eq!(Q::cond("a", 1).depth(), 0);
        assert_eq!(Q::cond("a", 1).and_(Q::cond("b", 2)).depth(), 1);
        assert_eq!(sample().depth(), 4);
    }

    #[test]
    fn render_tree_mirrors_combinators() {
        let q = Q::cond("a", 1)
            .or_(Q::cond("b", 2))
            .and_(Q::cond("c", 3));
        let tree = q.render_tree(2).unwrap();
        assert_eq!(
            tree.to_json(),
            serde_json::json!([["a = 1", "b = 2"], "c = 3"])
        );
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            serde_json::json!([["a = 1", "b = 2"], "c = 3"])
        );
        match tree {
            FilterTree::Group { op, .. } => assert_eq!(op, BoolOp::And),
            FilterTree::Leaf(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn render_tree_of_leaf_is_string() {
        let tree = Q::cond("a", 1).render_tree(0).unwrap();
        assert_eq!(tree, FilterTree::Leaf("a = 1".into()));
    }

    #[test]
    fn render_tree_rejects_deep_trees() {
        let q = Q::cond("a", 1)
            .and_(Q::cond("b", 2))
            .or_(Q::cond("c", 3))
            .and_(Q::cond("d", 4));
        assert_eq!(q.depth(), 3);
        assert_eq!(
            q.render_tree(2),
            Err(DslError::DepthExceeded { depth: 3, max: 2 })
        );
        assert!(q.render_tree(3).is_ok());

        assert!(q.render_tree_with(&DslConfig::default()).is_err());
        let relaxed = DslConfig {
            max_filter_depth: 3,
            ..DslConfig::default()
        };
        assert!(q.render_tree_with(&relaxed).is_ok());
    }

    #[test]
    fn render_tree_applies_negation() {
        let q = Q::cond("a", 1).or_(Q::cond("b", 2)).negate();
        let tree = q.render_tree(2).unwrap();
        assert_eq!(tree.to_json(), serde_json::json!(["a != 1", "b != 2"]));
        match tree {
            FilterTree::Group { op, .. } => assert_eq!(op, BoolOp::And),
            FilterTree::Leaf(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn prettify_leaf_is_flat_render() {
        let q = Q::cond("age__gt", 19).with("name", "Bob");
        assert_eq!(q.prettify().unwrap(), q.render().unwrap());
    }

    #[test]
    fn prettify_indents_each_level() {
        let q = Q::cond("a", 1).or_(Q::cond("b", 2)).and_(Q::cond("c", 3));
        let expected = "\
(
    (
        a = 1
    )
    OR
    (
        b = 2
    )
)
AND
(
    c = 3
)";
        assert_eq!(q.prettify().unwrap(), expected);
    }

    #[test]
    fn explain_nested() {
        let q = Q::cond("a", 1).or_(Q::cond("b__in", vec![1, 2])).and_(Q::exists("c"));
        let expected = "\
BEGIN
    BEGIN
        field \"a\": is equal to 1
    OR
        field \"b\": is in [1,2]
AND
    field \"c\": exists";
        assert_eq!(q.explain().unwrap(), expected);
    }

    #[test]
    fn explain_follows_negation() {
        let q = Q::cond("age__gt", 19).negate();
        assert_eq!(
            q.explain().unwrap(),
            "field \"age\": is less than or equal to 19"
        );
    }

    #[test]
    fn derived_views_do_not_mutate() {
        let q = sample();
        let before = q.clone();
        let _ = q.prettify().unwrap();
        let _ = q.explain().unwrap();
        let _ = q.render_tree(10).unwrap();
        assert_eq!(q, before);
    }
}
