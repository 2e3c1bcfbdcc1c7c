//! Condition trees and the merge algebra that folds a `where` clause.
//!
//! The grammar has no grouping parentheses. Comparisons are folded in source
//! order by [`merge`]:
//!
//! - consecutive comparisons joined by the same connective flatten into one
//!   n-ary group (`a and b and c` is `AND[a, b, c]`);
//! - a connective switch nests only the most recent term
//!   (`a and b or c` is `AND[a, OR[b, c]]`);
//! - a later switch back appends to the outer group again
//!   (`a and b or c and d` is `AND[a, OR[b, c], d]`).

use std::fmt;

use crate::{
    ast::{CompareOp, Connective},
    error::QueryError,
    value::Value,
};

/// Condition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Like,
    Between,
    And,
    Or,
    Not,
}

impl Operator {
    /// `And` and `Or`: operators whose value is an n-ary list of conditions.
    pub fn is_connective(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::In => "IN",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CompareOp> for Operator {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => Operator::Eq,
            CompareOp::Gt => Operator::Gt,
            CompareOp::Gte => Operator::Gte,
            CompareOp::Lt => Operator::Lt,
            CompareOp::Lte => Operator::Lte,
            CompareOp::Between => Operator::Between,
            CompareOp::In => Operator::In,
            CompareOp::Like => Operator::Like,
        }
    }
}

impl From<Connective> for Operator {
    fn from(c: Connective) -> Self {
        match c {
            Connective::And => Operator::And,
            Connective::Or => Operator::Or,
        }
    }
}

/// Payload of a [`Condition`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// Compared value of a leaf condition
    Value(Value),
    /// Children of an `AND`, `OR` or `NOT` node
    Conditions(Vec<Condition>),
}

/// Immutable condition tree node.
///
/// Invariants, enforced by the constructors:
/// - `AND`/`OR` hold a non-empty list of conditions;
/// - `NOT` holds exactly one condition;
/// - `BETWEEN` holds an array of exactly two comparable values;
/// - `IN` holds a non-empty array.
///
/// Placeholders ([`Value::Param`]) are accepted in place of values and
/// checked again once substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    name: String,
    operator: Operator,
    value: ConditionValue,
}

impl Condition {
    /// Builds a leaf comparison, checking the `BETWEEN`/`IN` cardinality.
    pub fn compare(
        name: impl Into<String>,
        operator: Operator,
        value: Value,
    ) -> Result<Self, QueryError> {
        let name = name.into();
        match operator {
            Operator::Between => check_between(&name, &value)?,
            Operator::In => check_in(&name, &value)?,
            Operator::And | Operator::Or | Operator::Not => {
                return Err(QueryError::InvalidValue(format!(
                    "{operator} is not a comparison operator"
                )));
            }
            _ => {}
        }
        Ok(Condition {
            name,
            operator,
            value: ConditionValue::Value(value),
        })
    }

    pub fn eq(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(name, Operator::Eq, value.into())
    }

    pub fn gt(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(name, Operator::Gt, value.into())
    }

    pub fn gte(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(name, Operator::Gte, value.into())
    }

    pub fn lt(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(name, Operator::Lt, value.into())
    }

    pub fn lte(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(name, Operator::Lte, value.into())
    }

    pub fn like(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(name, Operator::Like, value.into())
    }

    pub fn between(name: impl Into<String>, value: impl Into<Value>) -> Result<Self, QueryError> {
        Self::compare(name, Operator::Between, value.into())
    }

    pub fn in_(name: impl Into<String>, value: impl Into<Value>) -> Result<Self, QueryError> {
        Self::compare(name, Operator::In, value.into())
    }

    fn leaf(name: impl Into<String>, operator: Operator, value: Value) -> Self {
        Condition {
            name: name.into(),
            operator,
            value: ConditionValue::Value(value),
        }
    }

    pub fn and(conditions: Vec<Condition>) -> Result<Self, QueryError> {
        Self::non_empty_group(Connective::And, conditions)
    }

    pub fn or(conditions: Vec<Condition>) -> Result<Self, QueryError> {
        Self::non_empty_group(Connective::Or, conditions)
    }

    pub fn not(condition: Condition) -> Self {
        Condition {
            name: "_NOT".to_string(),
            operator: Operator::Not,
            value: ConditionValue::Conditions(vec![condition]),
        }
    }

    fn non_empty_group(connective: Connective, conditions: Vec<Condition>) -> Result<Self, QueryError> {
        if conditions.is_empty() {
            return Err(QueryError::Cardinality(format!(
                "{} requires at least one condition",
                Operator::from(connective)
            )));
        }
        Ok(group(connective, conditions))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    /// The compared value of a leaf; `None` for groups.
    pub fn as_value(&self) -> Option<&Value> {
        match &self.value {
            ConditionValue::Value(v) => Some(v),
            ConditionValue::Conditions(_) => None,
        }
    }

    /// The children of an `AND`/`OR`/`NOT` node; `None` for leaves.
    pub fn conditions(&self) -> Option<&[Condition]> {
        match &self.value {
            ConditionValue::Conditions(c) => Some(c),
            ConditionValue::Value(_) => None,
        }
    }

    /// Whether a placeholder remains anywhere in the tree.
    pub fn has_params(&self) -> bool {
        match &self.value {
            ConditionValue::Value(v) => v.has_params(),
            ConditionValue::Conditions(c) => c.iter().any(Condition::has_params),
        }
    }

    /// Rebuilds the tree with every leaf value passed through `f`.
    ///
    /// Leaves are re-validated, so a substituted parameter that breaks the
    /// `BETWEEN`/`IN` invariants fails here.
    pub fn try_map_values<F>(&self, f: &mut F) -> Result<Condition, QueryError>
    where
        F: FnMut(&Value) -> Result<Value, QueryError>,
    {
        match &self.value {
            ConditionValue::Value(v) => Condition::compare(self.name.clone(), self.operator, f(v)?),
            ConditionValue::Conditions(children) => {
                let children = children
                    .iter()
                    .map(|c| c.try_map_values(f))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Condition {
                    name: self.name.clone(),
                    operator: self.operator,
                    value: ConditionValue::Conditions(children),
                })
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ConditionValue::Value(v) => write!(f, "{} {} {}", self.name, self.operator, v),
            ConditionValue::Conditions(children) => {
                write!(f, "{}(", self.operator)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn check_between(name: &str, value: &Value) -> Result<(), QueryError> {
    match value {
        Value::Param(_) => Ok(()),
        Value::Array(items) if items.len() == 2 => {
            for item in items {
                if !(item.is_scalar() || matches!(item, Value::Param(_))) {
                    return Err(QueryError::InvalidValue(format!(
                        "between bounds of '{name}' must be comparable, got {}",
                        item.type_name()
                    )));
                }
            }
            Ok(())
        }
        Value::Array(items) => Err(QueryError::Cardinality(format!(
            "between on '{name}' requires exactly two values, got {}",
            items.len()
        ))),
        other => Err(QueryError::Cardinality(format!(
            "between on '{name}' requires exactly two values, got a single {}",
            other.type_name()
        ))),
    }
}

fn check_in(name: &str, value: &Value) -> Result<(), QueryError> {
    match value {
        Value::Param(_) => Ok(()),
        Value::Array(items) if items.is_empty() => Err(QueryError::Cardinality(format!(
            "in on '{name}' requires a non-empty collection"
        ))),
        Value::Array(_) => Ok(()),
        other => Err(QueryError::Cardinality(format!(
            "in on '{name}' requires a collection, got {}",
            other.type_name()
        ))),
    }
}

fn group(connective: Connective, conditions: Vec<Condition>) -> Condition {
    let operator = Operator::from(connective);
    Condition {
        name: format!("_{operator}"),
        operator,
        value: ConditionValue::Conditions(conditions),
    }
}

/// Folds one more leaf into the accumulated condition.
///
/// `connective` is the `and`/`or` written before `leaf`.
pub fn merge(pending: Option<Condition>, connective: Connective, leaf: Condition) -> Condition {
    let op = Operator::from(connective);
    let Some(pending) = pending else {
        return leaf;
    };

    match pending {
        // same connective: widen the list
        Condition {
            name,
            operator,
            value: ConditionValue::Conditions(mut items),
        } if operator == op => {
            items.push(leaf);
            Condition {
                name,
                operator,
                value: ConditionValue::Conditions(items),
            }
        }
        // pending is a leaf or NOT
        single if !single.operator.is_connective() => group(connective, vec![single, leaf]),
        // pending is a group of the other connective: nest the last term
        Condition {
            name,
            operator,
            value: ConditionValue::Conditions(mut items),
        } => {
            let nested = match items.pop() {
                Some(Condition {
                    name: last_name,
                    operator: last_op,
                    value: ConditionValue::Conditions(mut inner),
                }) if last_op == op => {
                    inner.push(leaf);
                    Condition {
                        name: last_name,
                        operator: last_op,
                        value: ConditionValue::Conditions(inner),
                    }
                }
                Some(last) => group(connective, vec![last, leaf]),
                None => leaf,
            };
            items.push(nested);
            Condition {
                name,
                operator,
                value: ConditionValue::Conditions(items),
            }
        }
        other => group(connective, vec![other, leaf]),
    }
}

/// A comparison ready to be folded: the connective written before it, the
/// condition itself, and whether `not` preceded it.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub connective: Option<Connective>,
    pub condition: Condition,
    pub negated: bool,
}

/// Folds the comparisons of a `where` clause, in source order.
///
/// The connective defaults to `and` until one is seen. Returns `None` for an
/// empty input.
pub fn fold_where<I>(leaves: I) -> Option<Condition>
where
    I: IntoIterator<Item = Leaf>,
{
    let mut connective = Connective::And;
    leaves.into_iter().fold(None, |pending, leaf| {
        if let Some(seen) = leaf.connective {
            connective = seen;
        }
        let condition = if leaf.negated {
            Condition::not(leaf.condition)
        } else {
            leaf.condition
        };
        Some(merge(pending, connective, condition))
    })
}
