// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::error::QueryError;

use super::column::Column;
use super::{ExpressionBuilder, ParameterBinding, SQLBuilder, SQLParamContainer};

/// Case sensitivity for string predicates.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

/// The set-membership operators.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SetOp {
    In,
    Any,
    All,
}

impl SetOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOp::In => "IN",
            SetOp::Any => "ANY",
            SetOp::All => "ALL",
        }
    }
}

/// The right-hand side of a set comparison: either a list of literal values or
/// an independently terminated statement to be spliced in.
#[derive(Debug, Clone, PartialEq)]
pub enum SetOperand {
    Values(Vec<SQLParamContainer>),
    Subquery(ParameterBinding),
}

impl SetOperand {
    pub(crate) fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SQLParamContainer>,
    {
        SetOperand::Values(values.into_iter().map(Into::into).collect())
    }
}

/// A predicate is a boolean expression that can be used in a WHERE or HAVING
/// clause: a binary tree of comparison leaves joined by AND/OR combinators.
///
/// Serialization is strictly in-order and unparenthesized; a chain renders
/// exactly as composed, e.g. `a=$1 AND b=$2 OR c=$3`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Column, SQLParamContainer),
    Neq(Column, SQLParamContainer),
    Lt(Column, SQLParamContainer),
    Lte(Column, SQLParamContainer),
    Gt(Column, SQLParamContainer),
    Gte(Column, SQLParamContainer),
    Match(Column, CaseSensitivity, SQLParamContainer),
    Between(Column, SQLParamContainer, SQLParamContainer),
    Null {
        column: Column,
        negated: bool,
    },
    SetCompare {
        column: Column,
        op: SetOp,
        negated: bool,
        operand: SetOperand,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Logical and of two predicates, serialized in composition order.
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Logical or of two predicates, serialized in composition order.
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Split a plain-column equality into its column/value pair, the only
    /// predicate shape usable as an insert/update assignment. An aggregated or
    /// negated column, or any non-equality predicate, is rejected.
    pub(crate) fn as_assignment(&self) -> Result<(&Column, &SQLParamContainer), QueryError> {
        match self {
            Predicate::Eq(column, value) => {
                if column.aggregate.is_some() {
                    Err(QueryError::InvalidAssignment(format!(
                        "aggregate applied to column '{}'",
                        column.physical_name()
                    )))
                } else if column.negated {
                    Err(QueryError::InvalidAssignment(format!(
                        "negated column '{}'",
                        column.physical_name()
                    )))
                } else {
                    Ok((column, value))
                }
            }
            _ => Err(QueryError::InvalidAssignment(
                "only plain column = value pairs can be assigned".to_owned(),
            )),
        }
    }

    /// Check the tree for compositions that cannot be rendered: a negation
    /// mark on an operator without a negated SQL form, or a set comparison
    /// against an empty value list. Run by the statement builders before any
    /// SQL is produced, so a failing statement yields an error rather than
    /// malformed SQL.
    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        match self {
            Predicate::Eq(column, _) => reject_negated(column, "="),
            Predicate::Neq(column, _) => reject_negated(column, "<>"),
            Predicate::Lt(column, _) => reject_negated(column, "<"),
            Predicate::Lte(column, _) => reject_negated(column, "<="),
            Predicate::Gt(column, _) => reject_negated(column, ">"),
            Predicate::Gte(column, _) => reject_negated(column, ">="),
            Predicate::Match(column, case_sensitivity, _) => {
                let op = match case_sensitivity {
                    CaseSensitivity::Sensitive => "~",
                    CaseSensitivity::Insensitive => "~*",
                };
                reject_negated(column, op)
            }
            Predicate::Between(column, _, _) => reject_negated(column, "BETWEEN"),
            Predicate::Null { .. } => Ok(()),
            Predicate::SetCompare { op, operand, .. } => match operand {
                SetOperand::Values(values) if values.is_empty() => {
                    Err(QueryError::EmptyValueList(op.as_str()))
                }
                _ => Ok(()),
            },
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.validate()?;
                right.validate()
            }
        }
    }
}

impl ExpressionBuilder for Predicate {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            Predicate::Eq(column, value) => relational_combine(column, "=", value, builder),
            Predicate::Neq(column, value) => relational_combine(column, "<>", value, builder),
            Predicate::Lt(column, value) => relational_combine(column, "<", value, builder),
            Predicate::Lte(column, value) => relational_combine(column, "<=", value, builder),
            Predicate::Gt(column, value) => relational_combine(column, ">", value, builder),
            Predicate::Gte(column, value) => relational_combine(column, ">=", value, builder),
            Predicate::Match(column, case_sensitivity, pattern) => {
                let op = match case_sensitivity {
                    CaseSensitivity::Sensitive => "~",
                    CaseSensitivity::Insensitive => "~*",
                };
                relational_combine(column, op, pattern, builder)
            }
            Predicate::Between(column, low, high) => {
                column.build(builder);
                builder.push_str(" BETWEEN ");
                builder.push_param(low.clone());
                builder.push_str(" AND ");
                builder.push_param(high.clone());
            }
            Predicate::Null { column, negated } => {
                column.build(builder);
                builder.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Predicate::SetCompare {
                column,
                op,
                negated,
                operand,
            } => {
                column.build(builder);
                builder.push_space();
                if *negated {
                    builder.push_str("NOT ");
                }
                builder.push_str(op.as_str());
                builder.push('(');
                match operand {
                    SetOperand::Values(values) => {
                        builder.push_iter(values.iter(), ",", |builder, value| {
                            builder.push_param(value.clone());
                        });
                    }
                    SetOperand::Subquery(subquery) => builder.push_binding(subquery),
                }
                builder.push(')');
            }
            Predicate::And(left, right) => logical_combine(left, "AND", right, builder),
            Predicate::Or(left, right) => logical_combine(left, "OR", right, builder),
        }
    }
}

fn reject_negated(column: &Column, op: &str) -> Result<(), QueryError> {
    if column.negated {
        Err(QueryError::InvalidNegation(format!(
            "operator {op} has no negated form (column '{}')",
            column.physical_name()
        )))
    } else {
        Ok(())
    }
}

/// Render `<column><op>$n`, with no spaces around the operator.
fn relational_combine(
    column: &Column,
    op: &str,
    value: &SQLParamContainer,
    builder: &mut SQLBuilder,
) {
    column.build(builder);
    builder.push_str(op);
    builder.push_param(value.clone());
}

/// Render `<left> <op> <right>`.
fn logical_combine(left: &Predicate, op: &str, right: &Predicate, builder: &mut SQLBuilder) {
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
}
