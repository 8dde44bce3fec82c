// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{self, Display};
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

use super::order::{OrderByElement, Ordering};
use super::predicate::{CaseSensitivity, Predicate, SetOp, SetOperand};
use super::{ExpressionBuilder, ParameterBinding, SQLBuilder, SQLParamContainer};

/// One attribute of a [`Table`](super::table::Table): the physical (database)
/// column name along with the logical (application-facing) name it is exposed
/// under, plus per-expression tags such as a type cast, an aggregate wrapper,
/// or a pending negation.
///
/// Columns are immutable descriptors. Every operator method takes `&self` and
/// returns either a fresh [`Predicate`] or a modified copy of the column, so a
/// descriptor obtained from a table can participate in any number of
/// statements, built concurrently or not, without interference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub(crate) table_schema: String,
    pub(crate) table_name: String,
    pub(crate) physical_name: String,
    pub(crate) logical_name: String,
    pub(crate) alias: String,
    pub(crate) cast: Option<CastType>,
    pub(crate) aggregate: Option<Aggregate>,
    pub(crate) negated: bool,
}

impl Column {
    pub(crate) fn new(
        table_schema: &str,
        table_name: &str,
        physical_name: &str,
        logical_name: &str,
    ) -> Self {
        Self {
            table_schema: table_schema.to_owned(),
            table_name: table_name.to_owned(),
            physical_name: physical_name.to_owned(),
            logical_name: logical_name.to_owned(),
            alias: logical_name.to_owned(),
            cast: None,
            aggregate: None,
            negated: false,
        }
    }

    pub fn physical_name(&self) -> &str {
        &self.physical_name
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn equal<V: Into<SQLParamContainer>>(&self, value: V) -> Predicate {
        Predicate::Eq(self.clone(), value.into())
    }

    pub fn unequal<V: Into<SQLParamContainer>>(&self, value: V) -> Predicate {
        Predicate::Neq(self.clone(), value.into())
    }

    pub fn lt<V: Into<SQLParamContainer>>(&self, value: V) -> Predicate {
        Predicate::Lt(self.clone(), value.into())
    }

    pub fn lte<V: Into<SQLParamContainer>>(&self, value: V) -> Predicate {
        Predicate::Lte(self.clone(), value.into())
    }

    pub fn gt<V: Into<SQLParamContainer>>(&self, value: V) -> Predicate {
        Predicate::Gt(self.clone(), value.into())
    }

    pub fn gte<V: Into<SQLParamContainer>>(&self, value: V) -> Predicate {
        Predicate::Gte(self.clone(), value.into())
    }

    /// Case-sensitive regex match (the `~` operator).
    pub fn matches<V: Into<SQLParamContainer>>(&self, pattern: V) -> Predicate {
        Predicate::Match(self.clone(), CaseSensitivity::Sensitive, pattern.into())
    }

    /// Case-insensitive regex match (the `~*` operator).
    pub fn imatches<V: Into<SQLParamContainer>>(&self, pattern: V) -> Predicate {
        Predicate::Match(self.clone(), CaseSensitivity::Insensitive, pattern.into())
    }

    pub fn between<A, B>(&self, low: A, high: B) -> Predicate
    where
        A: Into<SQLParamContainer>,
        B: Into<SQLParamContainer>,
    {
        Predicate::Between(self.clone(), low.into(), high.into())
    }

    /// Membership in a list of literal values: ` IN($a,$b,...)`, one placeholder
    /// per value. A preceding [`not`](Self::not) turns this into ` NOT IN(...)`.
    pub fn in_values<I, V>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<SQLParamContainer>,
    {
        self.set_compare(SetOp::In, SetOperand::values(values))
    }

    /// Membership in the result of an independently terminated statement. The
    /// subquery's placeholders are renumbered into the outer statement when the
    /// outer statement is finalized.
    pub fn in_subquery(&self, subquery: ParameterBinding) -> Predicate {
        self.set_compare(SetOp::In, SetOperand::Subquery(subquery))
    }

    pub fn any_values<I, V>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<SQLParamContainer>,
    {
        self.set_compare(SetOp::Any, SetOperand::values(values))
    }

    pub fn any_subquery(&self, subquery: ParameterBinding) -> Predicate {
        self.set_compare(SetOp::Any, SetOperand::Subquery(subquery))
    }

    pub fn all_values<I, V>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<SQLParamContainer>,
    {
        self.set_compare(SetOp::All, SetOperand::values(values))
    }

    pub fn all_subquery(&self, subquery: ParameterBinding) -> Predicate {
        self.set_compare(SetOp::All, SetOperand::Subquery(subquery))
    }

    fn set_compare(&self, op: SetOp, operand: SetOperand) -> Predicate {
        Predicate::SetCompare {
            column: self.unnegated(),
            op,
            negated: self.negated,
            operand,
        }
    }

    /// Start an `IS` test: `col.is().null()` renders ` IS NULL`, and either
    /// `col.not().is().null()` or `col.is().not().null()` renders
    /// ` IS NOT NULL`.
    pub fn is(&self) -> IsClause {
        IsClause {
            column: self.unnegated(),
            negated: self.negated,
        }
    }

    /// Mark the column negated. Only the operators with a negated SQL form
    /// honor the mark (`NOT IN`/`NOT ANY`/`NOT ALL`, `IS NOT NULL`); combining
    /// it with any other operator is rejected when the statement is finalized.
    pub fn not(&self) -> Column {
        Column {
            negated: true,
            ..self.clone()
        }
    }

    /// Tag the column with a `::cast` suffix for every rendered reference.
    pub fn cast(&self, cast: CastType) -> Column {
        Column {
            cast: Some(cast),
            ..self.clone()
        }
    }

    /// Replace the output alias (the `as "alias"` clause of projection and
    /// RETURNING lists). The alias defaults to the logical name; a repeated
    /// call replaces the previous alias rather than appending.
    pub fn alias<S: Into<String>>(&self, alias: S) -> Column {
        Column {
            alias: alias.into(),
            ..self.clone()
        }
    }

    pub fn asc(&self) -> OrderByElement {
        OrderByElement(self.clone(), Ordering::Asc)
    }

    pub fn desc(&self) -> OrderByElement {
        OrderByElement(self.clone(), Ordering::Desc)
    }

    pub fn avg(&self) -> Column {
        self.aggregate(Aggregate::Avg)
    }

    pub fn sum(&self) -> Column {
        self.aggregate(Aggregate::Sum)
    }

    pub fn min(&self) -> Column {
        self.aggregate(Aggregate::Min)
    }

    pub fn max(&self) -> Column {
        self.aggregate(Aggregate::Max)
    }

    pub fn count(&self) -> Column {
        self.aggregate(Aggregate::Count)
    }

    fn aggregate(&self, aggregate: Aggregate) -> Column {
        Column {
            aggregate: Some(aggregate),
            ..self.clone()
        }
    }

    /// Copy with the negation mark cleared, for operators that consume it.
    fn unnegated(&self) -> Column {
        Column {
            negated: false,
            ..self.clone()
        }
    }

    /// Render for a projection list: the qualified reference followed by the
    /// output alias, e.g. `public."user"."age"::bigint as "age"`.
    pub(crate) fn build_projection(&self, builder: &mut SQLBuilder) {
        self.build(builder);
        builder.push_str(" as ");
        builder.push_identifier(&self.alias);
    }

    /// Render for a RETURNING list: the bare physical name, aliased only when
    /// the alias differs from it.
    pub(crate) fn build_returning(&self, builder: &mut SQLBuilder) {
        builder.push_identifier(&self.physical_name);
        if self.alias != self.physical_name {
            builder.push_str(" as ");
            builder.push_identifier(&self.alias);
        }
    }
}

impl ExpressionBuilder for Column {
    /// Build the column into a fully qualified reference of the form
    /// `schema."table"."column"`, wrapped in the aggregate function and
    /// suffixed with the cast when those tags are present.
    fn build(&self, builder: &mut SQLBuilder) {
        if let Some(aggregate) = &self.aggregate {
            builder.push_str(aggregate.as_str());
            builder.push('(');
        }
        builder.push_str(&self.table_schema);
        builder.push('.');
        builder.push_identifier(&self.table_name);
        builder.push('.');
        builder.push_identifier(&self.physical_name);
        if let Some(cast) = &self.cast {
            builder.push_str("::");
            builder.push_str(cast.to_string());
        }
        if self.aggregate.is_some() {
            builder.push(')');
        }
    }
}

/// Reject a pending negation mark in a bare column list (projection,
/// GROUP BY, ORDER BY, RETURNING); only predicate operators with a negated
/// SQL form can consume the mark.
pub(crate) fn reject_negated<'a, I>(columns: I, context: &'static str) -> Result<(), QueryError>
where
    I: IntoIterator<Item = &'a Column>,
{
    for column in columns {
        if column.negated {
            return Err(QueryError::InvalidNegation(format!(
                "a {context} list has no negated form (column '{}')",
                column.physical_name()
            )));
        }
    }
    Ok(())
}

/// The intermediate state of an `IS` test; terminated by
/// [`null`](IsClause::null).
#[derive(Debug, Clone)]
pub struct IsClause {
    column: Column,
    negated: bool,
}

impl IsClause {
    pub fn not(self) -> IsClause {
        IsClause {
            negated: true,
            ..self
        }
    }

    pub fn null(self) -> Predicate {
        Predicate::Null {
            column: self.column,
            negated: self.negated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregate {
    Avg,
    Sum,
    Min,
    Max,
    Count,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Avg => "AVG",
            Aggregate::Sum => "SUM",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Count => "COUNT",
        }
    }
}

/// A PostgreSQL type tag usable as a `::cast` suffix on column references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastType {
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    Numeric {
        precision: Option<usize>,
        scale: Option<usize>,
    },
    Text,
    Varchar {
        max_length: Option<usize>,
    },
    Char {
        length: Option<usize>,
    },
    Boolean,
    Date,
    Time {
        precision: Option<usize>,
    },
    Timestamp {
        timezone: bool,
        precision: Option<usize>,
    },
    Uuid,
    Jsonb,
    Bytea,
}

impl Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastType::SmallInt => write!(f, "smallint"),
            CastType::Integer => write!(f, "integer"),
            CastType::BigInt => write!(f, "bigint"),
            CastType::Real => write!(f, "real"),
            CastType::DoublePrecision => write!(f, "double precision"),
            CastType::Numeric { precision, scale } => match (precision, scale) {
                (Some(precision), Some(scale)) => write!(f, "numeric({precision},{scale})"),
                (Some(precision), None) => write!(f, "numeric({precision})"),
                _ => write!(f, "numeric"),
            },
            CastType::Text => write!(f, "text"),
            CastType::Varchar { max_length } => match max_length {
                Some(max_length) => write!(f, "varchar({max_length})"),
                None => write!(f, "varchar"),
            },
            CastType::Char { length } => match length {
                Some(length) => write!(f, "char({length})"),
                None => write!(f, "char"),
            },
            CastType::Boolean => write!(f, "boolean"),
            CastType::Date => write!(f, "date"),
            CastType::Time { precision } => match precision {
                Some(precision) => write!(f, "time({precision})"),
                None => write!(f, "time"),
            },
            CastType::Timestamp {
                timezone,
                precision,
            } => {
                let name = if *timezone { "timestamptz" } else { "timestamp" };
                match precision {
                    Some(precision) => write!(f, "{name}({precision})"),
                    None => write!(f, "{name}"),
                }
            }
            CastType::Uuid => write!(f, "uuid"),
            CastType::Jsonb => write!(f, "jsonb"),
            CastType::Bytea => write!(f, "bytea"),
        }
    }
}

impl FromStr for CastType {
    type Err = QueryError;

    /// Parse a SQL type spelling, case-insensitively and with parenthesized
    /// arguments where the type takes them (`NUMERIC(10,2)`, `varchar(255)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_uppercase();

        // parse types with arguments
        let get_num = |s: &str| {
            s.chars()
                .filter(|c| c.is_numeric())
                .collect::<String>()
                .parse::<usize>()
                .ok()
        };

        match s.as_str() {
            "SMALLINT" | "INT2" => Ok(CastType::SmallInt),
            "INT" | "INTEGER" | "INT4" => Ok(CastType::Integer),
            "BIGINT" | "INT8" => Ok(CastType::BigInt),
            "REAL" | "FLOAT4" => Ok(CastType::Real),
            "DOUBLE PRECISION" | "FLOAT8" => Ok(CastType::DoublePrecision),
            "TEXT" => Ok(CastType::Text),
            "BOOLEAN" | "BOOL" => Ok(CastType::Boolean),
            "DATE" => Ok(CastType::Date),
            "UUID" => Ok(CastType::Uuid),
            "JSONB" => Ok(CastType::Jsonb),
            "BYTEA" => Ok(CastType::Bytea),
            "NUMERIC" | "DECIMAL" => Ok(CastType::Numeric {
                precision: None,
                scale: None,
            }),
            s => {
                if s.starts_with("CHARACTER VARYING") || s.starts_with("VARCHAR") {
                    Ok(CastType::Varchar {
                        max_length: get_num(s),
                    })
                } else if s.starts_with("CHAR") {
                    Ok(CastType::Char { length: get_num(s) })
                } else if s.starts_with("TIMESTAMPTZ") {
                    Ok(CastType::Timestamp {
                        timezone: true,
                        precision: get_num(s),
                    })
                } else if s.starts_with("TIMESTAMP") {
                    Ok(CastType::Timestamp {
                        timezone: s.contains("WITH TIME ZONE"),
                        precision: get_num(s),
                    })
                } else if s.starts_with("TIME") {
                    Ok(CastType::Time {
                        precision: get_num(s),
                    })
                } else if s.starts_with("NUMERIC") || s.starts_with("DECIMAL") {
                    let regex = Regex::new("(NUMERIC|DECIMAL)\\((?P<precision>\\d+),?(?P<scale>\\d+)?\\)")
                        .map_err(|_| QueryError::Config("Invalid numeric cast pattern".into()))?;
                    let captures = regex
                        .captures(s)
                        .ok_or_else(|| QueryError::Config(format!("Invalid numeric cast {s}")))?;

                    let precision = captures
                        .name("precision")
                        .and_then(|m| m.as_str().parse::<usize>().ok());
                    let scale = captures
                        .name("scale")
                        .and_then(|m| m.as_str().parse::<usize>().ok());

                    Ok(CastType::Numeric { precision, scale })
                } else {
                    Err(QueryError::Config(format!("Unknown cast type {s}")))
                }
            }
        }
    }
}
