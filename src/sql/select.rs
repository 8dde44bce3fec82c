// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::debug;

use crate::error::QueryError;

use super::column::{self, Column};
use super::group_by::GroupBy;
use super::limit::Limit;
use super::offset::Offset;
use super::order::{OrderBy, OrderByElement};
use super::predicate::Predicate;
use super::table::Table;
use super::{ExpressionBuilder, ParameterBinding, SQLBuilder};

/// A select statement under construction.
///
/// Clause methods may be chained in any order; the emitted statement always
/// follows the SQL clause order `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING ...
/// ORDER BY ... LIMIT ... OFFSET`. Calling a clause method again replaces the
/// previously supplied fragment.
pub struct SelectBuilder<'a> {
    table: &'a Table,
    columns: Vec<Column>,
    from: bool,
    predicate: Option<Predicate>,
    group_by: Option<GroupBy>,
    having: Option<Predicate>,
    order_by: Option<OrderBy>,
    limit: Option<Limit>,
    offset: Option<Offset>,
}

impl<'a> SelectBuilder<'a> {
    pub(crate) fn new(table: &'a Table, columns: Vec<Column>) -> Self {
        Self {
            table,
            columns,
            from: false,
            predicate: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    /// Attach the statement to its table. Required before `into_sql`.
    pub fn from(mut self) -> Self {
        self.from = true;
        self
    }

    pub fn r#where(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Alias for [`r#where`](Self::r#where), for callers who prefer to avoid
    /// the raw identifier.
    pub fn where_(self, predicate: Predicate) -> Self {
        self.r#where(predicate)
    }

    pub fn group_by(mut self, columns: Vec<Column>) -> Self {
        self.group_by = Some(GroupBy(columns));
        self
    }

    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn order_by(mut self, elements: Vec<OrderByElement>) -> Self {
        self.order_by = Some(OrderBy(elements));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(Limit(limit));
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(Offset(offset));
        self
    }

    /// Produce the statement of the form `SELECT <columns> FROM <table> WHERE
    /// <predicate> ...`, projecting `*` when no columns were supplied. Fails if
    /// `from()` was never called, a supplied predicate cannot be rendered, or
    /// a `group_by`/`order_by` call carried an empty list.
    pub fn into_sql(self) -> Result<ParameterBinding, QueryError> {
        if !self.from {
            return Err(QueryError::MissingClause("FROM"));
        }
        column::reject_negated(&self.columns, "projection")?;
        if let Some(predicate) = &self.predicate {
            predicate.validate()?;
        }
        if let Some(GroupBy(columns)) = &self.group_by {
            if columns.is_empty() {
                return Err(QueryError::EmptyValueList("GROUP BY"));
            }
            column::reject_negated(columns, "GROUP BY")?;
        }
        if let Some(having) = &self.having {
            having.validate()?;
        }
        if let Some(OrderBy(elements)) = &self.order_by {
            if elements.is_empty() {
                return Err(QueryError::EmptyValueList("ORDER BY"));
            }
            column::reject_negated(elements.iter().map(|element| &element.0), "ORDER BY")?;
        }

        let mut builder = SQLBuilder::new();
        builder.push_str("SELECT ");
        if self.columns.is_empty() {
            builder.push('*');
        } else {
            builder.push_iter(self.columns.iter(), ",", |builder, column| {
                column.build_projection(builder);
            });
        }

        builder.push_str(" FROM ");
        self.table.build(&mut builder);

        if let Some(predicate) = &self.predicate {
            builder.push_str(" WHERE ");
            predicate.build(&mut builder);
        }
        if let Some(group_by) = &self.group_by {
            builder.push_space();
            group_by.build(&mut builder);
        }
        if let Some(having) = &self.having {
            builder.push_str(" HAVING ");
            having.build(&mut builder);
        }
        if let Some(order_by) = &self.order_by {
            builder.push_space();
            order_by.build(&mut builder);
        }
        if let Some(limit) = &self.limit {
            builder.push_space();
            limit.build(&mut builder);
        }
        if let Some(offset) = &self.offset {
            builder.push_space();
            offset.build(&mut builder);
        }

        let binding = builder.into_binding();
        debug!(
            "Built SELECT statement ({} chars, {} params)",
            binding.stmt.len(),
            binding.params.len()
        );
        Ok(binding)
    }
}
