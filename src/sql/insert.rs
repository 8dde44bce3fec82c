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
use super::predicate::Predicate;
use super::table::Table;
use super::{ExpressionBuilder, ParameterBinding, SQLBuilder, SQLParamContainer};

/// An insert statement under construction. Rows are supplied as lists of
/// plain-column equalities (`column.equal(value)`); the first row fixes the
/// column list, and every further row must repeat it.
pub struct InsertBuilder<'a> {
    table: &'a Table,
    rows: Vec<Vec<Predicate>>,
    returning: Option<Vec<Column>>,
}

impl<'a> InsertBuilder<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            rows: Vec::new(),
            returning: None,
        }
    }

    pub fn values(mut self, rows: Vec<Vec<Predicate>>) -> Self {
        self.rows = rows;
        self
    }

    /// Request a `RETURNING` clause. An empty column list returns `*`.
    pub fn returning(mut self, columns: Vec<Column>) -> Self {
        self.returning = Some(columns);
        self
    }

    /// Produce the statement of the form `INSERT INTO <table> (<columns>)
    /// VALUES (<row>),(<row>)... RETURNING <returning-columns>`. Placeholders
    /// are numbered row-major, one per value.
    pub fn into_sql(self) -> Result<ParameterBinding, QueryError> {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(Predicate::as_assignment)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let first = match rows.first() {
            Some(first) if !first.is_empty() => first,
            _ => return Err(QueryError::MissingClause("VALUES")),
        };
        let first_shape: Vec<&str> = column_names(first);
        for (index, row) in rows.iter().enumerate().skip(1) {
            let shape = column_names(row);
            if shape != first_shape {
                return Err(QueryError::RowShapeMismatch {
                    row: index,
                    expected: first_shape.join(","),
                    found: shape.join(","),
                });
            }
        }
        if let Some(returning) = &self.returning {
            column::reject_negated(returning, "RETURNING")?;
        }

        let mut builder = SQLBuilder::new();
        builder.push_str("INSERT INTO ");
        self.table.build(&mut builder);

        builder.push_str(" (");
        builder.push_iter(first.iter(), ",", |builder, (column, _)| {
            builder.push_str(column.physical_name());
        });
        builder.push_str(") VALUES (");
        builder.push_iter(rows.iter(), "),(", |builder, row| {
            builder.push_iter(row.iter(), ",", |builder, (_, value)| {
                builder.push_param((*value).clone());
            });
        });
        builder.push(')');

        if let Some(returning) = &self.returning {
            build_returning(returning, &mut builder);
        }

        let binding = builder.into_binding();
        debug!(
            "Built INSERT statement ({} chars, {} params)",
            binding.stmt.len(),
            binding.params.len()
        );
        Ok(binding)
    }
}

fn column_names<'r>(row: &'r [(&Column, &SQLParamContainer)]) -> Vec<&'r str> {
    row.iter().map(|(column, _)| column.physical_name()).collect()
}

/// Render ` RETURNING *` or ` RETURNING <col>,<col>,...`. Shared by the insert
/// and update builders; a delete statement has no returning form.
pub(crate) fn build_returning(returning: &[Column], builder: &mut SQLBuilder) {
    builder.push_str(" RETURNING ");
    if returning.is_empty() {
        builder.push('*');
    } else {
        builder.push_iter(returning.iter(), ",", |builder, column| {
            column.build_returning(builder);
        });
    }
}
