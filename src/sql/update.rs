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
use super::insert::build_returning;
use super::predicate::Predicate;
use super::table::Table;
use super::{ExpressionBuilder, ParameterBinding, SQLBuilder};

/// An update statement under construction. Assignments are supplied as
/// plain-column equalities, the same shape an insert row takes.
pub struct UpdateBuilder<'a> {
    table: &'a Table,
    assignments: Vec<Predicate>,
    predicate: Option<Predicate>,
    returning: Option<Vec<Column>>,
}

impl<'a> UpdateBuilder<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            predicate: None,
            returning: None,
        }
    }

    pub fn set(mut self, assignments: Vec<Predicate>) -> Self {
        self.assignments = assignments;
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

    /// Request a `RETURNING` clause. An empty column list returns `*`.
    pub fn returning(mut self, columns: Vec<Column>) -> Self {
        self.returning = Some(columns);
        self
    }

    /// Produce the statement of the form `UPDATE <table> SET <column=$n,...>
    /// WHERE <predicate> RETURNING <returning-columns>`, the `WHERE` and
    /// `RETURNING` clauses present only when supplied.
    pub fn into_sql(self) -> Result<ParameterBinding, QueryError> {
        let assignments = self
            .assignments
            .iter()
            .map(Predicate::as_assignment)
            .collect::<Result<Vec<_>, _>>()?;
        if assignments.is_empty() {
            return Err(QueryError::MissingClause("SET"));
        }
        if let Some(predicate) = &self.predicate {
            predicate.validate()?;
        }
        if let Some(returning) = &self.returning {
            column::reject_negated(returning, "RETURNING")?;
        }

        let mut builder = SQLBuilder::new();
        builder.push_str("UPDATE ");
        self.table.build(&mut builder);

        builder.push_str(" SET ");
        builder.push_iter(assignments.iter(), ",", |builder, (column, value)| {
            builder.push_str(column.physical_name());
            builder.push('=');
            builder.push_param((*value).clone());
        });

        if let Some(predicate) = &self.predicate {
            builder.push_str(" WHERE ");
            predicate.build(&mut builder);
        }
        if let Some(returning) = &self.returning {
            build_returning(returning, &mut builder);
        }

        let binding = builder.into_binding();
        debug!(
            "Built UPDATE statement ({} chars, {} params)",
            binding.stmt.len(),
            binding.params.len()
        );
        Ok(binding)
    }
}
