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

use super::predicate::Predicate;
use super::table::Table;
use super::{ExpressionBuilder, ParameterBinding, SQLBuilder};

/// A delete statement under construction. Deliberately the smallest builder:
/// deletion takes at most a filter, and there is no returning form.
pub struct DeleteBuilder<'a> {
    table: &'a Table,
    predicate: Option<Predicate>,
}

impl<'a> DeleteBuilder<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            predicate: None,
        }
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

    /// Produce the statement of the form `DELETE FROM <table> WHERE
    /// <predicate>`, the `WHERE` clause present only when supplied.
    pub fn into_sql(self) -> Result<ParameterBinding, QueryError> {
        if let Some(predicate) = &self.predicate {
            predicate.validate()?;
        }

        let mut builder = SQLBuilder::new();
        builder.push_str("DELETE FROM ");
        self.table.build(&mut builder);

        if let Some(predicate) = &self.predicate {
            builder.push_str(" WHERE ");
            predicate.build(&mut builder);
        }

        let binding = builder.into_binding();
        debug!(
            "Built DELETE statement ({} chars, {} params)",
            binding.stmt.len(),
            binding.params.len()
        );
        Ok(binding)
    }
}
