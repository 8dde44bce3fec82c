// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

use super::column::Column;
use super::delete::DeleteBuilder;
use super::insert::InsertBuilder;
use super::select::SelectBuilder;
use super::update::UpdateBuilder;
use super::{ExpressionBuilder, SQLBuilder};

const DEFAULT_SCHEMA: &str = "public";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_owned()
}

/// The description a [`Table`] is built from, typically deserialized from a
/// JSON or TOML document. `from` is the logical (application-facing) column
/// name, `to` the physical name in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub table: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    pub columns: Vec<ColumnEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub from: String,
    pub to: String,
}

/// A table in the database such as "concerts" or "users": the entry point for
/// building statements against it. Immutable once constructed; the verb
/// methods borrow the table, so any number of statements can be under
/// construction against the same table at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    schema_name: String,
    table_name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Validate the configuration and build the table and its column
    /// descriptors from it.
    pub fn new(config: TableConfig) -> Result<Table, QueryError> {
        if config.table.is_empty() {
            return Err(QueryError::Config(
                "please specify a table as a string".to_owned(),
            ));
        }

        let schema_name = if config.schema.is_empty() {
            default_schema()
        } else {
            config.schema
        };

        let mut columns = Vec::with_capacity(config.columns.len());
        for entry in &config.columns {
            if entry.from.is_empty() || entry.to.is_empty() {
                return Err(QueryError::Config(
                    "please provide a valid column structure".to_owned(),
                ));
            }
            columns.push(Column::new(
                &schema_name,
                &config.table,
                &entry.to,
                &entry.from,
            ));
        }

        Ok(Table {
            schema_name,
            table_name: config.table,
            columns,
        })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by its logical name and, failing that, by its physical
    /// name, so statements can be phrased in either vocabulary. Returns an
    /// owned descriptor; the table's own copy is never affected by what the
    /// caller does with it.
    pub fn column(&self, name: &str) -> Result<Column, QueryError> {
        self.columns
            .iter()
            .find(|column| column.logical_name == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|column| column.physical_name == name)
            })
            .cloned()
            .ok_or_else(|| QueryError::UnknownColumn {
                table: self.table_name.clone(),
                name: name.to_owned(),
            })
    }

    /// Start a `SELECT`. An empty column list projects `*`.
    pub fn select(&self, columns: Vec<Column>) -> SelectBuilder<'_> {
        SelectBuilder::new(self, columns)
    }

    /// Start an `INSERT INTO`.
    pub fn insert_into(&self) -> InsertBuilder<'_> {
        InsertBuilder::new(self)
    }

    /// Start an `UPDATE`.
    pub fn update(&self) -> UpdateBuilder<'_> {
        UpdateBuilder::new(self)
    }

    /// Start a `DELETE FROM`.
    pub fn delete_from(&self) -> DeleteBuilder<'_> {
        DeleteBuilder::new(self)
    }
}

impl ExpressionBuilder for Table {
    /// Build a table reference of the form `schema."table"`.
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str(&self.schema_name);
        builder.push('.');
        builder.push_identifier(&self.table_name);
    }
}
