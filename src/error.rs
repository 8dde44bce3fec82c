// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Errors reported while describing tables or finalizing a statement.
///
/// Construction of a statement is infallible; problems surface either when a
/// table is built from its configuration ([`Config`](QueryError::Config),
/// [`UnknownColumn`](QueryError::UnknownColumn)) or when a builder is asked to
/// produce SQL through `into_sql`.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid table configuration: {0}")]
    Config(String),

    #[error("Unknown column '{name}' in table '{table}'")]
    UnknownColumn { table: String, name: String },

    #[error("Incomplete statement: missing {0} clause")]
    MissingClause(&'static str),

    #[error("{0} requires at least one element")]
    EmptyValueList(&'static str),

    #[error("Row {row} ({found}) does not match the columns of the first row ({expected})")]
    RowShapeMismatch {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    #[error("Invalid negation: {0}")]
    InvalidNegation(String),
}
