// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// The core idea in this library is describing a relational query or mutation
/// as a chain of method calls and turning the chain into a parameterized SQL
/// statement: the statement text with `$n` placeholders plus the ordered list
/// of values to bind, packaged as a [ParameterBinding]. User-supplied values
/// only ever travel through the parameter list, so injection through value
/// interpolation is impossible by construction rather than by discipline.
///
/// A [Table] (built from a [TableConfig] describing the logical-to-physical
/// column mapping) is the entry point. Its verb methods hand out statement
/// builders ([SelectBuilder], [InsertBuilder], [UpdateBuilder],
/// [DeleteBuilder]), which accumulate clause fragments and terminate with
/// `into_sql()`. Conditions are [Predicate] trees built from [Column]
/// operator methods; every descriptor is an immutable value, so tables and
/// columns can be shared freely across threads and statements.
///
/// Executing the statement against a database is out of scope; the parameter
/// values implement the postgres client's `ToSql`, so a binding plugs
/// directly into whatever execution layer sits above this crate.
#[macro_use]
mod sql;

pub mod error;

pub use error::QueryError;

/// Public types at the root level of this crate
pub use sql::{
    ExpressionBuilder, ParameterBinding, SQLBuilder, SQLParam, SQLParamContainer,
    column::{Aggregate, CastType, Column, IsClause},
    delete::DeleteBuilder,
    group_by::GroupBy,
    insert::InsertBuilder,
    limit::Limit,
    offset::Offset,
    order::{OrderBy, OrderByElement, Ordering},
    predicate::{CaseSensitivity, Predicate, SetOp, SetOperand},
    select::SelectBuilder,
    table::{ColumnEntry, Table, TableConfig},
    update::UpdateBuilder,
};
