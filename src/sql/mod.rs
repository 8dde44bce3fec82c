// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    any::Any,
    fmt::{Debug, Display},
    sync::{Arc, LazyLock},
};

use regex::{Captures, Regex};
use tokio_postgres::types::{ToSql, Type, to_sql_checked};

#[macro_use]
#[cfg(test)]
mod test_util;

pub mod column;
pub(crate) mod delete;
pub(crate) mod group_by;
pub(crate) mod insert;
pub(crate) mod limit;
pub(crate) mod offset;
pub mod order;
pub mod predicate;
pub(crate) mod select;
pub mod table;
pub(crate) mod update;

pub trait SQLParam: ToSql + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq(&self, other: &dyn SQLParam) -> bool;

    fn as_pg(&self) -> &(dyn ToSql + Sync);
}

impl<T: ToSql + Send + Sync + Any + PartialEq> SQLParam for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq(&self, other: &dyn SQLParam) -> bool {
        if let Some(other) = other.as_any().downcast_ref::<T>() {
            self == other
        } else {
            false
        }
    }

    fn as_pg(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

impl PartialEq for dyn SQLParam {
    fn eq(&self, other: &Self) -> bool {
        SQLParam::eq(self, other)
    }
}

/// A wrapper type for SQL parameters that can be used in a prepared statement.
/// We would have been fine with just using `Arc<dyn SQLParam>` but we need to
/// implement `ToSql` for it and since `Arc` (unlike `Box`) is not a `#[fundamental]`
/// type, so we have to wrap it in a newtype.
#[derive(Clone)]
pub struct SQLParamContainer(Arc<dyn SQLParam>);

impl ToSql for SQLParamContainer {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<tokio_postgres::types::IsNull, Box<dyn std::error::Error + Sync + Send>> {
        self.0.as_ref().to_sql_checked(ty, out)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl SQLParamContainer {
    pub fn new<T: SQLParam + 'static>(param: T) -> Self {
        Self(Arc::new(param))
    }
}

impl PartialEq for SQLParamContainer {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl AsRef<dyn SQLParam> for SQLParamContainer {
    fn as_ref(&self) -> &(dyn SQLParam + 'static) {
        self.0.as_ref()
    }
}

impl Debug for SQLParamContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for SQLParamContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i16> for SQLParamContainer {
    fn from(value: i16) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<i32> for SQLParamContainer {
    fn from(value: i32) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<i64> for SQLParamContainer {
    fn from(value: i64) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<f32> for SQLParamContainer {
    fn from(value: f32) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<f64> for SQLParamContainer {
    fn from(value: f64) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<bool> for SQLParamContainer {
    fn from(value: bool) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<&'static str> for SQLParamContainer {
    fn from(value: &'static str) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<String> for SQLParamContainer {
    fn from(value: String) -> Self {
        SQLParamContainer::new(value)
    }
}

impl From<Vec<u8>> for SQLParamContainer {
    fn from(value: Vec<u8>) -> Self {
        SQLParamContainer::new(value)
    }
}

/// A finished statement: the SQL text with `$1`, `$2`, ... placeholders and the
/// parameter values they stand for. The value at `params[i - 1]` binds to the
/// placeholder `$i`, in the order suitable for handing to a postgres client.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    pub stmt: String,
    pub params: Vec<SQLParamContainer>,
}

impl ParameterBinding {
    fn new(stmt: String, params: Vec<SQLParamContainer>) -> Self {
        Self { stmt, params }
    }
}

impl Display for ParameterBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.stmt)
    }
}

/// A trait for types that can build themselves into an SQL expression.
///
/// Each constituent of an SQL expression (column, table, predicate, select, etc.) should implement
/// this trait, which can then be used to hierarchically build an SQL string and the list of
/// parameters to be supplied to it.
pub trait ExpressionBuilder {
    /// Build the SQL expression into the given SQL builder
    fn build(&self, builder: &mut SQLBuilder);

    /// Build the SQL expression into a [`ParameterBinding`]. This is useful for testing/debugging,
    /// where we want to assert on the generated SQL without going through the whole process of
    /// creating an SQLBuilder, building the expression into it, and extracting the SQL and params.
    fn to_sql(&self) -> ParameterBinding
    where
        Self: Sized,
    {
        let mut builder = SQLBuilder::new();
        self.build(&mut builder);
        builder.into_binding()
    }
}

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\d+)").unwrap());

pub struct SQLBuilder {
    /// The SQL being built with placeholders for each parameter
    sql: String,
    /// The list of parameters
    params: Vec<SQLParamContainer>,
}

impl SQLBuilder {
    pub fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a string surrounded by double quotes. Useful for identifiers such as table names,
    /// column names, etc. Without the quotes, an identifier with uppercase letters would be
    /// interpreted the same as the identifier with lowercase letters.
    pub fn push_identifier<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push('"');
        self.sql.push_str(s.as_ref());
        self.sql.push('"');
    }

    /// Push a space. This is a common operation, so it is provided as a separate method.
    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Push a parameter, which will be replaced with a placeholder in the SQL string
    /// and the parameter will be added to the list of parameters.
    pub fn push_param(&mut self, param: SQLParamContainer) {
        self.params.push(param);
        self.push('$');
        self.push_str(self.params.len().to_string());
    }

    /// Splice an independently built statement into the one under construction, typically a
    /// subquery. The placeholders of the spliced statement are renumbered past the parameters
    /// already accumulated, and its parameters are appended so the combined statement binds
    /// every `$n` to the right value.
    pub fn push_binding(&mut self, binding: &ParameterBinding) {
        let offset = self.params.len();
        let renumbered = PLACEHOLDER_RE.replace_all(&binding.stmt, |caps: &Captures| {
            match caps[1].parse::<usize>() {
                Ok(index) => format!("${}", index + offset),
                Err(_) => caps[0].to_string(),
            }
        });
        self.sql.push_str(&renumbered);
        self.params.extend(binding.params.iter().cloned());
    }

    /// Push elements of an iterator, separated by `sep`. The `push_elem` function provides
    /// the flexibility to map the elements (compared to [`SQLBuilder::push_elems`], which assumes that
    /// the elements implement [`ExpressionBuilder`] and [`build`](ExpressionBuilder::build) is all you need to call).
    pub fn push_iter<T>(
        &mut self,
        iter: impl ExactSizeIterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T),
    ) {
        let len = iter.len();
        for (i, item) in iter.enumerate() {
            push_elem(self, item);

            if i < len - 1 {
                self.sql.push_str(sep);
            }
        }
    }

    /// Push elements of a slice, separated by `sep`. The elements must themselves implement
    /// `ExpressionBuilder`. This is a convenience method that encodes the common pattern of
    /// building a list of expressions and separating them by a separator.
    pub fn push_elems<T: ExpressionBuilder>(&mut self, elems: &[T], sep: &str) {
        self.push_iter(elems.iter(), sep, |builder, elem| {
            elem.build(builder);
        });
    }

    /// Get the statement and the list of parameters. Calling this method should be the final
    /// step in building an SQL expression, and thus this builder consumes the `self`.
    pub fn into_binding(self) -> ParameterBinding {
        ParameterBinding::new(self.sql, self.params)
    }
}
