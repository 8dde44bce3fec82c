// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

//! Test assertions to check SQL statements and parameters.

/// Assert that the given parameters match the expected ones. Comparison goes
/// through the `SQLParam` downcast equality, so expected values are written as
/// plain literals.
///
/// # Usage:
/// ```no_run
/// assert_params!(actual_params, expected_param1, expected_param2, ...);
/// assert_params!(actual_params); // asserts that no parameters were bound
/// ```
macro_rules! assert_params {
    ($actual_params:expr) => {
        assert!($actual_params.is_empty(), "Extra actual parameters");
    };
    ($actual_params:expr, $($expected_param:expr),*) => {
        let actual: &[$crate::sql::SQLParamContainer] = &$actual_params;
        let expected = vec![$($crate::sql::SQLParamContainer::new($expected_param)),*];
        assert_eq!(actual, &expected[..], "Parameter mismatch");
    };
}

/// Assert that a [`ParameterBinding`](crate::sql::ParameterBinding) carries
/// the expected statement text and parameters.
///
/// # Usage:
/// ```no_run
/// assert_binding!(binding, "SELECT * FROM public.\"user\"");
/// assert_binding!(binding, "... WHERE public.\"user\".\"id\"=$1", 1);
/// ```
macro_rules! assert_binding {
    ($actual:expr, $expected_stmt:expr) => {
        let binding = $actual;
        assert_eq!(binding.stmt, $expected_stmt);
        assert_params!(binding.params);
    };
    ($actual:expr, $expected_stmt:expr, $($rest:expr),*) => {
        let binding = $actual;
        assert_eq!(binding.stmt, $expected_stmt);
        assert_params!(binding.params, $($rest),*);
    };
}
