// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use exo_query::{Table, TableConfig};

/// The `user` table used throughout the statement tests. Every column keeps
/// its physical name.
pub fn user_table() -> Table {
    let config: TableConfig = serde_json::from_value(serde_json::json!({
        "table": "user",
        "schema": "public",
        "columns": [
            { "from": "id", "to": "id" },
            { "from": "username", "to": "username" },
            { "from": "email", "to": "email" },
            { "from": "password", "to": "password" },
            { "from": "role", "to": "role" },
        ]
    }))
    .unwrap();
    Table::new(config).unwrap()
}

/// The `offer` table: two of its columns are exposed under camel-cased
/// logical names, so statements against it exercise the name mapping.
pub fn offer_table() -> Table {
    let config: TableConfig = serde_json::from_value(serde_json::json!({
        "table": "offer",
        "schema": "public",
        "columns": [
            { "from": "id", "to": "id" },
            { "from": "offerName", "to": "offer_name" },
            { "from": "price", "to": "price" },
            { "from": "userId", "to": "user_id" },
        ]
    }))
    .unwrap();
    Table::new(config).unwrap()
}

#[allow(unused_macros)]
macro_rules! params {
    () => {
        Vec::<exo_query::SQLParamContainer>::new()
    };
    ($($param:expr),+ $(,)?) => {
        vec![$(exo_query::SQLParamContainer::new($param)),+]
    };
}
