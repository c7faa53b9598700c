// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::user::schema::*;

diesel::table! {
    auth_token (id) {
        id -> Text,
        row_created_ms -> BigInt,
        user_id -> BigInt,
        refresh_token -> Text,
        expires_ms -> BigInt,
    }
}

diesel::joinable!(auth_token -> user (user_id));
diesel::allow_tables_to_appear_in_same_query!(auth_token, user);
