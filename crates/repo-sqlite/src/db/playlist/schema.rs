// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::user::schema::*;

diesel::table! {
    playlist (row_id) {
        row_id -> BigInt,
        row_created_ms -> BigInt,
        row_updated_ms -> BigInt,
        user_id -> BigInt,
        title -> Text,
        slug -> Text,
        image_file -> Nullable<Text>,
    }
}

diesel::joinable!(playlist -> user (user_id));
diesel::allow_tables_to_appear_in_same_query!(playlist, user);
