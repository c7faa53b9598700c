// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::{track::schema::*, user::schema::*};

diesel::table! {
    listen (row_id) {
        row_id -> BigInt,
        user_id -> BigInt,
        track_id -> BigInt,
        listened_ms -> BigInt,
    }
}

diesel::joinable!(listen -> user (user_id));
diesel::joinable!(listen -> track (track_id));
diesel::allow_tables_to_appear_in_same_query!(listen, track);
diesel::allow_tables_to_appear_in_same_query!(listen, user);
