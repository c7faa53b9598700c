// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::{playlist::schema::*, track::schema::*, user::schema::*};

diesel::table! {
    playlist_track (row_id) {
        row_id -> BigInt,
        playlist_id -> BigInt,
        track_id -> BigInt,
        position -> BigInt,
        added_ms -> BigInt,
    }
}

diesel::joinable!(playlist_track -> playlist (playlist_id));
diesel::joinable!(playlist_track -> track (track_id));
diesel::allow_tables_to_appear_in_same_query!(playlist_track, playlist);
diesel::allow_tables_to_appear_in_same_query!(playlist_track, track);
diesel::allow_tables_to_appear_in_same_query!(playlist_track, user);
