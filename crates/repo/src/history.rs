// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::{TimestampMillis, UtcDateTimeMs};

use crate::{prelude::*, track::RecordId as TrackId, user::RecordId as UserId};

/// One entry in a user's listening history.
///
/// The history holds at most one entry per track and user. Listening
/// again refreshes the timestamp instead of adding a second entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listen {
    pub track_id: TrackId,
    pub listened_at: UtcDateTimeMs,
}

/// A listen joined with the track data needed for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenWithTrack {
    pub listen: Listen,
    pub title: String,
    pub artist: String,
    pub image_file: String,
    pub duration_ms: TimestampMillis,
}

pub trait Repo {
    /// Insert a listen or refresh the timestamp of an existing one.
    fn upsert_listen(
        &mut self,
        user_id: UserId,
        track_id: TrackId,
        listened_at: UtcDateTimeMs,
    ) -> RepoResult<()>;

    /// The user's listens descending by recency, optionally limited.
    fn list_listens(
        &mut self,
        user_id: UserId,
        limit: Option<u64>,
    ) -> RepoResult<Vec<ListenWithTrack>>;

    /// Returns the number of deleted rows.
    fn delete_all_user_listens(&mut self, user_id: UserId) -> RepoResult<usize>;
}
