// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::{TimestampMillis, UtcDateTimeMs};
use phonotek_repo::{
    history::{Listen, ListenWithTrack},
    track::RecordId as TrackId,
    user::RecordId as UserId,
};

use super::schema::*;
use crate::prelude::*;

/// A listen row joined with its track and the track's owner.
#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecordWithTrack {
    pub(crate) track_id: RowId,
    pub(crate) listened_ms: TimestampMillis,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) image_file: String,
    pub(crate) duration_ms: TimestampMillis,
}

impl From<QueryableRecordWithTrack> for ListenWithTrack {
    fn from(from: QueryableRecordWithTrack) -> Self {
        let QueryableRecordWithTrack {
            track_id,
            listened_ms,
            title,
            artist,
            image_file,
            duration_ms,
        } = from;
        Self {
            listen: Listen {
                track_id: track_id.into(),
                listened_at: UtcDateTimeMs::from_unix_timestamp_millis(listened_ms),
            },
            title,
            artist,
            image_file,
            duration_ms,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = listen)]
pub(crate) struct InsertableRecord {
    pub(crate) user_id: RowId,
    pub(crate) track_id: RowId,
    pub(crate) listened_ms: TimestampMillis,
}

impl InsertableRecord {
    pub(crate) fn bind(user_id: UserId, track_id: TrackId, listened_at: UtcDateTimeMs) -> Self {
        Self {
            user_id: user_id.into(),
            track_id: track_id.into(),
            listened_ms: listened_at.unix_timestamp_millis(),
        }
    }
}
