// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::{TimestampMillis, UtcDateTimeMs};
use phonotek_repo::{
    playlist::{Membership, MembershipWithTrack, Position, RecordId as PlaylistId},
    track::RecordId as TrackId,
};

use super::schema::*;
use crate::prelude::*;

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) track_id: RowId,
    pub(crate) position: Position,
    pub(crate) added_ms: TimestampMillis,
}

impl From<QueryableRecord> for Membership {
    fn from(from: QueryableRecord) -> Self {
        let QueryableRecord {
            track_id,
            position,
            added_ms,
        } = from;
        Self {
            track_id: track_id.into(),
            position,
            added_at: UtcDateTimeMs::from_unix_timestamp_millis(added_ms),
        }
    }
}

/// A membership row joined with its track and the track's owner.
#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecordWithTrack {
    pub(crate) track_id: RowId,
    pub(crate) position: Position,
    pub(crate) added_ms: TimestampMillis,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) image_file: String,
    pub(crate) duration_ms: TimestampMillis,
}

impl From<QueryableRecordWithTrack> for MembershipWithTrack {
    fn from(from: QueryableRecordWithTrack) -> Self {
        let QueryableRecordWithTrack {
            track_id,
            position,
            added_ms,
            title,
            artist,
            image_file,
            duration_ms,
        } = from;
        Self {
            membership: Membership {
                track_id: track_id.into(),
                position,
                added_at: UtcDateTimeMs::from_unix_timestamp_millis(added_ms),
            },
            title,
            artist,
            image_file,
            duration_ms,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = playlist_track)]
pub(crate) struct InsertableRecord {
    pub(crate) playlist_id: RowId,
    pub(crate) track_id: RowId,
    pub(crate) position: Position,
    pub(crate) added_ms: TimestampMillis,
}

impl InsertableRecord {
    pub(crate) fn bind(
        playlist_id: PlaylistId,
        track_id: TrackId,
        position: Position,
        added_at: UtcDateTimeMs,
    ) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            track_id: track_id.into(),
            position,
            added_ms: added_at.unix_timestamp_millis(),
        }
    }
}
