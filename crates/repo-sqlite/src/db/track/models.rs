// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{
    track::Track,
    util::clock::{TimestampMillis, UtcDateTimeMs},
    Slug,
};
use phonotek_repo::{track::RecordHeader, user::RecordId as UserId};

use super::schema::*;
use crate::prelude::*;

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) row_id: RowId,
    pub(crate) row_created_ms: TimestampMillis,
    pub(crate) row_updated_ms: TimestampMillis,
    pub(crate) user_id: RowId,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) audio_file: String,
    pub(crate) image_file: String,
    pub(crate) duration_ms: TimestampMillis,
    pub(crate) plays: i64,
}

impl From<QueryableRecord> for (RecordHeader, UserId, Track) {
    fn from(from: QueryableRecord) -> Self {
        let QueryableRecord {
            row_id,
            row_created_ms,
            row_updated_ms,
            user_id,
            title,
            slug,
            audio_file,
            image_file,
            duration_ms,
            plays,
        } = from;
        let header = RecordHeader {
            id: row_id.into(),
            created_at: UtcDateTimeMs::from_unix_timestamp_millis(row_created_ms),
            updated_at: UtcDateTimeMs::from_unix_timestamp_millis(row_updated_ms),
        };
        let track = Track {
            title,
            slug: Slug::new(slug),
            audio_file,
            image_file,
            duration_ms,
            plays,
        };
        (header, user_id.into(), track)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = track)]
pub(crate) struct InsertableRecord<'a> {
    pub(crate) row_created_ms: TimestampMillis,
    pub(crate) row_updated_ms: TimestampMillis,
    pub(crate) user_id: RowId,
    pub(crate) title: &'a str,
    pub(crate) slug: &'a str,
    pub(crate) audio_file: &'a str,
    pub(crate) image_file: &'a str,
    pub(crate) duration_ms: TimestampMillis,
    pub(crate) plays: i64,
}

impl<'a> InsertableRecord<'a> {
    pub(crate) fn bind(
        owner_id: UserId,
        created_at: UtcDateTimeMs,
        created_track: &'a Track,
    ) -> Self {
        let row_created_updated_ms = created_at.unix_timestamp_millis();
        let Track {
            title,
            slug,
            audio_file,
            image_file,
            duration_ms,
            plays,
        } = created_track;
        Self {
            row_created_ms: row_created_updated_ms,
            row_updated_ms: row_created_updated_ms,
            user_id: owner_id.into(),
            title,
            slug: slug.as_str(),
            audio_file,
            image_file,
            duration_ms: *duration_ms,
            plays: *plays,
        }
    }
}
