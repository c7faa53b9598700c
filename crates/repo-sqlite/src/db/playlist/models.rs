// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{
    playlist::Playlist,
    util::clock::{TimestampMillis, UtcDateTimeMs},
    Slug,
};
use phonotek_repo::{playlist::RecordHeader, user::RecordId as UserId};

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
    pub(crate) image_file: Option<String>,
}

impl From<QueryableRecord> for (RecordHeader, UserId, Playlist) {
    fn from(from: QueryableRecord) -> Self {
        let QueryableRecord {
            row_id,
            row_created_ms,
            row_updated_ms,
            user_id,
            title,
            slug,
            image_file,
        } = from;
        let header = RecordHeader {
            id: row_id.into(),
            created_at: UtcDateTimeMs::from_unix_timestamp_millis(row_created_ms),
            updated_at: UtcDateTimeMs::from_unix_timestamp_millis(row_updated_ms),
        };
        let playlist = Playlist {
            title,
            slug: Slug::new(slug),
            image_file,
        };
        (header, user_id.into(), playlist)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = playlist)]
pub(crate) struct InsertableRecord<'a> {
    pub(crate) row_created_ms: TimestampMillis,
    pub(crate) row_updated_ms: TimestampMillis,
    pub(crate) user_id: RowId,
    pub(crate) title: &'a str,
    pub(crate) slug: &'a str,
    pub(crate) image_file: Option<&'a str>,
}

impl<'a> InsertableRecord<'a> {
    pub(crate) fn bind(
        owner_id: UserId,
        created_at: UtcDateTimeMs,
        created_playlist: &'a Playlist,
    ) -> Self {
        let row_created_updated_ms = created_at.unix_timestamp_millis();
        let Playlist {
            title,
            slug,
            image_file,
        } = created_playlist;
        Self {
            row_created_ms: row_created_updated_ms,
            row_updated_ms: row_created_updated_ms,
            user_id: owner_id.into(),
            title,
            slug: slug.as_str(),
            image_file: image_file.as_deref(),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = playlist, treat_none_as_null = true)]
pub(crate) struct UpdatableImageRecord<'a> {
    pub(crate) row_updated_ms: TimestampMillis,
    pub(crate) image_file: Option<&'a str>,
}

impl<'a> UpdatableImageRecord<'a> {
    pub(crate) fn bind(updated_at: UtcDateTimeMs, image_file: Option<&'a str>) -> Self {
        Self {
            row_updated_ms: updated_at.unix_timestamp_millis(),
            image_file,
        }
    }
}
