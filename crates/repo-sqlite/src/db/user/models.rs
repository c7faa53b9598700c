// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{
    user::User,
    util::clock::{TimestampMillis, UtcDateTimeMs},
};
use phonotek_repo::user::RecordHeader;

use super::schema::*;
use crate::prelude::*;

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) row_id: RowId,
    pub(crate) row_created_ms: TimestampMillis,
    pub(crate) row_updated_ms: TimestampMillis,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) verified: bool,
}

impl From<QueryableRecord> for (RecordHeader, User) {
    fn from(from: QueryableRecord) -> Self {
        let QueryableRecord {
            row_id,
            row_created_ms,
            row_updated_ms,
            name,
            email,
            verified,
        } = from;
        let header = RecordHeader {
            id: row_id.into(),
            created_at: UtcDateTimeMs::from_unix_timestamp_millis(row_created_ms),
            updated_at: UtcDateTimeMs::from_unix_timestamp_millis(row_updated_ms),
        };
        let user = User {
            name,
            email,
            verified,
        };
        (header, user)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user)]
pub(crate) struct InsertableRecord<'a> {
    pub(crate) row_created_ms: TimestampMillis,
    pub(crate) row_updated_ms: TimestampMillis,
    pub(crate) name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) verified: bool,
}

impl<'a> InsertableRecord<'a> {
    pub(crate) fn bind(created_at: UtcDateTimeMs, created_user: &'a User) -> Self {
        let row_created_updated_ms = created_at.unix_timestamp_millis();
        let User {
            name,
            email,
            verified,
        } = created_user;
        Self {
            row_created_ms: row_created_updated_ms,
            row_updated_ms: row_created_updated_ms,
            name,
            email,
            verified: *verified,
        }
    }
}
