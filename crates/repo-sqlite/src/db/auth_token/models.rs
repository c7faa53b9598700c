// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::{TimestampMillis, UtcDateTimeMs};
use phonotek_repo::token::{Record, TokenId};

use super::schema::*;
use crate::prelude::*;

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) user_id: RowId,
    pub(crate) refresh_token: String,
    pub(crate) expires_ms: TimestampMillis,
}

impl From<QueryableRecord> for Record {
    fn from(from: QueryableRecord) -> Self {
        let QueryableRecord {
            user_id,
            refresh_token,
            expires_ms,
        } = from;
        Self {
            user_id: user_id.into(),
            refresh_value: refresh_token,
            expires_at: UtcDateTimeMs::from_unix_timestamp_millis(expires_ms),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = auth_token)]
pub(crate) struct InsertableRecord<'a> {
    pub(crate) id: &'a str,
    pub(crate) row_created_ms: TimestampMillis,
    pub(crate) user_id: RowId,
    pub(crate) refresh_token: &'a str,
    pub(crate) expires_ms: TimestampMillis,
}

impl<'a> InsertableRecord<'a> {
    pub(crate) fn bind(
        token_id: &'a TokenId,
        created_at: UtcDateTimeMs,
        record: &'a Record,
    ) -> Self {
        let Record {
            user_id,
            refresh_value,
            expires_at,
        } = record;
        Self {
            id: token_id.as_str(),
            row_created_ms: created_at.unix_timestamp_millis(),
            user_id: RowId::from(*user_id),
            refresh_token: refresh_value,
            expires_ms: expires_at.unix_timestamp_millis(),
        }
    }
}
