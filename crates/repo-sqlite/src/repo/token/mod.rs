// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{
    token::{Record, Repo, TokenId},
    user::RecordId as UserId,
};

use crate::{
    db::auth_token::{models::*, schema::*},
    prelude::*,
};

impl<'db> Repo for crate::prelude::Connection<'db> {
    fn insert_token(
        &mut self,
        token_id: &TokenId,
        created_at: UtcDateTimeMs,
        record: &Record,
    ) -> RepoResult<()> {
        let insertable = InsertableRecord::bind(token_id, created_at, record);
        let query = diesel::insert_into(auth_token::table).values(&insertable);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        Ok(())
    }

    fn load_token(&mut self, token_id: &TokenId) -> RepoResult<Record> {
        auth_token::table
            .select((
                auth_token::user_id,
                auth_token::refresh_token,
                auth_token::expires_ms,
            ))
            .filter(auth_token::id.eq(token_id.as_str()))
            .first::<QueryableRecord>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn delete_token(&mut self, token_id: &TokenId) -> RepoResult<usize> {
        let target = auth_token::table.filter(auth_token::id.eq(token_id.as_str()));
        let rows_affected = diesel::delete(target)
            .execute(self.as_mut())
            .map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        Ok(rows_affected)
    }

    fn delete_all_user_tokens(&mut self, user_id: UserId) -> RepoResult<usize> {
        let target = auth_token::table.filter(auth_token::user_id.eq(RowId::from(user_id)));
        diesel::delete(target)
            .execute(self.as_mut())
            .map_err(repo_error)
    }

    fn delete_expired_tokens(&mut self, now: UtcDateTimeMs) -> RepoResult<usize> {
        // A credential is valid strictly before its expiry, so the row
        // at the boundary is already unusable and swept as well.
        let target =
            auth_token::table.filter(auth_token::expires_ms.le(now.unix_timestamp_millis()));
        diesel::delete(target)
            .execute(self.as_mut())
            .map_err(repo_error)
    }
}

#[cfg(test)]
mod tests;
