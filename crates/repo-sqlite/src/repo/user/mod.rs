// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{user::User, util::clock::UtcDateTimeMs};
use phonotek_repo::user::{RecordHeader, RecordId, Repo};

use crate::{
    db::user::{models::*, schema::*},
    prelude::*,
};

impl<'db> Repo for crate::prelude::Connection<'db> {
    fn insert_user(
        &mut self,
        created_at: UtcDateTimeMs,
        created_user: &User,
    ) -> RepoResult<RecordId> {
        let insertable = InsertableRecord::bind(created_at, created_user);
        let query = diesel::insert_into(user::table).values(&insertable);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        self.resolve_user_id_by_email(&created_user.email)
    }

    fn load_user(&mut self, id: RecordId) -> RepoResult<(RecordHeader, User)> {
        user::table
            .filter(user::row_id.eq(RowId::from(id)))
            .first::<QueryableRecord>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn resolve_user_id_by_email(&mut self, email: &str) -> RepoResult<RecordId> {
        user::table
            .select(user::row_id)
            .filter(user::email.eq(email))
            .first::<RowId>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn update_user_email(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        email: &str,
    ) -> RepoResult<()> {
        let target = user::table.filter(user::row_id.eq(RowId::from(id)));
        let query = diesel::update(target).set((
            user::row_updated_ms.eq(updated_at.unix_timestamp_millis()),
            user::email.eq(email),
            user::verified.eq(false),
        ));
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn update_user_verified(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        verified: bool,
    ) -> RepoResult<()> {
        let target = user::table.filter(user::row_id.eq(RowId::from(id)));
        let query = diesel::update(target).set((
            user::row_updated_ms.eq(updated_at.unix_timestamp_millis()),
            user::verified.eq(verified),
        ));
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
