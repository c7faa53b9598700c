// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{
    history::{ListenWithTrack, Repo},
    track::RecordId as TrackId,
    user::RecordId as UserId,
};

use crate::{
    db::{
        listen::{models::*, schema::*},
        track::schema as track_schema,
        user::schema as user_schema,
    },
    prelude::*,
};

impl<'db> Repo for crate::prelude::Connection<'db> {
    fn upsert_listen(
        &mut self,
        user_id: UserId,
        track_id: TrackId,
        listened_at: UtcDateTimeMs,
    ) -> RepoResult<()> {
        let insertable = InsertableRecord::bind(user_id, track_id, listened_at);
        let query = diesel::insert_into(listen::table)
            .values(&insertable)
            .on_conflict((listen::user_id, listen::track_id))
            .do_update()
            .set(listen::listened_ms.eq(listened_at.unix_timestamp_millis()));
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        Ok(())
    }

    fn list_listens(
        &mut self,
        user_id: UserId,
        limit: Option<u64>,
    ) -> RepoResult<Vec<ListenWithTrack>> {
        use track_schema::track;
        use user_schema::user;
        let mut target = listen::table
            .inner_join(track::table.inner_join(user::table))
            .select((
                listen::track_id,
                listen::listened_ms,
                track::title,
                user::name,
                track::image_file,
                track::duration_ms,
            ))
            .filter(listen::user_id.eq(RowId::from(user_id)))
            // Most recent first; the rowid breaks ties within the
            // same millisecond.
            .order_by((listen::listened_ms.desc(), listen::row_id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            target = target.limit(limit as i64);
        }
        let records = target
            .load::<QueryableRecordWithTrack>(self.as_mut())
            .map_err(repo_error)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    fn delete_all_user_listens(&mut self, user_id: UserId) -> RepoResult<usize> {
        let target = listen::table.filter(listen::user_id.eq(RowId::from(user_id)));
        diesel::delete(target)
            .execute(self.as_mut())
            .map_err(repo_error)
    }
}
