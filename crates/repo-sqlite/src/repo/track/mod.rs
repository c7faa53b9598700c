// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{track::Track, util::clock::UtcDateTimeMs, Slug};
use phonotek_repo::{
    track::{RecordHeader, RecordId, Repo},
    user::RecordId as UserId,
};

use crate::{
    db::track::{models::*, schema::*},
    prelude::*,
};

impl<'db> Repo for crate::prelude::Connection<'db> {
    fn insert_track(
        &mut self,
        owner_id: UserId,
        created_at: UtcDateTimeMs,
        created_track: &Track,
    ) -> RepoResult<RecordId> {
        let insertable = InsertableRecord::bind(owner_id, created_at, created_track);
        let query = diesel::insert_into(track::table).values(&insertable);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        self.resolve_track_id_by_slug(owner_id, &created_track.slug)
    }

    fn load_track(&mut self, id: RecordId) -> RepoResult<(RecordHeader, UserId, Track)> {
        track::table
            .filter(track::row_id.eq(RowId::from(id)))
            .first::<QueryableRecord>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn resolve_track_id_by_title(
        &mut self,
        owner_id: UserId,
        title: &str,
    ) -> RepoResult<RecordId> {
        track::table
            .select(track::row_id)
            .filter(track::user_id.eq(RowId::from(owner_id)))
            .filter(track::title.eq(title))
            .first::<RowId>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn resolve_track_id_by_slug(&mut self, owner_id: UserId, slug: &Slug) -> RepoResult<RecordId> {
        track::table
            .select(track::row_id)
            .filter(track::user_id.eq(RowId::from(owner_id)))
            .filter(track::slug.eq(slug.as_str()))
            .first::<RowId>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn update_track_title(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        title: &str,
    ) -> RepoResult<()> {
        let target = track::table.filter(track::row_id.eq(RowId::from(id)));
        let query = diesel::update(target).set((
            track::row_updated_ms.eq(updated_at.unix_timestamp_millis()),
            track::title.eq(title),
        ));
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn register_track_play(&mut self, id: RecordId) -> RepoResult<()> {
        let target = track::table.filter(track::row_id.eq(RowId::from(id)));
        let query = diesel::update(target).set(track::plays.eq(track::plays + 1_i64));
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn purge_track(&mut self, id: RecordId) -> RepoResult<()> {
        let target = track::table.filter(track::row_id.eq(RowId::from(id)));
        let query = diesel::delete(target);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
