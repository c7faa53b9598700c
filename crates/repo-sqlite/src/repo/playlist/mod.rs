// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::dsl::count_star;

use phonotek_core::{playlist::Playlist, util::clock::UtcDateTimeMs, Slug};
use phonotek_repo::{
    playlist::{
        Membership, MembershipRepo, MembershipWithTrack, Position, PositionShiftRepo,
        RecordHeader, RecordId, Repo,
    },
    track::RecordId as TrackId,
    user::RecordId as UserId,
};

use crate::{
    db::{
        playlist::{models::*, schema::*},
        playlist_track as playlist_track_db,
        track::schema as track_schema,
        user::schema as user_schema,
    },
    prelude::*,
};

impl<'db> Repo for crate::prelude::Connection<'db> {
    fn insert_playlist(
        &mut self,
        owner_id: UserId,
        created_at: UtcDateTimeMs,
        created_playlist: &Playlist,
    ) -> RepoResult<RecordId> {
        let insertable = InsertableRecord::bind(owner_id, created_at, created_playlist);
        let query = diesel::insert_into(playlist::table).values(&insertable);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        self.resolve_playlist_id_by_slug(owner_id, &created_playlist.slug)
    }

    fn load_playlist(&mut self, id: RecordId) -> RepoResult<(RecordHeader, UserId, Playlist)> {
        playlist::table
            .filter(playlist::row_id.eq(RowId::from(id)))
            .first::<QueryableRecord>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn resolve_playlist_id_by_title(
        &mut self,
        owner_id: UserId,
        title: &str,
    ) -> RepoResult<RecordId> {
        playlist::table
            .select(playlist::row_id)
            .filter(playlist::user_id.eq(RowId::from(owner_id)))
            .filter(playlist::title.eq(title))
            .first::<RowId>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn resolve_playlist_id_by_slug(
        &mut self,
        owner_id: UserId,
        slug: &Slug,
    ) -> RepoResult<RecordId> {
        playlist::table
            .select(playlist::row_id)
            .filter(playlist::user_id.eq(RowId::from(owner_id)))
            .filter(playlist::slug.eq(slug.as_str()))
            .first::<RowId>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn update_playlist_image(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        image_file: Option<&str>,
    ) -> RepoResult<()> {
        let updatable = UpdatableImageRecord::bind(updated_at, image_file);
        let target = playlist::table.filter(playlist::row_id.eq(RowId::from(id)));
        let query = diesel::update(target).set(&updatable);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn purge_playlist(&mut self, id: RecordId) -> RepoResult<()> {
        let target = playlist::table.filter(playlist::row_id.eq(RowId::from(id)));
        let query = diesel::delete(target);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

impl<'db> MembershipRepo for crate::prelude::Connection<'db> {
    fn load_membership(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
    ) -> RepoResult<Membership> {
        use playlist_track_db::{models::QueryableRecord, schema::*};
        playlist_track::table
            .select((
                playlist_track::track_id,
                playlist_track::position,
                playlist_track::added_ms,
            ))
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .filter(playlist_track::track_id.eq(RowId::from(track_id)))
            .first::<QueryableRecord>(self.as_mut())
            .map_err(repo_error)
            .map(Into::into)
    }

    fn list_memberships(
        &mut self,
        playlist_id: RecordId,
        limit: Option<u64>,
    ) -> RepoResult<Vec<MembershipWithTrack>> {
        use playlist_track_db::{models::QueryableRecordWithTrack, schema::*};
        use track_schema::track;
        use user_schema::user;
        let mut target = playlist_track::table
            .inner_join(track::table.inner_join(user::table))
            .select((
                playlist_track::track_id,
                playlist_track::position,
                playlist_track::added_ms,
                track::title,
                user::name,
                track::image_file,
                track::duration_ms,
            ))
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .order_by(playlist_track::position.asc())
            .into_boxed();
        if let Some(limit) = limit {
            target = target.limit(limit as i64);
        }
        let records = target
            .load::<QueryableRecordWithTrack>(self.as_mut())
            .map_err(repo_error)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    fn count_memberships(&mut self, playlist_id: RecordId) -> RepoResult<usize> {
        use playlist_track_db::schema::*;
        playlist_track::table
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .select(count_star())
            .first::<i64>(self.as_mut())
            .map(|count| count as usize)
            .map_err(repo_error)
    }

    fn last_position(&mut self, playlist_id: RecordId) -> RepoResult<Position> {
        use playlist_track_db::schema::*;
        playlist_track::table
            .select(diesel::dsl::max(playlist_track::position))
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .first::<Option<Position>>(self.as_mut())
            .map(Option::unwrap_or_default)
            .map_err(repo_error)
    }

    fn insert_membership(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
        position: Position,
        added_at: UtcDateTimeMs,
    ) -> RepoResult<Membership> {
        use playlist_track_db::{models::InsertableRecord, schema::*};
        let insertable = InsertableRecord::bind(playlist_id, track_id, position, added_at);
        let query = diesel::insert_into(playlist_track::table).values(&insertable);
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        Ok(Membership {
            track_id,
            position,
            added_at,
        })
    }

    fn update_membership_position(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
        position: Position,
    ) -> RepoResult<()> {
        use playlist_track_db::schema::*;
        let target = playlist_track::table
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .filter(playlist_track::track_id.eq(RowId::from(track_id)));
        let query = diesel::update(target).set(playlist_track::position.eq(position));
        let rows_affected = query.execute(self.as_mut()).map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        if rows_affected < 1 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn delete_membership(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
    ) -> RepoResult<Position> {
        use playlist_track_db::schema::*;
        let Membership { position, .. } = self.load_membership(playlist_id, track_id)?;
        let target = playlist_track::table
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .filter(playlist_track::track_id.eq(RowId::from(track_id)));
        let rows_affected = diesel::delete(target)
            .execute(self.as_mut())
            .map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        Ok(position)
    }
}

/// Update the positions of the given rows one by one.
///
/// The position column cannot be shifted by a single SQL statement.
/// The update would fail with a UNIQUE constraint violation if the
/// rows are not updated in an order that ensures uniqueness at any
/// time, i.e. descending positions when incrementing and ascending
/// positions when decrementing.
fn shift_rows_by_one(
    db: &mut crate::prelude::Connection<'_>,
    row_ids: Vec<RowId>,
    increment: bool,
) -> RepoResult<usize> {
    use playlist_track_db::schema::*;
    let mut rows_updated = 0;
    for row_id in row_ids {
        let target = playlist_track::table.filter(playlist_track::row_id.eq(row_id));
        rows_updated += if increment {
            diesel::update(target)
                .set(playlist_track::position.eq(playlist_track::position + 1_i64))
                .execute(db.as_mut())
        } else {
            diesel::update(target)
                .set(playlist_track::position.eq(playlist_track::position - 1_i64))
                .execute(db.as_mut())
        }
        .map_err(repo_error)?;
    }
    Ok(rows_updated)
}

impl<'db> PositionShiftRepo for crate::prelude::Connection<'db> {
    fn shift_positions_up(
        &mut self,
        playlist_id: RecordId,
        from_position: Position,
    ) -> RepoResult<usize> {
        use playlist_track_db::schema::*;
        let row_ids = playlist_track::table
            .select(playlist_track::row_id)
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .filter(playlist_track::position.ge(from_position))
            .order_by(playlist_track::position.desc())
            .load::<RowId>(self.as_mut())
            .map_err(repo_error)?;
        shift_rows_by_one(self, row_ids, true)
    }

    fn shift_positions_down(
        &mut self,
        playlist_id: RecordId,
        above_position: Position,
    ) -> RepoResult<usize> {
        use playlist_track_db::schema::*;
        let row_ids = playlist_track::table
            .select(playlist_track::row_id)
            .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
            .filter(playlist_track::position.gt(above_position))
            .order_by(playlist_track::position.asc())
            .load::<RowId>(self.as_mut())
            .map_err(repo_error)?;
        shift_rows_by_one(self, row_ids, false)
    }

    fn shift_positions_between(
        &mut self,
        playlist_id: RecordId,
        from_position: Position,
        to_position: Position,
    ) -> RepoResult<usize> {
        use playlist_track_db::schema::*;
        if from_position == to_position {
            return Ok(0);
        }
        let (row_ids, increment) = if from_position < to_position {
            // Moving forward: close the vacated slot by pulling
            // (from, to] one position back.
            let row_ids = playlist_track::table
                .select(playlist_track::row_id)
                .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
                .filter(playlist_track::position.gt(from_position))
                .filter(playlist_track::position.le(to_position))
                .order_by(playlist_track::position.asc())
                .load::<RowId>(self.as_mut())
                .map_err(repo_error)?;
            (row_ids, false)
        } else {
            // Moving backward: push [to, from) one position forward.
            let row_ids = playlist_track::table
                .select(playlist_track::row_id)
                .filter(playlist_track::playlist_id.eq(RowId::from(playlist_id)))
                .filter(playlist_track::position.ge(to_position))
                .filter(playlist_track::position.lt(from_position))
                .order_by(playlist_track::position.desc())
                .load::<RowId>(self.as_mut())
                .map_err(repo_error)?;
            (row_ids, true)
        };
        shift_rows_by_one(self, row_ids, increment)
    }
}

#[cfg(test)]
mod tests;
