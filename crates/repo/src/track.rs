// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{track::Track, util::clock::UtcDateTimeMs, Slug};

use crate::{prelude::*, user::RecordId as UserId};

record_id_newtype!(RecordId);

pub type RecordHeader = crate::RecordHeader<RecordId>;

pub trait Repo {
    fn insert_track(
        &mut self,
        owner_id: UserId,
        created_at: UtcDateTimeMs,
        created_track: &Track,
    ) -> RepoResult<RecordId>;

    fn load_track(&mut self, id: RecordId) -> RepoResult<(RecordHeader, UserId, Track)>;

    fn resolve_track_id_by_title(&mut self, owner_id: UserId, title: &str)
        -> RepoResult<RecordId>;

    fn resolve_track_id_by_slug(&mut self, owner_id: UserId, slug: &Slug) -> RepoResult<RecordId>;

    fn update_track_title(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        title: &str,
    ) -> RepoResult<()>;

    /// Increment the play counter by one.
    fn register_track_play(&mut self, id: RecordId) -> RepoResult<()>;

    /// Purge the track.
    ///
    /// Purging is recursive and affects all relationships, i.e. all
    /// memberships referencing this track are deleted along with it,
    /// e.g. through ON DELETE CASCADE constraints in an SQL database.
    fn purge_track(&mut self, id: RecordId) -> RepoResult<()>;
}
