// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{
    playlist::Playlist,
    util::clock::{TimestampMillis, UtcDateTimeMs},
};

use crate::{prelude::*, track::RecordId as TrackId, user::RecordId as UserId};

record_id_newtype!(RecordId);

pub type RecordHeader = crate::RecordHeader<RecordId>;

/// 1-based rank of a track within a playlist.
///
/// For a playlist with `N` memberships the live positions are exactly
/// `1..=N`, without gaps or duplicates.
pub type Position = i64;

/// One playlist↔track link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    pub track_id: TrackId,
    pub position: Position,
    pub added_at: UtcDateTimeMs,
}

/// A membership joined with the track data needed for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipWithTrack {
    pub membership: Membership,
    pub title: String,
    pub artist: String,
    pub image_file: String,
    pub duration_ms: TimestampMillis,
}

pub trait Repo {
    fn insert_playlist(
        &mut self,
        owner_id: UserId,
        created_at: UtcDateTimeMs,
        created_playlist: &Playlist,
    ) -> RepoResult<RecordId>;

    fn load_playlist(&mut self, id: RecordId) -> RepoResult<(RecordHeader, UserId, Playlist)>;

    fn resolve_playlist_id_by_title(
        &mut self,
        owner_id: UserId,
        title: &str,
    ) -> RepoResult<RecordId>;

    fn resolve_playlist_id_by_slug(
        &mut self,
        owner_id: UserId,
        slug: &phonotek_core::Slug,
    ) -> RepoResult<RecordId>;

    fn update_playlist_image(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        image_file: Option<&str>,
    ) -> RepoResult<()>;

    /// Purge the playlist including all of its memberships.
    fn purge_playlist(&mut self, id: RecordId) -> RepoResult<()>;
}

/// Plain CRUD capability for membership rows.
///
/// Maintaining the density invariant across these operations is the
/// responsibility of the service layer, which combines them with
/// [`PositionShiftRepo`] inside a single transaction.
pub trait MembershipRepo {
    fn load_membership(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
    ) -> RepoResult<Membership>;

    /// All memberships of the playlist ascending by position,
    /// optionally limited.
    fn list_memberships(
        &mut self,
        playlist_id: RecordId,
        limit: Option<u64>,
    ) -> RepoResult<Vec<MembershipWithTrack>>;

    fn count_memberships(&mut self, playlist_id: RecordId) -> RepoResult<usize>;

    /// The current maximum position, i.e. 0 if the playlist is empty.
    fn last_position(&mut self, playlist_id: RecordId) -> RepoResult<Position>;

    fn insert_membership(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
        position: Position,
        added_at: UtcDateTimeMs,
    ) -> RepoResult<Membership>;

    fn update_membership_position(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
        position: Position,
    ) -> RepoResult<()>;

    /// Delete the membership row and return its last position.
    fn delete_membership(
        &mut self,
        playlist_id: RecordId,
        track_id: TrackId,
    ) -> RepoResult<Position>;
}

/// Position-shifting capability, separate from the CRUD capability.
///
/// Every intermediate statement of a shift must keep the per-playlist
/// position uniqueness intact, so implementations are expected to order
/// their row updates accordingly.
pub trait PositionShiftRepo {
    /// Increment every `position >= from_position` by 1 ("open a slot").
    ///
    /// Returns the number of shifted rows.
    fn shift_positions_up(
        &mut self,
        playlist_id: RecordId,
        from_position: Position,
    ) -> RepoResult<usize>;

    /// Decrement every `position > above_position` by 1 (close the gap
    /// left behind by a removal).
    ///
    /// Returns the number of shifted rows.
    fn shift_positions_down(
        &mut self,
        playlist_id: RecordId,
        above_position: Position,
    ) -> RepoResult<usize>;

    /// Shift the positions strictly between an occupied `from` slot and
    /// its `to` destination by one towards `from`, i.e. decrement
    /// `(from, to]` when moving forward and increment `[to, from)` when
    /// moving backward. A no-op when `from == to`.
    ///
    /// The row occupying `from` is not touched; the caller is expected
    /// to have parked it outside the live range beforehand.
    fn shift_positions_between(
        &mut self,
        playlist_id: RecordId,
        from_position: Position,
        to_position: Position,
    ) -> RepoResult<usize>;
}
