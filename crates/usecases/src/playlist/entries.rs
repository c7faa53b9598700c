// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ordered playlist memberships.
//!
//! The positions of the N memberships of a playlist are always exactly
//! `1..=N`. Every mutation below restores that density before it
//! returns and must therefore run inside a single transaction.

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{
    playlist::{
        Membership, MembershipRepo, MembershipWithTrack, Position, PositionShiftRepo,
        RecordId as PlaylistId, Repo as PlaylistRepo,
    },
    prelude::*,
    track::{RecordId as TrackId, Repo as TrackRepo},
    user::RecordId as UserId,
};

use crate::{Conflict, Error, Result, What};

fn require_playlist<R>(repo: &mut R, playlist_id: PlaylistId) -> Result<UserId>
where
    R: PlaylistRepo,
{
    let Some((_, owner_id, _)) = repo.load_playlist(playlist_id).optional()? else {
        return Err(Error::NotFound(What::Playlist));
    };
    Ok(owner_id)
}

fn require_owned_playlist<R>(
    repo: &mut R,
    actor: UserId,
    playlist_id: PlaylistId,
) -> Result<()>
where
    R: PlaylistRepo,
{
    let owner_id = require_playlist(repo, playlist_id)?;
    if owner_id != actor {
        return Err(Error::PermissionDenied);
    }
    Ok(())
}

/// All memberships of the playlist ascending by position, joined with
/// the track data needed for display.
pub fn list<R>(
    repo: &mut R,
    playlist_id: PlaylistId,
    limit: Option<u64>,
) -> Result<Vec<MembershipWithTrack>>
where
    R: PlaylistRepo + MembershipRepo,
{
    require_playlist(repo, playlist_id)?;
    repo.list_memberships(playlist_id, limit).map_err(Into::into)
}

/// Add a track to the playlist.
///
/// Without a requested position the track is appended. A requested
/// position within `1..=last` opens a slot by shifting the tail;
/// anything outside `1..=last+1` is normalized to an append.
pub fn add<R>(
    repo: &mut R,
    actor: UserId,
    playlist_id: PlaylistId,
    track_id: TrackId,
    requested_position: Option<Position>,
    now: UtcDateTimeMs,
) -> Result<Membership>
where
    R: PlaylistRepo + TrackRepo + MembershipRepo + PositionShiftRepo,
{
    require_owned_playlist(repo, actor, playlist_id)?;
    if repo.load_track(track_id).optional()?.is_none() {
        return Err(Error::NotFound(What::Track));
    }
    if repo
        .load_membership(playlist_id, track_id)
        .optional()?
        .is_some()
    {
        return Err(Conflict::AlreadyMember.into());
    }
    let last_position = repo.last_position(playlist_id)?;
    let position = match requested_position {
        Some(position) if (1..=last_position).contains(&position) => {
            let rows_shifted = repo.shift_positions_up(playlist_id, position)?;
            log::debug!(
                "Opened slot {position} in playlist {playlist_id} by shifting {rows_shifted} \
                 membership(s)"
            );
            position
        }
        _ => last_position + 1,
    };
    repo.insert_membership(playlist_id, track_id, position, now)
        .map_err(Into::into)
}

/// Move a membership to another position.
///
/// The moved row is parked at position 0 while the positions between
/// its old and new slot are shifted towards the old one, keeping the
/// per-playlist position uniqueness intact at every statement.
pub fn move_to<R>(
    repo: &mut R,
    actor: UserId,
    playlist_id: PlaylistId,
    track_id: TrackId,
    new_position: Position,
) -> Result<()>
where
    R: PlaylistRepo + MembershipRepo + PositionShiftRepo,
{
    require_owned_playlist(repo, actor, playlist_id)?;
    let Some(membership) = repo.load_membership(playlist_id, track_id).optional()? else {
        return Err(Error::NotFound(What::Membership));
    };
    if new_position == membership.position {
        return Err(Conflict::PositionUnchanged.into());
    }
    let last_position = repo.last_position(playlist_id)?;
    if !(1..=last_position).contains(&new_position) {
        return Err(Conflict::PositionOutOfRange.into());
    }
    repo.update_membership_position(playlist_id, track_id, 0)?;
    repo.shift_positions_between(playlist_id, membership.position, new_position)?;
    repo.update_membership_position(playlist_id, track_id, new_position)?;
    log::debug!(
        "Moved track {track_id} in playlist {playlist_id} from position {old_position} to \
         {new_position}",
        old_position = membership.position,
    );
    Ok(())
}

/// Remove a membership and close the gap it leaves behind.
pub fn remove<R>(
    repo: &mut R,
    actor: UserId,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<()>
where
    R: PlaylistRepo + MembershipRepo + PositionShiftRepo,
{
    require_owned_playlist(repo, actor, playlist_id)?;
    let removed_position = match repo.delete_membership(playlist_id, track_id) {
        Ok(position) => position,
        Err(RepoError::NotFound) => return Err(Error::NotFound(What::Membership)),
        Err(err) => return Err(err.into()),
    };
    let rows_shifted = repo.shift_positions_down(playlist_id, removed_position)?;
    log::debug!(
        "Removed track {track_id} from position {removed_position} of playlist {playlist_id}, \
         shifting {rows_shifted} membership(s)"
    );
    Ok(())
}
