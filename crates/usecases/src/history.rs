// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{
    history::{ListenWithTrack, Repo},
    prelude::*,
    track::{RecordId as TrackId, Repo as TrackRepo},
    user::{RecordId as UserId, Repo as UserRepo},
};

use crate::{Error, Result, What};

/// Record a playback in the user's listening history.
///
/// The history holds at most one entry per track; listening again
/// refreshes the timestamp. Play counting is a separate operation and
/// deliberately not coupled to the history.
pub fn log_listen<R>(
    repo: &mut R,
    user_id: UserId,
    track_id: TrackId,
    now: UtcDateTimeMs,
) -> Result<()>
where
    R: Repo + TrackRepo,
{
    if repo.load_track(track_id).optional()?.is_none() {
        return Err(Error::NotFound(What::Track));
    }
    repo.upsert_listen(user_id, track_id, now)?;
    Ok(())
}

/// The user's listening history, most recent first.
pub fn list_recently_played<R>(
    repo: &mut R,
    user_id: UserId,
    limit: Option<u64>,
) -> Result<Vec<ListenWithTrack>>
where
    R: Repo + UserRepo,
{
    if repo.load_user(user_id).optional()?.is_none() {
        return Err(Error::NotFound(What::User));
    }
    Ok(repo.list_listens(user_id, limit)?)
}

/// Erase the user's listening history. Idempotent.
/// Returns the number of erased listens.
pub fn clear_history<R>(repo: &mut R, user_id: UserId) -> Result<usize>
where
    R: Repo,
{
    let rows_deleted = repo.delete_all_user_listens(user_id)?;
    if rows_deleted > 0 {
        log::info!("Erased {rows_deleted} listen(s) of user {user_id}");
    }
    Ok(rows_deleted)
}
