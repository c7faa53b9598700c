// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Track lifecycle operations.
//!
//! These operations combine relational writes with calls to external
//! collaborators. The relational part happens first and is rolled back
//! by the caller's transaction when a later external call fails. The
//! external effects themselves are not compensated: when the second of
//! two external calls fails, the first one has already happened and
//! survives the rollback.

use phonotek_core::{track::Track, util::clock::UtcDateTimeMs};
use phonotek_repo::{
    prelude::*,
    track::{RecordId as TrackId, Repo},
    user::{RecordId as UserId, Repo as UserRepo},
};

use crate::{
    collab::{EmailMessage, FileCategory, FileStore, Notifications, SearchIndex},
    Conflict, Error, Result, What,
};

/// Create a track, index it for search, and notify the uploader.
pub fn create_track<R, Search, Notify>(
    repo: &mut R,
    search: &Search,
    notifications: &Notify,
    owner_id: UserId,
    new_track: &Track,
    now: UtcDateTimeMs,
) -> Result<TrackId>
where
    R: Repo + UserRepo,
    Search: SearchIndex,
    Notify: Notifications,
{
    crate::validate_input(new_track, What::Track)?;
    let Some((_, owner)) = repo.load_user(owner_id).optional()? else {
        return Err(Error::NotFound(What::User));
    };
    if repo
        .resolve_track_id_by_title(owner_id, &new_track.title)
        .optional()?
        .is_some()
    {
        return Err(Conflict::TitleTaken.into());
    }
    if repo
        .resolve_track_id_by_slug(owner_id, &new_track.slug)
        .optional()?
        .is_some()
    {
        return Err(Conflict::SlugTaken.into());
    }
    let track_id = repo.insert_track(owner_id, now, new_track)?;
    search
        .upsert_track(track_id, &new_track.title)
        .map_err(Error::Internal)?;
    // Known gap: the search upsert above is not compensated when the
    // notification below fails and the row insert is rolled back.
    let message = EmailMessage {
        subject: "Your track is live".into(),
        body: format!("\"{title}\" has been published.", title = new_track.title),
    };
    crate::collab::enqueue_email_with_retry(notifications, &owner.email, &message)?;
    log::info!("Created track {track_id} for user {owner_id}");
    Ok(track_id)
}

/// Purge a track with its memberships, drop it from the search index,
/// and delete its stored objects.
pub fn purge_track<R, Search, Files>(
    repo: &mut R,
    search: &Search,
    files: &Files,
    actor: UserId,
    track_id: TrackId,
) -> Result<()>
where
    R: Repo,
    Search: SearchIndex,
    Files: FileStore,
{
    let Some((_, owner_id, track)) = repo.load_track(track_id).optional()? else {
        return Err(Error::NotFound(What::Track));
    };
    if owner_id != actor {
        return Err(Error::PermissionDenied);
    }
    repo.purge_track(track_id)?;
    search.delete_track(track_id).map_err(Error::Internal)?;
    // Known gap: once the index delete has happened it is not restored
    // when one of the object deletions below fails.
    files
        .delete_file(&track.audio_file, FileCategory::Audio)
        .map_err(Error::Internal)?;
    files
        .delete_file(&track.image_file, FileCategory::Image)
        .map_err(Error::Internal)?;
    log::info!("Purged track {track_id}");
    Ok(())
}

/// Rename a track and update its search index entry.
pub fn rename_track<R, Search>(
    repo: &mut R,
    search: &Search,
    actor: UserId,
    track_id: TrackId,
    new_title: &str,
    now: UtcDateTimeMs,
) -> Result<()>
where
    R: Repo,
    Search: SearchIndex,
{
    let Some((_, owner_id, _)) = repo.load_track(track_id).optional()? else {
        return Err(Error::NotFound(What::Track));
    };
    if owner_id != actor {
        return Err(Error::PermissionDenied);
    }
    if let Some(existing_id) = repo
        .resolve_track_id_by_title(owner_id, new_title)
        .optional()?
    {
        if existing_id != track_id {
            return Err(Conflict::TitleTaken.into());
        }
    }
    repo.update_track_title(track_id, now, new_title)?;
    search
        .upsert_track(track_id, new_title)
        .map_err(Error::Internal)?;
    Ok(())
}

/// Count one playback of the track.
pub fn register_play<R>(repo: &mut R, track_id: TrackId) -> Result<()>
where
    R: Repo,
{
    repo.register_track_play(track_id)
        .optional()?
        .ok_or(Error::NotFound(What::Track))
}
