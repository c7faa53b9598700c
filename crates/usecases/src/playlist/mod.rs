// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{playlist::Playlist, util::clock::UtcDateTimeMs};
use phonotek_repo::{
    playlist::{RecordId as PlaylistId, Repo},
    prelude::*,
    user::RecordId as UserId,
};

use crate::{
    collab::{FileCategory, FileStore},
    Conflict, Error, Result, What,
};

pub mod entries;

/// Load the playlist and require the actor to be its owner.
fn load_owned_playlist<R>(
    repo: &mut R,
    actor: UserId,
    playlist_id: PlaylistId,
) -> Result<Playlist>
where
    R: Repo,
{
    let Some((_, owner_id, playlist)) = repo.load_playlist(playlist_id).optional()? else {
        return Err(Error::NotFound(What::Playlist));
    };
    if owner_id != actor {
        return Err(Error::PermissionDenied);
    }
    Ok(playlist)
}

pub fn create_playlist<R>(
    repo: &mut R,
    owner_id: UserId,
    new_playlist: &Playlist,
    now: UtcDateTimeMs,
) -> Result<PlaylistId>
where
    R: Repo,
{
    crate::validate_input(new_playlist, What::Playlist)?;
    if repo
        .resolve_playlist_id_by_title(owner_id, &new_playlist.title)
        .optional()?
        .is_some()
    {
        return Err(Conflict::TitleTaken.into());
    }
    if repo
        .resolve_playlist_id_by_slug(owner_id, &new_playlist.slug)
        .optional()?
        .is_some()
    {
        return Err(Conflict::SlugTaken.into());
    }
    let playlist_id = repo.insert_playlist(owner_id, now, new_playlist)?;
    log::info!("Created playlist {playlist_id} for user {owner_id}");
    Ok(playlist_id)
}

/// Purge the playlist with all of its memberships and delete its
/// cover image from the object storage.
pub fn purge_playlist<R, Files>(
    repo: &mut R,
    files: &Files,
    actor: UserId,
    playlist_id: PlaylistId,
) -> Result<()>
where
    R: Repo,
    Files: FileStore,
{
    let playlist = load_owned_playlist(repo, actor, playlist_id)?;
    repo.purge_playlist(playlist_id)?;
    if let Some(image_file) = &playlist.image_file {
        // Deleting the object is not transactional. If it fails the
        // row deletion is rolled back and the playlist stays intact.
        files
            .delete_file(image_file, FileCategory::Image)
            .map_err(Error::Internal)?;
    }
    log::info!("Purged playlist {playlist_id}");
    Ok(())
}

/// Replace (or clear) the playlist's cover image reference and delete
/// the previous object.
pub fn change_playlist_image<R, Files>(
    repo: &mut R,
    files: &Files,
    actor: UserId,
    playlist_id: PlaylistId,
    image_file: Option<&str>,
    now: UtcDateTimeMs,
) -> Result<()>
where
    R: Repo,
    Files: FileStore,
{
    let playlist = load_owned_playlist(repo, actor, playlist_id)?;
    repo.update_playlist_image(playlist_id, now, image_file)?;
    if let Some(previous) = &playlist.image_file {
        if image_file != Some(previous.as_str()) {
            files
                .delete_file(previous, FileCategory::Image)
                .map_err(Error::Internal)?;
        }
    }
    Ok(())
}
