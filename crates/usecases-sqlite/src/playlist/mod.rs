// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::Connection as _;

use phonotek_core::{playlist::Playlist, util::clock::UtcDateTimeMs};
use phonotek_repo::{playlist::RecordId as PlaylistId, user::RecordId as UserId};
use phonotek_repo_sqlite::DbConnection;
use phonotek_usecases as uc;
use uc::collab::FileStore;

use crate::{transaction_error, RepoConnection, Result, TransactionError};

pub mod entries;

pub fn create(
    connection: &mut DbConnection,
    owner_id: UserId,
    new_playlist: &Playlist,
) -> Result<PlaylistId> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::playlist::create_playlist(&mut repo, owner_id, new_playlist, now)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn purge(
    connection: &mut DbConnection,
    files: &impl FileStore,
    actor: UserId,
    playlist_id: PlaylistId,
) -> Result<()> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::playlist::purge_playlist(&mut repo, files, actor, playlist_id)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn change_image(
    connection: &mut DbConnection,
    files: &impl FileStore,
    actor: UserId,
    playlist_id: PlaylistId,
    image_file: Option<&str>,
) -> Result<()> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::playlist::change_playlist_image(
                &mut repo,
                files,
                actor,
                playlist_id,
                image_file,
                now,
            )
            .map_err(transaction_error)
        })
        .map_err(Into::into)
}
