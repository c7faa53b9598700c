// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::Connection as _;

use phonotek_core::{track::Track, util::clock::UtcDateTimeMs};
use phonotek_repo::{track::RecordId as TrackId, user::RecordId as UserId};
use phonotek_repo_sqlite::DbConnection;
use phonotek_usecases as uc;
use uc::collab::{FileStore, Notifications, SearchIndex};

use crate::{transaction_error, RepoConnection, Result, TransactionError};

pub fn create(
    connection: &mut DbConnection,
    search: &impl SearchIndex,
    notifications: &impl Notifications,
    owner_id: UserId,
    new_track: &Track,
) -> Result<TrackId> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::track::create_track(&mut repo, search, notifications, owner_id, new_track, now)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn purge(
    connection: &mut DbConnection,
    search: &impl SearchIndex,
    files: &impl FileStore,
    actor: UserId,
    track_id: TrackId,
) -> Result<()> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::track::purge_track(&mut repo, search, files, actor, track_id)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn rename(
    connection: &mut DbConnection,
    search: &impl SearchIndex,
    actor: UserId,
    track_id: TrackId,
    new_title: &str,
) -> Result<()> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::track::rename_track(&mut repo, search, actor, track_id, new_title, now)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn register_play(connection: &mut DbConnection, track_id: TrackId) -> Result<()> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::track::register_play(&mut repo, track_id).map_err(transaction_error)
        })
        .map_err(Into::into)
}
