// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::Connection as _;

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{
    playlist::{Membership, MembershipWithTrack, Position, RecordId as PlaylistId},
    track::RecordId as TrackId,
    user::RecordId as UserId,
};
use phonotek_repo_sqlite::DbConnection;
use phonotek_usecases as uc;

use crate::{transaction_error, RepoConnection, Result, TransactionError};

pub fn list(
    connection: &mut DbConnection,
    playlist_id: PlaylistId,
    limit: Option<u64>,
) -> Result<Vec<MembershipWithTrack>> {
    let mut repo = RepoConnection::new(connection);
    uc::playlist::entries::list(&mut repo, playlist_id, limit).map_err(Into::into)
}

pub fn add(
    connection: &mut DbConnection,
    actor: UserId,
    playlist_id: PlaylistId,
    track_id: TrackId,
    requested_position: Option<Position>,
) -> Result<Membership> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::playlist::entries::add(
                &mut repo,
                actor,
                playlist_id,
                track_id,
                requested_position,
                now,
            )
            .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn move_to(
    connection: &mut DbConnection,
    actor: UserId,
    playlist_id: PlaylistId,
    track_id: TrackId,
    new_position: Position,
) -> Result<()> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::playlist::entries::move_to(&mut repo, actor, playlist_id, track_id, new_position)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn remove(
    connection: &mut DbConnection,
    actor: UserId,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<()> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::playlist::entries::remove(&mut repo, actor, playlist_id, track_id)
                .map_err(transaction_error)
        })
        .map_err(Into::into)
}
