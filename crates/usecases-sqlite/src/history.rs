// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::Connection as _;

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{
    history::ListenWithTrack, track::RecordId as TrackId, user::RecordId as UserId,
};
use phonotek_repo_sqlite::DbConnection;
use phonotek_usecases as uc;

use crate::{transaction_error, RepoConnection, Result, TransactionError};

pub fn log_listen(
    connection: &mut DbConnection,
    user_id: UserId,
    track_id: TrackId,
) -> Result<()> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::history::log_listen(&mut repo, user_id, track_id, now).map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn list_recently_played(
    connection: &mut DbConnection,
    user_id: UserId,
    limit: Option<u64>,
) -> Result<Vec<ListenWithTrack>> {
    let mut repo = RepoConnection::new(connection);
    uc::history::list_recently_played(&mut repo, user_id, limit).map_err(Into::into)
}

pub fn clear(connection: &mut DbConnection, user_id: UserId) -> Result<usize> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::history::clear_history(&mut repo, user_id).map_err(transaction_error)
        })
        .map_err(Into::into)
}
