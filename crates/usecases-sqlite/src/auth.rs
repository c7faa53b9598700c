// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::Connection as _;

use phonotek_core::util::clock::UtcDateTimeMs;
use phonotek_repo::{token::TokenId, user::RecordId as UserId};
use phonotek_repo_sqlite::DbConnection;
use phonotek_usecases as uc;
use uc::auth::{Authenticated, Config, TokenPair};

use crate::{transaction_error, RepoConnection, Result, TransactionError};

pub fn issue(connection: &mut DbConnection, config: &Config, user_id: UserId) -> Result<TokenPair> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::auth::issue_tokens(&mut repo, config, user_id, now).map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn validate_access(
    connection: &mut DbConnection,
    config: &Config,
    presented: &str,
) -> Result<Authenticated> {
    let now = UtcDateTimeMs::now();
    let mut repo = RepoConnection::new(connection);
    uc::auth::validate_access(&mut repo, config, presented, now).map_err(Into::into)
}

/// Redeem a refresh credential for a successor pair. The deletion of
/// the old row and the insertion of the new one commit together, so
/// the presented value can never be redeemed twice.
pub fn rotate(
    connection: &mut DbConnection,
    config: &Config,
    presented: &str,
) -> Result<TokenPair> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::auth::rotate_tokens(&mut repo, config, presented, now).map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn revoke(connection: &mut DbConnection, token_id: &TokenId) -> Result<()> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::auth::revoke_token(&mut repo, token_id).map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn revoke_all(connection: &mut DbConnection, user_id: UserId) -> Result<usize> {
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::auth::revoke_all_tokens(&mut repo, user_id).map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn sweep_expired(connection: &mut DbConnection) -> Result<usize> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::auth::sweep_expired_tokens(&mut repo, now).map_err(transaction_error)
        })
        .map_err(Into::into)
}
