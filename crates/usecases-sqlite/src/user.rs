// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::Connection as _;

use phonotek_core::{user::User, util::clock::UtcDateTimeMs};
use phonotek_repo::user::RecordId as UserId;
use phonotek_repo_sqlite::DbConnection;
use phonotek_usecases as uc;
use uc::auth::{Config, TokenPair};

use crate::{transaction_error, RepoConnection, Result, TransactionError};

pub fn create(connection: &mut DbConnection, new_user: &User) -> Result<UserId> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::user::create_user(&mut repo, new_user, now).map_err(transaction_error)
        })
        .map_err(Into::into)
}

pub fn load(connection: &mut DbConnection, user_id: UserId) -> Result<User> {
    let mut repo = RepoConnection::new(connection);
    uc::user::load_user(&mut repo, user_id).map_err(Into::into)
}

/// Replace the user's e-mail address, revoke all live credential
/// pairs, and issue a fresh pair. All three steps commit together, so
/// the old credentials cannot outlive the address they were bound to.
pub fn change_email(
    connection: &mut DbConnection,
    config: &Config,
    user_id: UserId,
    new_email: &str,
) -> Result<TokenPair> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::user::change_email(&mut repo, user_id, new_email, now)
                .map_err(transaction_error)?;
            uc::auth::revoke_all_tokens(&mut repo, user_id).map_err(transaction_error)?;
            uc::auth::issue_tokens(&mut repo, config, user_id, now).map_err(transaction_error)
        })
        .map_err(Into::into)
}

/// Mark the user's e-mail address as verified and revoke all live
/// credential pairs, forcing a fresh login.
pub fn verify_email(connection: &mut DbConnection, user_id: UserId) -> Result<usize> {
    let now = UtcDateTimeMs::now();
    connection
        .transaction::<_, TransactionError, _>(|connection| {
            let mut repo = RepoConnection::new(connection);
            uc::user::verify_email(&mut repo, user_id, now).map_err(transaction_error)?;
            uc::auth::revoke_all_tokens(&mut repo, user_id).map_err(transaction_error)
        })
        .map_err(Into::into)
}
