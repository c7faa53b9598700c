// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{user::User, util::clock::UtcDateTimeMs};
use phonotek_repo::{
    prelude::*,
    user::{RecordId as UserId, Repo},
};

use crate::{Conflict, Error, Result, What};

/// Create a user account.
///
/// Name and e-mail address are unique across the catalog; uniqueness
/// is checked inside the caller's transaction, so the subsequent
/// insert cannot race against another writer.
pub fn create_user<R>(repo: &mut R, new_user: &User, now: UtcDateTimeMs) -> Result<UserId>
where
    R: Repo,
{
    crate::validate_input(new_user, What::User)?;
    if repo
        .resolve_user_id_by_email(&new_user.email)
        .optional()?
        .is_some()
    {
        return Err(Conflict::EmailTaken.into());
    }
    // With the e-mail address already checked a remaining uniqueness
    // violation can only concern the name.
    let user_id = repo.insert_user(now, new_user).map_err(|err| match err {
        RepoError::Conflict => Error::Conflict(Conflict::NameTaken),
        err => err.into(),
    })?;
    log::info!("Created user {user_id}");
    Ok(user_id)
}

pub fn load_user<R>(repo: &mut R, user_id: UserId) -> Result<User>
where
    R: Repo,
{
    let Some((_, user)) = repo.load_user(user_id).optional()? else {
        return Err(Error::NotFound(What::User));
    };
    Ok(user)
}

/// Replace the user's e-mail address.
///
/// The new address starts out unverified and must be unique across the
/// catalog. The caller is expected to revoke all outstanding
/// credentials of the user within the same transaction.
pub fn change_email<R>(
    repo: &mut R,
    user_id: UserId,
    new_email: &str,
    now: UtcDateTimeMs,
) -> Result<()>
where
    R: Repo,
{
    let Some((_, user)) = repo.load_user(user_id).optional()? else {
        return Err(Error::NotFound(What::User));
    };
    let updated_user = User {
        email: new_email.to_owned(),
        verified: false,
        ..user
    };
    crate::validate_input(&updated_user, What::User)?;
    if let Some(existing_id) = repo.resolve_user_id_by_email(new_email).optional()? {
        if existing_id != user_id {
            return Err(Conflict::EmailTaken.into());
        }
    }
    repo.update_user_email(user_id, now, new_email)?;
    log::info!("Changed e-mail address of user {user_id}");
    Ok(())
}

/// Mark the user's e-mail address as verified.
pub fn verify_email<R>(repo: &mut R, user_id: UserId, now: UtcDateTimeMs) -> Result<()>
where
    R: Repo,
{
    repo.update_user_verified(user_id, now, true)
        .optional()?
        .ok_or(Error::NotFound(What::User))?;
    log::info!("Verified e-mail address of user {user_id}");
    Ok(())
}
