// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Credential issuance and rotation.
//!
//! A credential pair consists of an access and a refresh value that
//! share one token id and expiry. Both values encode the same signed
//! claims; what distinguishes them is how they are validated. The
//! access path only requires a live row for the token id, while the
//! refresh path additionally compares the presented value against the
//! stored one and rotates the pair on use.

use std::{fmt, result::Result as StdResult, time::Duration};

use data_encoding::BASE64URL_NOPAD;
use rand::RngCore as _;
use serde::{Deserialize, Serialize};

use phonotek_core::util::clock::{TimestampMillis, UtcDateTimeMs};
use phonotek_repo::{
    prelude::*,
    token::{Record, Repo as TokenRepo, TokenId},
    user::RecordId as UserId,
};

use crate::{AuthInvalidity, Result};

/// Number of random bytes in a freshly minted token id.
const TOKEN_ID_LEN: usize = 24;

#[derive(Clone)]
pub struct Config {
    pub signing_key: [u8; blake3::KEY_LEN],

    /// Time to live of both the access and the refresh credential.
    pub token_ttl: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak the signing key into logs.
        f.debug_struct("Config")
            .field("signing_key", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// The signed claims payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Claims {
    pub user_id: i64,
    pub token_id: String,
    pub issued_at: TimestampMillis,
    pub expires_at: TimestampMillis,
}

/// A freshly issued credential pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
    pub token_id: TokenId,
    pub access: String,
    pub refresh: String,
    pub expires_at: UtcDateTimeMs,
}

/// The outcome of a successful access validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated {
    pub user_id: UserId,
    pub token_id: TokenId,
}

fn new_token_id() -> TokenId {
    let mut bytes = [0u8; TOKEN_ID_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    TokenId::from(BASE64URL_NOPAD.encode(&bytes))
}

fn encode_token(config: &Config, claims: &Claims) -> Result<String> {
    let payload = serde_json::to_vec(claims)
        .map_err(|err| anyhow::Error::from(err).context("failed to encode claims"))?;
    let mac = blake3::keyed_hash(&config.signing_key, &payload);
    Ok(format!(
        "{payload}.{mac}",
        payload = BASE64URL_NOPAD.encode(&payload),
        mac = BASE64URL_NOPAD.encode(mac.as_bytes())
    ))
}

fn decode_token(config: &Config, value: &str) -> StdResult<Claims, AuthInvalidity> {
    let Some((payload, mac)) = value.split_once('.') else {
        return Err(AuthInvalidity::Malformed);
    };
    let payload = BASE64URL_NOPAD
        .decode(payload.as_bytes())
        .map_err(|_| AuthInvalidity::Malformed)?;
    let mac: [u8; blake3::OUT_LEN] = BASE64URL_NOPAD
        .decode(mac.as_bytes())
        .map_err(|_| AuthInvalidity::Malformed)?
        .as_slice()
        .try_into()
        .map_err(|_| AuthInvalidity::Malformed)?;
    let expected = blake3::keyed_hash(&config.signing_key, &payload);
    // blake3::Hash compares in constant time.
    if expected != blake3::Hash::from(mac) {
        return Err(AuthInvalidity::BadSignature);
    }
    serde_json::from_slice(&payload).map_err(|_| AuthInvalidity::Malformed)
}

fn verify_expiry(claims: &Claims, now: UtcDateTimeMs) -> StdResult<(), AuthInvalidity> {
    let expires_at = UtcDateTimeMs::from_unix_timestamp_millis(claims.expires_at);
    // A credential is valid strictly before its expiry instant.
    if now.is_before(expires_at) {
        Ok(())
    } else {
        Err(AuthInvalidity::Expired)
    }
}

/// Issue a fresh credential pair for the user and persist its row.
///
/// The access and the refresh value encode identical claims with the
/// shared expiry, so both deserialize to the same [`Claims`]. This
/// mirrors how the pair has always been issued and is relied upon by
/// clients that inspect the payload.
pub fn issue_tokens<Repo>(
    repo: &mut Repo,
    config: &Config,
    user_id: UserId,
    now: UtcDateTimeMs,
) -> Result<TokenPair>
where
    Repo: TokenRepo,
{
    let token_id = new_token_id();
    let ttl_millis =
        TimestampMillis::try_from(config.token_ttl.as_millis()).unwrap_or(TimestampMillis::MAX);
    let expires_at = UtcDateTimeMs::from_unix_timestamp_millis(
        now.unix_timestamp_millis().saturating_add(ttl_millis),
    );
    let claims = Claims {
        user_id: user_id.into(),
        token_id: token_id.as_str().to_owned(),
        issued_at: now.unix_timestamp_millis(),
        expires_at: expires_at.unix_timestamp_millis(),
    };
    let access = encode_token(config, &claims)?;
    let refresh = encode_token(config, &claims)?;
    let record = Record {
        user_id,
        refresh_value: refresh.clone(),
        expires_at,
    };
    repo.insert_token(&token_id, now, &record)?;
    log::debug!("Issued credential pair {token_id} for user {user_id}");
    Ok(TokenPair {
        token_id,
        access,
        refresh,
        expires_at,
    })
}

/// Validate a presented access credential.
///
/// Requires a valid signature, an unexpired claims payload, and a live
/// row for the token id. The stored refresh value is deliberately not
/// compared on this path; see the module docs.
pub fn validate_access<Repo>(
    repo: &mut Repo,
    config: &Config,
    presented: &str,
    now: UtcDateTimeMs,
) -> Result<Authenticated>
where
    Repo: TokenRepo,
{
    let claims = decode_token(config, presented)?;
    verify_expiry(&claims, now)?;
    let token_id = TokenId::from(claims.token_id);
    let record = repo.load_token(&token_id).optional()?;
    if record.is_none() {
        log::debug!("No live row for presented access credential {token_id}");
        return Err(AuthInvalidity::Revoked.into());
    }
    Ok(Authenticated {
        user_id: claims.user_id.into(),
        token_id,
    })
}

/// Rotate a credential pair on presentation of its refresh value.
///
/// The presented value must match the stored one verbatim; a mismatch
/// means the value has already been used (or never issued) and the
/// rotation is refused. The old row is deleted and a successor pair is
/// issued within the caller's transaction, so a refresh value is
/// redeemable at most once.
pub fn rotate_tokens<Repo>(
    repo: &mut Repo,
    config: &Config,
    presented: &str,
    now: UtcDateTimeMs,
) -> Result<TokenPair>
where
    Repo: TokenRepo,
{
    let claims = decode_token(config, presented)?;
    verify_expiry(&claims, now)?;
    let token_id = TokenId::from(claims.token_id);
    let Some(record) = repo.load_token(&token_id).optional()? else {
        log::debug!("No live row for presented refresh credential {token_id}");
        return Err(AuthInvalidity::Revoked.into());
    };
    if record.refresh_value != presented {
        log::warn!("Replayed refresh credential {token_id} for user {}", record.user_id);
        return Err(AuthInvalidity::Replayed.into());
    }
    let rows_deleted = repo.delete_token(&token_id)?;
    debug_assert_eq!(1, rows_deleted);
    issue_tokens(repo, config, record.user_id, now)
}

/// Revoke a single credential pair. Idempotent.
pub fn revoke_token<Repo>(repo: &mut Repo, token_id: &TokenId) -> Result<()>
where
    Repo: TokenRepo,
{
    let rows_deleted = repo.delete_token(token_id)?;
    if rows_deleted > 0 {
        log::debug!("Revoked credential pair {token_id}");
    }
    Ok(())
}

/// Revoke all credential pairs of the user, i.e. logout everywhere.
/// Returns the number of revoked pairs.
pub fn revoke_all_tokens<Repo>(repo: &mut Repo, user_id: UserId) -> Result<usize>
where
    Repo: TokenRepo,
{
    let rows_deleted = repo.delete_all_user_tokens(user_id)?;
    log::debug!("Revoked {rows_deleted} credential pair(s) of user {user_id}");
    Ok(rows_deleted)
}

/// Delete all rows that are no longer usable at `now`. Idempotent.
/// Returns the number of swept rows.
pub fn sweep_expired_tokens<Repo>(repo: &mut Repo, now: UtcDateTimeMs) -> Result<usize>
where
    Repo: TokenRepo,
{
    let rows_deleted = repo.delete_expired_tokens(now)?;
    if rows_deleted > 0 {
        log::info!("Swept {rows_deleted} expired credential pair(s)");
    }
    Ok(rows_deleted)
}
