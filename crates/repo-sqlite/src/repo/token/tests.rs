// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use test_log::test;

use phonotek_core::user::User;
use phonotek_repo::user::Repo as _;

use super::*;
use crate::prelude::tests::*;

struct Fixture {
    db: DbConnection,
    user_id: UserId,
}

impl Fixture {
    fn new() -> TestResult<Self> {
        let mut db = establish_connection()?;
        let mut connection = Connection::new(&mut db);
        let user = User {
            name: "listener".into(),
            email: "listener@example.com".into(),
            verified: true,
        };
        let user_id = connection.insert_user(UtcDateTimeMs::now(), &user)?;
        Ok(Self { db, user_id })
    }

    fn insert_token(&mut self, id: &str, expires_at: UtcDateTimeMs) -> RepoResult<TokenId> {
        let token_id = TokenId::from(id.to_owned());
        let record = Record {
            user_id: self.user_id,
            refresh_value: format!("refresh-{id}"),
            expires_at,
        };
        Connection::new(&mut self.db).insert_token(&token_id, UtcDateTimeMs::now(), &record)?;
        Ok(token_id)
    }
}

fn in_one_hour() -> UtcDateTimeMs {
    let now = UtcDateTimeMs::now();
    UtcDateTimeMs::from_unix_timestamp_millis(now.unix_timestamp_millis() + 3_600_000)
}

#[test]
fn insert_and_load_token() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let expires_at = in_one_hour();
    let token_id = fixture.insert_token("token", expires_at)?;
    let mut connection = Connection::new(&mut fixture.db);
    let record = connection.load_token(&token_id)?;
    assert_eq!(fixture.user_id, record.user_id);
    assert_eq!("refresh-token", record.refresh_value);
    assert_eq!(expires_at, record.expires_at);
    Ok(())
}

#[test]
fn load_unknown_token_fails() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let mut connection = Connection::new(&mut fixture.db);
    let err = connection
        .load_token(&TokenId::from("unknown".to_owned()))
        .expect_err("unknown token");
    assert!(matches!(err, RepoError::NotFound));
    Ok(())
}

#[test]
fn reusing_a_token_id_is_a_conflict() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let expires_at = in_one_hour();
    fixture.insert_token("token", expires_at)?;
    let err = fixture
        .insert_token("token", expires_at)
        .expect_err("duplicate token id");
    assert!(matches!(err, RepoError::Conflict));
    Ok(())
}

#[test]
fn delete_token_only_once() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let token_id = fixture.insert_token("token", in_one_hour())?;
    let mut connection = Connection::new(&mut fixture.db);
    assert_eq!(1, connection.delete_token(&token_id)?);
    assert_eq!(0, connection.delete_token(&token_id)?);
    Ok(())
}

#[test]
fn delete_all_user_tokens() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    fixture.insert_token("first", in_one_hour())?;
    fixture.insert_token("second", in_one_hour())?;
    let other_user = User {
        name: "other".into(),
        email: "other@example.com".into(),
        verified: true,
    };
    let other_token_id = {
        let mut connection = Connection::new(&mut fixture.db);
        let other_user_id = connection.insert_user(UtcDateTimeMs::now(), &other_user)?;
        let token_id = TokenId::from("other".to_owned());
        let record = Record {
            user_id: other_user_id,
            refresh_value: "refresh-other".into(),
            expires_at: in_one_hour(),
        };
        connection.insert_token(&token_id, UtcDateTimeMs::now(), &record)?;
        token_id
    };
    let mut connection = Connection::new(&mut fixture.db);
    assert_eq!(2, connection.delete_all_user_tokens(fixture.user_id)?);
    // Tokens of other users are not affected.
    assert!(connection.load_token(&other_token_id).is_ok());
    Ok(())
}

#[test]
fn delete_expired_tokens_keeps_live_tokens() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let now = UtcDateTimeMs::now();
    let expired_at = UtcDateTimeMs::from_unix_timestamp_millis(now.unix_timestamp_millis() - 1);
    fixture.insert_token("expired", expired_at)?;
    // Tokens are valid strictly before their expiry, so a row expiring
    // right now is unusable and must be swept as well.
    fixture.insert_token("at-boundary", now)?;
    let live_token_id = fixture.insert_token("live", in_one_hour())?;
    let mut connection = Connection::new(&mut fixture.db);
    assert_eq!(2, connection.delete_expired_tokens(now)?);
    assert!(connection.load_token(&live_token_id).is_ok());
    Ok(())
}
