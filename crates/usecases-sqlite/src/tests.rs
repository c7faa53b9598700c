// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::time::Duration;

use test_log::test;

use phonotek_core::{playlist::Playlist, track::Track, user::User};
use phonotek_repo::{
    playlist::RecordId as PlaylistId,
    track::RecordId as TrackId,
    user::RecordId as UserId,
};
use phonotek_storage_sqlite::connection::{Config as StorageConfig, PooledConnection};
use phonotek_usecases::{
    auth::Config,
    collab::{EmailMessage, FileCategory, FileStore, Notifications, SearchIndex},
    AuthInvalidity, Conflict, What,
};

use crate::{auth, database, history, playlist, track, user, Error};

type TestResult<T> = anyhow::Result<T>;

#[derive(Default)]
struct FakeSearchIndex {
    upserts: RefCell<Vec<(TrackId, String)>>,
    deletes: RefCell<Vec<TrackId>>,
    fail: Cell<bool>,
}

impl SearchIndex for FakeSearchIndex {
    fn upsert_track(&self, track_id: TrackId, title: &str) -> anyhow::Result<()> {
        if self.fail.get() {
            anyhow::bail!("search index unavailable");
        }
        self.upserts.borrow_mut().push((track_id, title.to_owned()));
        Ok(())
    }

    fn delete_track(&self, track_id: TrackId) -> anyhow::Result<()> {
        if self.fail.get() {
            anyhow::bail!("search index unavailable");
        }
        self.deletes.borrow_mut().push(track_id);
        Ok(())
    }
}

#[derive(Default)]
struct FakeFileStore {
    deletes: RefCell<Vec<(String, FileCategory)>>,
    fail_category: Cell<Option<FileCategory>>,
}

impl FileStore for FakeFileStore {
    fn delete_file(&self, file_name: &str, category: FileCategory) -> anyhow::Result<()> {
        if self.fail_category.get() == Some(category) {
            anyhow::bail!("object storage unavailable");
        }
        self.deletes
            .borrow_mut()
            .push((file_name.to_owned(), category));
        Ok(())
    }
}

#[derive(Default)]
struct FakeNotifications {
    sent: RefCell<Vec<(String, EmailMessage)>>,
    attempts: Cell<u32>,
    failures_remaining: Cell<u32>,
}

impl Notifications for FakeNotifications {
    fn enqueue_email(&self, address: &str, message: &EmailMessage) -> anyhow::Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        if self.failures_remaining.get() > 0 {
            self.failures_remaining
                .set(self.failures_remaining.get() - 1);
            anyhow::bail!("notification queue unavailable");
        }
        self.sent
            .borrow_mut()
            .push((address.to_owned(), message.clone()));
        Ok(())
    }
}

fn establish_connection() -> TestResult<PooledConnection> {
    let config = StorageConfig {
        connection: ":memory:".to_owned(),
        // Every `:memory:` connection opens its own empty database, so
        // the pool must never hand out a second one.
        pool_max_size: NonZeroU32::MIN,
    };
    let pool = database::create_connection_pool(&config)?;
    let mut connection = database::get_pooled_connection(&pool)?;
    database::initialize(&mut connection)?;
    database::migrate_schema(&mut connection)?;
    Ok(connection)
}

fn new_config() -> Config {
    Config {
        signing_key: [1u8; 32],
        token_ttl: Duration::from_secs(3600),
    }
}

fn new_track(index: usize) -> Track {
    Track {
        title: format!("Track {index}"),
        slug: format!("track-{index}").into(),
        audio_file: format!("{index}.webm"),
        image_file: format!("{index}.jpeg"),
        duration_ms: 180_000,
        plays: 0,
    }
}

struct Fixture {
    db: PooledConnection,
    owner_id: UserId,
}

impl Fixture {
    fn new() -> TestResult<Self> {
        let mut db = establish_connection()?;
        let owner = User {
            name: "listener".into(),
            email: "listener@example.com".into(),
            verified: true,
        };
        let owner_id = user::create(&mut db, &owner)?;
        Ok(Self { db, owner_id })
    }

    fn create_tracks(&mut self, count: usize) -> TestResult<Vec<TrackId>> {
        let search = FakeSearchIndex::default();
        let notifications = FakeNotifications::default();
        let mut created = Vec::with_capacity(count);
        for index in 0..count {
            created.push(track::create(
                &mut self.db,
                &search,
                &notifications,
                self.owner_id,
                &new_track(index),
            )?);
        }
        Ok(created)
    }

    fn create_playlist(&mut self) -> TestResult<PlaylistId> {
        let new_playlist = Playlist {
            title: "Mix".into(),
            slug: "mix".into(),
            image_file: None,
        };
        Ok(playlist::create(&mut self.db, self.owner_id, &new_playlist)?)
    }

    fn track_order(&mut self, playlist_id: PlaylistId) -> TestResult<Vec<TrackId>> {
        let memberships = playlist::entries::list(&mut self.db, playlist_id, None)?;
        for (index, with_track) in memberships.iter().enumerate() {
            assert_eq!(index as i64 + 1, with_track.membership.position);
        }
        Ok(memberships
            .into_iter()
            .map(|with_track| with_track.membership.track_id)
            .collect())
    }
}

#[test]
fn add_tracks_at_requested_positions() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(4)?;
    let actor = fixture.owner_id;
    // Appends without a requested position.
    playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[0], None)?;
    playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[1], None)?;
    // Target the head of the playlist.
    let membership =
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[2], Some(1))?;
    assert_eq!(1, membership.position);
    // Positions past the end are normalized to an append.
    let membership =
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[3], Some(99))?;
    assert_eq!(4, membership.position);
    assert_eq!(
        vec![track_ids[2], track_ids[0], track_ids[1], track_ids[3]],
        fixture.track_order(playlist_id)?
    );
    Ok(())
}

#[test]
fn add_duplicate_track_is_a_conflict() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(1)?;
    let actor = fixture.owner_id;
    playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[0], None)?;
    let err = playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[0], None)
        .expect_err("already a member");
    assert!(matches!(err, Error::Conflict(Conflict::AlreadyMember)));
    Ok(())
}

#[test]
fn add_to_foreign_playlist_is_denied() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(1)?;
    let other_user = User {
        name: "other".into(),
        email: "other@example.com".into(),
        verified: true,
    };
    let other_user_id = user::create(&mut fixture.db, &other_user)?;
    let err = playlist::entries::add(
        &mut fixture.db,
        other_user_id,
        playlist_id,
        track_ids[0],
        None,
    )
    .expect_err("not the owner");
    assert!(matches!(err, Error::PermissionDenied));
    Ok(())
}

#[test]
fn move_track_forward_and_backward() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(5)?;
    let actor = fixture.owner_id;
    for &track_id in &track_ids {
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_id, None)?;
    }
    playlist::entries::move_to(&mut fixture.db, actor, playlist_id, track_ids[1], 4)?;
    assert_eq!(
        vec![
            track_ids[0],
            track_ids[2],
            track_ids[3],
            track_ids[1],
            track_ids[4],
        ],
        fixture.track_order(playlist_id)?
    );
    playlist::entries::move_to(&mut fixture.db, actor, playlist_id, track_ids[1], 2)?;
    assert_eq!(
        vec![
            track_ids[0],
            track_ids[1],
            track_ids[2],
            track_ids[3],
            track_ids[4],
        ],
        fixture.track_order(playlist_id)?
    );
    Ok(())
}

#[test]
fn move_track_rejects_bad_positions() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(2)?;
    let actor = fixture.owner_id;
    for &track_id in &track_ids {
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_id, None)?;
    }
    let err = playlist::entries::move_to(&mut fixture.db, actor, playlist_id, track_ids[0], 1)
        .expect_err("unchanged position");
    assert!(matches!(
        err,
        Error::Conflict(Conflict::PositionUnchanged)
    ));
    let err = playlist::entries::move_to(&mut fixture.db, actor, playlist_id, track_ids[0], 3)
        .expect_err("out of range");
    assert!(matches!(
        err,
        Error::Conflict(Conflict::PositionOutOfRange)
    ));
    let err = playlist::entries::move_to(&mut fixture.db, actor, playlist_id, track_ids[0], 0)
        .expect_err("out of range");
    assert!(matches!(
        err,
        Error::Conflict(Conflict::PositionOutOfRange)
    ));
    Ok(())
}

#[test]
fn remove_track_closes_the_gap() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(3)?;
    let actor = fixture.owner_id;
    for &track_id in &track_ids {
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_id, None)?;
    }
    playlist::entries::remove(&mut fixture.db, actor, playlist_id, track_ids[1])?;
    assert_eq!(
        vec![track_ids[0], track_ids[2]],
        fixture.track_order(playlist_id)?
    );
    let err = playlist::entries::remove(&mut fixture.db, actor, playlist_id, track_ids[1])
        .expect_err("no longer a member");
    assert!(matches!(err, Error::NotFound(What::Membership)));
    Ok(())
}

#[test]
fn insert_move_and_remove_in_sequence() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let playlist_id = fixture.create_playlist()?;
    let track_ids = fixture.create_tracks(4)?;
    let actor = fixture.owner_id;
    for &track_id in &track_ids[..3] {
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_id, None)?;
    }
    // Insert between the head and its successor.
    let membership =
        playlist::entries::add(&mut fixture.db, actor, playlist_id, track_ids[3], Some(2))?;
    assert_eq!(2, membership.position);
    assert_eq!(
        vec![track_ids[0], track_ids[3], track_ids[1], track_ids[2]],
        fixture.track_order(playlist_id)?
    );
    // Then push the inserted track to the tail.
    playlist::entries::move_to(&mut fixture.db, actor, playlist_id, track_ids[3], 4)?;
    assert_eq!(
        vec![track_ids[0], track_ids[1], track_ids[2], track_ids[3]],
        fixture.track_order(playlist_id)?
    );
    // Finally remove from the middle. The remaining positions are
    // dense again, as asserted by track_order.
    playlist::entries::remove(&mut fixture.db, actor, playlist_id, track_ids[1])?;
    assert_eq!(
        vec![track_ids[0], track_ids[2], track_ids[3]],
        fixture.track_order(playlist_id)?
    );
    Ok(())
}

#[test]
fn rotate_refresh_credential_only_once() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let config = new_config();
    let pair = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    let authenticated = auth::validate_access(&mut fixture.db, &config, &pair.access)?;
    assert_eq!(fixture.owner_id, authenticated.user_id);
    assert_eq!(pair.token_id, authenticated.token_id);

    let successor = auth::rotate(&mut fixture.db, &config, &pair.refresh)?;
    assert_ne!(pair.token_id, successor.token_id);

    // The redeemed value and its access sibling are both dead now.
    let err = auth::rotate(&mut fixture.db, &config, &pair.refresh)
        .expect_err("refresh value already redeemed");
    assert!(matches!(
        err,
        Error::Unauthenticated(AuthInvalidity::Revoked)
    ));
    let err = auth::validate_access(&mut fixture.db, &config, &pair.access)
        .expect_err("access credential rotated away");
    assert!(matches!(
        err,
        Error::Unauthenticated(AuthInvalidity::Revoked)
    ));

    let authenticated = auth::validate_access(&mut fixture.db, &config, &successor.access)?;
    assert_eq!(fixture.owner_id, authenticated.user_id);

    // The successor's refresh value is redeemable exactly once as
    // well, continuing the rotation chain.
    let third = auth::rotate(&mut fixture.db, &config, &successor.refresh)?;
    assert_ne!(successor.token_id, third.token_id);
    let err = auth::validate_access(&mut fixture.db, &config, &successor.access)
        .expect_err("access credential rotated away");
    assert!(matches!(
        err,
        Error::Unauthenticated(AuthInvalidity::Revoked)
    ));
    let authenticated = auth::validate_access(&mut fixture.db, &config, &third.access)?;
    assert_eq!(fixture.owner_id, authenticated.user_id);
    Ok(())
}

#[test]
fn reject_tampered_access_credential() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let config = new_config();
    let pair = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    let mut tampered = pair.access.clone();
    tampered.pop();
    let err = auth::validate_access(&mut fixture.db, &config, &tampered)
        .expect_err("tampered credential");
    assert!(matches!(err, Error::Unauthenticated(_)));
    Ok(())
}

#[test]
fn revoke_all_credentials_of_a_user() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let config = new_config();
    let first = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    let second = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    assert_eq!(2, auth::revoke_all(&mut fixture.db, fixture.owner_id)?);
    for pair in [first, second] {
        let err = auth::validate_access(&mut fixture.db, &config, &pair.access)
            .expect_err("revoked credential");
        assert!(matches!(
            err,
            Error::Unauthenticated(AuthInvalidity::Revoked)
        ));
    }
    Ok(())
}

#[test]
fn sweep_expired_credentials() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let short_lived = Config {
        token_ttl: Duration::from_millis(1),
        ..new_config()
    };
    auth::issue(&mut fixture.db, &short_lived, fixture.owner_id)?;
    let long_lived = auth::issue(&mut fixture.db, &new_config(), fixture.owner_id)?;
    std::thread::sleep(Duration::from_millis(10));
    assert_eq!(1, auth::sweep_expired(&mut fixture.db)?);
    // Sweeping is idempotent.
    assert_eq!(0, auth::sweep_expired(&mut fixture.db)?);
    let authenticated =
        auth::validate_access(&mut fixture.db, &new_config(), &long_lived.access)?;
    assert_eq!(fixture.owner_id, authenticated.user_id);
    Ok(())
}

#[test]
fn failed_search_upsert_rolls_back_the_track_insert() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let search = FakeSearchIndex::default();
    search.fail.set(true);
    let notifications = FakeNotifications::default();
    let err = track::create(
        &mut fixture.db,
        &search,
        &notifications,
        fixture.owner_id,
        &new_track(0),
    )
    .expect_err("search index down");
    assert!(matches!(err, Error::Other(_)));
    assert!(search.upserts.borrow().is_empty());
    // No notification for a track that was never created.
    assert_eq!(0, notifications.attempts.get());

    // The row was rolled back, so the same title and slug are free.
    search.fail.set(false);
    track::create(
        &mut fixture.db,
        &search,
        &notifications,
        fixture.owner_id,
        &new_track(0),
    )?;
    Ok(())
}

#[test]
fn notification_retry_recovers_from_transient_failures() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let search = FakeSearchIndex::default();
    let notifications = FakeNotifications::default();
    notifications.failures_remaining.set(2);
    track::create(
        &mut fixture.db,
        &search,
        &notifications,
        fixture.owner_id,
        &new_track(0),
    )?;
    assert_eq!(3, notifications.attempts.get());
    let sent = notifications.sent.borrow();
    assert_eq!(1, sent.len());
    assert_eq!("listener@example.com", sent[0].0);
    Ok(())
}

#[test]
fn notification_retry_exhaustion_rolls_back_the_track_insert() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let search = FakeSearchIndex::default();
    let notifications = FakeNotifications::default();
    notifications.failures_remaining.set(3);
    let err = track::create(
        &mut fixture.db,
        &search,
        &notifications,
        fixture.owner_id,
        &new_track(0),
    )
    .expect_err("notification queue down");
    assert!(matches!(err, Error::Other(_)));
    assert_eq!(3, notifications.attempts.get());
    assert!(notifications.sent.borrow().is_empty());

    // The search upsert before the notification is not compensated,
    // the relational insert is rolled back.
    assert_eq!(1, search.upserts.borrow().len());
    notifications.failures_remaining.set(0);
    track::create(
        &mut fixture.db,
        &search,
        &notifications,
        fixture.owner_id,
        &new_track(0),
    )?;
    Ok(())
}

#[test]
fn failed_object_deletion_keeps_the_track_but_not_the_index_entry() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(1)?;
    let search = FakeSearchIndex::default();
    let files = FakeFileStore::default();
    files.fail_category.set(Some(FileCategory::Image));
    let err = track::purge(
        &mut fixture.db,
        &search,
        &files,
        fixture.owner_id,
        track_ids[0],
    )
    .expect_err("object storage down");
    assert!(matches!(err, Error::Other(_)));

    // The row deletion was rolled back and the track can still be
    // renamed. The index deletion and the audio object deletion
    // already happened and are not compensated.
    track::rename(
        &mut fixture.db,
        &search,
        fixture.owner_id,
        track_ids[0],
        "Still here",
    )?;
    assert_eq!(vec![track_ids[0]], *search.deletes.borrow());
    assert_eq!(
        vec![("0.webm".to_owned(), FileCategory::Audio)],
        *files.deletes.borrow()
    );
    Ok(())
}

#[test]
fn purge_track_removes_row_index_entry_and_objects() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(1)?;
    let search = FakeSearchIndex::default();
    let files = FakeFileStore::default();
    track::purge(
        &mut fixture.db,
        &search,
        &files,
        fixture.owner_id,
        track_ids[0],
    )?;
    assert_eq!(vec![track_ids[0]], *search.deletes.borrow());
    assert_eq!(
        vec![
            ("0.webm".to_owned(), FileCategory::Audio),
            ("0.jpeg".to_owned(), FileCategory::Image),
        ],
        *files.deletes.borrow()
    );
    let err = track::register_play(&mut fixture.db, track_ids[0]).expect_err("track is gone");
    assert!(matches!(err, Error::NotFound(What::Track)));
    Ok(())
}

#[test]
fn purge_playlist_deletes_the_cover_image() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let new_playlist = Playlist {
        title: "Covered".into(),
        slug: "covered".into(),
        image_file: Some("cover.jpeg".into()),
    };
    let playlist_id = playlist::create(&mut fixture.db, fixture.owner_id, &new_playlist)?;
    let files = FakeFileStore::default();
    playlist::purge(&mut fixture.db, &files, fixture.owner_id, playlist_id)?;
    assert_eq!(
        vec![("cover.jpeg".to_owned(), FileCategory::Image)],
        *files.deletes.borrow()
    );
    Ok(())
}

#[test]
fn verify_email_revokes_all_credentials() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let config = new_config();
    let pair = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    assert_eq!(1, user::verify_email(&mut fixture.db, fixture.owner_id)?);
    let err = auth::validate_access(&mut fixture.db, &config, &pair.access)
        .expect_err("revoked on verification");
    assert!(matches!(
        err,
        Error::Unauthenticated(AuthInvalidity::Revoked)
    ));
    Ok(())
}

#[test]
fn change_email_revokes_and_reissues_credentials() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let config = new_config();
    let pair = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    let fresh = user::change_email(
        &mut fixture.db,
        &config,
        fixture.owner_id,
        "renamed@example.com",
    )?;
    // The old credentials died with the old address.
    let err = auth::validate_access(&mut fixture.db, &config, &pair.access)
        .expect_err("revoked on address change");
    assert!(matches!(
        err,
        Error::Unauthenticated(AuthInvalidity::Revoked)
    ));
    let authenticated = auth::validate_access(&mut fixture.db, &config, &fresh.access)?;
    assert_eq!(fixture.owner_id, authenticated.user_id);
    let updated = user::load(&mut fixture.db, fixture.owner_id)?;
    assert_eq!("renamed@example.com", updated.email);
    // The new address starts out unverified.
    assert!(!updated.verified);
    Ok(())
}

#[test]
fn change_email_to_taken_address_is_a_conflict() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let config = new_config();
    let other_user = User {
        name: "other".into(),
        email: "other@example.com".into(),
        verified: true,
    };
    user::create(&mut fixture.db, &other_user)?;
    let pair = auth::issue(&mut fixture.db, &config, fixture.owner_id)?;
    let err = user::change_email(
        &mut fixture.db,
        &config,
        fixture.owner_id,
        "other@example.com",
    )
    .expect_err("address already taken");
    assert!(matches!(err, Error::Conflict(Conflict::EmailTaken)));
    // The failed change left the credentials untouched.
    let authenticated = auth::validate_access(&mut fixture.db, &config, &pair.access)?;
    assert_eq!(fixture.owner_id, authenticated.user_id);
    Ok(())
}

#[test]
fn listening_history_is_most_recent_first() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(3)?;
    // Timestamps have millisecond precision, so the listens must not
    // land within the same millisecond.
    for &track_id in &track_ids {
        history::log_listen(&mut fixture.db, fixture.owner_id, track_id)?;
        std::thread::sleep(Duration::from_millis(2));
    }
    // Listening again moves the track to the front instead of adding a
    // second entry.
    history::log_listen(&mut fixture.db, fixture.owner_id, track_ids[0])?;
    let listens =
        history::list_recently_played(&mut fixture.db, fixture.owner_id, None)?;
    assert_eq!(
        vec![track_ids[0], track_ids[2], track_ids[1]],
        listens
            .iter()
            .map(|with_track| with_track.listen.track_id)
            .collect::<Vec<_>>()
    );
    assert_eq!("Track 0", listens[0].title);
    assert_eq!("listener", listens[0].artist);
    let limited =
        history::list_recently_played(&mut fixture.db, fixture.owner_id, Some(2))?;
    assert_eq!(2, limited.len());
    Ok(())
}

#[test]
fn log_listen_for_unknown_track_fails() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let err = history::log_listen(&mut fixture.db, fixture.owner_id, TrackId::from(4711))
        .expect_err("unknown track");
    assert!(matches!(err, Error::NotFound(What::Track)));
    assert!(history::list_recently_played(&mut fixture.db, fixture.owner_id, None)?.is_empty());
    Ok(())
}

#[test]
fn clear_listening_history() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    history::log_listen(&mut fixture.db, fixture.owner_id, track_ids[0])?;
    history::log_listen(&mut fixture.db, fixture.owner_id, track_ids[1])?;
    assert_eq!(2, history::clear(&mut fixture.db, fixture.owner_id)?);
    assert!(history::list_recently_played(&mut fixture.db, fixture.owner_id, None)?.is_empty());
    // Clearing is idempotent.
    assert_eq!(0, history::clear(&mut fixture.db, fixture.owner_id)?);
    let err = history::list_recently_played(&mut fixture.db, UserId::from(4711), None)
        .expect_err("unknown user");
    assert!(matches!(err, Error::NotFound(What::User)));
    Ok(())
}

#[test]
fn optimize_storage_after_purging_tracks() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    let search = FakeSearchIndex::default();
    let files = FakeFileStore::default();
    track::purge(
        &mut fixture.db,
        &search,
        &files,
        fixture.owner_id,
        track_ids[0],
    )?;
    database::optimize(&mut fixture.db, true)?;
    // The surviving rows are unaffected by the maintenance pass.
    track::register_play(&mut fixture.db, track_ids[1])?;
    let err = track::register_play(&mut fixture.db, track_ids[0]).expect_err("track is gone");
    assert!(matches!(err, Error::NotFound(What::Track)));
    Ok(())
}
