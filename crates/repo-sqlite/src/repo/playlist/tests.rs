// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use test_log::test;

use phonotek_core::{playlist::Playlist, track::Track, user::User};
use phonotek_repo::{track::Repo as _, user::Repo as _};

use super::*;
use crate::prelude::tests::*;

struct Fixture {
    db: DbConnection,
    owner_id: UserId,
    playlist_id: RecordId,
}

impl Fixture {
    fn new() -> TestResult<Self> {
        let mut db = establish_connection()?;
        let mut connection = Connection::new(&mut db);
        let created_at = UtcDateTimeMs::now();
        let owner = User {
            name: "listener".into(),
            email: "listener@example.com".into(),
            verified: true,
        };
        let owner_id = connection.insert_user(created_at, &owner)?;
        let playlist = Playlist {
            title: "Playlist".into(),
            slug: "playlist".into(),
            image_file: None,
        };
        let playlist_id = connection.insert_playlist(owner_id, created_at, &playlist)?;
        Ok(Self {
            db,
            owner_id,
            playlist_id,
        })
    }

    fn create_tracks(&mut self, count: usize) -> RepoResult<Vec<TrackId>> {
        let mut connection = Connection::new(&mut self.db);
        let mut created = Vec::with_capacity(count);
        for i in 0..count {
            let track = Track {
                title: format!("Track {i}"),
                slug: format!("track-{i}").into(),
                audio_file: format!("{i}.webm"),
                image_file: format!("{i}.jpeg"),
                duration_ms: 180_000,
                plays: 0,
            };
            created.push(connection.insert_track(
                self.owner_id,
                UtcDateTimeMs::now(),
                &track,
            )?);
        }
        Ok(created)
    }

    fn append_memberships(&mut self, track_ids: &[TrackId]) -> RepoResult<()> {
        let mut connection = Connection::new(&mut self.db);
        for &track_id in track_ids {
            let position = connection.last_position(self.playlist_id)? + 1;
            connection.insert_membership(
                self.playlist_id,
                track_id,
                position,
                UtcDateTimeMs::now(),
            )?;
        }
        Ok(())
    }

    fn track_order(&mut self) -> RepoResult<Vec<TrackId>> {
        let mut connection = Connection::new(&mut self.db);
        let memberships = connection.list_memberships(self.playlist_id, None)?;
        Ok(memberships
            .into_iter()
            .map(|with_track| with_track.membership.track_id)
            .collect())
    }

    fn assert_dense_positions(&mut self) {
        let mut connection = Connection::new(&mut self.db);
        let memberships = connection
            .list_memberships(self.playlist_id, None)
            .expect("memberships");
        for (index, with_track) in memberships.iter().enumerate() {
            assert_eq!(index as Position + 1, with_track.membership.position);
        }
    }
}

#[test]
fn last_position_of_an_empty_playlist_is_zero() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let mut connection = Connection::new(&mut fixture.db);
    assert_eq!(0, connection.last_position(fixture.playlist_id)?);
    Ok(())
}

#[test]
fn append_memberships_in_position_order() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(3)?;
    fixture.append_memberships(&track_ids)?;
    assert_eq!(track_ids, fixture.track_order()?);
    fixture.assert_dense_positions();
    let mut connection = Connection::new(&mut fixture.db);
    assert_eq!(3, connection.count_memberships(fixture.playlist_id)?);
    assert_eq!(3, connection.last_position(fixture.playlist_id)?);
    Ok(())
}

#[test]
fn list_memberships_joins_track_data() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    let memberships = connection.list_memberships(fixture.playlist_id, None)?;
    assert_eq!(2, memberships.len());
    assert_eq!("Track 0", memberships[0].title);
    assert_eq!("listener", memberships[0].artist);
    assert_eq!(180_000, memberships[0].duration_ms);
    Ok(())
}

#[test]
fn list_memberships_with_limit() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(3)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    let memberships = connection.list_memberships(fixture.playlist_id, Some(2))?;
    assert_eq!(2, memberships.len());
    assert_eq!(track_ids[0], memberships[0].membership.track_id);
    assert_eq!(track_ids[1], memberships[1].membership.track_id);
    Ok(())
}

#[test]
fn duplicate_membership_is_a_conflict() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(1)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    let err = connection
        .insert_membership(fixture.playlist_id, track_ids[0], 2, UtcDateTimeMs::now())
        .expect_err("duplicate track");
    assert!(matches!(err, RepoError::Conflict));
    Ok(())
}

#[test]
fn occupied_position_is_a_conflict() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    fixture.append_memberships(&track_ids[..1])?;
    let mut connection = Connection::new(&mut fixture.db);
    let err = connection
        .insert_membership(fixture.playlist_id, track_ids[1], 1, UtcDateTimeMs::now())
        .expect_err("occupied position");
    assert!(matches!(err, RepoError::Conflict));
    Ok(())
}

#[test]
fn shift_positions_up_opens_a_slot() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(4)?;
    fixture.append_memberships(&track_ids[..3])?;
    let mut connection = Connection::new(&mut fixture.db);
    let rows_shifted = connection.shift_positions_up(fixture.playlist_id, 2)?;
    assert_eq!(2, rows_shifted);
    connection.insert_membership(fixture.playlist_id, track_ids[3], 2, UtcDateTimeMs::now())?;
    assert_eq!(
        vec![track_ids[0], track_ids[3], track_ids[1], track_ids[2]],
        fixture.track_order()?
    );
    fixture.assert_dense_positions();
    Ok(())
}

#[test]
fn delete_membership_and_close_the_gap() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(3)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    let removed_position = connection.delete_membership(fixture.playlist_id, track_ids[0])?;
    assert_eq!(1, removed_position);
    let rows_shifted = connection.shift_positions_down(fixture.playlist_id, removed_position)?;
    assert_eq!(2, rows_shifted);
    assert_eq!(vec![track_ids[1], track_ids[2]], fixture.track_order()?);
    fixture.assert_dense_positions();
    Ok(())
}

#[test]
fn delete_unknown_membership_fails() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(1)?;
    let mut connection = Connection::new(&mut fixture.db);
    let err = connection
        .delete_membership(fixture.playlist_id, track_ids[0])
        .expect_err("not a member");
    assert!(matches!(err, RepoError::NotFound));
    Ok(())
}

#[test]
fn move_membership_forward() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(5)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    // Park the moved row at position 0 while the range is spliced.
    connection.update_membership_position(fixture.playlist_id, track_ids[1], 0)?;
    let rows_shifted = connection.shift_positions_between(fixture.playlist_id, 2, 4)?;
    assert_eq!(2, rows_shifted);
    connection.update_membership_position(fixture.playlist_id, track_ids[1], 4)?;
    assert_eq!(
        vec![
            track_ids[0],
            track_ids[2],
            track_ids[3],
            track_ids[1],
            track_ids[4],
        ],
        fixture.track_order()?
    );
    fixture.assert_dense_positions();
    Ok(())
}

#[test]
fn move_membership_backward() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(5)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    connection.update_membership_position(fixture.playlist_id, track_ids[3], 0)?;
    let rows_shifted = connection.shift_positions_between(fixture.playlist_id, 4, 2)?;
    assert_eq!(2, rows_shifted);
    connection.update_membership_position(fixture.playlist_id, track_ids[3], 2)?;
    assert_eq!(
        vec![
            track_ids[0],
            track_ids[3],
            track_ids[1],
            track_ids[2],
            track_ids[4],
        ],
        fixture.track_order()?
    );
    fixture.assert_dense_positions();
    Ok(())
}

#[test]
fn shift_positions_between_equal_bounds_is_a_noop() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    assert_eq!(
        0,
        connection.shift_positions_between(fixture.playlist_id, 1, 1)?
    );
    assert_eq!(track_ids, fixture.track_order()?);
    Ok(())
}

#[test]
fn purge_playlist_cascades_to_memberships() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    connection.purge_playlist(fixture.playlist_id)?;
    assert_eq!(0, connection.count_memberships(fixture.playlist_id)?);
    Ok(())
}

#[test]
fn purge_track_cascades_to_memberships() -> TestResult<()> {
    let mut fixture = Fixture::new()?;
    let track_ids = fixture.create_tracks(2)?;
    fixture.append_memberships(&track_ids)?;
    let mut connection = Connection::new(&mut fixture.db);
    connection.purge_track(track_ids[0])?;
    assert_eq!(1, connection.count_memberships(fixture.playlist_id)?);
    assert_eq!(vec![track_ids[1]], fixture.track_order()?);
    Ok(())
}
