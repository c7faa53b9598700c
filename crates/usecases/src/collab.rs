// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Collaborator interfaces for external side effects.
//!
//! Implementations are expected to be synchronous and idempotent per
//! key. None of these effects participate in the relational
//! transaction: a failure aborts the transaction, but effects that
//! already happened are not compensated.

use std::{thread, time::Duration};

use phonotek_repo::track::RecordId as TrackId;

use crate::{Error, Result};

/// Full-text search over the track catalog.
pub trait SearchIndex {
    fn upsert_track(&self, track_id: TrackId, title: &str) -> anyhow::Result<()>;

    fn delete_track(&self, track_id: TrackId) -> anyhow::Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileCategory {
    Audio,
    Image,
}

/// Object storage holding the uploaded audio and image data.
pub trait FileStore {
    fn delete_file(&self, file_name: &str, category: FileCategory) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// Outbound e-mail notifications, delivered through a queue.
///
/// Enqueueing is fallible and retried by the caller, see
/// [`enqueue_email_with_retry`].
pub trait Notifications {
    fn enqueue_email(&self, address: &str, message: &EmailMessage) -> anyhow::Result<()>;
}

const ENQUEUE_EMAIL_ATTEMPTS: u32 = 3;
const ENQUEUE_EMAIL_INITIAL_BACKOFF: Duration = Duration::from_millis(50);

/// Enqueue an e-mail, retrying transient failures with increasing
/// backoff. Exhausting all attempts fails the surrounding operation.
pub fn enqueue_email_with_retry(
    notifications: &dyn Notifications,
    address: &str,
    message: &EmailMessage,
) -> Result<()> {
    let mut backoff = ENQUEUE_EMAIL_INITIAL_BACKOFF;
    let mut attempt = 1;
    loop {
        match notifications.enqueue_email(address, message) {
            Ok(()) => return Ok(()),
            Err(err) if attempt < ENQUEUE_EMAIL_ATTEMPTS => {
                log::warn!(
                    "Failed to enqueue e-mail notification \
                     (attempt {attempt} of {ENQUEUE_EMAIL_ATTEMPTS}): {err}"
                );
                thread::sleep(backoff);
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => {
                log::warn!(
                    "Giving up on e-mail notification after {ENQUEUE_EMAIL_ATTEMPTS} attempts"
                );
                return Err(Error::Internal(
                    err.context("failed to enqueue e-mail notification"),
                ));
            }
        }
    }
}
