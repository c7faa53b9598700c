// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::prelude::*;

/// A single uploaded track.
///
/// The audio and image fields are opaque references into the object
/// storage. Transcoding happens upstream; by the time a track reaches
/// the catalog both objects are already stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub title: String,

    /// URL-safe identifier, unique per owner.
    pub slug: Slug,

    /// Object-storage reference of the audio data.
    pub audio_file: String,

    /// Object-storage reference of the cover image.
    pub image_file: String,

    pub duration_ms: TimestampMillis,

    /// Monotonic play counter.
    pub plays: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackInvalidity {
    TitleEmpty,
    Slug(crate::slug::SlugInvalidity),
    AudioFileEmpty,
    ImageFileEmpty,
    DurationInvalid,
}

impl Validate for Track {
    type Invalidity = TrackInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self {
            title,
            slug,
            audio_file,
            image_file,
            duration_ms,
            plays: _,
        } = self;
        ValidationContext::new()
            .invalidate_if(title.trim().is_empty(), Self::Invalidity::TitleEmpty)
            .validate_with(slug, Self::Invalidity::Slug)
            .invalidate_if(audio_file.is_empty(), Self::Invalidity::AudioFileEmpty)
            .invalidate_if(image_file.is_empty(), Self::Invalidity::ImageFileEmpty)
            .invalidate_if(*duration_ms <= 0, Self::Invalidity::DurationInvalid)
            .into()
    }
}
