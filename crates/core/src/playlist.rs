// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::prelude::*;

/// An ordered collection of tracks.
///
/// The ordering itself lives in the membership rows (one per contained
/// track, carrying a dense 1-based position) and is managed by the
/// repository layer, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist {
    pub title: String,

    /// URL-safe identifier, unique per owner.
    pub slug: Slug,

    /// Object-storage reference of the optional cover image.
    pub image_file: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaylistInvalidity {
    TitleEmpty,
    Slug(crate::slug::SlugInvalidity),
    ImageFileEmpty,
}

impl Validate for Playlist {
    type Invalidity = PlaylistInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self {
            title,
            slug,
            image_file,
        } = self;
        ValidationContext::new()
            .invalidate_if(title.trim().is_empty(), Self::Invalidity::TitleEmpty)
            .validate_with(slug, Self::Invalidity::Slug)
            .invalidate_if(
                image_file.as_deref().is_some_and(str::is_empty),
                Self::Invalidity::ImageFileEmpty,
            )
            .into()
    }
}
