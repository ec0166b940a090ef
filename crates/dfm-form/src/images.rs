//! Image attachments per entity
//!
//! Maps an entity index to its ordered list of images. An absent entry is
//! the only representation of "no images": lists are removed as soon as they
//! become empty, and empty lists coming from storage are dropped on load.

use crate::error::FormError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an image was picked from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Local file picker
    Gallery,
    /// Device camera capture
    Camera,
    /// SharePoint library (not integrated)
    SharePoint,
    /// Product catalogue (not integrated)
    Catalogue,
}

impl ImageSource {
    /// Whether images can actually be obtained from this source
    #[inline]
    #[must_use]
    pub fn is_integrated(self) -> bool {
        matches!(self, Self::Gallery | Self::Camera)
    }
}

/// One attached image, carried inline as a data URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    /// `data:<mime>;base64,<payload>`
    #[serde(alias = "dataUrl")]
    pub data: String,
    /// Original file name
    pub name: String,
    /// Size of the raw bytes
    pub size: u64,
    /// MIME type, always `image/*`
    #[serde(alias = "type")]
    pub mime_type: String,
    /// Picker the image came from
    pub source: ImageSource,
}

impl ImageAttachment {
    /// Encode raw image bytes
    ///
    /// # Errors
    /// [`FormError::NotAnImage`] when `mime_type` is not `image/*`.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
        source: ImageSource,
    ) -> Result<Self, FormError> {
        let mime_type = mime_type.into();
        if !is_image_mime(&mime_type) {
            return Err(FormError::NotAnImage(mime_type));
        }
        let data = format!("data:{mime_type};base64,{}", STANDARD.encode(bytes));
        Ok(Self {
            data,
            name: name.into(),
            size: bytes.len() as u64,
            mime_type,
            source,
        })
    }

    /// Decode the inline payload back into bytes
    #[must_use]
    pub fn decode(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }
}

/// Check for an `image/*` MIME type
#[inline]
#[must_use]
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .strip_prefix("image/")
        .is_some_and(|sub| !sub.is_empty())
}

/// Stored shape of the attachments: entity index → images
pub type ImageMap = BTreeMap<usize, Vec<ImageAttachment>>;

/// Images attached to a fixed number of entities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBoard {
    entity_count: usize,
    images: ImageMap,
}

impl ImageBoard {
    /// Create board for `entity_count` entities, none with images
    #[inline]
    #[must_use]
    pub fn new(entity_count: usize) -> Self {
        Self {
            entity_count,
            images: ImageMap::new(),
        }
    }

    /// Build from a stored map
    ///
    /// Empty lists and entries for indices outside `0..entity_count` are
    /// discarded; the discarded indices are returned alongside the board.
    #[must_use]
    pub fn from_map(entity_count: usize, map: ImageMap) -> (Self, Vec<usize>) {
        let mut dropped = Vec::new();
        let mut images = ImageMap::new();
        for (index, list) in map {
            if list.is_empty() {
                continue;
            }
            if index >= entity_count {
                dropped.push(index);
                continue;
            }
            images.insert(index, list);
        }
        (
            Self {
                entity_count,
                images,
            },
            dropped,
        )
    }

    /// Snapshot of the mapping, as stored
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &ImageMap {
        &self.images
    }

    /// Number of entities
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Images of one entity (empty slice when none)
    #[must_use]
    pub fn images(&self, index: usize) -> &[ImageAttachment] {
        self.images
            .get(&index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of images of one entity
    #[inline]
    #[must_use]
    pub fn image_count(&self, index: usize) -> usize {
        self.images(index).len()
    }

    /// Append an image to an entity
    ///
    /// Returns the entity's new image count.
    ///
    /// # Errors
    /// - [`FormError::EntityOutOfRange`] for an unknown entity
    /// - [`FormError::NotAnImage`] for a non-image MIME type
    pub fn attach(&mut self, index: usize, image: ImageAttachment) -> Result<usize, FormError> {
        if index >= self.entity_count {
            return Err(FormError::EntityOutOfRange {
                index,
                count: self.entity_count,
            });
        }
        if !is_image_mime(&image.mime_type) {
            return Err(FormError::NotAnImage(image.mime_type));
        }

        let list = self.images.entry(index).or_default();
        list.push(image);
        Ok(list.len())
    }

    /// Remove one image of an entity
    ///
    /// # Errors
    /// [`FormError::ImageNotFound`] when the entity has no image at `position`.
    pub fn detach(&mut self, index: usize, position: usize) -> Result<ImageAttachment, FormError> {
        let list = self
            .images
            .get_mut(&index)
            .filter(|list| position < list.len())
            .ok_or(FormError::ImageNotFound { index, position })?;

        let removed = list.remove(position);
        if list.is_empty() {
            self.images.remove(&index);
        }
        Ok(removed)
    }

    /// Entities still without images
    #[must_use]
    pub fn missing(&self) -> Vec<usize> {
        (0..self.entity_count)
            .filter(|i| !self.images.contains_key(i))
            .collect()
    }

    /// Every entity has at least one image (and there is at least one entity)
    #[must_use]
    pub fn all_entities_have_images(&self) -> bool {
        self.entity_count > 0 && self.missing().is_empty()
    }

    /// Check the board may be submitted
    ///
    /// # Errors
    /// [`FormError::MissingImages`] listing entities without images.
    pub fn ensure_complete(&self) -> Result<(), FormError> {
        let missing = self.missing();
        if self.entity_count == 0 || !missing.is_empty() {
            return Err(FormError::MissingImages { missing });
        }
        Ok(())
    }
}
