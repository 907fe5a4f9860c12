use crate::Error;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// A Facebook user ID used to tag a photo.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct TagId(pub i64);

/// What a post carries besides its message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Attachment {
    /// A plain status update.
    #[default]
    None,
    /// A video uploaded by Facebook from `file_url`.
    Video {
        /// Publicly reachable URL of the video file.
        file_url: String,
        /// Video title.
        title: String,
    },
    /// A photo fetched by Facebook from `url`.
    Photo {
        /// Publicly reachable URL of the image.
        url: String,
        /// User IDs to tag. Only the first one is sent.
        tags: Vec<String>,
    },
    /// A link share.
    Link {
        /// The shared URL.
        url: String,
    },
}

impl Attachment {
    /// The kind of this attachment.
    #[must_use]
    pub fn kind(&self) -> AttachmentType {
        match self {
            Attachment::None => AttachmentType::None,
            Attachment::Video { .. } => AttachmentType::Video,
            Attachment::Photo { .. } => AttachmentType::Photo,
            Attachment::Link { .. } => AttachmentType::Link,
        }
    }

    /// Returns the tag to apply to a photo, if any.
    pub(crate) fn photo_tag(tags: &[String]) -> Result<Option<TagId>, Error> {
        tags.first()
            .map(|tag| {
                tag.parse().map_err(|source| Error::InvalidTag {
                    tag: tag.clone(),
                    source,
                })
            })
            .transpose()
    }
}

/// The discriminant of an [`Attachment`], numbered as in stored post descriptions.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum AttachmentType {
    /// No attachment.
    None = 1,
    /// [`Attachment::Video`].
    Video = 2,
    /// [`Attachment::Photo`].
    Photo = 3,
    /// [`Attachment::Link`].
    Link = 4,
}

impl AttachmentType {
    /// The graph edge posts of this kind are created under.
    #[must_use]
    pub fn edge(self) -> &'static str {
        match self {
            AttachmentType::Video => "videos",
            AttachmentType::Photo => "photos",
            AttachmentType::Link | AttachmentType::None => "feed",
        }
    }

    /// Returns true if posts of this kind go to the video upload host.
    #[must_use]
    pub fn uses_video_host(self) -> bool {
        matches!(self, AttachmentType::Video)
    }
}

impl TryFrom<u8> for AttachmentType {
    type Error = u8;

    fn try_from(value: u8) -> Result<AttachmentType, u8> {
        match value {
            1 => Ok(AttachmentType::None),
            2 => Ok(AttachmentType::Video),
            3 => Ok(AttachmentType::Photo),
            4 => Ok(AttachmentType::Link),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Attachment, AttachmentType, TagId};
    use crate::Error;

    #[test]
    fn edges_match_kinds() {
        assert_eq!(AttachmentType::None.edge(), "feed");
        assert_eq!(AttachmentType::Video.edge(), "videos");
        assert_eq!(AttachmentType::Photo.edge(), "photos");
        assert_eq!(AttachmentType::Link.edge(), "feed");
        assert!(AttachmentType::Video.uses_video_host());
        assert!(!AttachmentType::Photo.uses_video_host());
        assert!(!AttachmentType::Link.uses_video_host());
        assert!(!AttachmentType::None.uses_video_host());
    }

    #[test]
    fn attachment_type_numbering() {
        for kind in [
            AttachmentType::None,
            AttachmentType::Video,
            AttachmentType::Photo,
            AttachmentType::Link,
        ] {
            assert_eq!(AttachmentType::try_from(kind as u8), Ok(kind));
        }
        assert_eq!(AttachmentType::try_from(0), Err(0));
        assert_eq!(AttachmentType::try_from(5), Err(5));
    }

    #[test]
    fn photo_tag_uses_first_entry() {
        let tags = vec!["1234".to_owned(), "not a number".to_owned()];
        assert_eq!(Attachment::photo_tag(&tags).unwrap(), Some(TagId(1234)));
        assert_eq!(Attachment::photo_tag(&[]).unwrap(), None);
        assert!(matches!(
            Attachment::photo_tag(&["@friend".to_owned()]),
            Err(Error::InvalidTag { tag, .. }) if tag == "@friend"
        ));
    }
}
