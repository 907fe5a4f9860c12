use crate::client::API_VERSION;
use crate::{Attachment, AttachmentType, Configuration, Credential, Error};
use serde::Deserialize;
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Describes a post to schedule on the configured page.
///
/// A `Post` can also be decoded from the JSON post description used by upstream triggers
/// (`attachment_type` is `1` for none, `2` video, `3` photo, `4` link).
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawPost")]
#[must_use]
pub struct Post {
    /// Text of the post. Used as the caption of photos and the description of videos.
    pub message: String,
    /// Media or link carried by the post.
    pub attachment: Attachment,
    /// Page ID of a location associated with the post. Not sent for videos.
    pub place: Option<String>,
    /// Publish immediately instead of holding the post until `scheduled_publish_time`.
    pub published: bool,
    /// Unix timestamp (seconds) at which Facebook publishes the post.
    pub scheduled_publish_time: i64,
}

impl Post {
    /// Holds the post until `when`.
    pub fn scheduled_at(mut self, when: chrono::DateTime<chrono::Utc>) -> Post {
        self.published = false;
        self.scheduled_publish_time = when.timestamp();
        self
    }

    /// Assembles the Graph API request that schedules this post on the page in
    /// `configuration`.
    pub fn to_request(&self, configuration: &Configuration) -> Result<ScheduleRequest, Error> {
        if !configuration.has_page() {
            return Err(Error::MissingCredentials(Credential::Page));
        }

        let mut params = vec![
            ("published", self.published.to_string()),
            (
                "scheduled_publish_time",
                self.scheduled_publish_time.to_string(),
            ),
            ("access_token", escape(&configuration.page_auth_token)),
            ("unpublished_content_type", "SCHEDULED".to_owned()),
        ];

        match &self.attachment {
            Attachment::Video { file_url, title } => {
                params.push(("title", escape(title)));
                params.push(("description", escape(&self.message)));
                params.push(("file_url", file_url.clone()));
            }
            Attachment::Photo { url, tags } => {
                let tag = Attachment::photo_tag(tags)?;
                params.push(("allow_spherical_photo", "true".to_owned()));
                params.push(("caption", escape(&self.message)));
                params.push(("url", url.clone()));
                self.push_place(&mut params);
                if let Some(tag) = tag {
                    params.push((
                        "tags",
                        escape(&format!(
                            "[{{x: 0.0, y: 0.0, tag_uid: {}, tag_text: ''}}]",
                            tag
                        )),
                    ));
                }
            }
            Attachment::Link { url } => {
                params.push(("message", escape(&self.message)));
                self.push_place(&mut params);
                params.push(("link", url.clone()));
            }
            Attachment::None => {
                params.push(("message", escape(&self.message)));
                self.push_place(&mut params);
            }
        }

        let request = ScheduleRequest {
            kind: self.attachment.kind(),
            page_id: configuration.page_id.clone(),
            params,
        };
        tracing::debug!(kind = %request.kind, page_id = %request.page_id, "built request");
        Ok(request)
    }

    fn push_place(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(place) = &self.place {
            params.push(("place", escape(place)));
        }
    }
}

fn escape(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// A fully assembled request to create a scheduled post.
///
/// Parameter values are stored query-ready: text is form-urlencoded, attachment URLs are
/// kept as given.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduleRequest {
    kind: AttachmentType,
    page_id: String,
    params: Vec<(&'static str, String)>,
}

impl ScheduleRequest {
    /// The kind of post being created.
    #[must_use]
    pub fn kind(&self) -> AttachmentType {
        self.kind
    }

    /// The graph edge the request is sent to.
    #[must_use]
    pub fn edge(&self) -> &'static str {
        self.kind.edge()
    }

    /// Query parameters in the order they are sent.
    pub fn params(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.params.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// The query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> String {
        self.query_with(false)
    }

    /// Builds the endpoint URL below `host`.
    pub fn url(&self, host: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}?{}", self.path(host), self.query()))?)
    }

    /// Same as [`ScheduleRequest::url`] with the access token masked, for logging.
    pub(crate) fn redacted_url(&self, host: &str) -> String {
        format!("{}?{}", self.path(host), self.query_with(true))
    }

    fn path(&self, host: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            host.trim_end_matches('/'),
            API_VERSION,
            self.page_id,
            self.edge()
        )
    }

    fn query_with(&self, redact: bool) -> String {
        let mut query = String::new();
        for (name, value) in &self.params {
            if !query.is_empty() {
                query.push('&');
            }
            let value = if redact && *name == "access_token" {
                "<redacted>"
            } else {
                value.as_str()
            };
            query.push_str(name);
            query.push('=');
            query.push_str(value);
        }
        query
    }
}

#[derive(Deserialize)]
struct RawPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    attachment: String,
    attachment_type: u8,
    #[serde(default)]
    place: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    published: bool,
    #[serde(default)]
    scheduled_publish_time: i64,
}

impl TryFrom<RawPost> for Post {
    type Error = String;

    fn try_from(raw: RawPost) -> Result<Post, String> {
        let attachment = match AttachmentType::try_from(raw.attachment_type)
            .map_err(|n| format!("unknown attachment_type {}", n))?
        {
            AttachmentType::None => Attachment::None,
            AttachmentType::Video => Attachment::Video {
                file_url: raw.attachment,
                title: raw.title,
            },
            AttachmentType::Photo => Attachment::Photo {
                url: raw.attachment,
                tags: raw.tags,
            },
            AttachmentType::Link => Attachment::Link {
                url: raw.attachment,
            },
        };
        Ok(Post {
            message: raw.message,
            attachment,
            place: Some(raw.place).filter(|place| !place.is_empty()),
            published: raw.published,
            scheduled_publish_time: raw.scheduled_publish_time,
        })
    }
}
