//! fbscheduler schedules posts on a Facebook Page through the Graph API, and handles the
//! exchange of the short-lived token from the Facebook login dialog for a long-lived one.
//!
//! ```no_run
//! use fbscheduler::{Attachment, JsonFileStore, Post, Scheduler};
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! // Credentials and page live in a JSON document
//! let scheduler = Scheduler::new(JsonFileStore::new("fbscheduler.json"));
//!
//! // Describe a post
//! let post = Post {
//!     message: "new on the blog".into(),
//!     attachment: Attachment::Link {
//!         url: "https://example.com/blog/hello".into(),
//!     },
//!     scheduled_publish_time: 1_700_000_000,
//!     ..Default::default()
//! };
//!
//! // Facebook holds it until the scheduled time
//! scheduler.schedule(post).await?;
//! # Ok(())
//! # }
//! ```

#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod attachment;
mod client;
mod config;
mod error;
mod post;
mod scheduler;
mod token;

pub use crate::attachment::{Attachment, AttachmentType, TagId};
pub use crate::client::Client;
pub use crate::config::{
    ConfigStore, Configuration, ConfigurationSubmission, JsonFileStore, MemoryStore, PageAccount,
};
pub use crate::error::{Credential, Error};
pub use crate::post::{Post, ScheduleRequest};
pub use crate::scheduler::Scheduler;
