//! Content administration for the studio site.
//!
//! The site owner maintains four kinds of content (reviews, FAQs, gallery
//! images and Instagram reels). Each kind lives in its own JSON file; every
//! change re-renders the matching sections of the static `index.html` and can
//! optionally be committed and pushed so the hosted page picks it up.

pub mod error;
pub mod git;
pub mod item;
pub mod render;
pub mod repository;
pub mod service;

pub use error::{Error, Result};
pub use git::{GitPublisher, PublishOutcome};
pub use item::{ContentItem, ContentKind, Faq, GalleryImage, Reel, Review};
pub use render::SiteRenderer;
pub use repository::JsonRepository;
pub use service::{ContentService, Repositories};
