//! [`ContentService`] — repositories, page rendering and publishing together.

use std::path::Path;

use crate::{
  Error, Result,
  git::{GitPublisher, PublishOutcome},
  item::{ContentItem, Faq, GalleryImage, Reel, Review},
  render::SiteRenderer,
  repository::JsonRepository,
};

/// Access to the repository holding items of type `T`.
pub trait Repositories<T: ContentItem> {
  fn repository(&self) -> &JsonRepository<T>;
}

/// The admin backend's view of the site content.
///
/// Every successful change re-renders the affected page sections and, with
/// auto-push enabled, publishes the result. A failed render skips the push,
/// so a stale page is never published. Neither follow-up can fail the change
/// itself: the JSON file is the source of truth and a later change or an
/// explicit render brings the page back in line.
pub struct ContentService {
  reviews:   JsonRepository<Review>,
  faqs:      JsonRepository<Faq>,
  gallery:   JsonRepository<GalleryImage>,
  reels:     JsonRepository<Reel>,
  renderer:  Option<SiteRenderer>,
  publisher: Option<GitPublisher>,
  auto_push: bool,
}

macro_rules! repositories {
  ($($ty:ty => $field:ident),* $(,)?) => {
    $(
      impl Repositories<$ty> for ContentService {
        fn repository(&self) -> &JsonRepository<$ty> { &self.$field }
      }
    )*
  };
}

repositories! {
  Review => reviews,
  Faq => faqs,
  GalleryImage => gallery,
  Reel => reels,
}

impl ContentService {
  pub fn new(data_dir: &Path) -> Self {
    Self {
      reviews:   JsonRepository::new(data_dir),
      faqs:      JsonRepository::new(data_dir),
      gallery:   JsonRepository::new(data_dir),
      reels:     JsonRepository::new(data_dir),
      renderer:  None,
      publisher: None,
      auto_push: false,
    }
  }

  pub fn with_renderer(mut self, renderer: SiteRenderer) -> Self {
    self.renderer = Some(renderer);
    self
  }

  pub fn with_publisher(mut self, publisher: GitPublisher, auto_push: bool) -> Self {
    self.publisher = Some(publisher);
    self.auto_push = auto_push;
    self
  }

  pub async fn list<T>(&self) -> Result<Vec<T>>
  where
    T: ContentItem,
    Self: Repositories<T>,
  {
    <Self as Repositories<T>>::repository(self).list().await
  }

  pub async fn create<T>(&self, new: T::New) -> Result<T>
  where
    T: ContentItem,
    Self: Repositories<T>,
  {
    let (item, items) = <Self as Repositories<T>>::repository(self).create(new).await?;
    self.changed(&items).await;
    Ok(item)
  }

  pub async fn update<T>(&self, id: u64, patch: T::Patch) -> Result<T>
  where
    T: ContentItem,
    Self: Repositories<T>,
  {
    let (item, items) = <Self as Repositories<T>>::repository(self).update(id, patch).await?;
    self.changed(&items).await;
    Ok(item)
  }

  pub async fn delete<T>(&self, id: u64) -> Result<()>
  where
    T: ContentItem,
    Self: Repositories<T>,
  {
    let items = <Self as Repositories<T>>::repository(self).delete(id).await?;
    self.changed(&items).await;
    Ok(())
  }

  /// Re-render every section from the stored content.
  pub async fn render_all(&self) -> Result<usize> {
    let Some(renderer) = &self.renderer else { return Ok(0) };
    let mut sections = Review::sections(&self.reviews.list().await?);
    sections.extend(Faq::sections(&self.faqs.list().await?));
    sections.extend(GalleryImage::sections(&self.gallery.list().await?));
    sections.extend(Reel::sections(&self.reels.list().await?));
    renderer.apply(&sections).await
  }

  pub async fn status(&self) -> Result<String> {
    self.publisher.as_ref().ok_or(Error::PublishingDisabled)?.status().await
  }

  pub async fn publish(&self, message: &str) -> Result<PublishOutcome> {
    self.publisher.as_ref().ok_or(Error::PublishingDisabled)?.publish(message).await
  }

  async fn changed<T: ContentItem>(&self, items: &[T]) -> FollowUp {
    if let Some(renderer) = &self.renderer {
      if let Err(e) = renderer.apply(&T::sections(items)).await {
        tracing::warn!(kind = %T::KIND, error = %e, "failed to render page after change");
        if self.auto_push && self.publisher.is_some() {
          tracing::warn!(kind = %T::KIND, "skipping auto-push of a stale page");
        }
        return FollowUp::RenderFailed;
      }
    }
    if !self.auto_push {
      return FollowUp::Done;
    }
    let Some(publisher) = &self.publisher else { return FollowUp::Done };
    let message = format!("Update {} content", T::KIND);
    match publisher.publish(&message).await {
      Ok(outcome) => {
        tracing::info!(%outcome, "auto-push finished");
        FollowUp::Done
      }
      Err(e) => {
        tracing::warn!(error = %e, "auto-push failed");
        FollowUp::PushFailed
      }
    }
  }
}

/// How the render and auto-push after a change went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
  Done,
  /// The page was not rendered, so auto-push was skipped too.
  RenderFailed,
  PushFailed,
}
