//! The four content kinds and their create/update rules.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::{Error, Result, render};

// ─── Lenient reads ───────────────────────────────────────────────────────────

/// Parse an RFC 3339 instant, or an offset-less ISO 8601 one read as UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
    .ok()
}

fn instant<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<DateTime<Utc>, D::Error> {
  let raw = String::deserialize(de)?;
  parse_instant(&raw)
    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
}

fn optional_instant<'de, D: Deserializer<'de>>(
  de: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
  match Option::<String>::deserialize(de)? {
    None => Ok(None),
    Some(raw) => parse_instant(&raw)
      .map(Some)
      .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`"))),
  }
}

/// `null` and absent text both read as `""`.
fn text<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
  Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

// ─── Kinds ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
  Reviews,
  Faqs,
  Gallery,
  Reels,
}

impl ContentKind {
  /// File name under the data directory.
  pub fn file_name(self) -> &'static str {
    match self {
      Self::Reviews => "reviews.json",
      Self::Faqs => "faqs.json",
      Self::Gallery => "gallery.json",
      Self::Reels => "reels.json",
    }
  }
}

impl fmt::Display for ContentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Reviews => "review",
      Self::Faqs => "faq",
      Self::Gallery => "gallery image",
      Self::Reels => "reel",
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A content item stored in a JSON array file and rendered into the site.
pub trait ContentItem:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  /// Request body for creating an item; omitted fields take their defaults.
  type New: DeserializeOwned + Send + 'static;
  /// Request body for a partial update; omitted fields keep their value.
  type Patch: DeserializeOwned + Send + 'static;

  const KIND: ContentKind;

  fn id(&self) -> u64;

  fn create(id: u64, new: Self::New, now: DateTime<Utc>) -> Result<Self>;

  fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>) -> Result<()>;

  /// Rendered page sections for the full, ordered list of items.
  fn sections(items: &[Self]) -> Vec<(&'static str, String)>;
}

fn patch<T>(slot: &mut T, value: Option<T>) {
  if let Some(value) = value {
    *slot = value;
  }
}

// ─── Review ──────────────────────────────────────────────────────────────────

fn default_rating() -> u8 { 5 }

fn default_review_time() -> String { "3 months ago".to_owned() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub id:         u64,
  #[serde(default, deserialize_with = "text")]
  pub name:       String,
  #[serde(default, deserialize_with = "text")]
  pub initial:    String,
  #[serde(default = "default_rating")]
  pub rating:     u8,
  #[serde(default, deserialize_with = "text")]
  pub time:       String,
  #[serde(default, deserialize_with = "text")]
  pub title:      String,
  #[serde(default, deserialize_with = "text")]
  pub content:    String,
  #[serde(default, deserialize_with = "text")]
  pub badge:      String,
  #[serde(deserialize_with = "instant")]
  pub created_at: DateTime<Utc>,
  #[serde(
    default,
    deserialize_with = "optional_instant",
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
  pub name:    String,
  /// Avatar letter; derived from `name` when absent.
  #[serde(default)]
  pub initial: Option<String>,
  #[serde(default = "default_rating")]
  pub rating:  u8,
  #[serde(default = "default_review_time")]
  pub time:    String,
  #[serde(default)]
  pub title:   String,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub badge:   String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
  pub name:    Option<String>,
  pub initial: Option<String>,
  pub rating:  Option<u8>,
  pub time:    Option<String>,
  pub title:   Option<String>,
  pub content: Option<String>,
  pub badge:   Option<String>,
}

fn initial_of(name: &str) -> String {
  name
    .trim()
    .chars()
    .next()
    .map(|c| c.to_uppercase().collect())
    .unwrap_or_else(|| "A".to_owned())
}

impl Review {
  fn check(&self) -> Result<()> {
    if !(1..=5).contains(&self.rating) {
      return Err(Error::Invalid {
        kind:   ContentKind::Reviews,
        reason: format!("rating must be between 1 and 5, got {}", self.rating),
      });
    }
    Ok(())
  }
}

impl ContentItem for Review {
  type New = NewReview;
  type Patch = ReviewPatch;

  const KIND: ContentKind = ContentKind::Reviews;

  fn id(&self) -> u64 { self.id }

  fn create(id: u64, new: NewReview, now: DateTime<Utc>) -> Result<Self> {
    let review = Self {
      id,
      initial: new.initial.unwrap_or_else(|| initial_of(&new.name)),
      name: new.name,
      rating: new.rating,
      time: new.time,
      title: new.title,
      content: new.content,
      badge: new.badge,
      created_at: now,
      updated_at: None,
    };
    review.check()?;
    Ok(review)
  }

  fn apply(&mut self, p: ReviewPatch, now: DateTime<Utc>) -> Result<()> {
    let mut next = self.clone();
    patch(&mut next.name, p.name);
    patch(&mut next.initial, p.initial);
    patch(&mut next.rating, p.rating);
    patch(&mut next.time, p.time);
    patch(&mut next.title, p.title);
    patch(&mut next.content, p.content);
    patch(&mut next.badge, p.badge);
    next.check()?;
    next.updated_at = Some(now);
    *self = next;
    Ok(())
  }

  fn sections(items: &[Self]) -> Vec<(&'static str, String)> {
    render::review_sections(items)
  }
}

// ─── FAQ ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
  pub id:         u64,
  #[serde(default, deserialize_with = "text")]
  pub question:   String,
  #[serde(default, deserialize_with = "text")]
  pub answer:     String,
  #[serde(deserialize_with = "instant")]
  pub created_at: DateTime<Utc>,
  #[serde(
    default,
    deserialize_with = "optional_instant",
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFaq {
  pub question: String,
  #[serde(default)]
  pub answer:   String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqPatch {
  pub question: Option<String>,
  pub answer:   Option<String>,
}

impl ContentItem for Faq {
  type New = NewFaq;
  type Patch = FaqPatch;

  const KIND: ContentKind = ContentKind::Faqs;

  fn id(&self) -> u64 { self.id }

  fn create(id: u64, new: NewFaq, now: DateTime<Utc>) -> Result<Self> {
    Ok(Self {
      id,
      question: new.question,
      answer: new.answer,
      created_at: now,
      updated_at: None,
    })
  }

  fn apply(&mut self, p: FaqPatch, now: DateTime<Utc>) -> Result<()> {
    patch(&mut self.question, p.question);
    patch(&mut self.answer, p.answer);
    self.updated_at = Some(now);
    Ok(())
  }

  fn sections(items: &[Self]) -> Vec<(&'static str, String)> {
    vec![("faqs", render::faqs(items))]
  }
}

// ─── Gallery ─────────────────────────────────────────────────────────────────

fn default_category() -> String { "weddings".to_owned() }

fn default_alt() -> String { "Gallery image".to_owned() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
  pub id:         u64,
  #[serde(default, deserialize_with = "text")]
  pub url:        String,
  /// Filter bucket used by the gallery tabs.
  #[serde(default, deserialize_with = "text")]
  pub category:   String,
  #[serde(default, deserialize_with = "text")]
  pub alt:        String,
  #[serde(deserialize_with = "instant")]
  pub created_at: DateTime<Utc>,
  #[serde(
    default,
    deserialize_with = "optional_instant",
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGalleryImage {
  pub url:      String,
  #[serde(default = "default_category")]
  pub category: String,
  #[serde(default = "default_alt")]
  pub alt:      String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryImagePatch {
  pub url:      Option<String>,
  pub category: Option<String>,
  pub alt:      Option<String>,
}

impl ContentItem for GalleryImage {
  type New = NewGalleryImage;
  type Patch = GalleryImagePatch;

  const KIND: ContentKind = ContentKind::Gallery;

  fn id(&self) -> u64 { self.id }

  fn create(id: u64, new: NewGalleryImage, now: DateTime<Utc>) -> Result<Self> {
    Ok(Self {
      id,
      url: new.url,
      category: new.category,
      alt: new.alt,
      created_at: now,
      updated_at: None,
    })
  }

  fn apply(&mut self, p: GalleryImagePatch, now: DateTime<Utc>) -> Result<()> {
    patch(&mut self.url, p.url);
    patch(&mut self.category, p.category);
    patch(&mut self.alt, p.alt);
    self.updated_at = Some(now);
    Ok(())
  }

  fn sections(items: &[Self]) -> Vec<(&'static str, String)> {
    vec![("gallery", render::gallery(items))]
  }
}

// ─── Reels ───────────────────────────────────────────────────────────────────

fn default_reel_title() -> String { "Instagram Reel".to_owned() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reel {
  pub id:         u64,
  /// Instagram permalink of the reel.
  #[serde(default, deserialize_with = "text")]
  pub embed_url:  String,
  #[serde(default, deserialize_with = "text")]
  pub title:      String,
  #[serde(deserialize_with = "instant")]
  pub created_at: DateTime<Utc>,
  #[serde(
    default,
    deserialize_with = "optional_instant",
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReel {
  pub embed_url: String,
  #[serde(default = "default_reel_title")]
  pub title:     String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReelPatch {
  pub embed_url: Option<String>,
  pub title:     Option<String>,
}

impl ContentItem for Reel {
  type New = NewReel;
  type Patch = ReelPatch;

  const KIND: ContentKind = ContentKind::Reels;

  fn id(&self) -> u64 { self.id }

  fn create(id: u64, new: NewReel, now: DateTime<Utc>) -> Result<Self> {
    Ok(Self {
      id,
      embed_url: new.embed_url,
      title: new.title,
      created_at: now,
      updated_at: None,
    })
  }

  fn apply(&mut self, p: ReelPatch, now: DateTime<Utc>) -> Result<()> {
    patch(&mut self.embed_url, p.embed_url);
    patch(&mut self.title, p.title);
    self.updated_at = Some(now);
    Ok(())
  }

  fn sections(items: &[Self]) -> Vec<(&'static str, String)> {
    vec![("reels", render::reels(items))]
  }
}
