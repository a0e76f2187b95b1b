//! Regenerating sections of the site's `index.html`.
//!
//! Each generated section sits between a pair of marker comments:
//!
//! ```html
//! <!-- folio:faqs:start -->
//! …generated…
//! <!-- folio:faqs:end -->
//! ```
//!
//! Everything outside the markers is left byte-for-byte untouched.

use std::{fmt::Write as _, path::PathBuf};

use quick_xml::escape::escape;
use tokio::sync::Mutex;

use crate::{
  Result,
  item::{Faq, GalleryImage, Reel, Review},
  repository::write_atomic,
};

/// Reviews beyond this many go to the smaller "more reviews" grid.
pub const FEATURED_REVIEWS: usize = 3;

const GOOGLE_LOGO: &str = "https://upload.wikimedia.org/wikipedia/commons/2/2f/Google_2015_logo.svg";

// ─── Markers ─────────────────────────────────────────────────────────────────

fn start_marker(section: &str) -> String { format!("<!-- folio:{section}:start -->") }

fn end_marker(section: &str) -> String { format!("<!-- folio:{section}:end -->") }

/// Replace the body of `section` in `html`. Returns `None` when the marker
/// pair is missing or out of order.
pub fn replace_section(html: &str, section: &str, body: &str) -> Option<String> {
  let start = start_marker(section);
  let end = end_marker(section);

  let body_start = html.find(&start)? + start.len();
  let body_end = body_start + html[body_start..].find(&end)?;

  let mut out = String::with_capacity(html.len() + body.len());
  out.push_str(&html[..body_start]);
  out.push('\n');
  out.push_str(body);
  if !body.is_empty() && !body.ends_with('\n') {
    out.push('\n');
  }
  out.push_str(&html[body_end..]);
  Some(out)
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Writes rendered sections into the site page.
pub struct SiteRenderer {
  html_path: PathBuf,
  lock:      Mutex<()>,
}

impl SiteRenderer {
  pub fn new(html_path: impl Into<PathBuf>) -> Self {
    Self { html_path: html_path.into(), lock: Mutex::new(()) }
  }

  /// Replace every section in `sections` and write the page back once.
  ///
  /// A section whose markers are missing is logged and skipped. Returns the
  /// number of sections replaced.
  pub async fn apply(&self, sections: &[(&str, String)]) -> Result<usize> {
    let _guard = self.lock.lock().await;
    let mut html = tokio::fs::read_to_string(&self.html_path).await?;

    let mut replaced = 0;
    for (section, body) in sections {
      match replace_section(&html, section, body) {
        Some(next) => {
          html = next;
          replaced += 1;
        }
        None => tracing::warn!(
          %section,
          page = %self.html_path.display(),
          "section markers not found; skipping"
        ),
      }
    }

    if replaced > 0 {
      write_atomic(&self.html_path, html.as_bytes()).await?;
      tracing::info!(replaced, page = %self.html_path.display(), "page sections rendered");
    }
    Ok(replaced)
  }
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

fn stars(rating: u8, size: &str) -> String {
  (0..rating)
    .map(|_| format!(r#"<span class="text-yellow-400 {size}">★</span>"#))
    .collect()
}

fn review_card(r: &Review) -> String {
  let mut card = format!(
    r#"<div class="bg-white rounded-2xl shadow-lg overflow-hidden transition-all duration-300 hover:shadow-xl hover:-translate-y-1 border border-gray-100">
  <div class="p-8">
    <div class="flex justify-between items-start mb-6">
      <div class="flex items-center space-x-4">
        <div class="w-14 h-14 rounded-full bg-gradient-to-br from-blue-500 to-purple-600 flex items-center justify-center text-white text-xl font-bold shadow-lg">{initial}</div>
        <div>
          <h3 class="font-bold text-lg text-gray-900">{name}</h3>
          <p class="text-sm text-gray-500">{time}</p>
        </div>
      </div>
      <img src="{GOOGLE_LOGO}" alt="Google" class="h-6">
    </div>
    <div class="flex mb-4">{stars}</div>
    <h4 class="font-bold text-lg mb-3 text-gray-900">"{title}"</h4>
    <p class="text-gray-600 leading-relaxed mb-4">{content}</p>
"#,
    initial = escape(r.initial.as_str()),
    name = escape(r.name.as_str()),
    time = escape(r.time.as_str()),
    stars = stars(r.rating, "text-xl"),
    title = escape(r.title.as_str()),
    content = escape(r.content.as_str()),
  );
  if !r.badge.is_empty() {
    let _ = writeln!(
      card,
      r#"    <span class="inline-block bg-green-100 text-green-700 px-4 py-2 rounded-full text-sm font-semibold"><span class="mr-2">✓</span>{}</span>"#,
      escape(r.badge.as_str())
    );
  }
  card.push_str("  </div>\n</div>\n");
  card
}

fn small_review_card(r: &Review) -> String {
  format!(
    r#"<div class="bg-white rounded-xl shadow-md overflow-hidden transition-all duration-300 hover:shadow-lg hover:-translate-y-1 border border-gray-100">
  <div class="p-6">
    <div class="flex items-center space-x-3 mb-4">
      <div class="w-12 h-12 rounded-full bg-gradient-to-br from-purple-500 to-pink-600 flex items-center justify-center text-white font-bold shadow">{initial}</div>
      <div class="flex-1">
        <h4 class="font-bold text-gray-900">{name}</h4>
        <div class="flex items-center space-x-2">
          <div class="flex">{stars}</div>
          <span class="text-xs text-gray-500">{time}</span>
        </div>
      </div>
      <img src="{GOOGLE_LOGO}" alt="Google" class="h-4">
    </div>
    <p class="text-gray-600 text-sm leading-relaxed">"{content}"</p>
  </div>
</div>
"#,
    initial = escape(r.initial.as_str()),
    name = escape(r.name.as_str()),
    stars = stars(r.rating, "text-sm"),
    time = escape(r.time.as_str()),
    content = escape(r.content.as_str()),
  )
}

/// The featured grid and the "more reviews" grid.
pub fn review_sections(reviews: &[Review]) -> Vec<(&'static str, String)> {
  let split = reviews.len().min(FEATURED_REVIEWS);
  let (featured, rest) = reviews.split_at(split);
  vec![
    ("reviews", featured.iter().map(review_card).collect()),
    ("more-reviews", rest.iter().map(small_review_card).collect()),
  ]
}

// ─── FAQs ────────────────────────────────────────────────────────────────────

pub fn faqs(faqs: &[Faq]) -> String {
  faqs
    .iter()
    .map(|f| {
      format!(
        r#"<div class="border-b border-gray-200 pb-4">
  <button class="flex justify-between items-center w-full text-left py-4 focus:outline-none faq-question">
    <h3 class="text-xl font-semibold text-gray-900">{question}</h3>
    <svg class="w-6 h-6 transform transition-transform duration-200 faq-icon" fill="none" stroke="currentColor" viewBox="0 0 24 24">
      <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"></path>
    </svg>
  </button>
  <div class="faq-answer hidden mt-2">
    <p class="text-gray-600 leading-relaxed">{answer}</p>
  </div>
</div>
"#,
        question = escape(f.question.as_str()),
        answer = escape(f.answer.as_str()),
      )
    })
    .collect()
}

// ─── Gallery ─────────────────────────────────────────────────────────────────

pub fn gallery(images: &[GalleryImage]) -> String {
  images
    .iter()
    .map(|i| {
      format!(
        r#"<div class="break-inside-avoid overflow-hidden shadow-md" data-category="{category}">
  <img src="{url}" alt="{alt}" class="w-full h-auto transition-transform duration-300 ease-in-out hover:scale-105">
</div>
"#,
        category = escape(i.category.as_str()),
        url = escape(i.url.as_str()),
        alt = escape(i.alt.as_str()),
      )
    })
    .collect()
}

// ─── Reels ───────────────────────────────────────────────────────────────────

pub fn reels(reels: &[Reel]) -> String {
  reels
    .iter()
    .map(|r| {
      format!(
        r#"<div class="instagram-embed" title="{title}">
  <blockquote class="instagram-media" data-instgrm-permalink="{url}" data-instgrm-version="14"></blockquote>
</div>
"#,
        title = escape(r.title.as_str()),
        url = escape(r.embed_url.as_str()),
      )
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  const PAGE: &str = "<html>\n<body>\n<div id=\"faq\">\n<!-- folio:faqs:start -->\n<p>old</p>\n<!-- folio:faqs:end -->\n</div>\n</body>\n</html>\n";

  fn review(id: u64, name: &str) -> Review {
    Review {
      id,
      name: name.to_owned(),
      initial: name[..1].to_owned(),
      rating: 4,
      time: "2 weeks ago".to_owned(),
      title: "Lovely".to_owned(),
      content: "Great photos".to_owned(),
      badge: String::new(),
      created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
      updated_at: None,
    }
  }

  #[test]
  fn replaces_only_between_markers() {
    let out = replace_section(PAGE, "faqs", "<p>new</p>").unwrap();
    assert_eq!(
      out,
      "<html>\n<body>\n<div id=\"faq\">\n<!-- folio:faqs:start -->\n<p>new</p>\n<!-- folio:faqs:end -->\n</div>\n</body>\n</html>\n"
    );
  }

  #[test]
  fn replacing_twice_is_stable() {
    let once = replace_section(PAGE, "faqs", "<p>new</p>").unwrap();
    let twice = replace_section(&once, "faqs", "<p>new</p>").unwrap();
    assert_eq!(once, twice);
  }

  #[test]
  fn missing_or_reversed_markers_yield_none() {
    assert!(replace_section(PAGE, "gallery", "x").is_none());
    let reversed = "<!-- folio:faqs:end --><!-- folio:faqs:start -->";
    assert!(replace_section(reversed, "faqs", "x").is_none());
  }

  #[test]
  fn text_is_escaped() {
    let faq = Faq {
      id:         1,
      question:   "Do you travel <outside> Dubai?".to_owned(),
      answer:     "Yes & we love it".to_owned(),
      created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
      updated_at: None,
    };
    let html = faqs(&[faq]);
    assert!(html.contains("Do you travel &lt;outside&gt; Dubai?"));
    assert!(html.contains("Yes &amp; we love it"));
    assert!(!html.contains("<outside>"));
  }

  #[test]
  fn first_three_reviews_are_featured() {
    let reviews: Vec<_> = ["Asha", "Ravi", "Meera", "Noor", "Zara"]
      .iter()
      .enumerate()
      .map(|(i, n)| review(i as u64 + 1, n))
      .collect();
    let sections = review_sections(&reviews);

    assert_eq!(sections[0].0, "reviews");
    assert_eq!(sections[0].1.matches("rounded-2xl").count(), 3);
    assert!(sections[0].1.contains("Meera"));
    assert!(!sections[0].1.contains("Noor"));

    assert_eq!(sections[1].0, "more-reviews");
    assert_eq!(sections[1].1.matches("rounded-xl").count(), 2);
    assert!(sections[1].1.contains("Zara"));
    assert_eq!(sections[1].1.matches('★').count(), 8);
  }

  #[test]
  fn badge_is_rendered_only_when_set() {
    let mut r = review(1, "Asha");
    assert!(!review_card(&r).contains('✓'));
    r.badge = "Verified client".to_owned();
    assert!(review_card(&r).contains("✓</span>Verified client"));
  }

  #[tokio::test]
  async fn apply_writes_present_sections_and_skips_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.html");
    tokio::fs::write(&path, PAGE).await.unwrap();

    let renderer = SiteRenderer::new(&path);
    let replaced = renderer
      .apply(&[("faqs", "<p>fresh</p>".to_owned()), ("gallery", "<img>".to_owned())])
      .await
      .unwrap();
    assert_eq!(replaced, 1);

    let page = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(page.contains("<p>fresh</p>"));
    assert!(!page.contains("<p>old</p>"));
  }

  #[tokio::test]
  async fn nothing_to_replace_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.html");
    tokio::fs::write(&path, "<html></html>").await.unwrap();

    let renderer = SiteRenderer::new(&path);
    assert_eq!(renderer.apply(&[("reels", String::new())]).await.unwrap(), 0);
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "<html></html>");
  }
}
