//! # herald-presenter
//!
//! Pure functions turning content entities into publishing API payloads.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use herald_core::{ContentItem, Locale, UpdateType};
//! use herald_presenter::{present, Presentable};
//!
//! fn payloads(item: &ContentItem) {
//!     for locale in item.locales() {
//!         if let Ok(payload) = present(Presentable::ContentItem(item), &UpdateType::major(), &locale) {
//!             println!("{} ({})", payload.base_path, payload.format);
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod payload;
pub mod presenters;

pub use error::PresentError;
pub use payload::{ContentPayload, PublishIntent, Route, PUBLISHING_APP};
pub use presenters::{
    present, present_coming_soon, present_content_item, present_gone, present_publish_intent,
    present_redirect, present_unpublishing, public_document_path, Presentable,
};
