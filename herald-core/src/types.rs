//! Domain types shared by every Herald crate.
//!
//! Identifiers are newtypes over the integer keys of the content database;
//! locales and update types are newtypes over their wire strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable identity of a document across all of its editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of a single edition (version) of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditionId(pub u64);

impl fmt::Display for EditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of an unpublishing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnpublishingId(pub u64);

impl fmt::Display for UnpublishingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A locale code such as `en`, `fr` or `zh-tw`.
///
/// Ordering is the byte order of the code, which is the order locale fan-out
/// happens in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(pub String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Locale {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Locale {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The `update_type` sent with every payload.
///
/// `major`, `minor` and `republish` are the well-known values, but any
/// caller-supplied string is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateType(pub String);

impl UpdateType {
    pub fn major() -> Self {
        Self::from("major")
    }

    pub fn minor() -> Self {
        Self::from("minor")
    }

    pub fn republish() -> Self {
        Self::from("republish")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UpdateType {
    fn default() -> Self {
        Self::major()
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UpdateType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for UpdateType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of the job queue a unit of work is delivered on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueName(pub String);

impl Default for QueueName {
    fn default() -> Self {
        Self::from("default")
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for QueueName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for QueueName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle state of an edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentState {
    #[default]
    Draft,
    Scheduled,
    Published,
    Archived,
    Withdrawn,
}

impl ContentState {
    /// `published`, `archived` and `withdrawn` editions are on the public site.
    pub fn is_publicly_visible(self) -> bool {
        matches!(
            self,
            ContentState::Published | ContentState::Archived | ContentState::Withdrawn
        )
    }
}

impl fmt::Display for ContentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentState::Draft => write!(f, "draft"),
            ContentState::Scheduled => write!(f, "scheduled"),
            ContentState::Published => write!(f, "published"),
            ContentState::Archived => write!(f, "archived"),
            ContentState::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// The content format (document type) of an edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    CaseStudy,
    Publication,
    NewsArticle,
    Speech,
    DetailedGuide,
    Consultation,
}

impl ContentFormat {
    /// All formats in a stable order.
    pub fn all() -> &'static [ContentFormat] {
        &[
            ContentFormat::CaseStudy,
            ContentFormat::Publication,
            ContentFormat::NewsArticle,
            ContentFormat::Speech,
            ContentFormat::DetailedGuide,
            ContentFormat::Consultation,
        ]
    }

    /// Public URL prefix under which documents of this format live.
    pub fn path_prefix(self) -> &'static str {
        match self {
            ContentFormat::CaseStudy => "/government/case-studies",
            ContentFormat::Publication => "/government/publications",
            ContentFormat::NewsArticle => "/government/news",
            ContentFormat::Speech => "/government/speeches",
            ContentFormat::DetailedGuide => "/guidance",
            ContentFormat::Consultation => "/government/consultations",
        }
    }

    /// The format whose public prefix `path` sits under, if any.
    pub fn for_path(path: &str) -> Option<ContentFormat> {
        ContentFormat::all().iter().copied().find(|format| {
            path.strip_prefix(format.path_prefix())
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Frontend application that renders this format once it is served from
    /// the content store.
    pub fn rendering_app(self) -> &'static str {
        match self {
            ContentFormat::CaseStudy => "government-frontend",
            _ => "whitehall-frontend",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentFormat::CaseStudy => "case_study",
            ContentFormat::Publication => "publication",
            ContentFormat::NewsArticle => "news_article",
            ContentFormat::Speech => "speech",
            ContentFormat::DetailedGuide => "detailed_guide",
            ContentFormat::Consultation => "consultation",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Entity references
// ---------------------------------------------------------------------------

/// The class of a publishable entity, as carried by a job descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    ContentItem,
    Unpublishing,
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityClass::ContentItem => write!(f, "content_item"),
            EntityClass::Unpublishing => write!(f, "unpublishing"),
        }
    }
}

/// `(entity_class, entity_id)`: everything a job needs to re-fetch an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    ContentItem(EditionId),
    Unpublishing(UnpublishingId),
}

impl EntityRef {
    pub fn class(&self) -> EntityClass {
        match self {
            EntityRef::ContentItem(_) => EntityClass::ContentItem,
            EntityRef::Unpublishing(_) => EntityClass::Unpublishing,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            EntityRef::ContentItem(id) => id.0,
            EntityRef::Unpublishing(id) => id.0,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.class(), self.id())
    }
}

/// Parses `content_item:<id>`, `edition:<id>` or `unpublishing:<id>`.
impl FromStr for EntityRef {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ContentError::InvalidEntityRef(s.to_owned());
        let (class, id) = s.split_once(':').ok_or_else(invalid)?;
        let id: u64 = id.trim().parse().map_err(|_| invalid())?;
        match class.trim().to_ascii_lowercase().as_str() {
            "content_item" | "edition" => Ok(EntityRef::ContentItem(EditionId(id))),
            "unpublishing" => Ok(EntityRef::Unpublishing(UnpublishingId(id))),
            _ => Err(invalid()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn locales_order_by_code() {
        let mut locales = vec![Locale::from("fr"), Locale::from("de"), Locale::from("en")];
        locales.sort();
        let codes: Vec<_> = locales.iter().map(Locale::as_str).collect();
        assert_eq!(codes, ["de", "en", "fr"]);
    }

    #[rstest]
    #[case(ContentState::Draft, false)]
    #[case(ContentState::Scheduled, false)]
    #[case(ContentState::Published, true)]
    #[case(ContentState::Archived, true)]
    #[case(ContentState::Withdrawn, true)]
    fn public_visibility_by_state(#[case] state: ContentState, #[case] visible: bool) {
        assert_eq!(state.is_publicly_visible(), visible);
    }

    #[rstest]
    #[case("content_item:12", EntityRef::ContentItem(EditionId(12)))]
    #[case("edition:7", EntityRef::ContentItem(EditionId(7)))]
    #[case("unpublishing:3", EntityRef::Unpublishing(UnpublishingId(3)))]
    fn entity_ref_parses(#[case] input: &str, #[case] expected: EntityRef) {
        assert_eq!(input.parse::<EntityRef>().expect("parse"), expected);
    }

    #[rstest]
    #[case("content_item")]
    #[case("widget:1")]
    #[case("edition:abc")]
    fn entity_ref_rejects_garbage(#[case] input: &str) {
        let err = input.parse::<EntityRef>().unwrap_err();
        assert!(err.to_string().contains(input), "got: {err}");
    }

    #[test]
    fn entity_ref_display_round_trips_through_parse() {
        let entity = EntityRef::Unpublishing(UnpublishingId(9));
        assert_eq!(entity.to_string(), "unpublishing:9");
        assert_eq!(entity.to_string().parse::<EntityRef>().expect("parse"), entity);
    }

    #[test]
    fn update_type_passes_unknown_values_through() {
        assert_eq!(UpdateType::default().as_str(), "major");
        assert_eq!(UpdateType::from("whizzo").to_string(), "whizzo");
    }

    #[rstest]
    #[case("/government/case-studies/school-meals.fr", Some(ContentFormat::CaseStudy))]
    #[case("/guidance/fishing-licences", Some(ContentFormat::DetailedGuide))]
    #[case("/government/case-studies", None)]
    #[case("/government/people/someone", None)]
    fn format_for_public_path(#[case] path: &str, #[case] expected: Option<ContentFormat>) {
        assert_eq!(ContentFormat::for_path(path), expected);
    }

    #[test]
    fn format_display_matches_serde_name() {
        for format in ContentFormat::all() {
            let yaml = serde_yaml::to_string(format).expect("serialize");
            assert_eq!(yaml.trim(), format.to_string());
        }
    }
}
