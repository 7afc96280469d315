//! One presenter per presentable kind, selected by [`present`].
//!
//! # Path mapping
//!
//! | Kind          | `base_path`                                         |
//! |---------------|-----------------------------------------------------|
//! | ContentItem   | `<format prefix>/<slug>` (primary locale)           |
//! |               | `<format prefix>/<slug>.<locale>` (other locales)   |
//! | Unpublishing  | document path of the removed edition, same rule     |
//! | Redirect      | the redirect's own `base_path`                      |
//!
//! Every function here is pure: the same inputs always produce the same
//! payload, and timestamps come from the entity, never from the clock.

use chrono::{DateTime, Utc};
use serde_json::Value;

use herald_core::{
    ContentFormat, ContentItem, EntityRef, Locale, Publishable, Redirect, RedirectRoute,
    RouteType, Translation, Unpublishing, UpdateType,
};

use crate::error::PresentError;
use crate::payload::{ContentPayload, PublishIntent, Route, PUBLISHING_APP};

/// Anything that can be turned into a payload.
#[derive(Debug, Clone, Copy)]
pub enum Presentable<'a> {
    ContentItem(&'a ContentItem),
    Unpublishing(&'a Unpublishing),
    Redirect(&'a Redirect),
}

impl<'a> From<&'a Publishable> for Presentable<'a> {
    fn from(entity: &'a Publishable) -> Self {
        match entity {
            Publishable::ContentItem(item) => Presentable::ContentItem(item),
            Publishable::Unpublishing(u) => Presentable::Unpublishing(u),
        }
    }
}

/// Build the payload for `entity` in `locale`. Redirects ignore the locale.
pub fn present(
    entity: Presentable<'_>,
    update_type: &UpdateType,
    locale: &Locale,
) -> Result<ContentPayload, PresentError> {
    match entity {
        Presentable::ContentItem(item) => present_content_item(item, update_type, locale),
        Presentable::Unpublishing(u) => present_unpublishing(u, update_type, locale),
        Presentable::Redirect(redirect) => Ok(present_redirect(redirect, update_type)),
    }
}

/// Public path of `item`'s document in `locale`.
pub fn public_document_path(item: &ContentItem, locale: &Locale) -> String {
    let base = format!("{}/{}", item.format.path_prefix(), item.document.slug);
    if item.is_primary(locale) {
        base
    } else {
        format!("{base}.{locale}")
    }
}

pub fn present_content_item(
    item: &ContentItem,
    update_type: &UpdateType,
    locale: &Locale,
) -> Result<ContentPayload, PresentError> {
    let translation = translation_for(item, EntityRef::ContentItem(item.id), locale)?;
    let base_path = public_document_path(item, locale);

    let mut payload = ContentPayload::new(&base_path, item.format.to_string(), update_type.clone())
        .detail("body", translation.body.clone());
    if let Some(first_public_at) = item.first_published_at {
        payload = payload.detail("first_public_at", first_public_at.to_rfc3339());
    }

    payload.title = Some(translation.title.clone());
    payload.description = Some(translation.summary.clone());
    payload.locale = Some(locale.clone());
    payload.rendering_app = Some(item.format.rendering_app().to_string());
    payload.public_updated_at = item.public_updated_at.or(item.first_published_at);
    payload.routes = vec![Route::exact(base_path)];
    Ok(payload)
}

/// Unpublishings are presented at the document's path with the edition's
/// *current* title and summary. With a redirect target they become a
/// `redirect` item pointing there.
pub fn present_unpublishing(
    unpublishing: &Unpublishing,
    update_type: &UpdateType,
    locale: &Locale,
) -> Result<ContentPayload, PresentError> {
    let edition = &unpublishing.edition;
    let translation = translation_for(edition, EntityRef::Unpublishing(unpublishing.id), locale)?;
    let base_path = public_document_path(edition, locale);

    let mut payload = match &unpublishing.redirect_target {
        Some(destination) => {
            let mut payload = ContentPayload::new(&base_path, "redirect", update_type.clone());
            payload.redirects = vec![RedirectRoute {
                path: base_path.clone(),
                route_type: RouteType::Exact,
                destination: destination.clone(),
            }];
            payload
        }
        None => {
            let mut payload = ContentPayload::new(&base_path, "unpublishing", update_type.clone())
                .detail("explanation", unpublishing.explanation.clone())
                .detail("unpublished_at", unpublishing.unpublished_at.to_rfc3339())
                .detail("alternative_url", Value::Null);
            payload.rendering_app = Some(edition.format.rendering_app().to_string());
            payload.routes = vec![Route::exact(&base_path)];
            payload
        }
    };

    payload.title = Some(translation.title.clone());
    payload.description = Some(translation.summary.clone());
    payload.locale = Some(locale.clone());
    payload.public_updated_at = Some(unpublishing.unpublished_at);
    Ok(payload)
}

/// Redirect payloads carry the route list verbatim, in order.
pub fn present_redirect(redirect: &Redirect, update_type: &UpdateType) -> ContentPayload {
    let mut payload = ContentPayload::new(&redirect.base_path, "redirect", update_type.clone());
    payload.redirects = redirect.redirects.clone();
    payload
}

/// Placeholder served at a scheduled edition's path until it goes live.
pub fn present_coming_soon(item: &ContentItem, locale: &Locale) -> Result<ContentPayload, PresentError> {
    let publish_time = item
        .scheduled_publication
        .ok_or(PresentError::MissingPublishTime { edition: item.id })?;
    let base_path = public_document_path(item, locale);

    let mut payload = ContentPayload::new(&base_path, "coming_soon", UpdateType::major())
        .detail("publish_time", publish_time.to_rfc3339());
    payload.title = Some("Coming soon".to_string());
    payload.description = Some("Coming soon".to_string());
    payload.locale = Some(locale.clone());
    payload.rendering_app = Some(item.format.rendering_app().to_string());
    payload.public_updated_at = Some(publish_time);
    payload.routes = vec![Route::exact(base_path)];
    Ok(payload)
}

/// Marks a path as gone.
pub fn present_gone(base_path: &str) -> ContentPayload {
    let mut payload = ContentPayload::new(base_path, "gone", UpdateType::major());
    payload.routes = vec![Route::exact(base_path)];
    payload
}

/// Publish intent for a scheduled path. The rendering app is inferred from the
/// path's format prefix.
pub fn present_publish_intent(base_path: &str, publish_time: DateTime<Utc>) -> PublishIntent {
    let rendering_app = ContentFormat::for_path(base_path)
        .map(ContentFormat::rendering_app)
        .unwrap_or("whitehall-frontend");
    PublishIntent {
        base_path: base_path.to_string(),
        publish_time,
        publishing_app: PUBLISHING_APP.to_string(),
        rendering_app: rendering_app.to_string(),
        routes: vec![Route::exact(base_path)],
    }
}

fn translation_for<'a>(
    item: &'a ContentItem,
    entity: EntityRef,
    locale: &Locale,
) -> Result<&'a Translation, PresentError> {
    item.translation(locale)
        .ok_or_else(|| PresentError::MissingTranslation {
            entity,
            locale: locale.clone(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
