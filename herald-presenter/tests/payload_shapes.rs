//! Payload shape tests across every presentable kind.

use chrono::{DateTime, TimeZone, Utc};
use herald_core::{
    ContentFormat, ContentItem, ContentState, DocumentRecord, EditionId, EditionRecord, Locale,
    Redirect, RedirectRoute, RouteType, Translation, Unpublishing, UnpublishingId, UpdateType,
};
use herald_presenter::{
    present, present_coming_soon, present_gone, ContentPayload, Presentable, Route,
};
use rstest::rstest;
use serde_json::json;

fn published_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap()
}

fn case_study(state: ContentState) -> ContentItem {
    DocumentRecord::new(12, "apprenticeships-in-wales")
        .with_edition(
            EditionRecord::new(120, ContentFormat::CaseStudy, "en")
                .with_state(state)
                .with_translation(
                    "en",
                    Translation::new("Apprenticeships in Wales", "Growth in apprenticeships", "English body"),
                )
                .with_translation(
                    "fr",
                    Translation::new("Apprentissage au pays de Galles", "Croissance", "Corps"),
                )
                .first_published(published_at())
                .scheduled_for(Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap()),
        )
        .content_item(EditionId(120))
        .expect("edition")
}

fn present_item(item: &ContentItem, update_type: &str, locale: &str) -> ContentPayload {
    present(
        Presentable::ContentItem(item),
        &UpdateType::from(update_type),
        &Locale::from(locale),
    )
    .expect("present")
}

#[test]
fn content_item_payload_in_primary_locale() {
    let payload = present_item(&case_study(ContentState::Published), "major", "en");

    let value = serde_json::to_value(&payload).expect("json");
    assert_eq!(
        value,
        json!({
            "base_path": "/government/case-studies/apprenticeships-in-wales",
            "format": "case_study",
            "title": "Apprenticeships in Wales",
            "description": "Growth in apprenticeships",
            "locale": "en",
            "publishing_app": "whitehall",
            "rendering_app": "government-frontend",
            "update_type": "major",
            "public_updated_at": "2024-02-14T10:00:00Z",
            "routes": [
                { "path": "/government/case-studies/apprenticeships-in-wales", "type": "exact" }
            ],
            "details": {
                "body": "English body",
                "first_public_at": "2024-02-14T10:00:00+00:00"
            }
        })
    );
}

#[test]
fn non_primary_locale_gets_suffixed_path_and_its_own_text() {
    let payload = present_item(&case_study(ContentState::Published), "major", "fr");
    assert_eq!(payload.base_path, "/government/case-studies/apprenticeships-in-wales.fr");
    assert_eq!(payload.title.as_deref(), Some("Apprentissage au pays de Galles"));
    assert_eq!(payload.routes, vec![Route::exact(payload.base_path.clone())]);
}

#[rstest]
#[case("major")]
#[case("minor")]
#[case("republish")]
#[case("whizzo")]
fn update_type_passes_through_verbatim(#[case] update_type: &str) {
    let payload = present_item(&case_study(ContentState::Published), update_type, "en");
    assert_eq!(payload.update_type.as_str(), update_type);
}

#[test]
fn presenting_is_deterministic() {
    let item = case_study(ContentState::Published);
    assert_eq!(present_item(&item, "major", "fr"), present_item(&item, "major", "fr"));
}

#[test]
fn unpublishing_uses_current_text_regardless_of_state() {
    // The edition is back in draft after being unpublished; the payload still
    // reflects its current translated content at the document path.
    let unpublishing = Unpublishing {
        id: UnpublishingId(4),
        edition: case_study(ContentState::Draft),
        explanation: "This case study is out of date".to_string(),
        redirect_target: None,
        unpublished_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    };

    let payload = present(
        Presentable::Unpublishing(&unpublishing),
        &UpdateType::republish(),
        &Locale::from("fr"),
    )
    .expect("present");

    assert_eq!(payload.base_path, "/government/case-studies/apprenticeships-in-wales.fr");
    assert_eq!(payload.format, "unpublishing");
    assert_eq!(payload.title.as_deref(), Some("Apprentissage au pays de Galles"));
    assert_eq!(payload.update_type, UpdateType::republish());
    assert_eq!(payload.details["unpublished_at"], json!("2024-03-01T08:00:00+00:00"));
    assert_eq!(payload.details["alternative_url"], serde_json::Value::Null);
}

#[test]
fn redirect_unpublishing_points_document_path_at_target() {
    let unpublishing = Unpublishing {
        id: UnpublishingId(5),
        edition: case_study(ContentState::Published),
        explanation: String::new(),
        redirect_target: Some("/government/case-studies/apprenticeships".to_string()),
        unpublished_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    };

    let payload = present(
        Presentable::Unpublishing(&unpublishing),
        &UpdateType::major(),
        &Locale::from("en"),
    )
    .expect("present");

    assert_eq!(payload.format, "redirect");
    assert!(payload.routes.is_empty());
    assert_eq!(
        payload.redirects,
        vec![RedirectRoute {
            path: "/government/case-studies/apprenticeships-in-wales".to_string(),
            route_type: RouteType::Exact,
            destination: "/government/case-studies/apprenticeships".to_string(),
        }]
    );
    assert_eq!(payload.title.as_deref(), Some("Apprenticeships in Wales"));
}

#[test]
fn redirect_payload_keeps_route_order_and_ignores_locale() {
    let redirect = Redirect::new(
        "/government/people/milly-vanilly",
        vec![
            RedirectRoute {
                path: "/government/people/milly-vanilly".to_string(),
                route_type: RouteType::Exact,
                destination: "/government/people/milli-vanilli".to_string(),
            },
            RedirectRoute {
                path: "/government/people/milly-vanilly/speeches".to_string(),
                route_type: RouteType::Prefix,
                destination: "/government/people/milli-vanilli".to_string(),
            },
        ],
    );

    let en = present(Presentable::Redirect(&redirect), &UpdateType::major(), &Locale::from("en"))
        .expect("present");
    let fr = present(Presentable::Redirect(&redirect), &UpdateType::major(), &Locale::from("fr"))
        .expect("present");

    assert_eq!(en, fr);
    assert_eq!(en.base_path, "/government/people/milly-vanilly");
    assert_eq!(en.format, "redirect");
    assert_eq!(en.redirects, redirect.redirects);
    assert!(en.locale.is_none());
}

#[test]
fn coming_soon_and_gone_payloads() {
    let item = case_study(ContentState::Scheduled);

    let coming_soon = present_coming_soon(&item, &Locale::from("fr")).expect("coming soon");
    assert_eq!(coming_soon.format, "coming_soon");
    assert_eq!(coming_soon.base_path, "/government/case-studies/apprenticeships-in-wales.fr");
    assert_eq!(coming_soon.details["publish_time"], json!("2024-07-01T09:30:00+00:00"));

    let gone = present_gone("/government/case-studies/apprenticeships-in-wales");
    assert_eq!(gone.format, "gone");
    assert_eq!(gone.update_type, UpdateType::major());
    assert_eq!(gone.routes.len(), 1);
}
