//! Unit tests for link mapping, patching, and ordering.

use std::collections::HashMap;

use rstest::rstest;

use super::*;

fn link(id: &str, position: i64) -> Link {
    Link {
        id: id.into(),
        user_id: "user_1".into(),
        title: "Example".into(),
        url: "https://example.com".into(),
        r#type: LinkType::Website,
        is_public: true,
        position,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
        clicks: 0,
    }
}

#[test]
fn hash_round_trip_preserves_every_field() {
    let mut original = link("link_1", 3);
    original.r#type = LinkType::Youtube;
    original.is_public = false;
    original.clicks = 17;
    let fields: HashMap<String, String> = original.to_fields().into_iter().collect();
    assert_eq!(Link::from_fields(&fields).expect("decode link"), original);
}

#[test]
fn unknown_type_decodes_as_website() {
    let mut fields: HashMap<String, String> = link("link_1", 0).to_fields().into_iter().collect();
    fields.insert("type".into(), "myspace".into());
    let decoded = Link::from_fields(&fields).expect("decode link");
    assert_eq!(decoded.r#type, LinkType::Website);
}

#[test]
fn missing_clicks_counter_defaults_to_zero() {
    let mut fields: HashMap<String, String> = link("link_1", 0).to_fields().into_iter().collect();
    fields.remove("clicks");
    assert_eq!(Link::from_fields(&fields).expect("decode link").clicks, 0);
}

#[test]
fn patch_touches_only_provided_fields() {
    let mut target = link("link_1", 2);
    let patch = LinkPatch {
        title: Some("New title".into()),
        is_public: Some(false),
        ..LinkPatch::default()
    };
    patch.apply(&mut target, 1_700_000_999_999);

    assert_eq!(target.title, "New title");
    assert!(!target.is_public);
    assert_eq!(target.url, "https://example.com");
    assert_eq!(target.position, 2);
    assert_eq!(target.updated_at, 1_700_000_999_999);
}

#[test]
fn display_order_is_position_then_id() {
    let mut links = vec![link("link_b", 1), link("link_a", 1), link("link_c", 0)];
    sort_for_display(&mut links);
    let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["link_c", "link_a", "link_b"]);
}

#[rstest]
#[case("https://example.com/page", true)]
#[case("http://example.com", true)]
#[case("ftp://example.com", false)]
#[case("javascript:alert(1)", false)]
#[case("not a url", false)]
fn url_validation(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(validate_url(raw), ok, "{raw}");
}
