//! Behavioural tests for the link store against the in-memory store.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::link::LinkType;
use crate::domain::password::Password;
use crate::domain::user::{Email, Username};
use crate::domain::users_service::{Registration, UsersService};
use crate::outbound::persistence::InMemoryKvStore;

struct Fixture {
    links: LinksService,
    users: UsersService,
}

fn fixture() -> Fixture {
    let kv = Arc::new(InMemoryKvStore::new());
    Fixture {
        links: LinksService::new(kv.clone()),
        users: UsersService::new(kv),
    }
}

fn draft(title: &str, position: i64) -> LinkDraft {
    LinkDraft {
        title: Some(title.into()),
        url: Some("https://example.com".into()),
        position: Some(position),
        ..LinkDraft::default()
    }
}

#[tokio::test]
async fn create_applies_legacy_defaults() {
    let fx = fixture();
    let created = fx
        .links
        .create("user_1", LinkDraft::default())
        .await
        .expect("create");
    assert_eq!(created.title, "New Link");
    assert_eq!(created.url, "");
    assert_eq!(created.r#type, LinkType::Website);
    assert!(created.is_public);
    assert_eq!(created.position, 0);
    assert_eq!(created.clicks, 0);
}

#[tokio::test]
async fn invalid_urls_are_rejected() {
    let fx = fixture();
    let bad = LinkDraft {
        url: Some("javascript:alert(1)".into()),
        ..LinkDraft::default()
    };
    let err = fx.links.create("user_1", bad).await.expect_err("bad url");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn links_come_back_in_position_order() {
    let fx = fixture();
    for (title, position) in [("c", 2), ("a", 0), ("b", 1)] {
        fx.links
            .create("user_1", draft(title, position))
            .await
            .expect("create");
    }
    let listed = fx.links.links_by_user("user_1").await.expect("list");
    let titles: Vec<&str> = listed.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn reorder_round_trips_the_requested_order() {
    let fx = fixture();
    let mut created = Vec::new();
    for position in 0..4 {
        created.push(
            fx.links
                .create("user_1", draft(&format!("link {position}"), position))
                .await
                .expect("create"),
        );
    }

    // Reverse the list.
    let updates: Vec<PositionUpdate> = created
        .iter()
        .rev()
        .enumerate()
        .map(|(position, link)| PositionUpdate {
            id: link.id.clone(),
            position: i64::try_from(position).expect("small index"),
        })
        .collect();
    fx.links.update_positions(&updates).await.expect("reorder");

    let listed = fx.links.links_by_user("user_1").await.expect("list");
    let expected: Vec<&str> = updates.iter().map(|u| u.id.as_str()).collect();
    let actual: Vec<&str> = listed.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let fx = fixture();
    let created = fx
        .links
        .create("user_1", draft("original", 0))
        .await
        .expect("create");

    let updated = fx
        .links
        .update(
            &created.id,
            &LinkPatch {
                title: Some("renamed".into()),
                is_public: Some(false),
                ..LinkPatch::default()
            },
        )
        .await
        .expect("update")
        .expect("link exists");

    assert_eq!(updated.title, "renamed");
    assert!(!updated.is_public);
    assert_eq!(updated.url, created.url);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn deleted_links_vanish_and_updates_return_none() {
    let fx = fixture();
    let created = fx
        .links
        .create("user_1", draft("doomed", 0))
        .await
        .expect("create");

    assert!(fx
        .links
        .delete(&created.id, "user_1")
        .await
        .expect("delete"));

    let listed = fx.links.links_by_user("user_1").await.expect("list");
    assert!(listed.is_empty());

    let gone = fx
        .links
        .update(&created.id, &LinkPatch::default())
        .await
        .expect("update call");
    assert!(gone.is_none());
}

#[tokio::test]
async fn five_clicks_count_five_with_a_bounded_log() {
    let fx = fixture();
    let created = fx
        .links
        .create("user_1", draft("clicky", 0))
        .await
        .expect("create");

    let mut last = 0;
    for _ in 0..5 {
        last = fx.links.record_click(&created.id).await.expect("click");
    }
    assert_eq!(last, 5);

    let stored = fx
        .links
        .by_id(&created.id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(stored.clicks, 5);

    // Same-millisecond events collapse, so the log holds at most 5 entries.
    let log = fx
        .links
        .kv
        .sorted_set_range_by_score(&crate::domain::keys::link_clicks(&created.id), 0, i64::MAX)
        .await
        .expect("log");
    assert!((1..=5).contains(&log.len()));
}

#[tokio::test]
async fn public_listing_filters_private_links() {
    let fx = fixture();
    let user = fx
        .users
        .register(Registration {
            email: Email::new("ada@example.com").expect("email"),
            username: Username::new("ada").expect("username"),
            password: Password::new("correctpass"),
            display_name: None,
        })
        .await
        .expect("register")
        .expect("registration succeeds");

    fx.links
        .create(&user.id, draft("public one", 0))
        .await
        .expect("create");
    let private = LinkDraft {
        is_public: Some(false),
        ..draft("private one", 1)
    };
    fx.links.create(&user.id, private).await.expect("create");

    let listed = fx
        .links
        .public_links_by_username("ada")
        .await
        .expect("list")
        .expect("user exists");
    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|l| l.is_public));

    assert!(fx
        .links
        .public_links_by_username("nobody")
        .await
        .expect("list")
        .is_none());
}
