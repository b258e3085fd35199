//! Tests for the admin maintenance operations against the in-memory store.

use std::sync::Arc;

use super::*;
use crate::domain::link::LinkDraft;
use crate::domain::links_service::LinksService;
use crate::domain::password::Password;
use crate::domain::profiles_service::ProfilesService;
use crate::domain::user::{Email, Username};
use crate::domain::users_service::{Registration, UsersService};
use crate::outbound::blob::InMemoryBlobStore;
use crate::outbound::persistence::InMemoryKvStore;

struct Fixture {
    kv: Arc<InMemoryKvStore>,
    users: UsersService,
    links: LinksService,
    profiles: ProfilesService,
    maintenance: MaintenanceService,
}

fn fixture() -> Fixture {
    let kv: Arc<InMemoryKvStore> = Arc::new(InMemoryKvStore::new());
    Fixture {
        kv: Arc::clone(&kv),
        users: UsersService::new(kv.clone()),
        links: LinksService::new(kv.clone()),
        profiles: ProfilesService::new(kv.clone(), Arc::new(InMemoryBlobStore::new())),
        maintenance: MaintenanceService::new(kv),
    }
}

async fn register(users: &UsersService, username: &str, email: &str) -> crate::domain::user::User {
    users
        .register(Registration {
            email: Email::new(email).expect("email"),
            username: Username::new(username).expect("username"),
            password: Password::new("correctpass"),
            display_name: None,
        })
        .await
        .expect("register")
        .expect("registration succeeds")
}

fn link_draft(url: &str) -> LinkDraft {
    LinkDraft {
        url: Some(url.into()),
        ..LinkDraft::default()
    }
}

#[tokio::test]
async fn stats_aggregate_users_links_views_and_clicks() {
    let fx = fixture();
    let alice = register(&fx.users, "alice", "alice@example.com").await;
    let bob = register(&fx.users, "bob", "bob@example.com").await;

    let a1 = fx
        .links
        .create(&alice.id, link_draft("https://a.example/1"))
        .await
        .expect("create");
    fx.links
        .create(&alice.id, link_draft("https://a.example/2"))
        .await
        .expect("create");
    fx.links
        .create(&bob.id, link_draft("https://b.example/1"))
        .await
        .expect("create");

    for _ in 0..3 {
        fx.links.record_click(&a1.id).await.expect("click");
    }
    // Materialise profiles, then record views against alice.
    fx.profiles.profile("alice").await.expect("profile");
    fx.profiles.profile("bob").await.expect("profile");
    fx.profiles.record_view("alice").await.expect("view");
    fx.profiles.record_view("alice").await.expect("view");

    let stats = fx.maintenance.system_stats().await.expect("stats");
    assert_eq!(
        stats,
        SystemStats {
            total_users: 2,
            total_links: 3,
            total_views: 2,
            total_clicks: 3,
        }
    );
}

#[tokio::test]
async fn stats_on_an_empty_store_are_all_zero() {
    let fx = fixture();
    let stats = fx.maintenance.system_stats().await.expect("stats");
    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.total_links, 0);
    assert_eq!(stats.total_views, 0);
    assert_eq!(stats.total_clicks, 0);
}

#[tokio::test]
async fn repair_recreates_missing_profiles_and_prunes_dangling_links() {
    let fx = fixture();
    let alice = register(&fx.users, "alice", "alice@example.com").await;
    let kept = fx
        .links
        .create(&alice.id, link_draft("https://a.example/kept"))
        .await
        .expect("create");
    let doomed = fx
        .links
        .create(&alice.id, link_draft("https://a.example/doomed"))
        .await
        .expect("create");

    // Simulate drift: the link hash vanishes but its set membership stays.
    fx.kv.delete(&keys::link(&doomed.id)).await.expect("delete");

    let report = fx.maintenance.repair_key_structure().await.expect("repair");
    assert_eq!(report.profiles_created, 1);
    assert_eq!(report.dangling_links_removed, 1);

    let remaining = fx.links.links_by_user(&alice.id).await.expect("links");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);

    // A second pass finds nothing to do.
    let again = fx.maintenance.repair_key_structure().await.expect("repair");
    assert_eq!(again, RepairReport::default());
}

#[tokio::test]
async fn clearing_a_user_removes_links_profile_sessions_and_indexes() {
    let fx = fixture();
    let alice = register(&fx.users, "alice", "alice@example.com").await;
    register(&fx.users, "bob", "bob@example.com").await;

    let link = fx
        .links
        .create(&alice.id, link_draft("https://a.example/1"))
        .await
        .expect("create");
    fx.links.record_click(&link.id).await.expect("click");
    fx.profiles.profile("alice").await.expect("profile");
    fx.profiles.record_view("alice").await.expect("view");
    let session = fx
        .users
        .create_session(&alice.username)
        .await
        .expect("session");

    let removed = fx
        .maintenance
        .clear_user_data("alice")
        .await
        .expect("clear");
    assert!(removed);

    assert!(
        fx.users
            .user_by_username("alice")
            .await
            .expect("lookup")
            .is_none()
    );
    assert!(
        fx.users
            .user_by_session(&session)
            .await
            .expect("session lookup")
            .is_none()
    );
    assert!(fx.links.by_id(&link.id).await.expect("link").is_none());
    assert!(fx.profiles.profile("alice").await.expect("profile").is_none());
    assert!(
        !fx.kv
            .exists(&keys::email_index("alice@example.com"))
            .await
            .expect("exists")
    );
    // The email is claimable again.
    register(&fx.users, "alice2", "alice@example.com").await;

    // Bob is untouched.
    assert!(
        fx.users
            .user_by_username("bob")
            .await
            .expect("lookup")
            .is_some()
    );
}

#[tokio::test]
async fn clearing_an_unknown_user_reports_false() {
    let fx = fixture();
    let removed = fx
        .maintenance
        .clear_user_data("ghost")
        .await
        .expect("clear");
    assert!(!removed);
}
