//! Behavioural tests for the profile store against the in-memory adapters.

use std::sync::Arc;

use super::*;
use crate::domain::password::Password;
use crate::domain::profile::Customization;
use crate::domain::theme;
use crate::domain::user::{Email, Username};
use crate::domain::users_service::{Registration, UsersService};
use crate::outbound::blob::InMemoryBlobStore;
use crate::outbound::persistence::InMemoryKvStore;

struct Fixture {
    profiles: ProfilesService,
    users: UsersService,
    blobs: Arc<InMemoryBlobStore>,
}

fn fixture() -> Fixture {
    let kv = Arc::new(InMemoryKvStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new());
    Fixture {
        profiles: ProfilesService::new(kv.clone(), blobs.clone()),
        users: UsersService::new(kv),
        blobs,
    }
}

async fn register_ada(users: &UsersService) {
    users
        .register(Registration {
            email: Email::new("ada@example.com").expect("email"),
            username: Username::new("ada").expect("username"),
            password: Password::new("correctpass"),
            display_name: Some("Ada Lovelace".into()),
        })
        .await
        .expect("register")
        .expect("registration succeeds");
}

#[tokio::test]
async fn profile_materialises_once_and_stays_stable() {
    let fx = fixture();
    register_ada(&fx.users).await;

    let first = fx
        .profiles
        .profile("ada")
        .await
        .expect("get")
        .expect("profile for existing user");
    let second = fx
        .profiles
        .profile("ada")
        .await
        .expect("get")
        .expect("profile still there");

    assert_eq!(first, second);
    assert_eq!(first.display_name, "Ada Lovelace");
    assert_eq!(first.theme, theme::DEFAULT_THEME_ID);
    assert_eq!(first.views, 0);
}

#[tokio::test]
async fn unknown_users_have_no_profile() {
    let fx = fixture();
    assert!(fx.profiles.profile("nobody").await.expect("get").is_none());
}

#[tokio::test]
async fn successive_customization_updates_accumulate() {
    let fx = fixture();
    register_ada(&fx.users).await;

    fx.profiles
        .update(
            "ada",
            &ProfilePatch {
                customization: Some(Customization {
                    background_color: Some("#123456".into()),
                    ..Customization::default()
                }),
                ..ProfilePatch::default()
            },
        )
        .await
        .expect("update")
        .expect("profile exists");

    let merged = fx
        .profiles
        .update(
            "ada",
            &ProfilePatch {
                customization: Some(Customization {
                    font_family: Some("serif".into()),
                    ..Customization::default()
                }),
                ..ProfilePatch::default()
            },
        )
        .await
        .expect("update")
        .expect("profile exists");

    assert_eq!(merged.customization.background_color.as_deref(), Some("#123456"));
    assert_eq!(merged.customization.font_family.as_deref(), Some("serif"));
    // Materialisation defaults survive both merges.
    assert_eq!(merged.customization.button_shape.as_deref(), Some("rounded"));
}

#[tokio::test]
async fn display_name_and_bio_sync_back_to_the_user() {
    let fx = fixture();
    register_ada(&fx.users).await;

    fx.profiles
        .update(
            "ada",
            &ProfilePatch {
                display_name: Some("Countess of Lovelace".into()),
                bio: Some("analyst".into()),
                ..ProfilePatch::default()
            },
        )
        .await
        .expect("update")
        .expect("profile exists");

    let user = fx
        .users
        .user_by_username("ada")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(user.display_name, "Countess of Lovelace");
    assert_eq!(user.bio, "analyst");
}

#[tokio::test]
async fn image_upload_replaces_the_previous_blob() {
    let fx = fixture();
    register_ada(&fx.users).await;

    let first = fx
        .profiles
        .upload_image("ada", b"first image")
        .await
        .expect("upload")
        .expect("user exists");
    assert_eq!(fx.blobs.len(), 1);

    let second = fx
        .profiles
        .upload_image("ada", b"second image")
        .await
        .expect("upload")
        .expect("user exists");
    assert_ne!(first, second);
    // The first blob was deleted when the second arrived.
    assert_eq!(fx.blobs.len(), 1);

    let profile = fx
        .profiles
        .profile("ada")
        .await
        .expect("get")
        .expect("profile exists");
    assert_eq!(profile.profile_image.as_deref(), Some(second.as_str()));
    let user = fx
        .users
        .user_by_username("ada")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(user.profile_image.as_deref(), Some(second.as_str()));
}

#[tokio::test]
async fn views_count_and_feed_the_histogram() {
    let fx = fixture();
    register_ada(&fx.users).await;

    let mut last = 0;
    for _ in 0..3 {
        last = fx.profiles.record_view("ada").await.expect("view");
    }
    assert_eq!(last, 3);

    let report = fx
        .profiles
        .analytics("ada", 30)
        .await
        .expect("analytics")
        .expect("user exists");
    assert_eq!(report.views, 3);
    // All events landed today; same-millisecond events may collapse.
    let total: u64 = report.views_by_day.values().sum();
    assert!((1..=3).contains(&total));
    assert_eq!(report.views_by_day.len(), 1);
}

#[tokio::test]
async fn analytics_for_unknown_users_is_none() {
    let fx = fixture();
    assert!(fx
        .profiles
        .analytics("nobody", 30)
        .await
        .expect("analytics")
        .is_none());
}
