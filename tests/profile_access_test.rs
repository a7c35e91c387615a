//! Integration tests for registration, profiles, page access and the auth
//! subscription.

mod helpers;

use std::sync::Arc;

use futures::StreamExt;
use helpers::{ana, core_over, init_logging, maria, seed_user};
use saferoute_core::auth::{auth_error_message, AuthUser};
use saferoute_core::notice::NoticeKind;
use saferoute_core::store::SqliteDocumentStore;
use saferoute_core::users::access::{COMPLETE_PROFILE_PATH, LOGIN_PATH};
use saferoute_core::users::{AccessDecision, AccessRequirement, ProfileUpdate};

fn shared_store() -> Arc<SqliteDocumentStore> {
    init_logging();
    Arc::new(SqliteDocumentStore::in_memory().unwrap())
}

#[tokio::test]
async fn new_user_is_sent_to_profile_completion() {
    let store = shared_store();
    let core = core_over(&store);

    assert_eq!(
        core.check_access(AccessRequirement::SignedIn)
            .await
            .redirect_path(),
        Some(LOGIN_PATH)
    );

    core.register(ana()).await.unwrap();
    assert_eq!(
        core.check_access(AccessRequirement::SignedIn).await,
        AccessDecision::Allow
    );
    assert_eq!(
        core.check_access(AccessRequirement::CompleteProfile)
            .await
            .redirect_path(),
        Some(COMPLETE_PROFILE_PATH)
    );

    seed_user(&core, ana(), "11912345678").await;
    assert_eq!(
        core.check_access(AccessRequirement::CompleteProfile).await,
        AccessDecision::Allow
    );
}

#[tokio::test]
async fn phone_owned_by_another_user_is_rejected() {
    let store = shared_store();
    let ana_core = core_over(&store);
    let maria_core = core_over(&store);
    seed_user(&ana_core, ana(), "11912345678").await;
    maria_core.register(maria()).await.unwrap();

    let notice = maria_core
        .save_profile(
            &ProfileUpdate::new("Maria")
                .with_phone("11912345678")
                .with_address("Rua B, 2"),
        )
        .await;
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Este telefone já está em uso.");

    let status = maria_core.profile_status().await.unwrap();
    assert!(!status.complete);
    assert!(status.record.unwrap().phone.is_empty());
}

#[tokio::test]
async fn saving_profile_keeps_contacts() {
    let store = shared_store();
    let ana_core = core_over(&store);
    let maria_core = core_over(&store);
    seed_user(&ana_core, ana(), "11912345678").await;
    seed_user(&maria_core, maria(), "21987654321").await;

    ana_core.send_contact_request("u2").await;
    let mut feed = maria_core.notification_feed().await.unwrap();
    let id = feed.notifications()[0].id.clone();
    feed.accept(&id).await;

    let notice = maria_core
        .save_profile(
            &ProfileUpdate::new("Maria Lima")
                .with_phone("21987654321")
                .with_address("Av. Central, 100"),
        )
        .await;
    assert_eq!(notice.message, "Perfil atualizado com sucesso!");

    let record = maria_core.users().require("u2").await.unwrap();
    assert_eq!(record.display_name, "Maria Lima");
    assert!(record.has_contact("u1"));
}

#[tokio::test]
async fn saving_profile_without_photo_keeps_photo() {
    let store = shared_store();
    let core = core_over(&store);
    let photo = "https://img/ana.png";
    core.register(AuthUser::new("u1").with_photo_url(photo))
        .await
        .unwrap();

    let update = ProfileUpdate::new("Ana")
        .with_phone("11912345678")
        .with_address("Rua A");
    let notice = core.save_profile(&update).await;
    assert_eq!(notice.kind, NoticeKind::Success);

    let record = core.users().require("u1").await.unwrap();
    let session = core.auth().current_user().unwrap();
    assert_eq!(record.photo_url.as_deref(), Some(photo));
    assert_eq!(session.photo_url.as_deref(), Some(photo));
    assert!(record.is_complete());
}

#[tokio::test]
async fn subscription_follows_sign_in_and_out() {
    let store = shared_store();
    let core = core_over(&store);

    let mut events = Box::pin(core.auth().subscribe());
    assert_eq!(events.next().await, Some(None));

    core.register(ana()).await.unwrap();
    let signed_in = events.next().await.unwrap().unwrap();
    assert_eq!(signed_in.uid, "u1");

    core.sign_out();
    assert_eq!(events.next().await, Some(None));

    let mut fresh = Box::pin(core.auth().subscribe());
    assert_eq!(fresh.next().await, Some(None));
}

#[tokio::test]
async fn register_keeps_existing_profile() {
    let store = shared_store();
    let core = core_over(&store);
    seed_user(&core, ana(), "11912345678").await;
    core.sign_out();

    let record = core
        .register(AuthUser::new("u1").with_email("ana@example.com"))
        .await
        .unwrap();
    assert_eq!(record.phone, "11912345678");
    assert!(core.profile_status().await.unwrap().complete);
}

#[test]
fn auth_error_codes_map_to_messages() {
    assert_eq!(
        auth_error_message(Some("auth/invalid-credential")),
        "As credenciais fornecidas são inválidas."
    );
    assert_eq!(auth_error_message(None), "Ocorreu um erro inesperado.");
    assert_eq!(auth_error_message(Some("auth/other")), "Erro desconhecido.");
}
