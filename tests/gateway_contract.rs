//! Gateway wire contract: envelope shapes, error mapping, offline degrade

mod common;

use serde_json::json;
use tempfile::tempdir;

use biblioteca_client::error::AppError;
use biblioteca_client::models::author::Author;
use biblioteca_client::models::enums::Role;
use biblioteca_client::models::user::NewUser;

use common::{app_state, offline_state, StubApi};

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "Luz".to_string(),
        last_name: None,
        email: email.to_string(),
        password: "secreta9".to_string(),
        phone: Some("555-0134".to_string()),
        address: None,
        gender: None,
        document_kind: None,
        document_number: None,
        role: Role::User,
    }
}

#[tokio::test]
async fn test_wrapped_and_bare_lists_read_the_same() {
    let (stub, base) = StubApi::spawn().await;
    stub.seed_author(json!({ "_id": "a1", "nombre": "Borges" }));
    stub.seed_author(json!({ "_id": "a2", "nombre": "Cortázar" }));
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    let bare = state.gateways.authors.list(&[]).await.unwrap();
    stub.wrap_lists(true);
    let wrapped = state.gateways.authors.list(&[]).await.unwrap();

    let ids = |authors: &[Author]| {
        authors.iter().map(|a| a.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(bare.len(), 2);
    assert_eq!(ids(&bare), ids(&wrapped));
}

#[tokio::test]
async fn test_shape_broken_list_reads_as_empty() {
    let (stub, base) = StubApi::spawn().await;
    stub.seed_author(json!({ "_id": "a1", "nombre": "Borges" }));
    stub.break_lists(true);
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    let authors = state.gateways.authors.list(&[]).await.unwrap();
    assert!(authors.is_empty());
}

#[tokio::test]
async fn test_undecodable_entries_are_skipped() {
    let (stub, base) = StubApi::spawn().await;
    stub.seed_author(json!({ "_id": "a1", "nombre": "Borges" }));
    stub.seed_author(json!({ "sin_id": true }));
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    let authors = state.gateways.authors.list(&[]).await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Borges");
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let (_stub, base) = StubApi::spawn().await;
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    let err = state.gateways.authors.get("missing").await.unwrap_err();
    match err {
        AppError::RequestFailed { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Autor no encontrado");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_available_books_and_populated_author_refs() {
    let (stub, base) = StubApi::spawn().await;
    stub.seed_book(json!({
        "_id": "b1",
        "titulo": "Ficciones",
        "autor": { "_id": "a1", "nombre": "Borges" },
        "existencias": 2,
    }));
    stub.seed_book(json!({
        "_id": "b2",
        "titulo": "Bestiario",
        "autor": "a2",
        "existencias": 0,
    }));
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    let all = state.gateways.books.list(&[]).await.unwrap();
    assert_eq!(all.len(), 2);

    let available = state.gateways.books.available().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, "b1");
    assert!(available[0].is_available());
    assert_eq!(available[0].author_name(), "Borges");

    // An unpopulated reference still exposes its id.
    let bestiario = state.gateways.books.get("b2").await.unwrap();
    assert_eq!(bestiario.author_name(), "a2");
    assert!(!bestiario.is_available());
}

#[tokio::test]
async fn test_users_degrade_to_the_local_registry_offline() {
    let dir = tempdir().unwrap();
    let state = offline_state(dir.path());

    let created = state
        .gateways
        .users
        .create(&new_user("luz@example.com"))
        .await
        .unwrap();
    assert!(created.id.starts_with("user_"));

    let listed = state.gateways.users.list(&[]).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    let fetched = state.gateways.users.get(&created.id).await.unwrap();
    assert_eq!(fetched.email, "luz@example.com");
    assert_eq!(fetched.phone.as_deref(), Some("555-0134"));
}

#[tokio::test]
async fn test_other_resources_never_degrade() {
    let dir = tempdir().unwrap();
    let state = offline_state(dir.path());

    let err = state.gateways.authors.list(&[]).await.unwrap_err();
    assert!(err.is_transport());

    let err = state.gateways.books.list(&[]).await.unwrap_err();
    assert!(err.is_transport());

    let err = state.gateways.loans.list(&[]).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_http_rejection_on_users_does_not_reach_the_registry() {
    let (_stub, base) = StubApi::spawn().await;
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    // A 404 is an answer from the backend. The registry would have said
    // NotFound in its own words; RequestFailed proves it was never asked.
    let err = state.gateways.users.get("user_missing").await.unwrap_err();
    assert!(matches!(err, AppError::RequestFailed { status: 404, .. }));
}

#[tokio::test]
async fn test_report_statistics_and_document_download() {
    let (stub, base) = StubApi::spawn().await;
    stub.seed_book(json!({ "_id": "b1", "titulo": "Ficciones", "autor": "a1", "existencias": 2 }));
    let dir = tempdir().unwrap();
    let state = app_state(&base, dir.path());

    let stats = state.gateways.reports.general_statistics().await.unwrap();
    assert_eq!(stats["totalLibros"], 1);

    let pdf = state.gateways.reports.download_pdf("libros").await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}
