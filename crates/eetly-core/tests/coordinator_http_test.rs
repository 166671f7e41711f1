//! End-to-end refresh cycles against a mock GraphQL server.
//!
//! Exercises the real `GraphqlClient` transport: four concurrent queries,
//! normalization, roster tracking, and publication.
#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eetly_core::{
    Coordinator, CoordinatorConfig, CoreError, CycleOutcome, PrimaryCook, QueryFamily, ResidentId,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn coordinator(server: &MockServer) -> Coordinator {
    let config = CoordinatorConfig::new(
        server.uri().parse().unwrap(),
        SecretString::from("household-jwt".to_owned()),
    );
    Coordinator::from_config(&config).unwrap()
}

fn user(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

fn info(residents: &[(i64, &str)]) -> Value {
    json!({
        "eetschema_group": [{
            "name": "Huize Test",
            "city": "Delft",
            "address": null,
            "active": true,
            "default_status": null,
            "summary": [{ "user_id": 1, "payed_total": 420 }],
            "users_in_groups": residents
                .iter()
                .map(|(id, name)| json!({ "order": id, "user": user(*id, name) }))
                .collect::<Vec<_>>()
        }]
    })
}

fn today() -> Value {
    json!({
        "eetschema_event": [{
            "start_date": "2024-06-15T00:00:00+00:00",
            "description": "Curry",
            "open": true,
            "event_attendees_all_users": [
                { "user": user(1, "Anna"), "status": "cook", "number_guests": 0 },
                { "user": user(2, "Bram"), "status": "eat_only", "number_guests": 2 }
            ]
        }]
    })
}

fn future() -> Value {
    json!({
        "eetschema_event": [
            {
                "start_date": "2024-06-15T00:00:00+00:00",
                "event_attendees_all_users": [
                    { "user": user(1, "Anna"), "status": "cook", "number_guests": 0 },
                    { "user": user(2, "Bram"), "status": "eat_only", "number_guests": 2 }
                ]
            },
            {
                "start_date": "2024-06-16T00:00:00+00:00",
                "event_attendees_all_users": [
                    { "user": user(1, "Anna"), "status": "dont_know_yet", "number_guests": null },
                    { "user": user(2, "Bram"), "status": "not_attending", "number_guests": 0 }
                ]
            }
        ]
    })
}

fn list() -> Value {
    json!({
        "eetschema_list": [
            { "text": "rice", "checked": false },
            { "text": "coconut milk", "checked": false }
        ]
    })
}

async fn mount(server: &MockServer, needle: &str, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer household-jwt"))
        .and(body_string_contains(needle))
        .respond_with(template)
        .mount(server)
        .await;
}

fn data(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": value }))
}

async fn mount_household(server: &MockServer, residents: &[(i64, &str)]) {
    mount(server, "eetschema_group", data(info(residents))).await;
    mount(server, "start_date: {_eq:", data(today())).await;
    mount(server, "limit: 7", data(future())).await;
    mount(server, "eetschema_list", data(list())).await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn first_cycle_publishes_every_view() {
    let server = MockServer::start().await;
    mount_household(&server, &[(1, "Anna"), (2, "Bram")]).await;

    let coordinator = coordinator(&server);
    let outcome = coordinator.refresh_for(date()).await.unwrap();
    let CycleOutcome::Published(snapshot) = outcome else {
        panic!("expected a published snapshot, got {outcome:?}");
    };

    assert_eq!(snapshot.info.name, "Huize Test");
    assert_eq!(snapshot.info.balances.get(&ResidentId::from("1")), Some(&420));
    assert_eq!(snapshot.today.cook, PrimaryCook::Resident("Anna".into()));
    assert_eq!(snapshot.today.eating, vec!["Anna".to_owned(), "Bram + 2".to_owned()]);
    assert_eq!(snapshot.today.total_eaters, 4);
    assert_eq!(snapshot.today.food.as_deref(), Some("Curry"));
    assert_eq!(snapshot.shopping_list.items, vec!["rice", "coconut milk"]);

    let anna = snapshot.forecast_by_name("anna").unwrap();
    let labels: Vec<&str> = anna.days.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["Today", "Sunday"]);
    assert_eq!(anna.days["Sunday"].status_code, None);

    assert_eq!(coordinator.store().generation(), 1);
    coordinator.shutdown().await;
}

#[tokio::test]
async fn failing_family_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_household(&server, &[(1, "Anna"), (2, "Bram")]).await;
    let coordinator = coordinator(&server);
    coordinator.refresh_for(date()).await.unwrap();

    server.reset().await;
    mount(&server, "eetschema_group", data(info(&[(1, "Anna"), (2, "Bram")]))).await;
    mount(&server, "start_date: {_eq:", data(today())).await;
    mount(&server, "eetschema_list", data(list())).await;
    mount(&server, "limit: 7", ResponseTemplate::new(503)).await;

    let err = coordinator.refresh_for(date()).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Transport {
            family: QueryFamily::Future,
            ..
        }
    ));
    assert_eq!(coordinator.store().generation(), 1);
    assert!(coordinator.snapshot().is_some());
}

#[tokio::test]
async fn new_resident_requires_a_rebuild() {
    let server = MockServer::start().await;
    mount_household(&server, &[(1, "Anna"), (2, "Bram")]).await;
    let coordinator = coordinator(&server);
    coordinator.refresh_for(date()).await.unwrap();

    server.reset().await;
    mount_household(&server, &[(1, "Anna"), (2, "Bram"), (3, "Cas")]).await;

    let outcome = coordinator.refresh_for(date()).await.unwrap();
    let CycleOutcome::RosterChanged(diff) = outcome else {
        panic!("expected a roster change, got {outcome:?}");
    };
    assert_eq!(diff.added, vec![ResidentId::from("3")]);
    assert!(diff.removed.is_empty());
    assert_eq!(coordinator.store().generation(), 1);

    coordinator.reset_roster().await;
    let outcome = coordinator.refresh_for(date()).await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Published(_)));
    assert_eq!(coordinator.roster().await.unwrap().len(), 3);
}

#[tokio::test]
async fn graphql_errors_name_the_family() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eetschema_group",
        ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Could not verify JWT: JWTExpired",
                "extensions": { "code": "invalid-jwt" }
            }]
        })),
    )
    .await;
    mount(&server, "start_date: {_eq:", data(today())).await;
    mount(&server, "limit: 7", data(future())).await;
    mount(&server, "eetschema_list", data(list())).await;

    let err = coordinator(&server).refresh_for(date()).await.unwrap_err();
    assert_eq!(err.family(), Some(QueryFamily::Info));
    assert!(err.is_auth_failure());
}
