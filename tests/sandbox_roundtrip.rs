//! End-to-end tests: resource services against the sandbox backend bound to
//! an ephemeral loopback port.

#![allow(clippy::panic, missing_docs)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};

use optica_client::config::ClientConfig;
use optica_client::domain::{Appointment, Client, Record, RecordId, Resource, Sale};
use optica_client::error::ClientError;
use optica_client::notice::NoticeBoard;
use optica_client::sandbox::{self, RunningSandbox, SandboxState};
use optica_client::service::ResourceService;
use optica_client::store::CollectionEvent;
use optica_client::view::{SortKey, ViewQuery};

async fn start(seed: Value, token: Option<&str>) -> RunningSandbox {
    let mut state = SandboxState::new();
    if let Some(token) = token {
        state = state.with_token(token);
    }
    let Ok(_) = state.seed(seed).await else {
        panic!("seed should load");
    };
    let Ok(running) = sandbox::spawn(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        state,
        Duration::from_secs(5),
    )
    .await
    else {
        panic!("sandbox should bind");
    };
    running
}

fn service<R: Record>(running: &RunningSandbox, token: Option<&str>) -> ResourceService<R> {
    let Ok(mut config) = ClientConfig::new(&running.api_url()) else {
        panic!("sandbox url should parse");
    };
    if let Some(token) = token {
        config = config.with_token(token);
    }
    let Ok(service) = ResourceService::from_config(&config, Arc::new(NoticeBoard::new())) else {
        panic!("service should build");
    };
    service
}

#[tokio::test]
async fn create_then_delete_restores_id_set() {
    let running = start(
        json!({ "clientes": [
            { "id": 1, "nombre": "Ana", "apellido": "Paz" },
            { "id": 2, "nombre": "Beto", "apellido": "Rios" }
        ] }),
        None,
    )
    .await;
    let clients = service::<Client>(&running, None);

    assert_eq!(assert_ok!(clients.load().await), 2);
    let before = clients.ids().await;

    let created = assert_ok!(
        clients
            .create(&json!({ "nombre": "Carla", "documento": "0912345678" }))
            .await
    );
    assert_eq!(created.id, RecordId::from(3_u64));
    assert_eq!(clients.ids().await.first(), Some(&created.id));

    assert_ok!(clients.delete(&created.id).await);
    assert_eq!(clients.ids().await, before);
    assert!(clients.notices().is_empty().await);

    running.shutdown();
}

#[tokio::test]
async fn update_preserves_fields_the_model_does_not_name() {
    let running = start(
        json!({ "ventas": [{
            "id": 7,
            "codigo": "V-007",
            "estado": "pendiente",
            "total": "120.50",
            "detalles": [{ "descripcion": "Montura", "cantidad": 1, "precio_unitario": 120.5 }],
            "pago": { "metodo": "tarjeta", "cuotas": 3 }
        }] }),
        None,
    )
    .await;
    let sales = service::<Sale>(&running, None);
    assert_ok!(sales.load().await);

    let id = RecordId::from(7_u64);
    let updated = assert_ok!(sales.update(&id, &json!({ "estado": "pagada" })).await);
    assert_eq!(updated.estado.as_deref(), Some("pagada"));
    assert_eq!(updated.total, Some(120.5));

    let Ok(stored) = running.state.get(Resource::Sales, &id).await else {
        panic!("record should still exist");
    };
    assert_eq!(stored.pointer("/pago/cuotas"), Some(&json!(3)));
    assert_eq!(stored.pointer("/detalles/0/descripcion"), Some(&json!("Montura")));
    assert_eq!(stored.get("estado"), Some(&json!("pagada")));

    let local = sales.get(&id).await;
    assert_eq!(
        local.and_then(|s| s.extra.get("pago").cloned()),
        Some(json!({ "metodo": "tarjeta", "cuotas": 3 }))
    );

    running.shutdown();
}

#[tokio::test]
async fn update_sends_untouched_values_back_verbatim() {
    let running = start(
        json!({ "ventas": [{
            "id": 7,
            "total": "120.50",
            "codigo": null,
            "estado": "pendiente"
        }] }),
        None,
    )
    .await;
    let sales = service::<Sale>(&running, None);
    assert_ok!(sales.load().await);

    let id = RecordId::from(7_u64);
    assert_ok!(sales.update(&id, &json!({ "estado": "pagada" })).await);

    let Ok(stored) = running.state.get(Resource::Sales, &id).await else {
        panic!("record should still exist");
    };
    assert_eq!(stored.get("total"), Some(&json!("120.50")));
    assert_eq!(stored.get("codigo"), Some(&Value::Null));
    assert_eq!(stored.get("estado"), Some(&json!("pagada")));

    running.shutdown();
}

#[tokio::test]
async fn patch_sends_only_changes() {
    let running = start(
        json!({ "ventas": [{ "id": 1, "estado": "pendiente", "vendedor": "Luis" }] }),
        None,
    )
    .await;
    let sales = service::<Sale>(&running, None);
    assert_ok!(sales.load().await);

    let patched = assert_ok!(
        sales
            .patch(&RecordId::from(1_u64), &json!({ "estado": "anulada" }))
            .await
    );
    assert_eq!(patched.estado.as_deref(), Some("anulada"));
    assert_eq!(patched.vendedor.as_deref(), Some("Luis"));

    running.shutdown();
}

#[tokio::test]
async fn missing_record_is_status_error_with_notice() {
    let running = start(json!({ "ventas": [] }), None).await;
    let sales = service::<Sale>(&running, None);

    let err = assert_err!(sales.fetch_one(&RecordId::from(99_u64)).await);
    let ClientError::Status { status, message } = err else {
        panic!("expected a status error");
    };
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message, "record 99 not found in ventas");

    let Some(notice) = sales.notices().latest().await else {
        panic!("failure should be surfaced");
    };
    assert_eq!(notice.resource, Resource::Sales);
    assert!(!notice.retryable);

    running.shutdown();
}

#[tokio::test]
async fn failed_delete_keeps_local_record() {
    let running = start(json!({ "ventas": [{ "id": 1 }, { "id": 2 }] }), None).await;
    let sales = service::<Sale>(&running, None);
    assert_ok!(sales.load().await);

    // Removed behind the client's back: the backend now answers 404.
    let id = RecordId::from(2_u64);
    assert_ok!(running.state.remove(Resource::Sales, &id).await);

    assert_err!(sales.delete(&id).await);
    assert!(sales.get(&id).await.is_some());
    assert_eq!(sales.notices().len().await, 1);

    running.shutdown();
}

#[tokio::test]
async fn token_is_required_when_configured() {
    let running = start(json!({ "citas": [{ "id": 1 }] }), Some("s3cret")).await;

    let anonymous = service::<Appointment>(&running, None);
    let err = assert_err!(anonymous.load().await);
    assert!(matches!(
        err,
        ClientError::Status { status, .. } if status == StatusCode::UNAUTHORIZED
    ));
    assert!(anonymous.records().await.is_empty());

    let authorized = service::<Appointment>(&running, Some("s3cret"));
    assert_eq!(assert_ok!(authorized.load().await), 1);

    running.shutdown();
}

#[tokio::test]
async fn appointments_append_and_events_are_published() {
    let running = start(
        json!({ "citas": [{ "id": 1, "fecha": "2024-03-01", "motivo": "Control" }] }),
        None,
    )
    .await;
    let appointments = service::<Appointment>(&running, None);
    let mut events = appointments.subscribe();

    assert_ok!(appointments.load().await);
    let created = assert_ok!(
        appointments
            .create(&json!({ "fecha": "2024-03-02", "motivo": "Entrega de lentes" }))
            .await
    );
    assert_eq!(appointments.ids().await.last(), Some(&created.id));

    let Ok(first) = events.recv().await else {
        panic!("load should publish");
    };
    assert!(matches!(first, CollectionEvent::Replaced { count: 1, .. }));
    let Ok(second) = events.recv().await else {
        panic!("create should publish");
    };
    assert_eq!(second.record_id(), Some(&created.id));
    assert_eq!(second.event_type_str(), "inserted");

    running.shutdown();
}

#[tokio::test]
async fn refresh_picks_up_backend_changes_and_view_filters() {
    let running = start(
        json!({ "ventas": [
            { "id": 1, "cliente_nombre": "Ana", "total": 10, "fecha": "2024-01-05" },
            { "id": 2, "cliente_nombre": "Beto", "total": 50, "fecha": "2024-02-01" }
        ] }),
        None,
    )
    .await;
    let sales = service::<Sale>(&running, None);
    assert_ok!(sales.load().await);
    let first_load = sales.load_state().await.last_loaded_at;

    assert_ok!(
        running
            .state
            .insert(
                Resource::Sales,
                json!({ "cliente_nombre": "Andrea", "total": 30, "fecha": "2024-03-10" })
            )
            .await
    );
    assert_eq!(assert_ok!(sales.refresh().await), 3);

    let state = sales.load_state().await;
    assert!(!state.refreshing);
    assert!(state.last_loaded_at >= first_load);

    let query = ViewQuery::new().search("an").sort_by(SortKey::Amount).ascending();
    let names: Vec<_> = sales
        .view(&query)
        .await
        .into_iter()
        .filter_map(|s| s.cliente_nombre)
        .collect();
    assert_eq!(names, vec!["Ana", "Andrea"]);

    running.shutdown();
}
