//! Integration tests for the fleet client happy paths
//!
//! Covers session single-flight, the response cache, fixture fallback under
//! forced offline mode, fan-out list synthesis, and report generation.
//!
//! Run with: cargo test -p frota-tests --test client_integration_test

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use frota_client::testing::TestServer;
use frota_client::{ApiError, FleetClient, MaintenanceDraft, AlertDraft, MOCK_TOKEN};
use frota_core::stats;
use frota_tests::{maintenance_json, start, test_config, Counters};

fn login_route(counters: Arc<Counters>, delay: Duration) -> Router {
    Router::new().route(
        "/v1/api/auth/login",
        post(move || {
            let counters = counters.clone();
            async move {
                Counters::hit(&counters.logins);
                tokio::time::sleep(delay).await;
                Json(json!({ "token": "test-token" }))
            }
        }),
    )
}

fn maintenance_route(counters: Arc<Counters>) -> Router {
    Router::new().route(
        "/v1/api/manutencao/caminhao/{id}",
        get(move |Path(id): Path<i64>| {
            let counters = counters.clone();
            async move {
                Counters::hit(&counters.data);
                Json(json!([maintenance_json(id * 10, id, 350.0, false)]))
            }
        }),
    )
}

// =============================================================================
// Session tests
// =============================================================================

#[tokio::test]
async fn test_concurrent_token_requests_login_once() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::from_millis(100));
    let (_server, client) = start(router).await;

    let tokens = futures::future::join_all((0..8).map(|_| client.valid_token())).await;
    for token in tokens {
        assert_eq!(token.expect("token"), "test-token");
    }
    assert_eq!(counters.logins(), 1);
}

#[tokio::test]
async fn test_back_to_back_logins_single_post() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::from_millis(50));
    let (_server, client) = start(router).await;

    let (first, second) = tokio::join!(client.login(), client.login());
    assert_eq!(first.expect("token"), "test-token");
    assert_eq!(second.expect("token"), "test-token");
    assert_eq!(counters.logins(), 1);
}

#[tokio::test]
async fn test_persisted_session_survives_restart() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO);
    let server = TestServer::start(router).await.expect("test server");

    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(&format!("{}/v1/api", server.base_url()));
    config.session_file = Some(dir.path().join("session.toml"));

    let client = FleetClient::new(config.clone()).expect("client");
    client.valid_token().await.expect("token");
    assert_eq!(counters.logins(), 1);

    // A fresh client with the same session file recovers the token
    let restarted = FleetClient::new(config.clone()).expect("client");
    assert_eq!(restarted.valid_token().await.expect("token"), "test-token");
    assert_eq!(counters.logins(), 1);

    // Logout purges the persisted session; the next client logs in again
    restarted.logout().await;
    let after_logout = FleetClient::new(config).expect("client");
    after_logout.valid_token().await.expect("token");
    assert_eq!(counters.logins(), 2);
}

// =============================================================================
// Cache tests
// =============================================================================

#[tokio::test]
async fn test_repeated_get_within_ttl_hits_cache() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO)
        .merge(maintenance_route(counters.clone()));
    let (_server, client) = start(router).await;

    let first = client.maintenance_for_truck(1).await;
    let second = client.maintenance_for_truck(1).await;
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    // The second call must not reach the backend
    assert_eq!(counters.data(), 1);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO)
        .merge(maintenance_route(counters.clone()));
    let server = TestServer::start(router).await.expect("test server");

    let mut config = test_config(&format!("{}/v1/api", server.base_url()));
    config.cache_ttl_ms = 50;
    let client = FleetClient::new(config).expect("client");

    client.maintenance_for_truck(1).await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    client.maintenance_for_truck(1).await;
    assert_eq!(counters.data(), 2);
}

#[tokio::test]
async fn test_mutation_invalidates_cache() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO)
        .merge(maintenance_route(counters.clone()))
        .route(
            "/v1/api/manutencao",
            post(|| async { Json(maintenance_json(100, 1, 99.0, true)) }),
        );
    let (_server, client) = start(router).await;

    client.maintenance_for_truck(1).await;
    client.maintenance_for_truck(1).await;
    assert_eq!(counters.data(), 1);

    let draft = MaintenanceDraft {
        service: "Troca de óleo".to_string(),
        cost: 99.0,
        started_at: None,
        completed_at: None,
        truck_id: Some(1),
    };
    client.create_maintenance(&draft).await.expect("create");

    // Previously cached data must be refetched after the write
    client.maintenance_for_truck(1).await;
    assert_eq!(counters.data(), 2);
}

// =============================================================================
// Fan-out list synthesis
// =============================================================================

#[tokio::test]
async fn test_list_maintenance_drops_failed_trucks() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO).route(
        "/v1/api/manutencao/caminhao/{id}",
        get(move |Path(id): Path<i64>| {
            let counters = counters.clone();
            async move {
                Counters::hit(&counters.data);
                if id == 2 {
                    Err(StatusCode::NOT_FOUND)
                } else {
                    Ok(Json(json!([maintenance_json(id * 10, id, 100.0, true)])))
                }
            }
        }),
    );
    let (_server, client) = start(router).await;

    let records = client.list_maintenance().await;
    let mut ids: Vec<i64> = records.iter().map(|m| m.id).collect();
    ids.sort_unstable();
    // Trucks 1 and 3 fulfilled; truck 2's failure is dropped silently
    assert_eq!(ids, vec![10, 30]);
    assert!(!client.offline());
}

// =============================================================================
// Offline fixtures
// =============================================================================

#[tokio::test]
async fn test_forced_offline_serves_reference_fixtures() {
    let client =
        FleetClient::new(test_config("http://127.0.0.1:1/v1/api")).expect("client");
    client.force_offline();

    // Truck 1 has exactly the two reference records 1 and 3
    let records = client.maintenance_for_truck(1).await;
    let ids: Vec<i64> = records.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 3]);

    // The whole read surface works without a network
    assert_eq!(client.valid_token().await.expect("token"), MOCK_TOKEN);
    assert_eq!(client.list_trucks().await.len(), 3);
    assert_eq!(client.alerts_for_truck(1).await.len(), 1);
    assert_eq!(client.route(1).await.len(), 3);
    assert!(client.position(1).await.is_some());

    // Reference statistics over the fixture records
    let all = client.list_maintenance().await;
    assert_eq!(stats::total_cost(&all), 2900.0);
    let open: Vec<i64> = stats::pending(&all).iter().map(|m| m.id).collect();
    assert_eq!(open, vec![3, 4]);
}

#[tokio::test]
async fn test_offline_writes_are_simulated() {
    let client =
        FleetClient::new(test_config("http://127.0.0.1:1/v1/api")).expect("client");
    client.force_offline();

    let draft = MaintenanceDraft {
        service: "Alinhamento".to_string(),
        cost: 200.0,
        started_at: None,
        completed_at: None,
        truck_id: Some(2),
    };
    let created = client.create_maintenance(&draft).await.expect("create");
    assert_eq!(created.service.as_deref(), Some("Alinhamento"));
    assert_eq!(created.truck_id(), Some(2));

    let again = client.create_maintenance(&draft).await.expect("create");
    assert_ne!(created.id, again.id);
}

// =============================================================================
// Domain endpoints
// =============================================================================

#[tokio::test]
async fn test_typed_domain_reads() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters, Duration::ZERO)
        .route(
            "/v1/api/caminhoes",
            get(|| async {
                Json(json!([
                    { "id": 1, "placa": "ABC-1234", "modelo": "Scania R450", "ano": 2022, "status": "ATIVO" }
                ]))
            }),
        )
        .route(
            "/v1/api/caminhoes/{id}",
            get(|Path(id): Path<i64>| async move {
                Json(json!({ "id": id, "placa": "DEF-5678", "modelo": "Volvo FH540" }))
            }),
        )
        .route(
            "/v1/api/maps/{id}",
            get(|Path(id): Path<i64>| async move {
                Json(json!({
                    "latitude": -23.5505,
                    "longitude": -46.6333,
                    "destino": "Curitiba",
                    "caminhao_id": id
                }))
            }),
        )
        .route(
            "/v1/api/rota_caminhao/{id}",
            get(|Path(_id): Path<i64>| async move {
                Json(json!([
                    {
                        "destinoInicial": "São Paulo",
                        "destinoFinal": "Campinas",
                        "latitude": -23.5505,
                        "longitude": -46.6333,
                        "status": "PENDENTE",
                        "dataHoraPrevisao": "2024-11-02T08:00:00.000Z"
                    }
                ]))
            }),
        )
        .route(
            "/v1/api/veiculos/{id}/historico",
            get(|Path(_id): Path<i64>| async move {
                Json(json!({
                    "historicoModificacoes": [{ "tipo": "motor" }],
                    "historicoAcidentes": [],
                    "upgradesRealizados": [{ "tipo": "freios" }]
                }))
            }),
        );
    let (_server, client) = start(router).await;

    let trucks = client.list_trucks().await;
    assert_eq!(trucks.len(), 1);
    assert!(trucks[0].is_active());

    let truck = client.truck(2).await.expect("truck");
    assert_eq!(truck.plate.as_deref(), Some("DEF-5678"));

    let position = client.position(1).await.expect("position");
    assert_eq!(position.destination.as_deref(), Some("Curitiba"));
    assert_eq!(position.truck_id, Some(1));

    let route = client.route(1).await;
    assert_eq!(route.len(), 1);
    assert_eq!(route[0].origin.as_deref(), Some("São Paulo"));

    let history = client.vehicle_history(1).await;
    assert_eq!(history.modifications.len(), 1);
    assert_eq!(history.upgrades.len(), 1);
    assert!(history.accidents.is_empty());
}

#[tokio::test]
async fn test_mutation_errors_propagate() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters, Duration::ZERO).route(
        "/v1/api/alerta/{id}",
        post(|Path(_id): Path<i64>| async {
            (StatusCode::BAD_REQUEST, "categoria inválida")
        }),
    );
    let (_server, client) = start(router).await;

    let draft = AlertDraft {
        title: "Combustível baixo".to_string(),
        category: "XXX".to_string(),
        description: "Combustível em 5%".to_string(),
    };
    let err = client.create_alert(1, &draft).await.expect_err("must fail");
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("categoria"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!client.offline());
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_report_uses_chat_answer() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO)
        .merge(maintenance_route(counters))
        .route(
            "/chat",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                if headers.get("X-API-Key").and_then(|v| v.to_str().ok()) != Some("key-1") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                if body.get("mensagem").is_none() || body.get("session_id").is_none() {
                    return Err(StatusCode::BAD_REQUEST);
                }
                Ok(Json(json!({ "resposta": "Relatório gerado pela IA" })))
            }),
        );
    let server = TestServer::start(router).await.expect("test server");

    let mut config = test_config(&format!("{}/v1/api", server.base_url()));
    config.chat.url = Some(format!("{}/chat", server.base_url()));
    config.chat.api_key = Some("key-1".to_string());
    let client = FleetClient::new(config).expect("client");

    let report = client.maintenance_report().await;
    assert_eq!(report, "Relatório gerado pela IA");
}

#[tokio::test]
async fn test_report_falls_back_without_chat_endpoint() {
    let counters = Arc::new(Counters::default());
    let router = login_route(counters.clone(), Duration::ZERO)
        .merge(maintenance_route(counters));
    let (_server, client) = start(router).await;

    let report = client.maintenance_report().await;
    assert!(report.contains("Resumo da frota"));
    // The chat endpoint being unset must not flip the backend offline
    assert!(!client.offline());
}
