use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;
use vetclinic_application::{ClinicApi, LoginRequest, PatientRequest, RegistrationRequest};
use vetclinic_core::AppError;

use super::HttpClinicApi;

#[derive(Debug, Clone)]
struct ReceivedPatient {
    authorization: Option<String>,
    content_type: Option<String>,
    body: Value,
}

type Received = Arc<Mutex<Vec<ReceivedPatient>>>;

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("password").and_then(Value::as_str) == Some("secreto") {
        (
            StatusCode::OK,
            Json(json!({"token": "abc", "_id": "u-1", "email": body["email"]})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"msg": "Invalid credentials"})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("email").and_then(Value::as_str) == Some("taken@example.com") {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"msg": "El email ya se encuentra registrado"})),
        )
    } else {
        (StatusCode::OK, Json(json!({"msg": "Revisa tu email"})))
    }
}

async fn register_patient(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let authorization = header_text(header::AUTHORIZATION);
    let content_type = header_text(header::CONTENT_TYPE);

    if let Ok(mut guard) = received.lock() {
        guard.push(ReceivedPatient {
            authorization: authorization.clone(),
            content_type,
            body,
        });
    }

    if authorization.as_deref() == Some("Bearer tok-123") {
        StatusCode::CREATED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn spawn_backend() -> (Url, Received) {
    let received = Received::default();
    let routes = Router::new()
        .route("/login", post(login))
        .route("/registro", post(register))
        .route("/paciente/registro", post(register_patient))
        .with_state(received.clone());
    let app = Router::new().nest("/api", routes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|error| panic!("failed to bind stub backend: {error}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|error| panic!("failed to read stub backend address: {error}"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base_url = Url::parse(&format!("http://{address}/api/"))
        .unwrap_or_else(|error| panic!("invalid stub backend url: {error}"));
    (base_url, received)
}

fn patient_request() -> PatientRequest {
    PatientRequest {
        nombre: "Firulais".to_owned(),
        propietario: "Ana Pérez".to_owned(),
        email: "ana@example.com".to_owned(),
        celular: serde_json::Number::from(991_234_567_i64),
        convencional: serde_json::Number::from(22_345_678_i64),
        salida: "2024-05-01".to_owned(),
        sintomas: "Tos".to_owned(),
        id: "u-1".to_owned(),
    }
}

#[tokio::test]
async fn login_returns_full_response_body() {
    let (base_url, _) = spawn_backend().await;
    let api = HttpClinicApi::new(reqwest::Client::new(), &base_url);

    let body = api
        .login(&LoginRequest {
            email: "ana@example.com".to_owned(),
            password: "secreto".to_owned(),
        })
        .await
        .unwrap_or_else(|error| panic!("login should succeed: {error}"));

    assert_eq!(body.get("token"), Some(&json!("abc")));
    assert_eq!(body.get("_id"), Some(&json!("u-1")));
    assert_eq!(body.get("email"), Some(&json!("ana@example.com")));
}

#[tokio::test]
async fn login_failure_surfaces_backend_message() {
    let (base_url, _) = spawn_backend().await;
    let api = HttpClinicApi::new(reqwest::Client::new(), &base_url);

    let result = api
        .login(&LoginRequest {
            email: "ana@example.com".to_owned(),
            password: "wrong".to_owned(),
        })
        .await;

    match result {
        Err(AppError::Rejected(message)) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_returns_backend_message_both_ways() {
    let (base_url, _) = spawn_backend().await;
    let api = HttpClinicApi::new(reqwest::Client::new(), &base_url);
    let mut request = RegistrationRequest {
        nombre: "Ana".to_owned(),
        apellido: "Pérez".to_owned(),
        direccion: "Av. Amazonas".to_owned(),
        telefono: "0991234567".to_owned(),
        email: "ana@example.com".to_owned(),
        password: "secreto".to_owned(),
    };

    let accepted = api.register(&request).await;
    assert_eq!(
        accepted.ok().flatten().as_deref(),
        Some("Revisa tu email")
    );

    request.email = "taken@example.com".to_owned();
    match api.register(&request).await {
        Err(AppError::Rejected(message)) => {
            assert_eq!(message, "El email ya se encuentra registrado");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn patient_registration_sends_bearer_token_and_json_body() {
    let (base_url, received) = spawn_backend().await;
    let api = HttpClinicApi::new(reqwest::Client::new(), &base_url);

    let result = api.register_patient("tok-123", &patient_request()).await;
    assert!(result.is_ok(), "unexpected failure: {result:?}");

    let received = received.lock().map(|guard| guard.clone()).unwrap_or_default();
    assert_eq!(received.len(), 1);
    let Some(request) = received.first() else {
        panic!("stub backend should have received one request");
    };
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok-123"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        request.body,
        json!({
            "nombre": "Firulais",
            "propietario": "Ana Pérez",
            "email": "ana@example.com",
            "celular": 991234567,
            "convencional": 22345678,
            "salida": "2024-05-01",
            "sintomas": "Tos",
            "id": "u-1"
        })
    );
}

#[tokio::test]
async fn failure_without_message_is_a_transport_error() {
    let (base_url, _) = spawn_backend().await;
    let api = HttpClinicApi::new(reqwest::Client::new(), &base_url);

    let result = api.register_patient("stale", &patient_request()).await;
    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|error| panic!("failed to bind probe listener: {error}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|error| panic!("failed to read probe address: {error}"));
    drop(listener);

    let base_url = Url::parse(&format!("http://{address}"))
        .unwrap_or_else(|error| panic!("invalid probe url: {error}"));
    let api = HttpClinicApi::new(reqwest::Client::new(), &base_url);

    let result = api
        .login(&LoginRequest {
            email: "ana@example.com".to_owned(),
            password: "secreto".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AppError::Transport(_))));
}
