use std::fmt::Display;
use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use solar_energy::Service;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::users::{UserError, UserService};

pub mod energy;
pub mod users;

/// Upper bound for uploaded bills
pub const BILL_UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    pub energy: Service,
    pub users: UserService,
}

/// Body returned by every failing route
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Error type for HTTP server
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Display) -> Self {
        Self {
            status,
            message: message.into(),
            error: Some(error.to_string()),
        }
    }

    pub fn bad_request(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, error)
    }

    pub fn internal(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, error)
    }

    /// A 404 with no underlying error text
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            error: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                error = self.error.as_deref().unwrap_or_default(),
                "{}",
                self.message
            );
        }
        let body = Json(ErrorResponse {
            message: self.message,
            error: self.error,
        });
        (self.status, body).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::Validation(_) => Self::bad_request("User validation failed!", err),
            UserError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "User not found.", err),
            UserError::Conflict(_) => Self::new(StatusCode::CONFLICT, "User already exists.", err),
            UserError::Storage(_) => Self::internal("Could not access users.", err),
        }
    }
}

/// Build the router with every route and middleware layer
pub fn create_router(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/energy/calculate_panels", post(energy::calculate_panels))
        .route(
            "/energy/calculate_from_file",
            post(energy::calculate_from_file)
                .layer(DefaultBodyLimit::max(BILL_UPLOAD_LIMIT_BYTES)),
        )
        .route("/energy/tts", post(energy::text_to_speech))
        .route("/energy/chat", post(energy::chat))
        .route("/energy/monthly_consumption", get(energy::monthly_consumption))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting HTTP server on {}", addr);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {}", e))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Solar daemon is running"
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use solar_core::{Content, GeminiError, GeminiResult, SpeechResult};
    use solar_energy::{Generator, Service, SpeechSynthesizer};
    use tower::ServiceExt;

    use super::{create_router, AppState};
    use crate::users::{InMemoryUserStore, UserService};

    /// Canned answers keyed on the kind of prompt
    pub struct ScriptedGenerator {
        pub household_answer: GeminiResult<String>,
        pub extraction: String,
        pub chat_answer: Option<String>,
    }

    impl Default for ScriptedGenerator {
        fn default() -> Self {
            Self {
                household_answer: Ok("12".to_string()),
                extraction: r#"{"total_kwh": 850, "last_month_cost": 4200}"#.to_string(),
                chat_answer: Some("¡Hola!".to_string()),
            }
        }
    }

    fn clone_result(result: &GeminiResult<String>) -> GeminiResult<String> {
        match result {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(GeminiError::ResponseError(e.to_string())),
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, prompt: &str, _system_instruction: &str) -> GeminiResult<String> {
            if prompt.contains("Monthly Consumption") {
                Ok("15".to_string())
            } else {
                clone_result(&self.household_answer)
            }
        }

        async fn generate_with_file(
            &self,
            _file: &[u8],
            _file_name: &str,
            _prompt: &str,
            _system_instruction: &str,
        ) -> GeminiResult<String> {
            Ok(self.extraction.clone())
        }

        async fn chat(
            &self,
            _history: Vec<Content>,
            _message: &str,
        ) -> GeminiResult<Option<String>> {
            Ok(self.chat_answer.clone())
        }
    }

    pub struct EchoSpeech;

    #[async_trait]
    impl SpeechSynthesizer for EchoSpeech {
        async fn synthesize(&self, text: &str) -> SpeechResult<Vec<u8>> {
            Ok(format!("AUDIO:{}", text).into_bytes())
        }
    }

    pub fn router_with(generator: ScriptedGenerator) -> Router {
        let state = AppState {
            energy: Service::new(Arc::new(generator), Arc::new(EchoSpeech)),
            users: UserService::new(Arc::new(InMemoryUserStore::new())),
        };
        create_router(state)
    }

    pub fn router() -> Router {
        router_with(ScriptedGenerator::default())
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Send `request` and return the status with the raw body
    pub async fn send(app: Router, request: Request<Body>) -> (axum::http::StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn send_json(
        app: Router,
        request: Request<Body>,
    ) -> (axum::http::StatusCode, serde_json::Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}
