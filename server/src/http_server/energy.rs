use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use solar_energy::{EnergyAnalysisResult, HouseholdProfile, MonthlyConsumption};
use tracing::{error, info};

use super::{ApiError, AppState};

const BILL_FIELD: &str = "bill";
const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Household facts as posted by the onboarding form. Missing fields default to zero.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CalculatePanelsRequest {
    pub amount_people: u32,
    pub spaces: u32,
    pub home_office: i64,
    pub electric_car: bool,
    /// A/C usage code
    pub climate: i64,
}

impl From<CalculatePanelsRequest> for HouseholdProfile {
    fn from(request: CalculatePanelsRequest) -> Self {
        Self {
            people: request.amount_people,
            spaces: request.spaces,
            home_office: request.home_office,
            electric_car: request.electric_car,
            ac_usage: request.climate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilePanelsResponse {
    pub panels: EnergyAnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<String>,
    pub new_message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

/// POST /energy/calculate_panels
pub async fn calculate_panels(
    State(state): State<AppState>,
    payload: Result<Json<CalculatePanelsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<String>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        ApiError::bad_request("Panel calculations validation failed!", e.body_text())
    })?;

    let profile = HouseholdProfile::from(payload);
    let answer = state
        .energy
        .estimate_panels_from_household(&profile)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to calculate panels");
            ApiError::bad_request("Could not calculate panels.", e)
        })?;

    Ok((StatusCode::CREATED, Json(answer)))
}

/// POST /energy/calculate_from_file, multipart field `bill`
pub async fn calculate_from_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FilePanelsResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::bad_request("Could not get uploaded file.", e.body_text()))?;

    let mut bill = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        upload_error(e, |e| ApiError::bad_request("Could not get uploaded file.", e))
    })? {
        if field.name() != Some(BILL_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| {
                upload_error(e, |e| ApiError::internal("Could not open uploaded file.", e))
            })?;
        bill = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = bill.ok_or_else(|| {
        ApiError::bad_request(
            "Could not get uploaded file.",
            format!("missing multipart field '{}'", BILL_FIELD),
        )
    })?;

    info!(file_name = %file_name, size = bytes.len(), "Received bill upload");

    let panels = state
        .energy
        .estimate_panels_from_bill(&bytes, &file_name)
        .await
        .map_err(|e| ApiError::internal("Could not calculate panels from file.", e))?;

    Ok(Json(FilePanelsResponse { panels }))
}

/// Uploads over the body limit are reported as 413, anything else through `otherwise`
fn upload_error(
    err: MultipartError,
    otherwise: impl FnOnce(MultipartError) -> ApiError,
) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Uploaded file is too large.", err)
    } else {
        otherwise(err)
    }
}

/// POST /energy/tts, returns the synthesized audio
pub async fn text_to_speech(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) =
        payload.map_err(|e| ApiError::bad_request("Speech validation failed!", e.body_text()))?;

    if payload.text.trim().is_empty() {
        return Err(ApiError::bad_request(
            "Speech validation failed!",
            "text must not be empty",
        ));
    }

    let audio = state
        .energy
        .synthesize_speech(&payload.text)
        .await
        .map_err(|e| ApiError::internal("Could not generate speech.", e))?;

    Ok(([(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)], audio).into_response())
}

/// POST /energy/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) =
        payload.map_err(|e| ApiError::bad_request("Chat validation failed!", e.body_text()))?;

    let response = state
        .energy
        .continue_chat(&payload.history, &payload.new_message)
        .await
        .map_err(|e| ApiError::internal("Could not continue chat.", e))?;

    Ok(Json(ChatResponse { response }))
}

/// GET /energy/monthly_consumption?month=<name>
pub async fn monthly_consumption(
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<MonthlyConsumption>>, ApiError> {
    solar_energy::monthly_consumption(query.month.as_deref())
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No data found for the specified month"))
}
