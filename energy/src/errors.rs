use solar_core::{GeminiError, SpeechError};
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnergyError {
    /// Household parameters out of range; never sent to the provider
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] GeminiError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("failed to parse bill extraction: {0}")]
    Extraction(#[source] serde_json::Error),

    #[error("failed to parse recommended panels: {0}")]
    PanelCount(#[source] ParseIntError),

    #[error("no response from model")]
    NoResponse,
}

pub type EnergyResult<T> = Result<T, EnergyError>;
