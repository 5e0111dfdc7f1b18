//! Solar panel estimation on top of a generative model.
//!
//! [`Service`] turns household facts or an uploaded energy bill into a panel
//! recommendation, and passes speech synthesis and chat through to the
//! injected providers.

pub mod analysis;
pub mod consumption;
pub mod errors;
pub mod generator;
pub mod prompts;
pub mod service;

pub use analysis::{BillExtraction, EnergyAnalysisResult};
pub use consumption::{monthly_consumption, MonthlyConsumption};
pub use errors::{EnergyError, EnergyResult};
pub use generator::{Generator, SpeechSynthesizer};
pub use service::Service;

/// Household facts used to estimate panels without a bill
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdProfile {
    pub people: u32,
    /// Rooms or general areas
    pub spaces: u32,
    /// 0 = yes, 1 = no, 2 = sometimes
    pub home_office: i64,
    pub electric_car: bool,
    /// 0 = all day, 1 = only at night, 2 = occasionally, 3 = never
    pub ac_usage: i64,
}
