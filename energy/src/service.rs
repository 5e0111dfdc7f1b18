use std::sync::Arc;

use solar_core::Content;
use tracing::{debug, info, warn};

use crate::analysis::{BillExtraction, EnergyAnalysisResult};
use crate::errors::{EnergyError, EnergyResult};
use crate::generator::{Generator, SpeechSynthesizer};
use crate::prompts;
use crate::HouseholdProfile;

/// Highest accepted home office code
pub const MAX_HOME_OFFICE_CODE: i64 = 3;
/// Highest accepted A/C usage code
pub const MAX_AC_USAGE_CODE: i64 = 4;

const UNAVAILABLE: &str = "unavailable.";

/// Panel estimation, speech and chat on top of the injected providers
#[derive(Clone)]
pub struct Service {
    generator: Arc<dyn Generator>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl Service {
    pub fn new(generator: Arc<dyn Generator>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { generator, speech }
    }

    /// Ask the model for a panel count from household facts.
    ///
    /// The reply is returned as-is; it is expected to be a bare integer but
    /// is not parsed here.
    pub async fn estimate_panels_from_household(
        &self,
        profile: &HouseholdProfile,
    ) -> EnergyResult<String> {
        if !(0..=MAX_HOME_OFFICE_CODE).contains(&profile.home_office)
            || !(0..=MAX_AC_USAGE_CODE).contains(&profile.ac_usage)
        {
            warn!(
                home_office = profile.home_office,
                ac_usage = profile.ac_usage,
                "Rejected household parameters"
            );
            return Err(EnergyError::Validation(UNAVAILABLE.to_string()));
        }

        let prompt = prompts::household_prompt(profile);
        let answer = self
            .generator
            .generate(&prompt, prompts::SOLAR_DESIGN_EXPERT)
            .await?;

        info!(answer = %answer.trim(), "Estimated panels from household");
        Ok(answer)
    }

    /// Read consumption off a bill, ask for a panel count and derive the savings.
    pub async fn estimate_panels_from_bill(
        &self,
        file: &[u8],
        file_name: &str,
    ) -> EnergyResult<EnergyAnalysisResult> {
        let extraction = self
            .generator
            .generate_with_file(
                file,
                file_name,
                prompts::bill_extraction_prompt(),
                prompts::BILL_READING_EXPERT,
            )
            .await?;

        let bill: BillExtraction =
            serde_json::from_str(&extraction).map_err(EnergyError::Extraction)?;
        debug!(
            total_kwh = bill.total_kwh,
            last_month_cost = bill.last_month_cost,
            "Extracted bill figures"
        );

        let answer = self
            .generator
            .generate(
                &prompts::panel_estimation_prompt(bill.total_kwh),
                prompts::SOLAR_DESIGN_EXPERT,
            )
            .await?;

        let recommended_panels: i64 = answer.trim().parse().map_err(EnergyError::PanelCount)?;

        let result = EnergyAnalysisResult::compute(bill, recommended_panels);
        info!(
            file_name,
            recommended_panels,
            yearly_savings = result.yearly_savings,
            "Estimated panels from bill"
        );
        Ok(result)
    }

    pub async fn synthesize_speech(&self, text: &str) -> EnergyResult<Vec<u8>> {
        Ok(self.speech.synthesize(text).await?)
    }

    /// Send `new_message` after `history`.
    ///
    /// Turn roles come from position in `history`: even indexes are model
    /// turns, odd indexes user turns.
    pub async fn continue_chat(
        &self,
        history: &[String],
        new_message: &str,
    ) -> EnergyResult<String> {
        let turns = history_to_turns(history);
        self.generator
            .chat(turns, new_message)
            .await?
            .ok_or(EnergyError::NoResponse)
    }
}

pub(crate) fn history_to_turns(history: &[String]) -> Vec<Content> {
    history
        .iter()
        .enumerate()
        .map(|(i, message)| {
            if i % 2 == 0 {
                Content::model(message.as_str())
            } else {
                Content::user(message.as_str())
            }
        })
        .collect()
}
