//! Prompt templates sent to the model.

use crate::HouseholdProfile;

pub const SOLAR_DESIGN_EXPERT: &str = "You are an expert in solar energy system design.";

pub const BILL_READING_EXPERT: &str =
    "You are an expert in reading and extracting information from energy bills.";

pub fn household_prompt(profile: &HouseholdProfile) -> String {
    format!(
        r#"
Given the following household parameters:
- Number of people: {}
- Number of spaces (rooms or general areas): {}
- Do you do home office? (0 = Yes, 1 = No, 2 = Sometimes): {}
- Has an electric car: {}
- How much you use your A/C (0 = All day, 1 = Only night, 2 = Occasionally, 3 = No): {}

Estimate how many standard solar panels are required to cover the average daily energy consumption of this house.

Your response must be a **single number** representing the estimated number of panels needed (rounded to the nearest whole number), based on realistic energy usage patterns and solar generation efficiency.
EXAMPLE:
10
"#,
        profile.people,
        profile.spaces,
        profile.home_office,
        profile.electric_car,
        profile.ac_usage,
    )
}

pub fn bill_extraction_prompt() -> &'static str {
    r#"
Given the attached energy bill, extract the total monthly energy consumption in kWh
and the total amount charged on the current bill.

Respond with a single JSON object and nothing else, using integer values:
{"total_kwh": <kWh consumed>, "last_month_cost": <amount charged>}
"#
}

pub fn panel_estimation_prompt(monthly_kwh: i64) -> String {
    format!(
        r#"
Given the following monthly energy consumption in kWh:
- Monthly Consumption: {} kWh

Estimate how many standard solar panels (assume 400W panels) are required to cover this energy consumption.
Assume an average of 5 peak sun hours per day.
Your response must be a **single number** representing the estimated number of panels needed (rounded to the nearest whole number).
EXAMPLE:
15
"#,
        monthly_kwh
    )
}
