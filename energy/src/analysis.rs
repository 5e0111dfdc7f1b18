use serde::{Deserialize, Serialize};

/// Currency units per kWh
pub const COST_PER_KWH: f64 = 5.0;
/// Rated output of one panel, watts
pub const PANEL_WATTAGE: f64 = 400.0;
/// Full-sun-equivalent hours per day
pub const PEAK_SUN_HOURS: f64 = 5.0;
pub const DAYS_IN_MONTH: f64 = 30.0;
/// Installed cost of one panel, currency units
pub const COST_PER_PANEL: f64 = 10_000.0;
/// kg CO2 per kWh of grid energy
pub const CO2_EMISSION_FACTOR: f64 = 0.423;

/// Figures read off an uploaded bill by the model. Missing fields read as zero.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BillExtraction {
    pub total_kwh: i64,
    pub last_month_cost: i64,
}

/// Panel recommendation with its financial and environmental figures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyAnalysisResult {
    /// kWh per month, as read from the bill
    pub monthly_consumption: f64,
    pub monthly_cost: f64,
    pub recommended_panels: i64,
    /// kWh per month produced by the recommended panels
    pub panel_production: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
    /// kWh per month produced beyond consumption; negative when short
    pub surplus: f64,
    pub break_even_years: f64,
    /// kg CO2 avoided per year
    pub carbon_offset: f64,
}

impl EnergyAnalysisResult {
    pub fn compute(bill: BillExtraction, recommended_panels: i64) -> Self {
        let panels = recommended_panels as f64;
        let monthly_consumption = bill.total_kwh as f64;

        let panel_production = panel_production(recommended_panels);
        let monthly_savings = panel_production * COST_PER_KWH;
        let yearly_savings = monthly_savings * 12.0;

        Self {
            monthly_consumption,
            monthly_cost: bill.last_month_cost as f64,
            recommended_panels,
            panel_production,
            monthly_savings,
            yearly_savings,
            surplus: panel_production - monthly_consumption,
            break_even_years: break_even_years(panels * COST_PER_PANEL, yearly_savings),
            carbon_offset: panel_production * 12.0 * CO2_EMISSION_FACTOR,
        }
    }
}

/// kWh per month produced by `panels` panels
pub fn panel_production(panels: i64) -> f64 {
    panels as f64 * PANEL_WATTAGE * PEAK_SUN_HOURS * DAYS_IN_MONTH / 1000.0
}

/// Years to recover `installation_cost`; zero when there are no savings
pub fn break_even_years(installation_cost: f64, yearly_savings: f64) -> f64 {
    if yearly_savings > 0.0 {
        installation_cost / yearly_savings
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fifteen_panels() {
        let bill = BillExtraction {
            total_kwh: 850,
            last_month_cost: 4200,
        };
        let result = EnergyAnalysisResult::compute(bill, 15);

        assert!(approx(result.panel_production, 900.0));
        assert!(approx(result.monthly_savings, 4500.0));
        assert!(approx(result.yearly_savings, 54000.0));
        assert!(approx(result.carbon_offset, 4568.4));
        assert!(approx(result.surplus, 50.0));
        assert!(approx(result.monthly_consumption, 850.0));
        assert!(approx(result.monthly_cost, 4200.0));
        assert!(approx(result.break_even_years, 150_000.0 / 54_000.0));
    }

    #[test]
    fn test_break_even_ten_panels() {
        let years = break_even_years(10.0 * COST_PER_PANEL, 36_000.0);
        assert!(approx(years, 100_000.0 / 36_000.0));
        assert!((years - 2.7777).abs() < 1e-3);
    }

    #[test]
    fn test_break_even_without_savings() {
        assert_eq!(break_even_years(100_000.0, 0.0), 0.0);
        assert_eq!(break_even_years(100_000.0, -10.0), 0.0);

        let result = EnergyAnalysisResult::compute(
            BillExtraction {
                total_kwh: 200,
                last_month_cost: 900,
            },
            0,
        );
        assert_eq!(result.yearly_savings, 0.0);
        assert_eq!(result.break_even_years, 0.0);
        assert!(approx(result.surplus, -200.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = EnergyAnalysisResult::compute(
            BillExtraction {
                total_kwh: 300,
                last_month_cost: 1500,
            },
            1,
        );
        let value = serde_json::to_value(result).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "monthlyConsumption",
            "monthlyCost",
            "recommendedPanels",
            "panelProduction",
            "monthlySavings",
            "yearlySavings",
            "surplus",
            "breakEvenYears",
            "carbonOffset",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(object.len(), 9);
        assert_eq!(value["recommendedPanels"], 1);
    }

    #[test]
    fn test_bill_extraction_decoding() {
        let bill: BillExtraction =
            serde_json::from_str(r#"{"total_kwh": 320, "last_month_cost": 1450}"#).unwrap();
        assert_eq!(
            bill,
            BillExtraction {
                total_kwh: 320,
                last_month_cost: 1450
            }
        );

        assert!(serde_json::from_str::<BillExtraction>("320 kWh").is_err());
    }

    #[test]
    fn test_bill_extraction_missing_fields_default_to_zero() {
        let bill: BillExtraction = serde_json::from_str(r#"{"total_kwh": 850}"#).unwrap();
        assert_eq!(bill.total_kwh, 850);
        assert_eq!(bill.last_month_cost, 0);

        let empty: BillExtraction = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, BillExtraction::default());
    }
}
