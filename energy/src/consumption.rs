use serde::Serialize;

/// Sample consumption figure for one month, in kWh
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyConsumption {
    pub month: &'static str,
    pub consumption: f64,
}

const MONTHLY_CONSUMPTION: [MonthlyConsumption; 12] = [
    MonthlyConsumption { month: "January", consumption: 150.5 },
    MonthlyConsumption { month: "February", consumption: 160.2 },
    MonthlyConsumption { month: "March", consumption: 155.8 },
    MonthlyConsumption { month: "April", consumption: 145.3 },
    MonthlyConsumption { month: "May", consumption: 140.1 },
    MonthlyConsumption { month: "June", consumption: 135.9 },
    MonthlyConsumption { month: "July", consumption: 130.5 },
    MonthlyConsumption { month: "August", consumption: 138.7 },
    MonthlyConsumption { month: "September", consumption: 142.6 },
    MonthlyConsumption { month: "October", consumption: 148.9 },
    MonthlyConsumption { month: "November", consumption: 152.3 },
    MonthlyConsumption { month: "December", consumption: 158.0 },
];

/// Mock consumption data, optionally narrowed to one month.
///
/// `None` or an empty name returns all twelve months. A name that matches
/// no month (the match is case-sensitive) returns `None`.
pub fn monthly_consumption(month: Option<&str>) -> Option<Vec<MonthlyConsumption>> {
    match month.filter(|m| !m.is_empty()) {
        None => Some(MONTHLY_CONSUMPTION.to_vec()),
        Some(name) => MONTHLY_CONSUMPTION
            .iter()
            .find(|record| record.month == name)
            .map(|record| vec![record.clone()]),
    }
}
