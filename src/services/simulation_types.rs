use serde::Serialize;

/// Operator-tunable macroeconomic inputs of a cost forecast.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    pub inflation_annual_percent: f64,
    /// Share of monthly spend exposed to the exchange rate.
    pub import_exposure_percent: f64,
    /// Local currency units per USD.
    pub fx_forward_rate: f64,
    pub contingency_percent: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            inflation_annual_percent: 6.0,
            import_exposure_percent: 20.0,
            fx_forward_rate: 4150.0,
            contingency_percent: 10.0,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CostPercentiles {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BinBand {
    BelowP10,
    Middle,
    AboveP90,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub bin_start: f64,
    pub count: usize,
    pub band: BinBand,
}

#[derive(Serialize, Debug, Clone)]
pub struct ForecastReport {
    pub data_source: String,
    pub as_of: String,
    pub iterations: usize,
    pub horizon_months: u32,
    pub actual_cost: f64,
    pub base_monthly_burn: f64,
    pub risk_volatility: f64,
    pub fx_impact: f64,
    pub params: ForecastParams,
    pub percentiles: CostPercentiles,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub histogram: Vec<HistogramBin>,
}

/// A finished run: the report plus the sorted samples it was derived from.
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub report: ForecastReport,
    pub samples: Vec<f64>,
}
