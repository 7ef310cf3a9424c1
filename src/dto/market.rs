use super::common::PriceData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceProjection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_data: Option<Vec<PriceData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_best_offers_overrides: Option<ExBestOffersOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtualise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollover_stakes: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExBestOffersOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_prices_depth: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup_liability_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup_liability_factor: Option<i32>,
}
