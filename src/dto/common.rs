use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketProjection {
    Competition,
    Event,
    #[serde(rename = "EVENT_TYPE")]
    EventType,
    #[serde(rename = "MARKET_START_TIME")]
    MarketStartTime,
    #[serde(rename = "MARKET_DESCRIPTION")]
    MarketDescription,
    #[serde(rename = "RUNNER_DESCRIPTION")]
    RunnerDescription,
    #[serde(rename = "RUNNER_METADATA")]
    RunnerMetadata,
}

impl MarketProjection {
    pub const ALL: [MarketProjection; 7] = [
        MarketProjection::Competition,
        MarketProjection::Event,
        MarketProjection::EventType,
        MarketProjection::MarketStartTime,
        MarketProjection::MarketDescription,
        MarketProjection::RunnerDescription,
        MarketProjection::RunnerMetadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketProjection::Competition => "COMPETITION",
            MarketProjection::Event => "EVENT",
            MarketProjection::EventType => "EVENT_TYPE",
            MarketProjection::MarketStartTime => "MARKET_START_TIME",
            MarketProjection::MarketDescription => "MARKET_DESCRIPTION",
            MarketProjection::RunnerDescription => "RUNNER_DESCRIPTION",
            MarketProjection::RunnerMetadata => "RUNNER_METADATA",
        }
    }
}

impl fmt::Display for MarketProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketProjection {
    type Err = ();

    /// Exact match against the wire names; callers normalise case first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketProjection::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketSort {
    #[serde(rename = "MINIMUM_TRADED")]
    MinimumTraded,
    #[serde(rename = "MAXIMUM_TRADED")]
    MaximumTraded,
    #[serde(rename = "MINIMUM_AVAILABLE")]
    MinimumAvailable,
    #[serde(rename = "MAXIMUM_AVAILABLE")]
    MaximumAvailable,
    #[serde(rename = "FIRST_TO_START")]
    FirstToStart,
    #[serde(rename = "LAST_TO_START")]
    LastToStart,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketBettingType {
    Odds,
    Line,
    Range,
    #[serde(rename = "ASIAN_HANDICAP_DOUBLE_LINE")]
    AsianHandicapDoubleLine,
    #[serde(rename = "ASIAN_HANDICAP_SINGLE_LINE")]
    AsianHandicapSingleLine,
    #[serde(rename = "FIXED_ODDS")]
    FixedOdds,
}

impl FromStr for MarketBettingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ODDS" => Ok(MarketBettingType::Odds),
            "LINE" => Ok(MarketBettingType::Line),
            "RANGE" => Ok(MarketBettingType::Range),
            "ASIAN_HANDICAP_DOUBLE_LINE" => Ok(MarketBettingType::AsianHandicapDoubleLine),
            "ASIAN_HANDICAP_SINGLE_LINE" => Ok(MarketBettingType::AsianHandicapSingleLine),
            "FIXED_ODDS" => Ok(MarketBettingType::FixedOdds),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceData {
    #[serde(rename = "SP_AVAILABLE")]
    SpAvailable,
    #[serde(rename = "SP_TRADED")]
    SpTraded,
    #[serde(rename = "EX_BEST_OFFERS")]
    ExBestOffers,
    #[serde(rename = "EX_ALL_OFFERS")]
    ExAllOffers,
    #[serde(rename = "EX_TRADED")]
    ExTraded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderProjection {
    All,
    Executable,
    #[serde(rename = "EXECUTION_COMPLETE")]
    ExecutionComplete,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchProjection {
    #[serde(rename = "NO_ROLLUP")]
    NoRollup,
    #[serde(rename = "ROLLED_UP_BY_PRICE")]
    RolledUpByPrice,
    #[serde(rename = "ROLLED_UP_BY_AVG_PRICE")]
    RolledUpByAvgPrice,
}

/// Bucket size for `listTimeRanges`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeGranularity {
    #[default]
    Days,
    Hours,
    Minutes,
}
