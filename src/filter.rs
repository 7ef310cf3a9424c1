//! Market filter construction.
//!
//! [`MarketFilter`] is the selection criteria shared by every navigation and
//! catalogue call. It can only be produced by [`FilterBuilder::build`], which
//! validates each field once, so a filter held by the caller is always in a
//! shape the API accepts.

use crate::dto::common::MarketBettingType;
use crate::error::{BetfairError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Market start time window, serialized as `{"from": ..., "to": ...}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    text_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_type_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    competition_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    venues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bsp_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn_in_play_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_play_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_betting_types: Option<Vec<MarketBettingType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_type_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_start_time: Option<TimeRange>,
}

impl MarketFilter {
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    /// True when no criterion is set; the API then matches everything.
    pub fn is_empty(&self) -> bool {
        *self == MarketFilter::default()
    }

    pub fn event_type_ids(&self) -> Option<&[String]> {
        self.event_type_ids.as_deref()
    }

    pub fn market_ids(&self) -> Option<&[String]> {
        self.market_ids.as_deref()
    }

    pub fn market_start_time(&self) -> Option<&TimeRange> {
        self.market_start_time.as_ref()
    }
}

/// Collects raw filter criteria; nothing is checked until [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    text_query: Option<String>,
    event_type_ids: Option<Vec<String>>,
    event_ids: Option<Vec<String>>,
    competition_ids: Option<Vec<String>>,
    market_ids: Option<Vec<String>>,
    venues: Option<Vec<String>>,
    bsp_only: Option<bool>,
    turn_in_play_enabled: Option<bool>,
    in_play_only: Option<bool>,
    market_betting_types: Option<Vec<String>>,
    market_countries: Option<Vec<String>>,
    market_type_codes: Option<Vec<String>>,
    market_start_time: Option<(String, String)>,
}

fn collect<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl FilterBuilder {
    pub fn text_query(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    pub fn event_type_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_type_ids = Some(collect(ids));
        self
    }

    pub fn event_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_ids = Some(collect(ids));
        self
    }

    pub fn competition_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competition_ids = Some(collect(ids));
        self
    }

    pub fn market_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.market_ids = Some(collect(ids));
        self
    }

    pub fn venues<I, S>(mut self, venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.venues = Some(collect(venues));
        self
    }

    pub fn market_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.market_countries = Some(collect(countries));
        self
    }

    pub fn market_type_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.market_type_codes = Some(collect(codes));
        self
    }

    pub fn market_betting_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.market_betting_types = Some(collect(types));
        self
    }

    pub fn in_play_only(mut self, in_play_only: bool) -> Self {
        self.in_play_only = Some(in_play_only);
        self
    }

    pub fn turn_in_play_enabled(mut self, enabled: bool) -> Self {
        self.turn_in_play_enabled = Some(enabled);
        self
    }

    pub fn bsp_only(mut self, bsp_only: bool) -> Self {
        self.bsp_only = Some(bsp_only);
        self
    }

    /// Restricts markets to those starting inside `[from, to]`.
    ///
    /// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC)
    /// or bare dates (midnight UTC).
    pub fn market_start_time(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.market_start_time = Some((from.into(), to.into()));
        self
    }

    pub fn build(self) -> Result<MarketFilter> {
        let text_query = match self.text_query {
            Some(query) if query.trim().is_empty() => {
                return Err(BetfairError::validation("textQuery", "must not be blank"));
            }
            other => other,
        };

        let market_betting_types = self
            .market_betting_types
            .map(|types| {
                types
                    .iter()
                    .map(|t| {
                        t.trim().parse::<MarketBettingType>().map_err(|_| {
                            BetfairError::validation(
                                "marketBettingTypes",
                                format!("unknown betting type {t:?}"),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let market_start_time = self
            .market_start_time
            .map(|(from, to)| parse_range(&from, &to))
            .transpose()?;

        Ok(MarketFilter {
            text_query,
            event_type_ids: identifiers("eventTypeIds", self.event_type_ids)?,
            event_ids: identifiers("eventIds", self.event_ids)?,
            competition_ids: identifiers("competitionIds", self.competition_ids)?,
            market_ids: identifiers("marketIds", self.market_ids)?,
            venues: names("venues", self.venues)?,
            bsp_only: self.bsp_only,
            turn_in_play_enabled: self.turn_in_play_enabled,
            in_play_only: self.in_play_only,
            market_betting_types,
            market_countries: countries(self.market_countries)?,
            market_type_codes: names("marketTypeCodes", self.market_type_codes)?,
            market_start_time,
        })
    }
}

/// Betfair ids are numeric, market ids carry a `1.` exchange prefix.
pub(crate) fn identifiers(field: &str, ids: Option<Vec<String>>) -> Result<Option<Vec<String>>> {
    let Some(ids) = ids else { return Ok(None) };
    ids.into_iter()
        .map(|id| {
            let id = id.trim().to_string();
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit() || c == '.') {
                Err(BetfairError::validation(
                    field,
                    format!("{id:?} is not a valid identifier"),
                ))
            } else {
                Ok(id)
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn names(field: &str, values: Option<Vec<String>>) -> Result<Option<Vec<String>>> {
    let Some(values) = values else { return Ok(None) };
    values
        .into_iter()
        .map(|v| {
            let v = v.trim().to_string();
            if v.is_empty() {
                Err(BetfairError::validation(field, "entries must not be blank"))
            } else {
                Ok(v)
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn countries(codes: Option<Vec<String>>) -> Result<Option<Vec<String>>> {
    let Some(codes) = codes else { return Ok(None) };
    codes
        .into_iter()
        .map(|code| {
            let code = code.trim().to_ascii_uppercase();
            if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                Ok(code)
            } else {
                Err(BetfairError::validation(
                    "marketCountries",
                    format!("{code:?} is not a two-letter country code"),
                ))
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn parse_range(from: &str, to: &str) -> Result<TimeRange> {
    let from = parse_timestamp(from)?;
    let to = parse_timestamp(to)?;
    if from > to {
        return Err(BetfairError::validation(
            "marketStartTime",
            "`from` must not be after `to`",
        ));
    }
    Ok(TimeRange { from, to })
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
        .ok_or_else(|| {
            BetfairError::validation(
                "marketStartTime",
                format!("{value:?} is not an ISO-8601 timestamp"),
            )
        })
}
