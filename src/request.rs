//! JSON-RPC request construction.
//!
//! [`Method`] is the dispatch table for every supported call: it knows the
//! API operation name and which extra parameters the call accepts.
//! [`build_request`] turns a filter and extras into the exact envelope the
//! betting endpoint expects.

use crate::dto::common::{
    MarketProjection, MarketSort, MatchProjection, OrderProjection, TimeGranularity,
};
use crate::dto::market::PriceProjection;
use crate::dto::rpc::JsonRpcRequest;
use crate::error::{BetfairError, Result};
use crate::filter::{identifiers, MarketFilter};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const SPORTS_API: &str = "SportsAPING/v1.0";

/// Upper bound the API enforces on `maxResults` for market catalogues.
pub const MAX_CATALOGUE_RESULTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Competitions,
    Countries,
    Events,
    EventTypes,
    MarketCatalogue,
    MarketBook,
    MarketTypes,
    Venues,
    TimeRanges,
}

/// An extra parameter a method may accept beyond the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extra {
    MarketProjection,
    Sort,
    MaxResults,
    KeepRules,
    MarketIds,
    PriceProjection,
    OrderProjection,
    MatchProjection,
    Granularity,
    Locale,
}

impl Extra {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Extra::MarketProjection => "marketProjection",
            Extra::Sort => "sort",
            Extra::MaxResults => "maxResults",
            Extra::KeepRules => "keepRules",
            Extra::MarketIds => "marketIds",
            Extra::PriceProjection => "priceProjection",
            Extra::OrderProjection => "orderProjection",
            Extra::MatchProjection => "matchProjection",
            Extra::Granularity => "granularity",
            Extra::Locale => "locale",
        }
    }
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Competitions,
        Method::Countries,
        Method::Events,
        Method::EventTypes,
        Method::MarketCatalogue,
        Method::MarketBook,
        Method::MarketTypes,
        Method::Venues,
        Method::TimeRanges,
    ];

    /// Short name used by callers, e.g. `marketCatalogue`.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Competitions => "competitions",
            Method::Countries => "countries",
            Method::Events => "events",
            Method::EventTypes => "eventTypes",
            Method::MarketCatalogue => "marketCatalogue",
            Method::MarketBook => "marketBook",
            Method::MarketTypes => "marketTypes",
            Method::Venues => "venues",
            Method::TimeRanges => "timeRanges",
        }
    }

    /// Operation name on the betting API, e.g. `listMarketCatalogue`.
    pub fn api_name(&self) -> &'static str {
        match self {
            Method::Competitions => "listCompetitions",
            Method::Countries => "listCountries",
            Method::Events => "listEvents",
            Method::EventTypes => "listEventTypes",
            Method::MarketCatalogue => "listMarketCatalogue",
            Method::MarketBook => "listMarketBook",
            Method::MarketTypes => "listMarketTypes",
            Method::Venues => "listVenues",
            Method::TimeRanges => "listTimeRanges",
        }
    }

    pub fn operation(&self) -> String {
        format!("{SPORTS_API}/{}", self.api_name())
    }

    pub fn accepts_filter(&self) -> bool {
        !matches!(self, Method::MarketBook)
    }

    pub fn allowed_extras(&self) -> &'static [Extra] {
        match self {
            Method::MarketCatalogue => &[
                Extra::MarketProjection,
                Extra::Sort,
                Extra::MaxResults,
                Extra::KeepRules,
                Extra::Locale,
            ],
            Method::MarketBook => &[
                Extra::MarketIds,
                Extra::PriceProjection,
                Extra::OrderProjection,
                Extra::MatchProjection,
                Extra::Locale,
            ],
            Method::TimeRanges => &[Extra::Granularity],
            Method::Competitions
            | Method::Countries
            | Method::Events
            | Method::EventTypes
            | Method::MarketTypes
            | Method::Venues => &[Extra::Locale],
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = BetfairError;

    /// Accepts either the short name (`eventTypes`) or the API name
    /// (`listEventTypes`).
    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s || m.api_name() == s)
            .ok_or_else(|| BetfairError::validation("method", format!("unsupported method {s:?}")))
    }
}

/// Method-specific parameters beyond the filter.
///
/// Only the extras listed by [`Method::allowed_extras`] may be set for a
/// given method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestExtras {
    /// Raw projection names; case-normalised and filtered on build.
    pub market_projection: Option<Vec<String>>,
    pub sort: Option<MarketSort>,
    pub max_results: Option<u32>,
    /// Keep the betting rules text when flattening catalogues. Never sent.
    pub keep_rules: Option<bool>,
    pub market_ids: Option<Vec<String>>,
    pub price_projection: Option<PriceProjection>,
    pub order_projection: Option<OrderProjection>,
    pub match_projection: Option<MatchProjection>,
    pub granularity: Option<TimeGranularity>,
    pub locale: Option<String>,
}

impl RequestExtras {
    fn supplied(&self) -> Vec<Extra> {
        let flags = [
            (self.market_projection.is_some(), Extra::MarketProjection),
            (self.sort.is_some(), Extra::Sort),
            (self.max_results.is_some(), Extra::MaxResults),
            (self.keep_rules.is_some(), Extra::KeepRules),
            (self.market_ids.is_some(), Extra::MarketIds),
            (self.price_projection.is_some(), Extra::PriceProjection),
            (self.order_projection.is_some(), Extra::OrderProjection),
            (self.match_projection.is_some(), Extra::MatchProjection),
            (self.granularity.is_some(), Extra::Granularity),
            (self.locale.is_some(), Extra::Locale),
        ];
        flags
            .into_iter()
            .filter_map(|(set, extra)| set.then_some(extra))
            .collect()
    }
}

/// The `params` object of a betting API request.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<MarketFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_projection: Option<Vec<MarketProjection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<MarketSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_projection: Option<PriceProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_projection: Option<OrderProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_projection: Option<MatchProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<TimeGranularity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

pub type Envelope = JsonRpcRequest<RequestParams>;

/// Upper-cases each value and keeps those naming a known projection.
///
/// Unknown values are dropped without error. Input order is kept and
/// repeats collapse to their first occurrence.
pub fn normalize_market_projection<S: AsRef<str>>(values: &[S]) -> Vec<MarketProjection> {
    let mut projections: Vec<MarketProjection> = Vec::with_capacity(values.len());
    for value in values {
        if let Ok(projection) = value.as_ref().trim().to_ascii_uppercase().parse::<MarketProjection>() {
            if !projections.contains(&projection) {
                projections.push(projection);
            }
        }
    }
    projections
}

pub fn build_request(
    method: Method,
    filter: &MarketFilter,
    extras: &RequestExtras,
) -> Result<Envelope> {
    let allowed = method.allowed_extras();
    if let Some(extra) = extras.supplied().into_iter().find(|e| !allowed.contains(e)) {
        return Err(BetfairError::validation(
            extra.wire_name(),
            format!("not accepted by {}", method.api_name()),
        ));
    }

    let mut params = RequestParams {
        locale: extras.locale.clone(),
        ..Default::default()
    };

    if method.accepts_filter() {
        params.filter = Some(filter.clone());
    } else if !filter.is_empty() {
        return Err(BetfairError::validation(
            "filter",
            format!("{} selects markets by marketIds only", method.api_name()),
        ));
    }

    match method {
        Method::MarketBook => {
            let market_ids = identifiers("marketIds", extras.market_ids.clone())?
                .filter(|ids| !ids.is_empty())
                .ok_or_else(|| {
                    BetfairError::validation("marketIds", "at least one market id is required")
                })?;
            params.market_ids = Some(market_ids);
            params.price_projection = extras.price_projection.clone();
            params.order_projection = extras.order_projection;
            params.match_projection = extras.match_projection;
        }
        Method::MarketCatalogue => {
            let max_results = extras.max_results.unwrap_or(MAX_CATALOGUE_RESULTS);
            if !(1..=MAX_CATALOGUE_RESULTS).contains(&max_results) {
                return Err(BetfairError::validation(
                    "maxResults",
                    format!("must be between 1 and {MAX_CATALOGUE_RESULTS}"),
                ));
            }
            params.market_projection = extras
                .market_projection
                .as_deref()
                .map(normalize_market_projection);
            params.sort = extras.sort;
            params.max_results = Some(max_results);
        }
        Method::TimeRanges => {
            params.granularity = Some(extras.granularity.unwrap_or_default());
        }
        Method::Competitions
        | Method::Countries
        | Method::Events
        | Method::EventTypes
        | Method::MarketTypes
        | Method::Venues => {}
    }

    Ok(JsonRpcRequest::new(method.operation(), params))
}
