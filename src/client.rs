use crate::auth::{self, Credentials, Session, SessionSummary};
use crate::config::{Config, Endpoints};
use crate::dto::common::{MarketSort, MatchProjection, OrderProjection, TimeGranularity};
use crate::dto::market::PriceProjection;
use crate::error::{BetfairError, Result};
use crate::filter::MarketFilter;
use crate::flatten::{flatten, FlattenOptions};
use crate::request::{build_request, normalize_market_projection, Extra, Method, RequestExtras};
use crate::table::Table;
use crate::transport::Transport;
use crate::validate;
use serde_json::Value;
use tracing::debug;

/// Options for `listMarketCatalogue`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueOptions {
    /// Projection names, any case. Unknown names are ignored.
    pub market_projection: Option<Vec<String>>,
    pub sort: Option<MarketSort>,
    /// Defaults to the API maximum of 1000.
    pub max_results: Option<u32>,
    pub keep_rules: bool,
}

/// Options for `listMarketBook`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketBookOptions {
    pub market_ids: Vec<String>,
    pub price_projection: Option<PriceProjection>,
    pub order_projection: Option<OrderProjection>,
    pub match_projection: Option<MatchProjection>,
}

/// Client for the Betfair betting API.
///
/// Holds at most one session, replaced by each [`login`](Self::login).
/// Every query needs a session and fails with an authentication error,
/// without touching the network, when none is held.
#[derive(Debug)]
pub struct BetfairClient {
    transport: Transport,
    locale: Option<String>,
    session: Option<Session>,
}

impl Default for BetfairClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BetfairClient {
    /// Create a client for the production endpoints, not yet logged in.
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            transport: Transport::new(endpoints),
            locale: None,
            session: None,
        }
    }

    /// Sends `locale` with every request that accepts one.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Build a client from configuration and log in with its credentials.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut client = Self::with_endpoints(config.endpoints.clone());
        client.locale = config.betfair.locale.clone();
        client
            .login(
                &config.betfair.username,
                &config.betfair.password,
                &config.betfair.api_key,
            )
            .await?;
        Ok(client)
    }

    /// Log in and replace the held session.
    ///
    /// The previous session is discarded before the attempt, so a failed
    /// login leaves the client logged out.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        app_key: &str,
    ) -> Result<SessionSummary> {
        self.session = None;
        let credentials = Credentials::new(username, password, app_key);
        let session = auth::login(&self.transport, &credentials).await?;
        let summary = session.summary();
        self.session = Some(session);
        Ok(summary)
    }

    pub fn session(&self) -> Option<SessionSummary> {
        self.session.as_ref().map(Session::summary)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    async fn call(
        &self,
        method: Method,
        filter: &MarketFilter,
        extras: &RequestExtras,
    ) -> Result<Value> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(BetfairError::not_logged_in)?;

        let mut extras = extras.clone();
        if extras.locale.is_none() && method.allowed_extras().contains(&Extra::Locale) {
            extras.locale = self.locale.clone();
        }

        let envelope = build_request(method, filter, &extras)?;
        let raw = self.transport.post(&envelope, session).await?;
        let checked = validate::check(raw, method)?;
        validate::result_of(checked, method)
    }

    /// Run any tabular method. The typed operations below all go through here.
    pub async fn query(
        &self,
        method: Method,
        filter: &MarketFilter,
        extras: &RequestExtras,
    ) -> Result<Table> {
        if method == Method::MarketBook {
            return Err(BetfairError::validation(
                "method",
                "listMarketBook results are not tabulated; use market_book",
            ));
        }
        let result = self.call(method, filter, extras).await?;

        let options = FlattenOptions {
            keep_rules: extras.keep_rules.unwrap_or(false),
            market_projection: extras
                .market_projection
                .as_deref()
                .map(normalize_market_projection)
                .unwrap_or_default(),
        };
        let table = flatten(&result, method, &options)?;
        debug!("{} returned {} rows", method.api_name(), table.len());
        Ok(table)
    }

    pub async fn competitions(&self, filter: &MarketFilter) -> Result<Table> {
        self.query(Method::Competitions, filter, &RequestExtras::default())
            .await
    }

    pub async fn countries(&self, filter: &MarketFilter) -> Result<Table> {
        self.query(Method::Countries, filter, &RequestExtras::default())
            .await
    }

    pub async fn events(&self, filter: &MarketFilter) -> Result<Table> {
        self.query(Method::Events, filter, &RequestExtras::default())
            .await
    }

    pub async fn event_types(&self, filter: &MarketFilter) -> Result<Table> {
        self.query(Method::EventTypes, filter, &RequestExtras::default())
            .await
    }

    pub async fn market_types(&self, filter: &MarketFilter) -> Result<Table> {
        self.query(Method::MarketTypes, filter, &RequestExtras::default())
            .await
    }

    pub async fn venues(&self, filter: &MarketFilter) -> Result<Table> {
        self.query(Method::Venues, filter, &RequestExtras::default())
            .await
    }

    /// Market counts bucketed by start time.
    pub async fn time_ranges(
        &self,
        filter: &MarketFilter,
        granularity: TimeGranularity,
    ) -> Result<Table> {
        let extras = RequestExtras {
            granularity: Some(granularity),
            ..Default::default()
        };
        self.query(Method::TimeRanges, filter, &extras).await
    }

    /// List market catalogue, one row per runner when runners are projected.
    pub async fn market_catalogue(
        &self,
        filter: &MarketFilter,
        options: &CatalogueOptions,
    ) -> Result<Table> {
        let extras = RequestExtras {
            market_projection: options.market_projection.clone(),
            sort: options.sort,
            max_results: options.max_results,
            keep_rules: Some(options.keep_rules),
            ..Default::default()
        };
        self.query(Method::MarketCatalogue, filter, &extras).await
    }

    /// List market book. Each market comes back as its decoded JSON record,
    /// untouched.
    pub async fn market_book(&self, options: &MarketBookOptions) -> Result<Vec<Value>> {
        let extras = RequestExtras {
            market_ids: Some(options.market_ids.clone()),
            price_projection: options.price_projection.clone(),
            order_projection: options.order_projection,
            match_projection: options.match_projection,
            ..Default::default()
        };
        let method = Method::MarketBook;
        match self.call(method, &MarketFilter::default(), &extras).await? {
            Value::Array(records) => {
                debug!("{} returned {} markets", method.api_name(), records.len());
                Ok(records)
            }
            _ => Err(BetfairError::parse(method.api_name(), None, "result")),
        }
    }
}
