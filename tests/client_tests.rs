use betfair_tables::dto::{PriceData, PriceProjection, TimeGranularity};
use betfair_tables::{
    BetfairClient, BetfairError, CatalogueOptions, Endpoints, ErrorKind, MarketBookOptions,
    MarketFilter, Method, RequestExtras,
};
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;

const LOGIN_PATH: &str = "/api/login";
const BETTING_PATH: &str = "/exchange/betting/json-rpc/v1";
const TOKEN: &str = "token-123";
const APP_KEY: &str = "app-key";

fn endpoints(server: &ServerGuard) -> Endpoints {
    Endpoints {
        login_url: format!("{}{LOGIN_PATH}", server.url()),
        betting_url: format!("{}{BETTING_PATH}", server.url()),
    }
}

fn login_form(username: &str, password: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("username".into(), username.into()),
        Matcher::UrlEncoded("password".into(), password.into()),
    ])
}

fn login_ok() -> String {
    json!({"token": TOKEN, "product": APP_KEY, "status": "SUCCESS", "error": ""}).to_string()
}

async fn logged_in_client(server: &mut ServerGuard) -> BetfairClient {
    let _login = server
        .mock("POST", LOGIN_PATH)
        .match_body(login_form("user", "pass"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(login_ok())
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(server));
    client.login("user", "pass", APP_KEY).await.unwrap();
    client
}

fn soccer() -> MarketFilter {
    MarketFilter::builder().event_type_ids(["1"]).build().unwrap()
}

#[tokio::test]
async fn test_login_success() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", LOGIN_PATH)
        .match_header("x-application", APP_KEY)
        .match_header("accept", "application/json")
        .match_body(login_form("user", "pass"))
        .with_status(200)
        .with_body(login_ok())
        .expect(1)
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(&server));
    assert!(!client.is_logged_in());

    let before = chrono::Utc::now();
    let summary = client.login("user", "pass", APP_KEY).await.unwrap();

    login.assert_async().await;
    assert_eq!(summary.token, TOKEN);
    assert_eq!(summary.status, "SUCCESS");
    assert_eq!(summary.product.as_deref(), Some(APP_KEY));
    assert!(summary.created_at >= before);
    assert_eq!(client.session(), Some(summary));
}

#[tokio::test]
async fn test_login_rejected_by_http_status() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(&server));
    let err = client.login("user", "bad", APP_KEY).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    match err {
        BetfairError::Auth { status, detail } => {
            assert_eq!(status, Some(401));
            assert_eq!(detail, "Unauthorized");
        }
        other => panic!("expected auth error, got {other:?}"),
    }
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_login_rejected_by_status_field() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body(
            json!({"token": "", "product": APP_KEY, "status": "FAIL", "error": "INVALID_USERNAME_OR_PASSWORD"})
                .to_string(),
        )
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(&server));
    let err = client.login("user", "bad", APP_KEY).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "authentication failed (HTTP 200): INVALID_USERNAME_OR_PASSWORD"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_login_with_malformed_body() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(&server));
    let err = client.login("user", "pass", APP_KEY).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_string().contains("malformed login response"));
}

#[tokio::test]
async fn test_login_with_empty_credentials_sends_nothing() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", LOGIN_PATH)
        .expect(0)
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(&server));
    let err = client.login("user", "", APP_KEY).await.unwrap_err();

    login.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "invalid password: must not be empty");
}

#[tokio::test]
async fn test_login_against_unreachable_endpoint() {
    let mut client = BetfairClient::with_endpoints(Endpoints {
        login_url: "http://127.0.0.1:1/api/login".to_string(),
        ..Default::default()
    });
    let err = client.login("user", "pass", APP_KEY).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_failed_relogin_clears_session() {
    let mut server = Server::new_async().await;
    let mut client = logged_in_client(&mut server).await;
    assert!(client.is_logged_in());

    let _rejected = server
        .mock("POST", LOGIN_PATH)
        .match_body(login_form("user", "wrong"))
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;
    let betting = server
        .mock("POST", BETTING_PATH)
        .expect(0)
        .create_async()
        .await;

    assert!(client.login("user", "wrong", APP_KEY).await.is_err());
    assert!(client.session().is_none());

    let err = client.competitions(&soccer()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    betting.assert_async().await;
}

#[tokio::test]
async fn test_query_without_session_never_reaches_network() {
    let mut server = Server::new_async().await;
    let betting = server
        .mock("POST", BETTING_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = BetfairClient::with_endpoints(endpoints(&server));
    let err = client.event_types(&MarketFilter::default()).await.unwrap_err();

    betting.assert_async().await;
    assert_eq!(err.to_string(), "authentication failed: not logged in");
}

#[tokio::test]
async fn test_competitions() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let betting = server
        .mock("POST", BETTING_PATH)
        .match_header("x-authentication", TOKEN)
        .match_header("x-application", APP_KEY)
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "method": "SportsAPING/v1.0/listCompetitions",
            "params": {"filter": {"eventTypeIds": ["1"]}},
            "id": 1
        })))
        .with_status(200)
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "result": [
                    {"competition": {"id": "10", "name": "Premier League"}, "marketCount": 120, "competitionRegion": "GBR"},
                    {"competition": {"id": "11", "name": "Serie A"}, "marketCount": 80, "competitionRegion": "ITA"}
                ],
                "id": 1
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let table = client.competitions(&soccer()).await.unwrap();

    betting.assert_async().await;
    assert_eq!(
        table.columns(),
        ["id", "name", "marketCount", "competitionRegion"]
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(1, "name"), Some(&json!("Serie A")));
}

#[tokio::test]
async fn test_client_locale_is_sent() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body(login_ok())
        .create_async()
        .await;
    let betting = server
        .mock("POST", BETTING_PATH)
        .match_body(Matcher::PartialJson(json!({"params": {"locale": "it"}})))
        .with_status(200)
        .with_body(json!({"jsonrpc": "2.0", "result": [], "id": 1}).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut client = BetfairClient::with_endpoints(endpoints(&server)).with_locale("it");
    client.login("user", "pass", APP_KEY).await.unwrap();
    let table = client.countries(&MarketFilter::default()).await.unwrap();

    betting.assert_async().await;
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_time_ranges_send_granularity() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .match_body(Matcher::PartialJson(json!({
            "method": "SportsAPING/v1.0/listTimeRanges",
            "params": {"granularity": "HOURS"}
        })))
        .with_status(200)
        .with_body(
            json!({"result": [{"timeRange": {"from": "2024-03-01T10:00:00.000Z", "to": "2024-03-01T11:00:00.000Z"}, "marketCount": 4}]})
                .to_string(),
        )
        .create_async()
        .await;

    let table = client
        .time_ranges(&soccer(), TimeGranularity::Hours)
        .await
        .unwrap();
    assert_eq!(table.columns(), ["from", "to", "marketCount"]);
}

#[tokio::test]
async fn test_api_error_envelope() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .with_status(200)
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "error": {
                    "code": -32099,
                    "message": "ANGX-0003",
                    "data": {
                        "APINGException": {"errorCode": "INVALID_SESSION_INFORMATION", "errorDetails": "expired"},
                        "exceptionname": "APINGException"
                    }
                },
                "id": 1
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client.events(&soccer()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(
        err.to_string(),
        "listEvents returned INVALID_SESSION_INFORMATION: expired"
    );
}

#[tokio::test]
async fn test_error_body_on_non_2xx_is_an_api_error() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .with_status(400)
        .with_body(json!({"error": {"code": -32602, "message": "DSC-0018"}}).to_string())
        .create_async()
        .await;

    let err = client.venues(&soccer()).await.unwrap_err();
    match err {
        BetfairError::Api { method, code, .. } => {
            assert_eq!(method, "listVenues");
            assert_eq!(code, "-32602");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_a_network_error() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let err = client.market_types(&soccer()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    match err {
        BetfairError::Network { status, detail } => {
            assert_eq!(status, Some(503));
            assert_eq!(detail, "Service Unavailable");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_network_error() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client.countries(&soccer()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("not valid JSON"));
}

#[tokio::test]
async fn test_market_catalogue() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let betting = server
        .mock("POST", BETTING_PATH)
        .match_body(Matcher::PartialJson(json!({
            "method": "SportsAPING/v1.0/listMarketCatalogue",
            "params": {
                "filter": {"eventTypeIds": ["1"]},
                "marketProjection": ["MARKET_DESCRIPTION", "RUNNER_DESCRIPTION"],
                "maxResults": 5
            }
        })))
        .with_status(200)
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "result": [{
                    "marketId": "1.2",
                    "marketName": "Match Odds",
                    "totalMatched": 10.0,
                    "description": {"bettingType": "ODDS", "rules": "rules text"},
                    "runners": [
                        {"selectionId": 11, "runnerName": "Home"},
                        {"selectionId": 12, "runnerName": "Away"},
                        {"selectionId": 13, "runnerName": "The Draw"}
                    ]
                }],
                "id": 1
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let options = CatalogueOptions {
        market_projection: Some(vec![
            "market_description".to_string(),
            "runner_description".to_string(),
        ]),
        max_results: Some(5),
        ..Default::default()
    };
    let table = client.market_catalogue(&soccer(), &options).await.unwrap();

    betting.assert_async().await;
    assert_eq!(table.len(), 3);
    assert!(!table.has_column("rules"));
    assert_eq!(
        table.column("runnerName").unwrap(),
        [&json!("Home"), &json!("Away"), &json!("The Draw")]
    );
    assert_eq!(table.get(2, "bettingType"), Some(&json!("ODDS")));
}

#[tokio::test]
async fn test_keep_rules_is_not_sent() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .match_body(Matcher::PartialJson(json!({
            "params": {"marketProjection": ["MARKET_DESCRIPTION"], "maxResults": 1000}
        })))
        .with_status(200)
        .with_body(
            json!({"result": [{"marketId": "1.2", "marketName": "Match Odds",
                               "description": {"bettingType": "ODDS", "rules": "rules text"}}]})
            .to_string(),
        )
        .create_async()
        .await;

    let options = CatalogueOptions {
        market_projection: Some(vec!["MARKET_DESCRIPTION".to_string()]),
        keep_rules: true,
        ..Default::default()
    };
    let table = client.market_catalogue(&soccer(), &options).await.unwrap();
    assert_eq!(table.get(0, "rules"), Some(&json!("rules text")));
}

#[tokio::test]
async fn test_invalid_catalogue_options_fail_before_sending() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;
    let betting = server
        .mock("POST", BETTING_PATH)
        .expect(0)
        .create_async()
        .await;

    let options = CatalogueOptions {
        max_results: Some(5000),
        ..Default::default()
    };
    let err = client.market_catalogue(&soccer(), &options).await.unwrap_err();

    betting.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_query_rejects_market_book() {
    let server = Server::new_async().await;
    let client = BetfairClient::with_endpoints(endpoints(&server));
    let extras = RequestExtras {
        market_ids: Some(vec!["1.2".to_string()]),
        ..Default::default()
    };
    let err = client
        .query(Method::MarketBook, &MarketFilter::default(), &extras)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_market_book_returns_records_untouched() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let record = json!({
        "marketId": "1.2",
        "isMarketDataDelayed": false,
        "status": "OPEN",
        "inplay": false,
        "totalMatched": 1520.25,
        "priceLadderDefinition": {"type": "CLASSIC"},
        "runners": [{
            "selectionId": 11,
            "handicap": 0.0,
            "status": "ACTIVE",
            "lastPriceTraded": 2.5,
            "newField": 42,
            "ex": {
                "availableToBack": [{"price": 2.48, "size": 100.0}],
                "availableToLay": [{"price": 2.52, "size": 80.0}],
                "tradedVolume": []
            }
        }]
    });

    let betting = server
        .mock("POST", BETTING_PATH)
        .match_body(Matcher::PartialJson(json!({
            "method": "SportsAPING/v1.0/listMarketBook",
            "params": {"marketIds": ["1.2"], "priceProjection": {"priceData": ["EX_BEST_OFFERS"]}}
        })))
        .with_status(200)
        .with_body(json!({"jsonrpc": "2.0", "result": [record.clone()], "id": 1}).to_string())
        .expect(1)
        .create_async()
        .await;

    let options = MarketBookOptions {
        market_ids: vec!["1.2".to_string()],
        price_projection: Some(PriceProjection {
            price_data: Some(vec![PriceData::ExBestOffers]),
            ..Default::default()
        }),
        ..Default::default()
    };
    let books = client.market_book(&options).await.unwrap();

    betting.assert_async().await;
    assert_eq!(books, vec![record]);
    assert_eq!(books[0]["priceLadderDefinition"]["type"], json!("CLASSIC"));
    assert_eq!(books[0]["runners"][0]["newField"], json!(42));
}

#[tokio::test]
async fn test_market_book_with_non_array_result() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;

    let _betting = server
        .mock("POST", BETTING_PATH)
        .with_status(200)
        .with_body(json!({"result": {"marketId": "1.2"}}).to_string())
        .create_async()
        .await;

    let options = MarketBookOptions {
        market_ids: vec!["1.2".to_string()],
        ..Default::default()
    };
    let err = client.market_book(&options).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("`result`"));
}

#[tokio::test]
async fn test_market_book_requires_market_ids() {
    let mut server = Server::new_async().await;
    let client = logged_in_client(&mut server).await;
    let betting = server
        .mock("POST", BETTING_PATH)
        .expect(0)
        .create_async()
        .await;

    let err = client
        .market_book(&MarketBookOptions::default())
        .await
        .unwrap_err();

    betting.assert_async().await;
    assert!(err.to_string().starts_with("invalid marketIds"));
}
