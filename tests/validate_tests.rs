use betfair_tables::validate::{check, result_of};
use betfair_tables::{BetfairError, ErrorKind, Method};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_success_passes_through() {
    let raw = json!({"jsonrpc": "2.0", "result": [{"venue": "Ascot", "marketCount": 3}], "id": 1});
    let checked = check(raw.clone(), Method::Venues).unwrap();
    assert_eq!(checked, raw);
    assert_eq!(
        result_of(checked, Method::Venues).unwrap(),
        json!([{"venue": "Ascot", "marketCount": 3}])
    );
}

#[test]
fn test_invalid_session_information() {
    let raw = json!({
        "jsonrpc": "2.0",
        "error": {
            "code": -32099,
            "message": "ANGX-0003",
            "data": {
                "APINGException": {
                    "requestUUID": "prdang001-04141148-00001a9ef7",
                    "errorCode": "INVALID_SESSION_INFORMATION",
                    "errorDetails": "The session token hasn't been provided, is invalid or has expired."
                },
                "exceptionname": "APINGException"
            }
        },
        "id": 1
    });

    let err = check(raw, Method::Competitions).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    match err {
        BetfairError::Api { method, code, description } => {
            assert_eq!(method, "listCompetitions");
            assert_eq!(code, "INVALID_SESSION_INFORMATION");
            assert!(description.contains("session token"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn test_exception_without_details_falls_back_to_message() {
    let raw = json!({
        "error": {
            "code": -32099,
            "message": "ANGX-0006",
            "data": {"APINGException": {"errorCode": "TOO_MUCH_DATA"}, "exceptionname": "APINGException"}
        }
    });

    let err = check(raw, Method::MarketCatalogue).unwrap_err();
    assert_eq!(
        err.to_string(),
        "listMarketCatalogue returned TOO_MUCH_DATA: ANGX-0006"
    );
}

#[test]
fn test_string_code() {
    let raw = json!({"error": {"code": "DSC-0018", "message": "MandatoryNotDefined"}});
    let err = check(raw, Method::Events).unwrap_err();
    assert_eq!(
        err.to_string(),
        "listEvents returned DSC-0018: MandatoryNotDefined"
    );
}

#[test]
fn test_unstructured_error_is_still_an_api_error() {
    let raw = json!({"error": "something broke"});
    match check(raw, Method::Countries).unwrap_err() {
        BetfairError::Api { code, description, .. } => {
            assert_eq!(code, "UNKNOWN");
            assert_eq!(description, "\"something broke\"");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn test_missing_result_is_a_parse_error() {
    let raw = json!({"jsonrpc": "2.0", "id": 1});
    let err = result_of(check(raw, Method::Events).unwrap(), Method::Events).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("`result`"));
}
