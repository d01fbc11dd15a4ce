//! Verify request building and response normalization against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector describes inputs, the expected request, and where relevant a
//! simulated response with its expected outcome. JSON bodies are compared as
//! parsed values, so field ordering does not matter.

use autoupload_core::{
    AccessToken, ApiError, AutouploadClient, Credentials, HttpMethod, HttpRequest, HttpResponse,
    Hosts, Listing, OAuthClient,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn optional_id(value: &Value) -> Option<u32> {
    value.as_u64().map(|id| id as u32)
}

fn expected_status(expected_error: &Value) -> Option<u16> {
    expected_error["status"].as_u64().map(|s| s as u16)
}

fn assert_method_and_path(name: &str, req: &HttpRequest, expected: &Value) {
    let method = parse_method(expected["method"].as_str().unwrap());
    assert_eq!(req.method, method, "{name}: method");
    let url = format!("{BASE_URL}{}", expected["path"].as_str().unwrap());
    assert_eq!(req.url, url, "{name}: path");
}

// ---------------------------------------------------------------------------
// Auth host
// ---------------------------------------------------------------------------

#[test]
fn auth_test_vectors() {
    let raw = include_str!("../../test-vectors/auth.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let credentials: Credentials = serde_json::from_value(vectors["credentials"].clone()).unwrap();
    let c = OAuthClient::new(credentials, &Hosts::single(BASE_URL));

    for case in vectors["auth_url_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let url = c.auth_url(case["autoupload"].as_bool().unwrap(), case["state"].as_str());
        assert_eq!(url, format!("{BASE_URL}{}", case["expected"].as_str().unwrap()), "{name}: url");
    }

    for case in vectors["token_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_token(case["code"].as_str().unwrap()).unwrap();
        assert_method_and_path(name, &req, expected_req);

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert_eq!(req.body.as_deref(), expected_req["body"].as_str(), "{name}: body");

        // Verify parse
        let result = c.parse_get_token(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.status(), expected_status(expected_error), "{name}: status");
            assert_eq!(err.remote_body(), Some(&expected_error["body"]), "{name}: error body");
        } else {
            let token = result.unwrap();
            assert_eq!(Some(token.as_str()), case["expected_result"].as_str(), "{name}: token");
        }
    }
}

// ---------------------------------------------------------------------------
// App host
// ---------------------------------------------------------------------------

#[test]
fn autoupload_test_vectors() {
    let raw = include_str!("../../test-vectors/autoupload.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = AutouploadClient::new(&Hosts::single(BASE_URL));
    let token = AccessToken::new(vectors["access_token"].as_str().unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        let brand_id = optional_id(&case["brand_id"]);
        let model_id = optional_id(&case["model_id"]);
        let req = match case["operation"].as_str().unwrap() {
            "published" => c.build_published(&token),
            "basic_user_info" => c.build_basic_user_info(&token),
            "publish" => {
                let listings: Vec<Listing> =
                    serde_json::from_value(case["listings"].clone()).unwrap();
                c.build_publish(&token, &listings)
            }
            "delete" => {
                let ids: Vec<String> = serde_json::from_value(case["ids"].clone()).unwrap();
                c.build_delete(&token, ids.as_slice())
            }
            "import_status" => {
                c.build_import_status(&token, case["import_token"].as_str().unwrap())
            }
            "car_info" => c.build_car_info(&token, brand_id, model_id),
            "moto_info" => c.build_moto_info(&token, brand_id, model_id),
            "moto_cubiccms_info" => c.build_moto_cubiccms_info(&token),
            other => panic!("{name}: unknown operation {other}"),
        }
        .unwrap();

        assert_method_and_path(name, &req, expected_req);
        assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
        assert_eq!(req.headers.len(), 1, "{name}: no headers besides content type");

        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = AutouploadClient::new(&Hosts::single(BASE_URL));
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = c.parse(simulated(case));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error["kind"].as_str().unwrap() {
                "Remote" => {
                    assert!(err.has_remote_body(), "{name}: expected Remote, got {err:?}");
                    assert_eq!(err.status(), expected_status(expected_error), "{name}: status");
                    assert_eq!(err.remote_body(), Some(&expected_error["body"]), "{name}: body");
                }
                "Status" => {
                    let status = expected_error["status"].as_u64().unwrap() as u16;
                    assert!(
                        matches!(err, ApiError::Status { status: s } if s == status),
                        "{name}: expected Status, got {err:?}"
                    );
                }
                "Deserialization" => {
                    assert!(
                        matches!(err, ApiError::Deserialization(_)),
                        "{name}: expected Deserialization"
                    );
                }
                other => panic!("{name}: unknown expected_error kind: {other}"),
            }
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}
