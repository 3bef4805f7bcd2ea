//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, simulated responses, and the expected
//! mapped result or error. Expected results are deserialized into the domain
//! types and compared structurally.

use chrono::NaiveDate;
use dining_core::{DiningError, DiningInfo, HttpResponse, MenuClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> MenuClient {
    MenuClient::new(BASE_URL).unwrap()
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_error(name: &str, err: DiningError, expected: &str) {
    let matched = match expected {
        "HttpStatus" => matches!(err, DiningError::HttpStatus { .. }),
        "Parse" => matches!(err, DiningError::Parse(_)),
        "UnknownLocation" => matches!(err, DiningError::UnknownLocation(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[test]
fn locations_test_vectors() {
    let raw = include_str!("../../test-vectors/locations.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    let req = c.build_locations();
    assert_eq!(req.url, format!("{BASE_URL}/locations"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = c.parse_locations(simulated(case));

        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let registry = result.unwrap();
            let expected: Vec<String> =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            let names: Vec<String> = registry.iter().map(str::to_string).collect();
            assert_eq!(names, expected, "{name}: registry");
        }
    }
}

// ---------------------------------------------------------------------------
// Day
// ---------------------------------------------------------------------------

#[test]
fn day_test_vectors() {
    let raw = include_str!("../../test-vectors/day.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let location = case["location"].as_str().unwrap();
        let date: NaiveDate = case["date"].as_str().unwrap().parse().unwrap();

        // Verify build
        let req = c.build_day(location, date);
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", case["expected_request"]["path"].as_str().unwrap()),
            "{name}: url"
        );

        // Verify parse
        let result = c.parse_day(simulated(case), location, date);
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let info = result.unwrap();
            let expected: DiningInfo =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(info, expected, "{name}: parsed result");
        }
    }
}
