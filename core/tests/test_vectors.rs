//! Verify the pipeline stages against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs and expected outputs for one stage.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use routecall_core::split::Directives;
use routecall_core::{
    fill_path_checked, split, HttpMethod, Payload, RequestBuilder, RouteError, RouteTable,
    SplitMode, UrlRef,
};
use serde_json::{Map, Value};

fn directives_json(directives: &Directives) -> Value {
    let mut map = Map::new();
    if let Some(vars) = &directives.vars {
        map.insert("vars".to_string(), vars.clone());
    }
    if let Some(routes) = &directives.routes {
        map.insert("routes".to_string(), routes.clone());
    }
    if let Some(flag) = &directives.add_route_method {
        map.insert("addRouteMethod".to_string(), flag.clone());
    }
    Value::Object(map)
}

fn parse_mode(s: &str) -> SplitMode {
    match s {
        "payload" => SplitMode::Payload,
        "config" => SplitMode::Config,
        other => panic!("unknown mode: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

#[test]
fn split_test_vectors() {
    let raw = include_str!("../../test-vectors/split.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mode = parse_mode(case["mode"].as_str().unwrap());
        let expected = &case["expected"];

        let result = split(case["input"].clone().into(), mode);
        assert_eq!(directives_json(&result.directives), expected["directives"], "{name}: directives");
        assert_eq!(Value::Object(result.options), expected["options"], "{name}: options");
        let payload = serde_json::to_value(&result.payload).unwrap();
        assert_eq!(payload, expected["payload"], "{name}: payload");
    }
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

#[test]
fn fill_test_vectors() {
    let raw = include_str!("../../test-vectors/fill.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let template = case["template"].as_str().unwrap();
        let vars = case["vars"].as_object().cloned().unwrap();

        let filled = fill_path_checked(template, &vars);
        assert_eq!(filled.path, case["expected_path"].as_str().unwrap(), "{name}: path");

        let expected_unresolved: Vec<String> =
            serde_json::from_value(case["expected_unresolved"].clone()).unwrap();
        assert_eq!(filled.unresolved, expected_unresolved, "{name}: unresolved");
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let routes = RouteTable::from_value(vectors["routes"].clone()).unwrap();
    let builder = RequestBuilder::new(&routes);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method: HttpMethod = case["method"].as_str().unwrap().parse().unwrap();
        let url = UrlRef::from_value(case["url"].clone()).unwrap();

        let result = builder.build(
            method,
            &url,
            case["payload"].clone().into(),
            case["config"].clone().into(),
        );

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "UnknownRoute" => assert!(matches!(err, RouteError::UnknownRoute { .. }), "{name}: expected UnknownRoute"),
                "InvalidRoute" => assert!(matches!(err, RouteError::InvalidRoute { .. }), "{name}: expected InvalidRoute"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let req = result.unwrap();
            assert!(matches!(req.data, Payload::Fields(_)), "{name}: data should be fields");
            let actual = serde_json::to_value(&req).unwrap();
            assert_eq!(actual, case["expected_request"], "{name}: request");
        }
    }
}
