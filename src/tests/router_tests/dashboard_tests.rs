use crate::errors::ServerError;
use crate::responses::error_response;
use crate::router::{handle, AppState};
use crate::tests::utils::{body_bytes, body_string, header, seed_data_dir, test_config, FakeFetcher};
use astra::{Body, Request};
use http::Method;

fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn seeded_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());
    let state = AppState::new(test_config(dir.path()), Box::new(FakeFetcher::new()));
    (dir, state)
}

#[test]
fn dashboard_lists_placed_woodlands() {
    let (_dir, state) = seeded_state();

    let resp = handle(get("/"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "text/html; charset=utf-8");

    let body = body_string(resp);
    assert!(body.contains("Oak Wood"));
    assert!(body.contains("Ash Copse"));
    assert!(!body.contains("Lost Wood"), "unplaced woodland must not be shown");
    assert!(body.contains("Woodlands: 2"));
    assert!(body.contains("Cities (after population filter): 2"));
    assert!(body.contains("leaflet.markercluster.js"));
}

#[test]
fn type_filter_narrows_the_view() {
    let (_dir, state) = seeded_state();

    let body = body_string(handle(get("/?type=Leasehold"), &state).unwrap());

    assert!(body.contains("Ash Copse"));
    assert!(!body.contains("Oak Wood"));
    assert!(body.contains("Woodlands: 1"));
}

#[test]
fn distance_filter_uses_filtered_cities() {
    let (_dir, state) = seeded_state();

    // Only Bristol passes the population floor, so the Oxford woodland is far.
    let body = body_string(
        handle(get("/?pop_min=200000&near=on&max_miles=20"), &state).unwrap(),
    );

    assert!(body.contains("Filtered by distance: kept 1 of 2 woodlands (≤ 20 miles)."));
    assert!(body.contains("Ash Copse"));
    assert!(!body.contains("Oak Wood"));
    assert!(body.contains("Cities (after population filter): 1"));
}

#[test]
fn hidden_cities_disable_the_distance_filter() {
    let (_dir, state) = seeded_state();

    let body = body_string(handle(get("/?hide_cities=1&near=on"), &state).unwrap());

    assert!(body.contains("the distance filter is disabled"));
    assert!(body.contains("Woodlands: 2"));
}

#[test]
fn nearest_city_is_derived_without_the_column() {
    let (_dir, state) = seeded_state();

    let body = body_string(handle(get("/?city=Oxford"), &state).unwrap());
    assert!(body.contains("Oak Wood"));
    assert!(!body.contains("Ash Copse"));
}

#[test]
fn bad_filter_value_is_a_bad_request() {
    let (_dir, state) = seeded_state();

    let err = handle(get("/?price_min=cheap"), &state).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let resp = error_response(err);
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("price_min"));
}

#[test]
fn unknown_routes_are_not_found() {
    let (_dir, state) = seeded_state();

    let err = handle(get("/admin"), &state).unwrap_err();
    assert_eq!(error_response(err).status(), 404);

    let post = http::Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    assert!(matches!(handle(post, &state), Err(ServerError::NotFound)));
}

#[test]
fn missing_sites_file_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path()), Box::new(FakeFetcher::new()));

    let err = handle(get("/"), &state).unwrap_err();
    assert!(matches!(err, ServerError::Store(_)));
    assert_eq!(error_response(err).status(), 500);
}

#[test]
fn export_returns_filtered_workbook() {
    let (_dir, state) = seeded_state();

    let resp = handle(get("/export.xlsx?type=Freehold"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        header(&resp, "Content-Type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        header(&resp, "Content-Disposition"),
        "attachment; filename=\"woodlands.xlsx\""
    );
    assert_eq!(&body_bytes(resp)[..2], b"PK");
}
