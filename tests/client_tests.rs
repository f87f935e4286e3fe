/// HTTP client tests against a throwaway local server.
///
/// Each test binds a `tiny_http` server to an ephemeral port, answers a
/// single request with a canned status and body, and reports back the URL
/// the client asked for.
use std::thread::{self, JoinHandle};

use taxidash::api::{AnalyticsSource, BackendClient, FetchError, TripId, TripQuery};
use tiny_http::{Response, Server, StatusCode};

fn serve_once(status: u16, body: &'static str) -> (BackendClient, JoinHandle<String>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        let url = request.url().to_string();
        let response = Response::from_string(body).with_status_code(StatusCode(status));
        request.respond(response).unwrap();
        url
    });
    let client = BackendClient::new(&format!("http://{addr}/api/"), None);
    (client, handle)
}

// ---------------------------------------------------------------------------
// Success paths
// ---------------------------------------------------------------------------

#[test]
fn stats_are_parsed_with_nulls() {
    let (client, server) = serve_once(
        200,
        r#"{"total_trips": 1200, "avg_duration_min": 12.5, "avg_speed_kmh": null, "avg_distance_km": 0}"#,
    );
    let stats = client.insights_stats().unwrap();
    assert_eq!(server.join().unwrap(), "/api/insights/stats");

    assert_eq!(stats.total_trips, Some(1200));
    assert_eq!(stats.avg_duration_min, Some(12.5));
    assert_eq!(stats.avg_speed_kmh, None);
    assert_eq!(stats.avg_distance_km, Some(0.0));
}

#[test]
fn trips_request_carries_filters() {
    let (client, server) = serve_once(
        200,
        r#"{"trips": [{"trip_id": "id2875421", "fare_amount": 9.5}, {"trip_id": 17}]}"#,
    );
    let query = TripQuery::new(20).with_speeds(Some(5.0), None);
    let page = client.trips(&query).unwrap();

    let url = server.join().unwrap();
    assert!(url.starts_with("/api/trips/?"), "unexpected url: {url}");
    assert!(url.contains("limit=20"));
    assert!(url.contains("min_speed=5"));
    assert!(!url.contains("max_speed"));

    assert_eq!(page.trips.len(), 2);
    assert_eq!(page.trips[0].trip_id, Some(TripId::Text("id2875421".into())));
    assert_eq!(page.trips[1].trip_id, Some(TripId::Number(17)));
}

#[test]
fn trips_request_sends_nonzero_max_speed() {
    let (client, server) = serve_once(200, r#"{"trips": []}"#);
    let query = TripQuery::new(10).with_speeds(None, Some(40.0));
    let page = client.trips(&query).unwrap();

    let url = server.join().unwrap();
    assert!(url.contains("max_speed=40"), "unexpected url: {url}");
    assert!(page.trips.is_empty());
}

#[test]
fn hourly_pattern_is_parsed() {
    let (client, server) = serve_once(200, r#"{"hours": [0, 1, 2], "counts": [3, 5, 1]}"#);
    let pattern = client.hourly_pattern().unwrap();
    assert_eq!(server.join().unwrap(), "/api/insights/hourly-pattern");
    assert_eq!(pattern.hours, vec![0, 1, 2]);
    assert_eq!(pattern.counts, vec![3, 5, 1]);
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[test]
fn non_2xx_is_a_status_error_even_with_json_body() {
    let (client, server) = serve_once(500, r#"{"trips": []}"#);
    let err = client.trips(&TripQuery::default()).unwrap_err();
    server.join().unwrap();

    match &err {
        FetchError::Status { status, .. } => assert_eq!(*status, 500),
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("HTTP error! status: 500"));
}

#[test]
fn invalid_json_is_malformed() {
    let (client, server) = serve_once(200, "<html>oops</html>");
    let err = client.insights_stats().unwrap_err();
    server.join().unwrap();
    assert_eq!(err.kind(), "malformed");
}

#[test]
fn misaligned_passenger_distribution_is_malformed() {
    let (client, server) = serve_once(200, r#"{"labels": ["1", "2"], "counts": [5]}"#);
    let err = client.passenger_distribution().unwrap_err();
    server.join().unwrap();
    assert_eq!(err.kind(), "malformed");
}

#[test]
fn api_root_lists_endpoints() {
    let (client, server) = serve_once(
        200,
        r#"{"message": "NYC Taxi API", "endpoints": {"trips": "/api/trips/"}}"#,
    );
    let info = client.api_info().unwrap();
    assert_eq!(server.join().unwrap(), "/api");
    assert_eq!(info.message, "NYC Taxi API");
    assert_eq!(info.endpoints.len(), 1);
}
