//! Query Router Integration Tests
//!
//! Covers the decision procedure:
//! - address extraction with the "between" fallback
//! - single-address and two-address map paths
//! - the no-fallthrough rule when geocoding fails
//! - analyst answers and the plain completion fallback

use sales_assistant::RoutingOutcome;
use sales_assistant_core::{Coordinate, Notice};
use serde_json::json;

use crate::support::*;

fn addresses_json(addresses: &[&str]) -> String {
    text_events(&format!(
        "```json\n{}\n```",
        serde_json::to_string(addresses).unwrap()
    ))
}

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

// ============================================================================
// Map Paths
// ============================================================================

#[tokio::test]
async fn test_between_fallback_selects_routing_path() {
    let h = Harness::new(
        ScriptedProvider::default(),
        FakeGeocoder::with(&[
            ("123 Main St", GeoAnswer::At(52.5, 13.4)),
            ("456 Oak Ave", GeoAnswer::At(52.51, 13.41)),
        ]),
    );

    let outcome = h.router.route("ship between 123 Main St and 456 Oak Ave").await;

    assert_eq!(
        outcome,
        RoutingOutcome::MapRoute {
            coordinates: vec![coord(52.5, 13.4), coord(52.51, 13.41)]
        }
    );
    assert_eq!(
        *h.geocoder.calls.lock().unwrap(),
        vec!["123 Main St", "456 Oak Ave"]
    );
    // extraction only; the analyst is never consulted
    assert_eq!(h.provider.calls(), vec![CallKind::Extraction]);
    assert_eq!(h.primary_calls(), 1);
    assert_eq!(h.secondary_calls(), 0);
    assert!(h.notices.notices().is_empty());
}

#[tokio::test]
async fn test_single_address_maps_location() {
    let provider = ScriptedProvider {
        extraction: ok(addresses_json(&["1 Place Ville Marie, Montréal"])),
        ..Default::default()
    };
    let h = Harness::new(
        provider,
        FakeGeocoder::with(&[("1 Place Ville Marie, Montréal", GeoAnswer::At(45.5, -73.57))]),
    );

    let outcome = h.router.route("where is 1 Place Ville Marie?").await;

    assert_eq!(
        outcome,
        RoutingOutcome::MapSingle {
            coordinate: coord(45.5, -73.57)
        }
    );
    assert_eq!(h.primary_calls(), 0);
}

#[tokio::test]
async fn test_single_address_not_found_is_notice_not_error() {
    let provider = ScriptedProvider {
        extraction: ok(addresses_json(&["1 Nowhere Rd"])),
        ..Default::default()
    };
    let h = Harness::new(provider, FakeGeocoder::default());

    let outcome = h.router.route("where is 1 Nowhere Rd?").await;

    assert_eq!(outcome, RoutingOutcome::NoAction);
    let notices = h.notices.notices();
    assert_eq!(
        notices,
        vec![Notice::AddressNotFound {
            address: "1 Nowhere Rd".to_string()
        }]
    );
    assert!(notices[0].is_not_found());
    assert_eq!(h.provider.calls(), vec![CallKind::Extraction]);
}

#[tokio::test]
async fn test_geocoder_transport_failure_reported_distinctly() {
    let provider = ScriptedProvider {
        extraction: ok(addresses_json(&["1 Main St"])),
        ..Default::default()
    };
    let h = Harness::new(
        provider,
        FakeGeocoder::with(&[("1 Main St", GeoAnswer::Fails)]),
    );

    assert_eq!(h.router.route("where is 1 Main St").await, RoutingOutcome::NoAction);

    let notices = h.notices.notices();
    assert_eq!(notices.len(), 2);
    assert!(matches!(notices[0], Notice::TransportFailure { .. }));
    assert!(!notices[0].is_not_found());
    assert!(matches!(notices[1], Notice::AddressNotFound { .. }));
}

#[tokio::test]
async fn test_partial_geocode_stops_without_analyst() {
    let provider = ScriptedProvider {
        extraction: ok(addresses_json(&["123 Main St", "999 Unknown Blvd"])),
        analyst: ok(text_events("should not be used")),
        ..Default::default()
    };
    let h = Harness::new(
        provider,
        FakeGeocoder::with(&[("123 Main St", GeoAnswer::At(52.5, 13.4))]),
    );

    let outcome = h.router.route("route 123 Main St to 999 Unknown Blvd").await;

    assert_eq!(outcome, RoutingOutcome::NoAction);
    assert_eq!(
        h.notices.notices(),
        vec![Notice::GeocodeIncomplete {
            addresses: vec!["123 Main St".to_string(), "999 Unknown Blvd".to_string()]
        }]
    );
    assert_eq!(h.provider.calls(), vec![CallKind::Extraction]);
    assert_eq!(h.primary_calls(), 0);
}

#[tokio::test]
async fn test_route_falls_back_to_secondary() {
    let h = Harness::with_routing(
        ScriptedProvider::default(),
        FakeGeocoder::with(&[
            ("A St", GeoAnswer::At(52.5, 13.4)),
            ("B St", GeoAnswer::At(52.51, 13.41)),
        ]),
        transport_failure,
        || Ok(shape_document(&["52.5,13.4", "52.505,13.405", "52.51,13.41"])),
    );

    let outcome = h.router.route("between A St and B St").await;

    assert_eq!(
        outcome,
        RoutingOutcome::MapRoute {
            coordinates: vec![coord(52.5, 13.4), coord(52.505, 13.405), coord(52.51, 13.41)]
        }
    );
    assert_eq!(h.primary_calls(), 1);
    assert_eq!(h.secondary_calls(), 1);
    assert!(h.notices.notices().is_empty());
}

#[tokio::test]
async fn test_route_unavailable_when_both_stages_fail() {
    let h = Harness::with_routing(
        ScriptedProvider::default(),
        FakeGeocoder::with(&[
            ("A St", GeoAnswer::At(52.5, 13.4)),
            ("B St", GeoAnswer::At(52.51, 13.41)),
        ]),
        transport_failure,
        transport_failure,
    );

    let outcome = h.router.route("between A St and B St").await;

    assert_eq!(outcome, RoutingOutcome::NoAction);
    assert_eq!(h.secondary_calls(), 1);
    let notices = h.notices.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::RouteUnavailable { .. }));
}

// ============================================================================
// Analyst Paths
// ============================================================================

#[tokio::test]
async fn test_no_address_goes_to_analyst() {
    let analyst = json!([{
        "event": "message.delta",
        "data": {"delta": {"content": [
            {"type": "text", "text": "Top deals: "},
            {"type": "tool_results", "tool_results": {"content": [
                {"type": "json", "json": {
                    "sql": "SELECT * FROM deals;",
                    "searchResults": [{"source_id": "call-7", "doc_id": "c7"}]
                }}
            ]}}
        ]}}
    }]);
    let provider = ScriptedProvider {
        analyst: ok(analyst.to_string()),
        ..Default::default()
    };
    let h = Harness::new(provider, FakeGeocoder::default());

    let outcome = h.router.route("what were our top deals?").await;

    let RoutingOutcome::AnalystAnswer { response } = outcome else {
        panic!("expected analyst answer, got {:?}", outcome);
    };
    assert_eq!(response.text, "Top deals:");
    assert_eq!(response.sql, "SELECT * FROM deals;");
    assert_eq!(response.citations.len(), 1);
    assert_eq!(response.citations[0].doc_id, "c7");
    assert_eq!(
        h.provider.calls(),
        vec![CallKind::Extraction, CallKind::Analyst]
    );
    assert!(h.geocoder.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_analyst_answer_falls_back_to_plain() {
    let provider = ScriptedProvider {
        analyst: ok(json!([{"event": "response.status"}]).to_string()),
        plain: ok(text_events("Hello! How can I help?")),
        ..Default::default()
    };
    let h = Harness::new(provider, FakeGeocoder::default());

    let outcome = h.router.route("hi").await;

    assert_eq!(
        outcome,
        RoutingOutcome::PlainText {
            text: "Hello! How can I help?".to_string()
        }
    );
    assert_eq!(
        h.provider.calls(),
        vec![CallKind::Extraction, CallKind::Analyst, CallKind::Plain]
    );
}

#[tokio::test]
async fn test_analyst_failure_is_reported_then_falls_back() {
    let provider = ScriptedProvider {
        analyst: status(500),
        plain: ok(text_events("fallback")),
        ..Default::default()
    };
    let h = Harness::new(provider, FakeGeocoder::default());

    let outcome = h.router.route("revenue by region").await;

    assert_eq!(
        outcome,
        RoutingOutcome::PlainText {
            text: "fallback".to_string()
        }
    );
    assert_eq!(
        h.notices.notices(),
        vec![Notice::CompletionStatus { status: 500 }]
    );
}

#[tokio::test]
async fn test_extraction_transport_failure_still_answers() {
    let provider = ScriptedProvider {
        extraction: network_error(),
        analyst: ok(text_events("Pipeline is healthy.")),
        ..Default::default()
    };
    let h = Harness::new(provider, FakeGeocoder::default());

    let outcome = h.router.route("how is the pipeline?").await;

    assert!(matches!(outcome, RoutingOutcome::AnalystAnswer { .. }));
    let notices = h.notices.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::TransportFailure { .. }));
}

#[tokio::test]
async fn test_more_than_two_addresses_goes_to_analyst() {
    let provider = ScriptedProvider {
        extraction: ok(addresses_json(&["A St", "B St", "C St"])),
        analyst: ok(text_events("Three stops noted.")),
        ..Default::default()
    };
    let h = Harness::new(
        provider,
        FakeGeocoder::with(&[
            ("A St", GeoAnswer::At(1.0, 1.0)),
            ("B St", GeoAnswer::At(2.0, 2.0)),
            ("C St", GeoAnswer::At(3.0, 3.0)),
        ]),
    );

    let outcome = h.router.route("visit A St, B St and C St").await;

    assert!(matches!(outcome, RoutingOutcome::AnalystAnswer { .. }));
    assert!(h.geocoder.calls.lock().unwrap().is_empty());
    assert_eq!(h.primary_calls(), 0);
}
