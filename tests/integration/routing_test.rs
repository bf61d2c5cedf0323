//! Route Decoding Integration Tests

use std::sync::Arc;

use sales_assistant_core::Coordinate;
use sales_assistant_geo::{decode, EncodedRoute, GeoError, RouteResolver, RouteStage};

use crate::support::*;

fn resolver(
    primary: fn() -> sales_assistant_geo::GeoResult<sales_assistant_geo::RouteDocument>,
    secondary: fn() -> sales_assistant_geo::GeoResult<sales_assistant_geo::ShapeDocument>,
) -> (RouteResolver, Arc<FakePrimary>, Arc<FakeSecondary>) {
    let p = Arc::new(FakePrimary {
        answer: primary,
        calls: Default::default(),
    });
    let s = Arc::new(FakeSecondary {
        answer: secondary,
        calls: Default::default(),
    });
    (RouteResolver::new(p.clone(), s.clone()), p, s)
}

fn ends() -> (Coordinate, Coordinate) {
    (
        Coordinate::new(52.5, 13.4).unwrap(),
        Coordinate::new(52.53, 13.42).unwrap(),
    )
}

#[test]
fn test_decoding_same_document_twice_is_identical() {
    let doc = EncodedRoute::Structured(route_document(&[
        "BFg9tgKgm5xCw-Bw-B",
        "BFg6xgKwk7xCw-Bw-B",
    ]));
    let first = decode(&doc).unwrap();
    let second = decode(&doc).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_sections_concatenate_in_order() {
    let doc = EncodedRoute::Structured(route_document(&[
        "BFg9tgKgm5xCw-Bw-B",
        "BFg6xgKwk7xCw-Bw-B",
    ]));
    let points: Vec<(f64, f64)> = decode(&doc)
        .unwrap()
        .iter()
        .map(|c| (c.lat(), c.lon()))
        .collect();
    assert_eq!(
        points,
        vec![(52.5, 13.4), (52.51, 13.41), (52.52, 13.41), (52.53, 13.42)]
    );
}

#[tokio::test]
async fn test_primary_failure_calls_secondary_once() {
    let (resolver, p, s) = resolver(transport_failure, || {
        Ok(shape_document(&["52.5,13.4", "52.53,13.42"]))
    });
    let (o, d) = ends();

    let resolution = resolver.resolve(o, d).await.unwrap();

    assert_eq!(resolution.stage, RouteStage::Secondary);
    assert_eq!(resolution.coordinates, vec![o, d]);
    assert_eq!(p.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(s.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_both_stages_failing_returns_no_coordinates() {
    let (resolver, _p, s) = resolver(transport_failure, transport_failure);
    let (o, d) = ends();

    let err = resolver.resolve_route(o, d).await.unwrap_err();

    assert!(matches!(err, GeoError::Transport(_)));
    assert_eq!(s.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_undecodable_primary_uses_secondary() {
    let (resolver, _p, _s) = resolver(
        || Ok(route_document(&["%%%"])),
        || Ok(shape_document(&["52.5,13.4"])),
    );
    let (o, d) = ends();
    let resolution = resolver.resolve(o, d).await.unwrap();
    assert_eq!(resolution.stage, RouteStage::Secondary);
    assert_eq!(resolution.coordinates, vec![o]);
}
