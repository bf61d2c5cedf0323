//! Fake collaborators

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sales_assistant::services::analyst::{AnalystService, AnalystTools};
use sales_assistant::services::router::QueryRouter;
use sales_assistant::models::settings::CortexSettings;
use sales_assistant_core::{Coordinate, NoticeLog};
use sales_assistant_geo::geocoder::{GeocodeItem, GeocodeResponse, Position};
use sales_assistant_geo::polyline::{Route, Section, ShapeLeg, ShapeResponse, ShapeRoute};
use sales_assistant_geo::{
    GeoError, GeoResult, GeocoderAdapter, GeocodingService, PrimaryRouting, RouteDocument,
    RouteResolver, SecondaryRouting, ShapeDocument,
};
use sales_assistant_llm::{
    AddressExtractor, CompletionProvider, CompletionRequest, CompletionResponse, LlmError,
    LlmResult,
};
use serde_json::json;

/// Which kind of completion the router asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Extraction,
    Analyst,
    Plain,
}

/// JSON event array carrying one text delta.
pub fn text_events(text: &str) -> String {
    json!([{
        "event": "message.delta",
        "data": {"delta": {"content": [{"type": "text", "text": text}]}}
    }])
    .to_string()
}

pub fn ok(content: String) -> LlmResult<CompletionResponse> {
    Ok(CompletionResponse {
        status: 200,
        content,
    })
}

pub fn status(status: u16) -> LlmResult<CompletionResponse> {
    Ok(CompletionResponse {
        status,
        content: String::new(),
    })
}

pub fn network_error() -> LlmResult<CompletionResponse> {
    Err(LlmError::NetworkError {
        message: "connection reset".to_string(),
    })
}

/// Answers each kind of completion with a fixed response.
pub struct ScriptedProvider {
    pub extraction: LlmResult<CompletionResponse>,
    pub analyst: LlmResult<CompletionResponse>,
    pub plain: LlmResult<CompletionResponse>,
    pub calls: Mutex<Vec<CallKind>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            extraction: ok(text_events("[]")),
            analyst: ok("[]".to_string()),
            plain: ok(text_events("")),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedProvider {
    pub fn calls(&self) -> Vec<CallKind> {
        self.calls.lock().unwrap().clone()
    }
}

fn kind_of(request: &CompletionRequest) -> CallKind {
    if !request.tools.is_empty() {
        return CallKind::Analyst;
    }
    let is_extraction = request.messages.iter().any(|m| {
        m.content.iter().any(|c| match c {
            sales_assistant_llm::MessageContent::Text { text } => {
                text.starts_with("Extract every full street address")
            }
        })
    });
    if is_extraction {
        CallKind::Extraction
    } else {
        CallKind::Plain
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "claude-4-sonnet"
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
        let kind = kind_of(&request);
        self.calls.lock().unwrap().push(kind);
        match kind {
            CallKind::Extraction => self.extraction.clone(),
            CallKind::Analyst => self.analyst.clone(),
            CallKind::Plain => self.plain.clone(),
        }
    }
}

/// How the fake geocoder answers for one address
#[derive(Debug, Clone, Copy)]
pub enum GeoAnswer {
    At(f64, f64),
    NoItems,
    Fails,
}

/// Unknown addresses answer with no items.
#[derive(Default)]
pub struct FakeGeocoder {
    pub answers: HashMap<String, GeoAnswer>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn with(answers: &[(&str, GeoAnswer)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(a, g)| (a.to_string(), *g))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GeocodingService for FakeGeocoder {
    async fn geocode(&self, address: &str) -> GeoResult<GeocodeResponse> {
        self.calls.lock().unwrap().push(address.to_string());
        match self.answers.get(address).copied().unwrap_or(GeoAnswer::NoItems) {
            GeoAnswer::At(lat, lng) => Ok(GeocodeResponse {
                items: Some(vec![GeocodeItem {
                    title: Some(address.to_string()),
                    position: Some(Position { lat, lng }),
                }]),
            }),
            GeoAnswer::NoItems => Ok(GeocodeResponse { items: Some(vec![]) }),
            GeoAnswer::Fails => Err(GeoError::Transport("geocoder unreachable".to_string())),
        }
    }
}

pub struct FakePrimary {
    pub answer: fn() -> GeoResult<RouteDocument>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl PrimaryRouting for FakePrimary {
    async fn route(&self, _o: Coordinate, _d: Coordinate) -> GeoResult<RouteDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.answer)()
    }
}

pub struct FakeSecondary {
    pub answer: fn() -> GeoResult<ShapeDocument>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl SecondaryRouting for FakeSecondary {
    async fn route(&self, _o: Coordinate, _d: Coordinate) -> GeoResult<ShapeDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.answer)()
    }
}

pub fn route_document(polylines: &[&str]) -> RouteDocument {
    RouteDocument {
        routes: vec![Route {
            sections: polylines
                .iter()
                .map(|p| Section {
                    polyline: Some(p.to_string()),
                })
                .collect(),
        }],
    }
}

pub fn shape_document(points: &[&str]) -> ShapeDocument {
    ShapeDocument {
        response: ShapeResponse {
            route: vec![ShapeRoute {
                leg: vec![ShapeLeg {
                    shape: points.iter().map(|p| p.to_string()).collect(),
                }],
            }],
        },
    }
}

pub fn transport_failure<T>() -> GeoResult<T> {
    Err(GeoError::Transport("routing unreachable".to_string()))
}

/// A router wired to fakes, with handles to inspect them.
pub struct Harness {
    pub router: QueryRouter,
    pub notices: Arc<NoticeLog>,
    pub provider: Arc<ScriptedProvider>,
    pub geocoder: Arc<FakeGeocoder>,
    pub primary: Arc<FakePrimary>,
    pub secondary: Arc<FakeSecondary>,
}

impl Harness {
    pub fn new(provider: ScriptedProvider, geocoder: FakeGeocoder) -> Self {
        Self::with_routing(
            provider,
            geocoder,
            || Ok(route_document(&["BFg9tgKgm5xCw-Bw-B"])),
            || Ok(shape_document(&[])),
        )
    }

    pub fn with_routing(
        provider: ScriptedProvider,
        geocoder: FakeGeocoder,
        primary: fn() -> GeoResult<RouteDocument>,
        secondary: fn() -> GeoResult<ShapeDocument>,
    ) -> Self {
        let notices = Arc::new(NoticeLog::new());
        let provider = Arc::new(provider);
        let geocoder = Arc::new(geocoder);
        let primary = Arc::new(FakePrimary {
            answer: primary,
            calls: AtomicUsize::new(0),
        });
        let secondary = Arc::new(FakeSecondary {
            answer: secondary,
            calls: AtomicUsize::new(0),
        });

        let router = QueryRouter::new(
            AddressExtractor::new(provider.clone(), notices.clone()),
            GeocoderAdapter::new(geocoder.clone(), notices.clone()),
            RouteResolver::new(primary.clone(), secondary.clone()),
            AnalystService::new(
                provider.clone(),
                notices.clone(),
                AnalystTools::from(&CortexSettings::default()),
            ),
            notices.clone(),
        );

        Self {
            router,
            notices,
            provider,
            geocoder,
            primary,
            secondary,
        }
    }

    pub fn primary_calls(&self) -> usize {
        self.primary.calls.load(Ordering::SeqCst)
    }

    pub fn secondary_calls(&self) -> usize {
        self.secondary.calls.load(Ordering::SeqCst)
    }
}
