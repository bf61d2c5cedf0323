//! Query Router
//!
//! Decides, per query, between showing a location, showing a route,
//! answering through the analyst, or answering with plain completion.
//!
//! 1. Extract addresses, using the "between A and B" fallback when none are found.
//! 2. One address: geocode it and show it.
//! 3. Two addresses: geocode both and resolve a route between them. If either
//!    fails to geocode the query stops here; it is not re-read as an analytic
//!    question.
//! 4. Anything else goes to the analyst. An empty analyst answer falls back
//!    to plain completion.

use std::sync::Arc;

use sales_assistant_core::{Notice, NoticeSink};
use sales_assistant_geo::{GeocodeOutcome, GeocoderAdapter, RouteResolver};
use sales_assistant_llm::AddressExtractor;

use crate::models::outcome::RoutingOutcome;
use crate::models::session::ChatSession;
use crate::services::analyst::AnalystService;

pub struct QueryRouter {
    extractor: AddressExtractor,
    geocoder: GeocoderAdapter,
    resolver: RouteResolver,
    analyst: AnalystService,
    notices: Arc<dyn NoticeSink>,
}

impl QueryRouter {
    pub fn new(
        extractor: AddressExtractor,
        geocoder: GeocoderAdapter,
        resolver: RouteResolver,
        analyst: AnalystService,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            extractor,
            geocoder,
            resolver,
            analyst,
            notices,
        }
    }

    /// Route one query and record the exchange in `session`.
    pub async fn handle(&self, session: &mut ChatSession, query: &str) -> RoutingOutcome {
        session.push_user(query);
        let outcome = self.route(query).await;
        if let Some(text) = outcome.assistant_text() {
            session.push_assistant(text);
        }
        outcome
    }

    /// Decide what to do with `query`. Never fails; problems are sent to the
    /// notice channel and end in `NoAction` or an empty answer.
    pub async fn route(&self, query: &str) -> RoutingOutcome {
        let addresses = self.extractor.extract_with_fallback(query).await;
        tracing::debug!(count = addresses.len(), "routing query");

        match addresses.as_slice() {
            [address] => self.map_single(address).await,
            [origin, destination] => self.map_route(origin, destination).await,
            _ => {
                if addresses.len() > 2 {
                    tracing::debug!(
                        count = addresses.len(),
                        "more than two addresses, treating as analyst query"
                    );
                }
                self.ask_analyst(query).await
            }
        }
    }

    async fn map_single(&self, address: &str) -> RoutingOutcome {
        match self.geocoder.geocode(address).await {
            GeocodeOutcome::Found(coordinate) => {
                tracing::info!(%coordinate, "single address located");
                RoutingOutcome::MapSingle { coordinate }
            }
            GeocodeOutcome::NotFound => {
                self.notices.notify(Notice::AddressNotFound {
                    address: address.to_string(),
                });
                RoutingOutcome::NoAction
            }
        }
    }

    async fn map_route(&self, origin: &str, destination: &str) -> RoutingOutcome {
        let from = self.geocoder.geocode(origin).await;
        let to = self.geocoder.geocode(destination).await;

        let (Some(from), Some(to)) = (from.coordinate(), to.coordinate()) else {
            self.notices.notify(Notice::GeocodeIncomplete {
                addresses: vec![origin.to_string(), destination.to_string()],
            });
            return RoutingOutcome::NoAction;
        };

        match self.resolver.resolve(from, to).await {
            Ok(resolution) => {
                tracing::info!(
                    stage = ?resolution.stage,
                    points = resolution.coordinates.len(),
                    "route resolved"
                );
                RoutingOutcome::MapRoute {
                    coordinates: resolution.coordinates,
                }
            }
            Err(e) => {
                self.notices.notify(Notice::RouteUnavailable {
                    message: e.to_string(),
                });
                RoutingOutcome::NoAction
            }
        }
    }

    async fn ask_analyst(&self, query: &str) -> RoutingOutcome {
        let response = self.analyst.ask(query).await;
        if !response.is_empty() {
            return RoutingOutcome::AnalystAnswer { response };
        }
        tracing::debug!("analyst answer empty, using plain completion");
        RoutingOutcome::PlainText {
            text: self.analyst.complete_plain(query).await,
        }
    }
}
