//! Routing Outcome

use sales_assistant_core::{Coordinate, NormalizedResponse};
use serde::{Deserialize, Serialize};

/// What the router decided to do with a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutingOutcome {
    /// One address, geocoded
    MapSingle { coordinate: Coordinate },
    /// Two addresses, routed; an empty route is a valid "no route" answer
    MapRoute { coordinates: Vec<Coordinate> },
    /// Non-empty analyst/search answer
    AnalystAnswer { response: NormalizedResponse },
    /// Plain completion text, used when the analyst answer was empty
    PlainText { text: String },
    /// Nothing to show; the reason was sent through the notice channel
    NoAction,
}

impl RoutingOutcome {
    /// Text to record as the assistant's turn in the chat history.
    pub fn assistant_text(&self) -> Option<String> {
        match self {
            RoutingOutcome::MapSingle { coordinate } => Some(format!("Location: {}", coordinate)),
            RoutingOutcome::MapRoute { coordinates } => {
                Some(format!("Route with {} points", coordinates.len()))
            }
            RoutingOutcome::AnalystAnswer { response } if !response.text.is_empty() => {
                Some(response.text.clone())
            }
            RoutingOutcome::AnalystAnswer { response } if !response.sql.is_empty() => {
                Some(response.sql.clone())
            }
            RoutingOutcome::AnalystAnswer { .. } => None,
            RoutingOutcome::PlainText { text } => Some(text.clone()),
            RoutingOutcome::NoAction => None,
        }
    }
}
