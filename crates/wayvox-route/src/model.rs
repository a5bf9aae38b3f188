//! Normalizes a raw directions payload into a [`Route`].

use crate::error::RouteError;
use crate::types::{DirectionsResponse, Route, Step};
use regex::Regex;
use std::sync::OnceLock;
use wayvox_geo::{decode_polyline, Coordinate};

fn markup_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("markup regex is valid"))
}

/// Strip HTML-ish markup tags from an instruction, collapsing the
/// whitespace that tags often pad around.
pub fn strip_markup(instruction: &str) -> String {
    let stripped = markup_tag_re().replace_all(instruction, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the first route's first leg into the typed model.
///
/// Step order is preserved exactly as received: it encodes the walking
/// sequence and must not be reordered or deduplicated. A payload with no
/// usable steps is `NoRouteFound`.
pub fn parse_directions(
    raw: &DirectionsResponse,
    destination: Coordinate,
    destination_name: &str,
) -> Result<Route, RouteError> {
    let leg = raw
        .routes
        .first()
        .and_then(|r| r.legs.first())
        .ok_or(RouteError::NoRouteFound)?;

    if leg.steps.is_empty() {
        return Err(RouteError::NoRouteFound);
    }

    let steps = leg
        .steps
        .iter()
        .enumerate()
        .map(|(index, raw_step)| Step {
            index,
            instruction: strip_markup(&raw_step.html_instructions),
            end_point: raw_step.end_location.into(),
        })
        .collect();

    let render_path = decode_polyline(
        &raw.routes
            .first()
            .map(|r| r.overview_polyline.points.as_str())
            .unwrap_or_default(),
    )?;

    Ok(Route {
        steps,
        destination,
        destination_name: destination_name.to_string(),
        render_path,
    })
}
