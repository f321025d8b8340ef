use std::io::{Read, Write};

use anyhow::{Context, Result};

use crate::gmaps_url::{self, TravelMode};
use crate::import_data;
use crate::map_renderer;
use crate::polyline_codec;
use crate::route_simplifier::{self, SimplifyOptions};
use crate::route_vector::Route;

/// Façade over the conversion pipeline: parse a GPX document, simplify
/// each track once, and hand the simplified routes to the independent
/// consumers (directions link, polyline token, preview image).
pub struct RouteService {
    options: SimplifyOptions,
}

impl RouteService {
    pub fn new() -> Self {
        RouteService {
            options: SimplifyOptions::default(),
        }
    }

    pub fn with_options(options: SimplifyOptions) -> Self {
        RouteService { options }
    }

    /// Parses GPX data from `reader` and returns one simplified route
    /// per track, each at most `max_size` points.
    pub fn convert_to_routes(&self, reader: impl Read, max_size: usize) -> Result<Vec<Route>> {
        let routes = import_data::read_gpx(reader)?;
        Ok(routes
            .iter()
            .map(|route| route_simplifier::simplify_with_options(route, max_size, &self.options))
            .collect())
    }

    pub fn google_maps_url(&self, route: &Route, mode: TravelMode) -> String {
        gmaps_url::of(route, mode)
    }

    pub fn encode_polyline(&self, route: &Route) -> String {
        polyline_codec::encode(route)
    }

    pub fn decode_polyline(&self, token: &str) -> Result<Route> {
        polyline_codec::decode(token).context("decoding polyline")
    }

    pub fn write_png(&self, writer: impl Write, route: &Route) -> Result<()> {
        map_renderer::write_png(writer, route).context("rendering route image")
    }
}

impl Default for RouteService {
    fn default() -> Self {
        RouteService::new()
    }
}
