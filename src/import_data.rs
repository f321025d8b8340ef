use std::{fs::File, io::BufReader, io::Read};

use anyhow::{Context, Result};
use gpx::read;

use crate::route_vector::{Route, TrackPoint};

/// Reads a GPX document and returns one route per track, with each
/// track's segments flattened into a single ordered point sequence.
pub fn read_gpx(reader: impl Read) -> Result<Vec<Route>> {
    let gpx_data = read(reader).context("parsing gpx data")?;
    Ok(gpx_data.tracks.iter().map(route_of_track).collect())
}

pub fn load_gpx(file_path: &str) -> Result<Vec<Route>> {
    let file = File::open(file_path).with_context(|| format!("opening {file_path}"))?;
    read_gpx(BufReader::new(file))
}

fn route_of_track(track: &gpx::Track) -> Route {
    let points = track
        .segments
        .iter()
        .flat_map(|segment| {
            segment
                .points
                .iter()
                .map(|waypoint| TrackPoint::from(waypoint.point()))
        })
        .collect();
    Route::new(points)
}
