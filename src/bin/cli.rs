use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use gpxmaps_core::gmaps_url::TravelMode;
use gpxmaps_core::route_service::RouteService;

/// Default waypoint cap for generated directions links.
const DEFAULT_MAX_WAYPOINTS: usize = 25;

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let file_path = match args.get(1) {
        Some(path) => path,
        None => bail_usage(&args[0]),
    };
    let output_dir = args.get(2);

    let service = RouteService::new();
    let file = File::open(file_path).with_context(|| format!("opening {file_path}"))?;
    let routes = service.convert_to_routes(file, DEFAULT_MAX_WAYPOINTS)?;

    for route in &routes {
        println!("{}", service.google_maps_url(route, TravelMode::Driving));
    }

    if let Some(output_dir) = output_dir {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating directory {output_dir}"))?;
        for (i, route) in routes.iter().enumerate() {
            let path = Path::new(output_dir).join(format!("map-{i}.png"));
            let writer = BufWriter::new(File::create(&path)?);
            service
                .write_png(writer, route)
                .with_context(|| format!("rendering {}", path.display()))?;
            log::info!("output to: {}", path.display());
        }
    }

    Ok(())
}

fn bail_usage(program: &str) -> ! {
    eprintln!("usage: {program} <file.gpx> [output-dir]");
    std::process::exit(2);
}
