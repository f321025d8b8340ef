use anyhow::Result;
use gpxmaps_core::map_server::MapServer;

const DEFAULT_PORT: u16 = 9876;

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = match std::env::var("PORT") {
        Ok(value) => Some(value.parse()?),
        Err(_) => Some(DEFAULT_PORT),
    };
    let base_url = std::env::var("BASE_URL").ok();

    let server = MapServer::create_and_start(&host, port, base_url)?;
    log::info!("serving at {}", server.url());
    server.join();
    Ok(())
}
