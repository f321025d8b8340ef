use std::sync::{mpsc, Arc, RwLock};
use std::thread;

use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm, MultipartFormConfig};
use actix_web::dev::Service;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::gmaps_url::TravelMode;
use crate::route_service::RouteService;

const MULTIPART_LIMIT: usize = 5 * 1024 * 1024;

struct AppState {
    service: RouteService,
    base_url: Arc<RwLock<String>>,
}

#[derive(MultipartForm)]
struct ConvertGpxForm {
    gpx: Bytes,
    max_size: Text<usize>,
    vehicle_type: Option<Text<String>>,
}

#[derive(Serialize)]
struct ConvertGpxResponse {
    google_maps_urls: Vec<String>,
    maps_urls: Vec<String>,
}

#[derive(Deserialize)]
struct StaticMapQuery {
    polyline: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn client_error(message: String) -> HttpResponse {
    warn!("handled error: {message}");
    HttpResponse::BadRequest().json(ErrorResponse { error: message })
}

fn server_error(message: String) -> HttpResponse {
    error!("unhandled error: {message}");
    HttpResponse::InternalServerError().json(ErrorResponse { error: message })
}

async fn status() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}

async fn convert_gpx(
    MultipartForm(form): MultipartForm<ConvertGpxForm>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let mode = match &form.vehicle_type {
        None => TravelMode::Driving,
        Some(value) => match TravelMode::from_form_value(value.as_str()) {
            Some(mode) => mode,
            None => return client_error(format!("invalid vehicle type {}", value.as_str())),
        },
    };

    let routes = match data
        .service
        .convert_to_routes(form.gpx.data.as_ref(), form.max_size.0)
    {
        Ok(routes) => routes,
        Err(err) => return client_error(format!("converting gpx: {err:#}")),
    };

    let base_url = data.base_url.read().unwrap().clone();
    let mut google_maps_urls = Vec::with_capacity(routes.len());
    let mut maps_urls = Vec::with_capacity(routes.len());
    for route in &routes {
        google_maps_urls.push(data.service.google_maps_url(route, mode));
        let token = data.service.encode_polyline(route);
        maps_urls.push(format!(
            "{}/static-map?polyline={}",
            base_url,
            escape_query(&token)
        ));
    }

    HttpResponse::Ok().json(ConvertGpxResponse {
        google_maps_urls,
        maps_urls,
    })
}

async fn static_map(query: web::Query<StaticMapQuery>, data: web::Data<AppState>) -> HttpResponse {
    if query.polyline.is_empty() {
        return client_error("polyline must be provided".to_string());
    }

    let route = match data.service.decode_polyline(&query.polyline) {
        Ok(route) => route,
        Err(err) => return client_error(format!("{err:#}")),
    };

    let mut buffer = Vec::new();
    if let Err(err) = data.service.write_png(&mut buffer, &route) {
        return server_error(format!("generating static map: {err:#}"));
    }

    HttpResponse::Ok().content_type("image/png").body(buffer)
}

/// Percent-encodes a query parameter value. The polyline alphabet uses
/// most of printable ASCII, so nearly every token needs escaping.
fn escape_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub struct MapServer {
    url: String,
    handle: Option<thread::JoinHandle<()>>,
}

impl MapServer {
    /// Starts the server on a dedicated thread with its own runtime.
    /// `port` of `None` binds an OS-assigned port; the actual bound
    /// address is reported back before this returns. `base_url` is the
    /// prefix baked into the static-map links handed to clients, and
    /// defaults to the bound address.
    pub fn create_and_start(host: &str, port: Option<u16>, base_url: Option<String>) -> Result<Self> {
        let host = host.to_string();
        let port = port.unwrap_or(0);
        let base_url = Arc::new(RwLock::new(base_url.unwrap_or_default()));

        let (tx, rx) = mpsc::channel();
        let thread_host = host.clone();
        let thread_base_url = base_url.clone();
        let handle = thread::spawn(move || {
            let app_state = web::Data::new(AppState {
                service: RouteService::new(),
                base_url: thread_base_url.clone(),
            });

            let runtime = Runtime::new().expect("failed to create tokio runtime");
            runtime.block_on(async move {
                let server = HttpServer::new(move || {
                    App::new()
                        .app_data(app_state.clone())
                        // The uploaded file is buffered in memory, so the
                        // memory limit has to match the total limit or
                        // uploads past the 2 MiB default get rejected.
                        .app_data(
                            MultipartFormConfig::default()
                                .total_limit(MULTIPART_LIMIT)
                                .memory_limit(MULTIPART_LIMIT)
                                .error_handler(|err, _req| {
                                    let response =
                                        client_error(format!("reading multipart form: {err}"));
                                    InternalError::from_response(err, response).into()
                                }),
                        )
                        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                            let response = client_error(format!("reading query: {err}"));
                            InternalError::from_response(err, response).into()
                        }))
                        .wrap_fn(|req, srv| {
                            info!("incoming request: {} {}", req.method(), req.uri());
                            srv.call(req)
                        })
                        .route("/convert-gpx", web::post().to(convert_gpx))
                        .route("/static-map", web::get().to(static_map))
                        .route("/status", web::get().to(status))
                })
                .bind((thread_host.as_str(), port));

                let server = match server {
                    Ok(server) => server,
                    Err(err) => {
                        let _ = tx.send(Err(err));
                        return;
                    }
                };

                let actual_port = server
                    .addrs()
                    .first()
                    .map(|addr| addr.port())
                    .unwrap_or(port);
                {
                    let mut url = thread_base_url.write().unwrap();
                    if url.is_empty() {
                        *url = format!("http://{thread_host}:{actual_port}");
                    }
                }
                let _ = tx.send(Ok(actual_port));

                if let Err(err) = server.run().await {
                    error!("server exited with error: {err}");
                }
            });
        });

        let actual_port = rx.recv()??;
        info!("server listening on {host}:{actual_port}");

        Ok(MapServer {
            url: format!("http://{host}:{actual_port}"),
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Blocks until the server thread exits.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
