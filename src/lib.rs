#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod gmaps_url;
pub mod import_data;
pub mod map_renderer;
pub mod map_server;
pub mod polyline_codec;
pub mod route_service;
pub mod route_simplifier;
pub mod route_vector;
