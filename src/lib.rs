pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod model;
pub mod routes;
pub mod utils;
pub mod view;
