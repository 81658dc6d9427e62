pub mod app;
pub mod error;
pub mod extract;
pub mod flash;
pub mod forms;
pub mod http_routes;
pub mod state;
pub mod templates;
pub mod view_models;
