// Library exports for comment-thread
// Integration tests and the binary both go through these modules

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod html;
pub mod model;
pub mod renderer;
pub mod routes;
pub mod state;
pub mod view;
