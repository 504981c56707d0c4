//! HTTP middleware for the gateway surface.

pub mod cors;

pub use cors::create_cors_layer;
