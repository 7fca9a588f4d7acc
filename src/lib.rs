//! # mapview
//!
//! A small static-map viewer core: map-view state, the pixel/degree
//! coordinate math that keeps the displayed image, pointer, and search
//! results consistent, and blocking clients for the static-map renderer,
//! geocoder, and business-search services.
//!
//! The GUI shell lives in the `mapview-app` workspace member; this crate is
//! deliberately UI-free so the state machine and transforms can be tested in
//! isolation.

pub mod config;
pub mod core;
pub mod services;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    geo::LonLat,
    view::{MapStyle, MapViewState, PanDirection},
};

pub use config::ApiKeys;

pub use services::{
    geocode::{GeocodeHit, Geocoder},
    search::{Business, BusinessSearch},
    static_map::StaticMapSource,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service returned HTTP {status}")]
    Service { status: reqwest::StatusCode },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
