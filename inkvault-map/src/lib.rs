//! Deterministic procedural map generation from entry text.
//!
//! A cosmetic derived artifact: the entry body seeds a small terrain map
//! with the body's most frequent meaningful words placed as points of
//! interest. The whole pipeline — seed, noise, classification, POI
//! ranking, placement, rendering — is a pure function of
//! `(body, MapConfig)`, with no hidden state and no randomness source
//! beyond the seed. Identical body text always renders byte-identically.
//!
//! Nothing here is security-sensitive; callers encrypt the rendered text
//! before persisting it.

mod grid;
mod noise;
mod poi;
mod render;
mod seed;

pub use grid::{MapGrid, Poi, Terrain, Thresholds, classify};
pub use noise::{generate_elevation, value_noise};
pub use poi::{extract_pois, place_pois};
pub use render::{POI_MARKER, render};
pub use seed::compute_seed;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from map generation.
#[derive(Debug, Error)]
pub enum MapError {
    /// Elevation bands are not strictly increasing within (0, 1).
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// The grid has no interior to place markers in.
    #[error("grid too small: {width}x{height} (minimum 3x3)")]
    GridTooSmall { width: usize, height: usize },
}

/// Grid parameters for map generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    pub thresholds: Thresholds,
    /// How many ranked keywords to place as POIs.
    pub top_k: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Storage-friendly dimensions: maps are persisted (encrypted) with
        // every entry, so they stay small.
        Self {
            width: 32,
            height: 12,
            thresholds: Thresholds::default(),
            top_k: 3,
        }
    }
}

impl MapConfig {
    /// Validates grid dimensions and thresholds.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.width < 3 || self.height < 3 {
            return Err(MapError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        self.thresholds.validate()
    }
}

/// Generates the full map grid for an entry body.
pub fn generate(body: &str, config: &MapConfig) -> Result<MapGrid, MapError> {
    config.validate()?;

    let seed = compute_seed(body);
    let elevation = generate_elevation(seed, config.width, config.height);
    let terrain = elevation
        .iter()
        .map(|&e| classify(e, &config.thresholds))
        .collect();

    let keywords = extract_pois(body, config.top_k);
    let pois = place_pois(seed, config.width, config.height, &keywords);

    Ok(MapGrid {
        width: config.width,
        height: config.height,
        elevation,
        terrain,
        pois,
    })
}

/// Generates and renders the map text for an entry body.
pub fn map_text(body: &str, config: &MapConfig) -> Result<String, MapError> {
    Ok(render(&generate(body, config)?))
}
