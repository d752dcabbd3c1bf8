//! Terrain classification and the transient map grid.

use crate::MapError;
use serde::{Deserialize, Serialize};

/// Terrain classes in increasing elevation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Water,
    Grass,
    Forest,
    Mountain,
}

impl Terrain {
    /// The symbol rendered for this terrain.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Water => '~',
            Self::Grass => '.',
            Self::Forest => '#',
            Self::Mountain => '^',
        }
    }
}

/// Elevation band boundaries, strictly increasing within (0, 1).
///
/// Elevations below `water` are water, below `grass` are grass, below
/// `forest` are forest, and everything above is mountain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub water: f64,
    pub grass: f64,
    pub forest: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            water: 0.30,
            grass: 0.55,
            forest: 0.78,
        }
    }
}

impl Thresholds {
    /// Validates that the bands are strictly increasing within (0, 1).
    pub fn validate(&self) -> Result<(), MapError> {
        let ordered = 0.0 < self.water && self.water < self.grass && self.grass < self.forest
            && self.forest < 1.0;
        if ordered {
            Ok(())
        } else {
            Err(MapError::InvalidThresholds(format!(
                "bands must satisfy 0 < water < grass < forest < 1, got {} / {} / {}",
                self.water, self.grass, self.forest
            )))
        }
    }
}

/// Maps an elevation value to its terrain band.
#[must_use]
pub fn classify(elevation: f64, thresholds: &Thresholds) -> Terrain {
    if elevation < thresholds.water {
        Terrain::Water
    } else if elevation < thresholds.grass {
        Terrain::Grass
    } else if elevation < thresholds.forest {
        Terrain::Forest
    } else {
        Terrain::Mountain
    }
}

/// A point of interest placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poi {
    /// The ranked keyword this marker stands for.
    pub word: String,
    pub x: usize,
    pub y: usize,
}

/// A generated map. Transient: only the rendered text is ever persisted,
/// and only in encrypted form.
#[derive(Debug, Clone)]
pub struct MapGrid {
    pub width: usize,
    pub height: usize,
    /// Row-major elevation values in [0, 1).
    pub elevation: Vec<f64>,
    /// Row-major terrain classification.
    pub terrain: Vec<Terrain>,
    /// POI placements in rank order.
    pub pois: Vec<Poi>,
}

impl MapGrid {
    /// Returns the terrain at (x, y).
    #[must_use]
    pub fn terrain_at(&self, x: usize, y: usize) -> Terrain {
        self.terrain[y * self.width + x]
    }

    /// Returns the elevation at (x, y).
    #[must_use]
    pub fn elevation_at(&self, x: usize, y: usize) -> f64 {
        self.elevation[y * self.width + x]
    }
}
