//! Hash-lattice value noise.
//!
//! Cheap coherent noise: lattice points get a deterministic pseudo-random
//! value from hashing (seed, x, y), and cells between lattice points are
//! smoothly interpolated. Not true Perlin noise, but spatially correlated
//! enough for terrain. Everything here is a pure function of its inputs;
//! determinism is testable by calling twice.

use sha2::{Digest, Sha256};

const OCTAVES: u32 = 4;
const PERSISTENCE: f64 = 0.55;
const SCALE: f64 = 12.0;

/// Deterministic value in [0, 1) for a lattice point.
fn lattice_value(seed: u64, ix: i64, iy: i64) -> f64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_be_bytes());
    hasher.update(ix.to_be_bytes());
    hasher.update(iy.to_be_bytes());
    let digest = hasher.finalize();
    let word = u32::from_be_bytes(digest[..4].try_into().expect("SHA-256 digest is 32 bytes"));
    // word / 2^32
    f64::from(word) / 4_294_967_296.0
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Classic fade curve for smoother interpolation.
fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Multi-octave value noise in [0, 1) at a sample point.
pub fn value_noise(seed: u64, x: f64, y: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut norm = 0.0;

    for _ in 0..OCTAVES {
        let sx = x / SCALE * frequency;
        let sy = y / SCALE * frequency;
        let x0 = sx.floor();
        let y0 = sy.floor();
        let tx = smooth(sx - x0);
        let ty = smooth(sy - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let v00 = lattice_value(seed, ix, iy);
        let v10 = lattice_value(seed, ix + 1, iy);
        let v01 = lattice_value(seed, ix, iy + 1);
        let v11 = lattice_value(seed, ix + 1, iy + 1);

        let vx0 = lerp(v00, v10, tx);
        let vx1 = lerp(v01, v11, tx);
        total += lerp(vx0, vx1, ty) * amplitude;

        norm += amplitude;
        amplitude *= PERSISTENCE;
        frequency *= 2.0;
    }

    total / norm
}

/// Generates the elevation field for a grid, row-major.
///
/// Pure in (seed, width, height): repeated calls yield identical grids.
pub fn generate_elevation(seed: u64, width: usize, height: usize) -> Vec<f64> {
    let mut elevation = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            elevation.push(value_noise(seed, x as f64, y as f64));
        }
    }
    elevation
}
