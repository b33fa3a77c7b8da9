//! Seed points, the named sites each region grows from.
//!
//! Seeds are load-time content: a theatre file lists them by hand, or
//! [`scatter_seeds`] produces a procedural set for sweeps and tests.

use crate::geometry::Point;
use crate::RegionId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Terrain classification of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Plains,
    Desert,
    Mountain,
    Hills,
    Urban,
    CoastalDesert,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Plains,
        Terrain::Desert,
        Terrain::Mountain,
        Terrain::Hills,
        Terrain::Urban,
        Terrain::CoastalDesert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Terrain::Plains => "Plains",
            Terrain::Desert => "Desert",
            Terrain::Mountain => "Mountain",
            Terrain::Hills => "Hills",
            Terrain::Urban => "Urban",
            Terrain::CoastalDesert => "Coastal Desert",
        }
    }
}

/// A named site on the canvas. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub id: RegionId,
    pub x: f64,
    pub y: f64,
    pub name: String,
    /// Owning territory tag (e.g. a country).
    pub territory: String,
    /// Parent group inside the territory (e.g. a state or province group).
    pub district: String,
    pub terrain: Terrain,
    /// Victory-point style weight; drives the derived region attributes.
    pub importance: u32,
    #[serde(default)]
    pub coastal: bool,
    #[serde(default)]
    pub port: bool,
}

impl Seed {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Scatter `count` seeds over a `width`×`height` canvas.
///
/// Uses rejection sampling to keep seeds at least `min_distance` apart. After
/// `count * 100` attempts the remaining seeds are placed without the distance
/// constraint, so the result always has exactly `count` entries. Identifiers
/// run from 1 to `count`.
pub fn scatter_seeds<R: Rng + ?Sized>(
    count: usize,
    width: f64,
    height: f64,
    min_distance: f64,
    rng: &mut R,
) -> Vec<Seed> {
    let mut points: Vec<Point> = Vec::with_capacity(count);
    let max_attempts = count * 100;
    let mut attempts = 0;

    while points.len() < count && attempts < max_attempts {
        attempts += 1;
        let p = Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        if min_distance > 0.0 && points.iter().any(|q| q.distance(p) < min_distance) {
            continue;
        }
        points.push(p);
    }
    while points.len() < count {
        points.push(Point::new(
            rng.gen_range(0.0..width),
            rng.gen_range(0.0..height),
        ));
    }

    points
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let terrain = Terrain::ALL[rng.gen_range(0..Terrain::ALL.len())];
            Seed {
                id: i as RegionId + 1,
                x: p.x,
                y: p.y,
                name: format!("Region {}", i + 1),
                territory: "PROCEDURAL".to_string(),
                district: format!("District {}", i / 4 + 1),
                terrain,
                importance: rng.gen_range(1..=50),
                coastal: false,
                port: false,
            }
        })
        .collect()
}
