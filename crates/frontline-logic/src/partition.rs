//! Nearest-seed partition of the canvas into regions.
//!
//! Every point of a padded rectangle belongs to the seed closest to it. Each
//! seed's cell is built by clipping the rectangle against the bisector with
//! every other seed; two regions are adjacent when their cells share a
//! bisector edge of positive length. The result is produced once at world
//! setup and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{self, attributes, factions};
use crate::geometry::{Boundary, Cell, Point, Rect};
use crate::pathfinding::NavGraph;
use crate::seeds::{Seed, Terrain};
use crate::RegionId;

/// Visible canvas plus the padding used to bound edge cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
}

fn default_margin() -> f64 {
    constants::CANVAS_MARGIN
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: constants::CANVAS_WIDTH,
            height: constants::CANVAS_HEIGHT,
            margin: constants::CANVAS_MARGIN,
        }
    }
}

impl Canvas {
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        self.rect().is_valid() && self.margin.is_finite() && self.margin >= 0.0
    }
}

/// A faction rule for one district of one territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictRule {
    pub territory: String,
    pub district: String,
    pub faction: String,
}

/// Territory → initial faction mapping.
///
/// Precedence: per-region override, then district rule, then territory, then
/// `default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allegiance {
    #[serde(default = "default_faction")]
    pub default: String,
    #[serde(default)]
    pub territories: BTreeMap<String, String>,
    #[serde(default)]
    pub districts: Vec<DistrictRule>,
    #[serde(default)]
    pub regions: BTreeMap<RegionId, String>,
}

fn default_faction() -> String {
    factions::NEUTRAL.to_string()
}

impl Default for Allegiance {
    fn default() -> Self {
        Self {
            default: default_faction(),
            territories: BTreeMap::new(),
            districts: Vec::new(),
            regions: BTreeMap::new(),
        }
    }
}

impl Allegiance {
    /// Initial owner of the region grown from `seed`.
    pub fn resolve(&self, seed: &Seed) -> &str {
        if let Some(f) = self.regions.get(&seed.id) {
            return f;
        }
        if let Some(rule) = self
            .districts
            .iter()
            .find(|r| r.territory == seed.territory && r.district == seed.district)
        {
            return &rule.faction;
        }
        self.territories
            .get(&seed.territory)
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }
}

/// Load-time inputs of the partitioner besides the seeds themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub allegiance: Allegiance,
    /// Per-territory outline for the renderer, passed through untouched.
    #[serde(default)]
    pub territory_borders: BTreeMap<String, String>,
}

/// Numeric attributes derived from a seed's importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionAttributes {
    pub manpower: u32,
    pub infrastructure: u8,
    pub factories: u8,
    pub supply_limit: u8,
    pub resistance: u8,
    pub compliance: u8,
    pub anti_air: u8,
    pub victory_points: u32,
}

impl RegionAttributes {
    pub fn from_importance(importance: u32) -> Self {
        Self {
            manpower: attributes::BASE_MANPOWER
                .saturating_add(importance.saturating_mul(attributes::MANPOWER_PER_IMPORTANCE)),
            infrastructure: attributes::INFRASTRUCTURE,
            factories: if importance > attributes::INDUSTRIAL_THRESHOLD {
                attributes::INDUSTRIAL_FACTORIES
            } else {
                attributes::BASE_FACTORIES
            },
            supply_limit: attributes::SUPPLY_LIMIT,
            resistance: attributes::RESISTANCE,
            compliance: attributes::COMPLIANCE,
            anti_air: attributes::ANTI_AIR,
            victory_points: importance,
        }
    }
}

/// One cell of the partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub territory: String,
    pub district: String,
    pub terrain: Terrain,
    pub owner: String,
    /// Starts equal to `owner`; gameplay outside this crate may change it.
    pub controller: String,
    pub attributes: RegionAttributes,
    pub coastal: bool,
    pub port: bool,
    /// Adjacent regions, in seed input order.
    pub neighbors: Vec<RegionId>,
    pub center: Point,
    pub boundary: Boundary,
}

/// Output of the partitioner. Empty means "world not ready".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partition {
    pub regions: Vec<Region>,
    pub territory_borders: BTreeMap<String, String>,
}

impl Partition {
    pub fn is_ready(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn nav_graph(&self) -> NavGraph {
        NavGraph::from_regions(&self.regions)
    }
}

/// Why a partition could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("no seeds to partition")]
    NoSeeds,
    #[error("canvas {width}x{height} (margin {margin}) is not a usable area")]
    InvalidCanvas { width: f64, height: f64, margin: f64 },
    #[error("seed {0} has a non-finite coordinate")]
    NonFiniteSeed(RegionId),
    #[error("seed id {0} is used more than once")]
    DuplicateSeedId(RegionId),
}

/// Build the partition, or an empty one if it cannot be built.
///
/// Failures are logged and swallowed; callers treat an empty
/// [`Partition`] as "not ready" rather than as a fatal error.
pub fn generate(seeds: &[Seed], settings: &MapSettings) -> Partition {
    match try_generate(seeds, settings) {
        Ok(partition) => partition,
        Err(e) => {
            log::error!("Map generation failed: {}", e);
            Partition::default()
        }
    }
}

/// Build the partition, reporting why it could not be built.
pub fn try_generate(seeds: &[Seed], settings: &MapSettings) -> Result<Partition, GenerationError> {
    if seeds.is_empty() {
        return Err(GenerationError::NoSeeds);
    }
    let canvas = settings.canvas;
    if !canvas.is_valid() {
        return Err(GenerationError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
            margin: canvas.margin,
        });
    }
    let mut seen = HashSet::new();
    for s in seeds {
        if !s.point().is_finite() {
            return Err(GenerationError::NonFiniteSeed(s.id));
        }
        if !seen.insert(s.id) {
            return Err(GenerationError::DuplicateSeedId(s.id));
        }
    }

    let bounds = seeds.iter().fold(canvas.rect().expand(canvas.margin), |r, s| {
        r.include(s.point(), canvas.margin)
    });
    let points: Vec<Point> = seeds.iter().map(Seed::point).collect();

    // The first seed at a location owns it; later coincident seeds get no cell.
    let eps_sq = constants::COINCIDENT_EPSILON * constants::COINCIDENT_EPSILON;
    let owner: Vec<usize> = (0..points.len())
        .map(|i| {
            (0..i)
                .find(|&j| points[i].distance_sq(points[j]) <= eps_sq)
                .unwrap_or(i)
        })
        .collect();
    let shadowed = owner.iter().enumerate().filter(|&(i, &o)| i != o).count();
    if shadowed > 0 {
        log::warn!("{} seeds coincide with an earlier seed and get no cell", shadowed);
    }

    let cells: Vec<Cell> = (0..points.len())
        .map(|i| {
            if owner[i] != i {
                return Cell::empty();
            }
            (0..points.len())
                .filter(|&j| j != i && owner[j] == j)
                .fold(Cell::from_rect(bounds), |cell, j| {
                    cell.clip(points[i], points[j], j)
                })
        })
        .collect();

    let mut adjacent: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); points.len()];
    for (i, cell) in cells.iter().enumerate() {
        let mut lengths: BTreeMap<usize, f64> = BTreeMap::new();
        for (j, len) in cell.shared_edges() {
            *lengths.entry(j).or_default() += len;
        }
        for (j, len) in lengths {
            if j != i && len > constants::MIN_SHARED_EDGE {
                adjacent[i].insert(j);
                adjacent[j].insert(i);
            }
        }
    }

    let regions: Vec<Region> = seeds
        .iter()
        .zip(cells.iter())
        .zip(adjacent.iter())
        .map(|((seed, cell), adj)| {
            let owner = settings.allegiance.resolve(seed).to_string();
            Region {
                id: seed.id,
                name: seed.name.clone(),
                territory: seed.territory.clone(),
                district: seed.district.clone(),
                terrain: seed.terrain,
                controller: owner.clone(),
                owner,
                attributes: RegionAttributes::from_importance(seed.importance),
                coastal: seed.coastal,
                port: seed.port,
                neighbors: adj.iter().map(|&j| seeds[j].id).collect(),
                center: seed.point(),
                boundary: cell.boundary(constants::MIN_SHARED_EDGE),
            }
        })
        .collect();

    let edges: usize = regions.iter().map(|r| r.neighbors.len()).sum::<usize>() / 2;
    log::info!(
        "Generated {} regions with {} adjacencies over {:.0}x{:.0}",
        regions.len(),
        edges,
        bounds.width(),
        bounds.height()
    );

    Ok(Partition {
        regions,
        territory_borders: settings.territory_borders.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(id: RegionId, x: f64, y: f64) -> Seed {
        Seed {
            id,
            x,
            y,
            name: format!("R{}", id),
            territory: "LAND".to_string(),
            district: "North".to_string(),
            terrain: Terrain::Plains,
            importance: 10,
            coastal: false,
            port: false,
        }
    }

    fn neighbors(p: &Partition, id: RegionId) -> Vec<RegionId> {
        p.region(id).unwrap().neighbors.clone()
    }

    #[test]
    fn test_two_seeds_adjacent() {
        let p = generate(&[seed(1, 500.0, 600.0), seed(2, 1500.0, 600.0)], &MapSettings::default());
        assert_eq!(p.len(), 2);
        assert_eq!(neighbors(&p, 1), vec![2]);
        assert_eq!(neighbors(&p, 2), vec![1]);
    }

    #[test]
    fn test_row_only_touches_next() {
        let seeds = [
            seed(1, 100.0, 500.0),
            seed(2, 500.0, 500.0),
            seed(3, 900.0, 500.0),
        ];
        let p = generate(&seeds, &MapSettings::default());
        assert_eq!(neighbors(&p, 1), vec![2]);
        assert_eq!(neighbors(&p, 2), vec![1, 3]);
        assert_eq!(neighbors(&p, 3), vec![2]);
    }

    #[test]
    fn test_grid_diagonals_not_adjacent() {
        // 3x3 grid: cells are squares that only touch diagonally at corners.
        let mut seeds = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                let id = (row * 3 + col + 1) as RegionId;
                seeds.push(seed(id, 400.0 + col as f64 * 400.0, 200.0 + row as f64 * 400.0));
            }
        }
        let p = generate(&seeds, &MapSettings::default());
        assert_eq!(neighbors(&p, 5), vec![2, 4, 6, 8]);
        assert_eq!(neighbors(&p, 1), vec![2, 4]);
        assert_eq!(neighbors(&p, 9), vec![6, 8]);
    }

    #[test]
    fn test_single_seed_takes_everything() {
        let settings = MapSettings::default();
        let p = generate(&[seed(42, 100.0, 100.0)], &settings);
        assert_eq!(p.len(), 1);
        let r = &p.regions[0];
        assert!(r.neighbors.is_empty());
        let bounds = settings.canvas.rect().expand(settings.canvas.margin);
        assert!((r.boundary.area() - bounds.width() * bounds.height()).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_seeds_stay_present() {
        let seeds = [
            seed(1, 500.0, 500.0),
            seed(2, 500.0, 500.0),
            seed(3, 900.0, 500.0),
        ];
        let p = generate(&seeds, &MapSettings::default());
        assert_eq!(p.len(), 3);
        assert!(neighbors(&p, 2).is_empty());
        assert!(p.region(2).unwrap().boundary.is_empty());
        assert_eq!(neighbors(&p, 1), vec![3]);
        assert_eq!(neighbors(&p, 3), vec![1]);
    }

    #[test]
    fn test_failures_yield_empty_partition() {
        let settings = MapSettings::default();
        assert_eq!(try_generate(&[], &settings), Err(GenerationError::NoSeeds));
        assert!(!generate(&[], &settings).is_ready());

        let dup = [seed(1, 0.0, 0.0), seed(1, 10.0, 10.0)];
        assert_eq!(
            try_generate(&dup, &settings),
            Err(GenerationError::DuplicateSeedId(1))
        );
        assert!(generate(&dup, &settings).is_empty());

        let nan = [seed(1, f64::NAN, 0.0)];
        assert_eq!(
            try_generate(&nan, &settings),
            Err(GenerationError::NonFiniteSeed(1))
        );

        let mut flat = MapSettings::default();
        flat.canvas.height = 0.0;
        assert!(matches!(
            try_generate(&[seed(1, 0.0, 0.0)], &flat),
            Err(GenerationError::InvalidCanvas { .. })
        ));
        assert!(generate(&[seed(1, 0.0, 0.0)], &flat).territory_borders.is_empty());
    }

    #[test]
    fn test_seed_outside_canvas_still_gets_cell() {
        let seeds = [seed(1, -900.0, 600.0), seed(2, 1000.0, 600.0)];
        let p = generate(&seeds, &MapSettings::default());
        assert!(!p.region(1).unwrap().boundary.is_empty());
        assert_eq!(neighbors(&p, 1), vec![2]);
    }

    #[test]
    fn test_attributes_from_importance() {
        let low = RegionAttributes::from_importance(20);
        assert_eq!(low.manpower, 3000);
        assert_eq!(low.factories, 1);
        assert_eq!(low.victory_points, 20);
        let high = RegionAttributes::from_importance(21);
        assert_eq!(high.factories, 4);
        assert_eq!(high.infrastructure, 5);
        assert_eq!(high.supply_limit, 15);
        assert_eq!(high.compliance, 100);
        assert_eq!(RegionAttributes::from_importance(u32::MAX).manpower, u32::MAX);
    }

    #[test]
    fn test_allegiance_precedence() {
        let mut allegiance = Allegiance::default();
        allegiance
            .territories
            .insert("LAND".to_string(), "Blue".to_string());
        allegiance.districts.push(DistrictRule {
            territory: "LAND".to_string(),
            district: "South".to_string(),
            faction: "Rebels".to_string(),
        });
        allegiance.regions.insert(3, "Red".to_string());

        let north = seed(1, 0.0, 0.0);
        let mut south = seed(2, 0.0, 0.0);
        south.district = "South".to_string();
        let mut overridden = seed(3, 0.0, 0.0);
        overridden.district = "South".to_string();
        let mut elsewhere = seed(4, 0.0, 0.0);
        elsewhere.territory = "SEA".to_string();

        assert_eq!(allegiance.resolve(&north), "Blue");
        assert_eq!(allegiance.resolve(&south), "Rebels");
        assert_eq!(allegiance.resolve(&overridden), "Red");
        assert_eq!(allegiance.resolve(&elsewhere), factions::NEUTRAL);
    }

    #[test]
    fn test_owner_equals_controller_and_borders_pass_through() {
        let mut settings = MapSettings::default();
        settings
            .territory_borders
            .insert("LAND".to_string(), "M 0,0 L 10,0 Z".to_string());
        let p = generate(&[seed(1, 10.0, 10.0), seed(2, 90.0, 10.0)], &settings);
        for r in &p.regions {
            assert_eq!(r.owner, r.controller);
            assert_eq!(r.owner, factions::NEUTRAL);
        }
        assert_eq!(p.territory_borders, settings.territory_borders);
    }
}
