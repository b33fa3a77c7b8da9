//! Validation for generated region graphs.
//!
//! Pure functions that take regions (and the seeds they came from) and
//! return validation errors. Used by the harness and the integration tests;
//! generation itself never depends on them.

use std::collections::{HashMap, HashSet};

use crate::partition::Region;
use crate::pathfinding::NavGraph;
use crate::seeds::Seed;
use crate::RegionId;

/// A region graph validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Partition completeness ───────────────────────────────────────────

/// Check exactly one region per seed, matched by identifier.
pub fn check_region_count(regions: &[Region], seeds: &[Seed]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if regions.len() != seeds.len() {
        errors.push(ValidationError {
            category: "completeness",
            severity: Severity::Error,
            message: format!("{} seeds produced {} regions", seeds.len(), regions.len()),
        });
    }
    let region_ids: HashSet<RegionId> = regions.iter().map(|r| r.id).collect();
    for s in seeds {
        if !region_ids.contains(&s.id) {
            errors.push(ValidationError {
                category: "completeness",
                severity: Severity::Error,
                message: format!("Seed #{} ({}) has no region", s.id, s.name),
            });
        }
    }
    let seed_ids: HashSet<RegionId> = seeds.iter().map(|s| s.id).collect();
    for r in regions {
        if !seed_ids.contains(&r.id) {
            errors.push(ValidationError {
                category: "completeness",
                severity: Severity::Error,
                message: format!("Region #{} matches no seed", r.id),
            });
        }
    }
    errors
}

/// Warn about regions that ended up with no outline (coincident seeds).
pub fn check_degenerate_cells(regions: &[Region]) -> Vec<ValidationError> {
    regions
        .iter()
        .filter(|r| r.boundary.is_empty())
        .map(|r| ValidationError {
            category: "geometry",
            severity: Severity::Warning,
            message: format!("Region #{} ({}) has an empty outline", r.id, r.name),
        })
        .collect()
}

// ── B. Adjacency ────────────────────────────────────────────────────────

/// Check that every neighbor id names a region.
pub fn check_unknown_neighbors(regions: &[Region]) -> Vec<ValidationError> {
    let ids: HashSet<RegionId> = regions.iter().map(|r| r.id).collect();
    let mut errors = Vec::new();
    for r in regions {
        for n in &r.neighbors {
            if !ids.contains(n) {
                errors.push(ValidationError {
                    category: "adjacency",
                    severity: Severity::Error,
                    message: format!("Region #{} lists unknown neighbor #{}", r.id, n),
                });
            }
        }
    }
    errors
}

/// Check that no region lists itself as a neighbor.
pub fn check_self_loops(regions: &[Region]) -> Vec<ValidationError> {
    regions
        .iter()
        .filter(|r| r.neighbors.contains(&r.id))
        .map(|r| ValidationError {
            category: "adjacency",
            severity: Severity::Error,
            message: format!("Region #{} lists itself as a neighbor", r.id),
        })
        .collect()
}

/// Check that adjacency is undirected: A lists B iff B lists A.
pub fn check_symmetry(regions: &[Region]) -> Vec<ValidationError> {
    let by_id: HashMap<RegionId, &Region> = regions.iter().map(|r| (r.id, r)).collect();
    let mut errors = Vec::new();
    for r in regions {
        for n in &r.neighbors {
            let Some(other) = by_id.get(n) else {
                continue; // caught by unknown-neighbor check
            };
            if !other.neighbors.contains(&r.id) {
                errors.push(ValidationError {
                    category: "adjacency",
                    severity: Severity::Error,
                    message: format!(
                        "Region #{} lists #{} but #{} does not list #{}",
                        r.id, n, n, r.id
                    ),
                });
            }
        }
    }
    errors
}

// ── C. Connectivity ─────────────────────────────────────────────────────

/// Warn once per component beyond the largest; isolated regions are legal.
pub fn check_connectivity(regions: &[Region]) -> Vec<ValidationError> {
    let mut components = NavGraph::from_regions(regions).components();
    if components.len() <= 1 {
        return Vec::new();
    }
    components.sort_by(|a, b| b.len().cmp(&a.len()));
    let main = components[0].len();
    components
        .iter()
        .skip(1)
        .map(|c| ValidationError {
            category: "connectivity",
            severity: Severity::Warning,
            message: format!(
                "{} regions cut off from the main graph of {} (e.g. region #{})",
                c.len(),
                main,
                c[0]
            ),
        })
        .collect()
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all region graph validations and return combined results.
pub fn validate_all(regions: &[Region], seeds: &[Seed]) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_region_count(regions, seeds));
    all.extend(check_degenerate_cells(regions));
    all.extend(check_unknown_neighbors(regions));
    all.extend(check_self_loops(regions));
    all.extend(check_symmetry(regions));
    all.extend(check_connectivity(regions));
    all
}

/// Errors only, dropping warnings.
pub fn errors_only(all: &[ValidationError]) -> Vec<&ValidationError> {
    all.iter()
        .filter(|e| e.severity == Severity::Error)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{generate, MapSettings};
    use crate::seeds::Terrain;

    fn make_seed(id: RegionId, x: f64, y: f64) -> Seed {
        Seed {
            id,
            x,
            y,
            name: format!("S{}", id),
            territory: "LAND".to_string(),
            district: "D".to_string(),
            terrain: Terrain::Hills,
            importance: 5,
            coastal: false,
            port: false,
        }
    }

    fn generated() -> (Vec<Seed>, Vec<Region>) {
        let seeds = vec![
            make_seed(1, 200.0, 200.0),
            make_seed(2, 800.0, 250.0),
            make_seed(3, 500.0, 700.0),
            make_seed(4, 1400.0, 900.0),
        ];
        let regions = generate(&seeds, &MapSettings::default()).regions;
        (seeds, regions)
    }

    #[test]
    fn test_generated_graph_is_clean() {
        let (seeds, regions) = generated();
        assert!(validate_all(&regions, &seeds).is_empty());
    }

    #[test]
    fn test_asymmetric_neighbor() {
        let (_, mut regions) = generated();
        let victim = regions[0].neighbors[0];
        regions
            .iter_mut()
            .find(|r| r.id == victim)
            .unwrap()
            .neighbors
            .retain(|&n| n != 1);
        let errors = check_symmetry(&regions);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "adjacency");
    }

    #[test]
    fn test_self_loop_and_unknown_neighbor() {
        let (_, mut regions) = generated();
        regions[0].neighbors.push(1);
        regions[1].neighbors.push(404);
        assert_eq!(check_self_loops(&regions).len(), 1);
        assert_eq!(check_unknown_neighbors(&regions).len(), 1);
    }

    #[test]
    fn test_missing_region() {
        let (seeds, mut regions) = generated();
        regions.pop();
        let errors = check_region_count(&regions, &seeds);
        assert_eq!(errors.len(), 2); // count mismatch + seed #4 missing
    }

    #[test]
    fn test_disconnected_is_warning() {
        let (seeds, mut regions) = generated();
        let cut = regions[3].id;
        for r in regions.iter_mut() {
            r.neighbors.retain(|&n| n != cut);
        }
        regions[3].neighbors.clear();
        let all = validate_all(&regions, &seeds);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].severity, Severity::Warning);
        assert!(errors_only(&all).is_empty());
    }

    #[test]
    fn test_coincident_seed_warns() {
        let seeds = vec![make_seed(1, 100.0, 100.0), make_seed(2, 100.0, 100.0)];
        let regions = generate(&seeds, &MapSettings::default()).regions;
        let all = validate_all(&regions, &seeds);
        // Empty outline for #2, plus #2 cut off from #1.
        assert_eq!(all.len(), 2);
        assert!(errors_only(&all).is_empty());
    }
}
