//! Pure map logic for Frontline.
//!
//! This crate contains the algorithmic core of the strategy map: it turns a
//! list of named seed points into a set of adjacent regions, answers
//! shortest-hop queries over that graph, and advances unit groups one hop per
//! tick. Functions take plain data and return results; nothing here renders,
//! sleeps, or touches the disk.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Canvas defaults, attribute derivation constants, faction tags |
//! | [`geometry`] | Points, rectangles, half-plane clipping, opaque boundary payload |
//! | [`movement`] | Tick scheduler, order issuance, stack queries |
//! | [`partition`] | Nearest-seed partition of the canvas into regions with adjacency |
//! | [`pathfinding`] | BFS next-hop queries over the region adjacency graph |
//! | [`scenario`] | JSON theatre loading and validation |
//! | [`seeds`] | Seed points, terrain classes, procedural seed scattering |
//! | [`session`] | Host-side world state: gating, tick counter, single writer |
//! | [`validation`] | Region graph checks (symmetry, self-loops, connectivity) |

pub mod constants;
pub mod geometry;
pub mod movement;
pub mod partition;
pub mod pathfinding;
pub mod scenario;
pub mod seeds;
pub mod session;
pub mod validation;

/// Identifier of a region. Matches the identifier of the seed it grew from.
pub type RegionId = u32;
