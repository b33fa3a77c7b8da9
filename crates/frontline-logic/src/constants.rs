//! Map constants: canvas defaults, derived region attributes, faction tags.
//!
//! Plain constants with no dependencies. Both the library and the headless
//! harness use these.

/// Canvas width in map units.
pub const CANVAS_WIDTH: f64 = 2000.0;
/// Canvas height in map units.
pub const CANVAS_HEIGHT: f64 = 1200.0;
/// Padding added around the canvas before clipping cells, so border cells
/// stay bounded without being cut at the visible edge.
pub const CANVAS_MARGIN: f64 = 500.0;

/// Bisector edges shorter than this do not make two regions adjacent.
pub const MIN_SHARED_EDGE: f64 = 1e-6;
/// Seeds closer than this are treated as coincident.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

pub mod attributes {
    /// Manpower every region starts with before importance is applied.
    pub const BASE_MANPOWER: u32 = 1000;
    /// Extra manpower per point of importance.
    pub const MANPOWER_PER_IMPORTANCE: u32 = 100;
    pub const INFRASTRUCTURE: u8 = 5;
    /// Importance strictly above this marks an industrial region.
    pub const INDUSTRIAL_THRESHOLD: u32 = 20;
    pub const INDUSTRIAL_FACTORIES: u8 = 4;
    pub const BASE_FACTORIES: u8 = 1;
    pub const SUPPLY_LIMIT: u8 = 15;
    pub const RESISTANCE: u8 = 0;
    pub const COMPLIANCE: u8 = 100;
    pub const ANTI_AIR: u8 = 0;
}

pub mod factions {
    /// Faction for any seed whose territory has no allegiance rule.
    pub const NEUTRAL: &str = "Neutral";
}
