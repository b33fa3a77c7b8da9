//! Host-side world state.
//!
//! `Session` bundles the immutable partition with the mutable group list and
//! is the only writer of that list: orders and ticks both take `&mut self`,
//! so one mutation pass always completes before the next begins. The host's
//! timer calls [`Session::tick`]; while a foreground sequence is active the
//! host marks the session blocked and both ticks and orders are ignored.

use crate::movement::{self, GroupId, MobileGroup, TickReport};
use crate::partition::{self, Partition};
use crate::pathfinding::NavGraph;
use crate::scenario::Scenario;
use crate::RegionId;

pub struct Session {
    partition: Partition,
    nav: NavGraph,
    groups: Vec<MobileGroup>,
    blocked: bool,
    ticks: u64,
}

impl Session {
    pub fn new(partition: Partition, groups: Vec<MobileGroup>) -> Self {
        let nav = partition.nav_graph();
        Self {
            partition,
            nav,
            groups,
            blocked: false,
            ticks: 0,
        }
    }

    /// Generate the map for a scenario and place its starting forces.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let partition = partition::generate(&scenario.seeds, &scenario.settings);
        Self::new(partition, scenario.forces.clone())
    }

    /// False until the partition has regions.
    pub fn is_ready(&self) -> bool {
        self.partition.is_ready()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Suspend (or resume) ticks and orders, e.g. during a cutscene.
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Advance every group one step. Does nothing while blocked or not ready.
    pub fn tick(&mut self) -> TickReport {
        if self.blocked || !self.is_ready() {
            return TickReport::default();
        }
        let report = movement::tick(&mut self.groups, &self.nav);
        self.ticks += 1;
        if report.changed() {
            log::debug!(
                "Tick {}: {} moved, {} arrived, {} blocked",
                self.ticks,
                report.moved(),
                report.arrived(),
                report.blocked()
            );
        }
        report
    }

    /// Order groups toward `destination`. Ignored while blocked.
    pub fn issue_move(&mut self, ids: &[GroupId], destination: RegionId) -> usize {
        if self.blocked {
            log::debug!("Move order ignored while session is blocked");
            return 0;
        }
        movement::issue_move(&mut self.groups, ids, destination)
    }

    pub fn groups(&self) -> &[MobileGroup] {
        &self.groups
    }

    pub fn group(&self, id: &GroupId) -> Option<&MobileGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn nav(&self) -> &NavGraph {
        &self.nav
    }

    /// Ticks actually run (blocked calls are not counted).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
