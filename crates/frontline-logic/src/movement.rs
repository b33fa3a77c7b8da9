//! Order-driven movement: one hop per group per tick.
//!
//! Orders only set a destination. The tick scheduler is the single place a
//! group's region changes: every tick, each group with an order either takes
//! one hop along a shortest path, or has its order cleared because it has
//! arrived or cannot advance. Groups never interact with each other.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pathfinding::NavGraph;
use crate::RegionId;

/// Identifier of a mobile group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Unit type. Display metadata only; movement treats every kind alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Infantry,
    Armor,
    Mechanized,
    Mountaineer,
    Marine,
    Hq,
}

/// A unit group on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileGroup {
    pub id: GroupId,
    pub name: String,
    pub kind: UnitKind,
    pub faction: String,
    /// Formation tag used for stacking and selection.
    pub formation: String,
    pub region: RegionId,
    #[serde(default)]
    pub target: Option<RegionId>,
}

impl MobileGroup {
    pub fn new(
        id: impl Into<String>,
        faction: impl Into<String>,
        formation: impl Into<String>,
        region: RegionId,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: GroupId(id),
            kind: UnitKind::Infantry,
            faction: faction.into(),
            formation: formation.into(),
            region,
            target: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.target {
            None => Phase::Idle,
            Some(t) if t == self.region => Phase::Arrived,
            Some(t) => Phase::EnRoute(t),
        }
    }
}

/// Where a group is in its order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    EnRoute(RegionId),
    Arrived,
}

/// What happened to one group during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Took one hop; the order stays active.
    Moved { from: RegionId, to: RegionId },
    /// Was already at its destination; order cleared.
    Arrived { at: RegionId },
    /// No path to the destination; order cleared, position unchanged.
    Blocked { at: RegionId, target: RegionId },
}

/// Everything that changed in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub transitions: Vec<(GroupId, Transition)>,
}

impl TickReport {
    /// False when no group changed, so callers can skip downstream work.
    pub fn changed(&self) -> bool {
        !self.transitions.is_empty()
    }

    pub fn moved(&self) -> usize {
        self.count(|t| matches!(t, Transition::Moved { .. }))
    }

    pub fn arrived(&self) -> usize {
        self.count(|t| matches!(t, Transition::Arrived { .. }))
    }

    pub fn blocked(&self) -> usize {
        self.count(|t| matches!(t, Transition::Blocked { .. }))
    }

    pub fn transition_of(&self, id: &GroupId) -> Option<Transition> {
        self.transitions
            .iter()
            .find(|(g, _)| g == id)
            .map(|&(_, t)| t)
    }

    fn count(&self, pred: impl Fn(&Transition) -> bool) -> usize {
        self.transitions.iter().filter(|(_, t)| pred(t)).count()
    }
}

/// Advance one group by at most one hop.
pub fn step(group: &mut MobileGroup, nav: &NavGraph) -> Option<Transition> {
    step_with(group, |from, to| nav.next_hop(from, to))
}

fn step_with(
    group: &mut MobileGroup,
    mut next_hop: impl FnMut(RegionId, RegionId) -> RegionId,
) -> Option<Transition> {
    match group.phase() {
        Phase::Idle => None,
        Phase::Arrived => {
            group.target = None;
            Some(Transition::Arrived { at: group.region })
        }
        Phase::EnRoute(target) => {
            let hop = next_hop(group.region, target);
            if hop == group.region {
                log::debug!(
                    "Group {} cannot reach region {} from {}; order cleared",
                    group.id,
                    target,
                    group.region
                );
                group.target = None;
                Some(Transition::Blocked {
                    at: group.region,
                    target,
                })
            } else {
                let from = group.region;
                group.region = hop;
                Some(Transition::Moved { from, to: hop })
            }
        }
    }
}

/// Run one tick over every group.
///
/// Each group with an order takes exactly one step. Next-hop answers are
/// memoised per `(from, to)` for the duration of the tick; the graph is
/// immutable so the answers match a fresh query.
pub fn tick(groups: &mut [MobileGroup], nav: &NavGraph) -> TickReport {
    let mut hops: HashMap<(RegionId, RegionId), RegionId> = HashMap::new();
    let mut report = TickReport::default();
    for group in groups.iter_mut() {
        let transition = step_with(group, |from, to| {
            *hops
                .entry((from, to))
                .or_insert_with(|| nav.next_hop(from, to))
        });
        if let Some(t) = transition {
            report.transitions.push((group.id.clone(), t));
        }
    }
    report
}

/// Give every group in `ids` the order to move to `destination`.
///
/// Nothing moves until the next tick. Ids that match no group are ignored.
/// Returns the number of groups that received the order.
pub fn issue_move(groups: &mut [MobileGroup], ids: &[GroupId], destination: RegionId) -> usize {
    let wanted: HashSet<&GroupId> = ids.iter().collect();
    let mut updated = 0;
    for group in groups.iter_mut().filter(|g| wanted.contains(&g.id)) {
        group.target = Some(destination);
        updated += 1;
    }
    if updated < wanted.len() {
        log::debug!(
            "Move order to region {}: {} of {} ids matched no group",
            destination,
            wanted.len() - updated,
            wanted.len()
        );
    }
    updated
}

/// Groups sharing a region and faction form one stack on the map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackKey {
    pub region: RegionId,
    pub faction: String,
}

/// All stacks, members in stored order.
pub fn stacks(groups: &[MobileGroup]) -> BTreeMap<StackKey, Vec<GroupId>> {
    let mut out: BTreeMap<StackKey, Vec<GroupId>> = BTreeMap::new();
    for g in groups {
        out.entry(StackKey {
            region: g.region,
            faction: g.faction.clone(),
        })
        .or_default()
        .push(g.id.clone());
    }
    out
}

/// The first `count` members of the stack at `region` for `faction`.
pub fn select_from_stack(
    groups: &[MobileGroup],
    region: RegionId,
    faction: &str,
    count: usize,
) -> Vec<GroupId> {
    groups
        .iter()
        .filter(|g| g.region == region && g.faction == faction)
        .take(count)
        .map(|g| g.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> NavGraph {
        NavGraph::from_adjacency(vec![
            (1, vec![2, 5]),
            (2, vec![1, 3]),
            (3, vec![2, 4]),
            (4, vec![3, 5]),
            (5, vec![4, 1]),
        ])
    }

    fn group(id: &str, region: RegionId) -> MobileGroup {
        MobileGroup::new(id, "Blue", "ag_1", region)
    }

    #[test]
    fn test_idle_groups_never_change() {
        let nav = ring();
        let mut groups = vec![group("a", 1), group("b", 4)];
        let before = groups.clone();
        for _ in 0..5 {
            let report = tick(&mut groups, &nav);
            assert!(!report.changed());
        }
        assert_eq!(groups, before);
    }

    #[test]
    fn test_ring_scenario() {
        let nav = ring();
        let mut groups = vec![group("a", 1)];
        assert_eq!(issue_move(&mut groups, &["a".into()], 3), 1);
        // Ordering alone does not move anything.
        assert_eq!(groups[0].region, 1);

        let r1 = tick(&mut groups, &nav);
        assert_eq!(r1.transition_of(&"a".into()), Some(Transition::Moved { from: 1, to: 2 }));
        assert_eq!(groups[0].target, Some(3));

        let r2 = tick(&mut groups, &nav);
        assert_eq!(r2.moved(), 1);
        assert_eq!(groups[0].region, 3);
        assert_eq!(groups[0].phase(), Phase::Arrived);

        let r3 = tick(&mut groups, &nav);
        assert_eq!(r3.transition_of(&"a".into()), Some(Transition::Arrived { at: 3 }));
        assert_eq!(groups[0].region, 3);
        assert_eq!(groups[0].target, None);

        assert!(!tick(&mut groups, &nav).changed());
    }

    #[test]
    fn test_unreachable_order_clears_in_one_tick() {
        // 1's only neighbor is 2; nothing leads to 99.
        let nav = NavGraph::from_adjacency(vec![(1, vec![2]), (2, vec![1])]);
        let mut groups = vec![group("a", 1)];
        issue_move(&mut groups, &["a".into()], 99);

        let report = tick(&mut groups, &nav);
        assert_eq!(report.blocked(), 1);
        assert_eq!(
            report.transition_of(&"a".into()),
            Some(Transition::Blocked { at: 1, target: 99 })
        );
        assert_eq!(groups[0].region, 1);
        assert_eq!(groups[0].target, None);
    }

    #[test]
    fn test_order_to_current_region_arrives_next_tick() {
        let nav = ring();
        let mut groups = vec![group("a", 4)];
        issue_move(&mut groups, &["a".into()], 4);
        let report = tick(&mut groups, &nav);
        assert_eq!(report.arrived(), 1);
        assert_eq!(groups[0].region, 4);
        assert_eq!(groups[0].target, None);
    }

    #[test]
    fn test_new_order_mid_transit_uses_current_position() {
        let nav = NavGraph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 5)]);
        let mut groups = vec![group("a", 1)];
        issue_move(&mut groups, &["a".into()], 5);
        tick(&mut groups, &nav);
        tick(&mut groups, &nav);
        assert_eq!(groups[0].region, 3);

        issue_move(&mut groups, &["a".into()], 1);
        tick(&mut groups, &nav);
        assert_eq!(groups[0].region, 2);
        assert_eq!(groups[0].target, Some(1));
    }

    #[test]
    fn test_groups_move_independently() {
        let nav = NavGraph::from_edges(&[(1, 2), (2, 3)]);
        let mut groups = vec![group("a", 1), group("b", 1), group("c", 3)];
        issue_move(&mut groups, &["a".into(), "b".into()], 3);
        issue_move(&mut groups, &["c".into()], 1);
        let report = tick(&mut groups, &nav);
        assert_eq!(report.moved(), 3);
        assert!(groups.iter().all(|g| g.region == 2));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut groups = vec![group("a", 1), group("b", 2)];
        let updated = issue_move(&mut groups, &["b".into(), "ghost".into()], 5);
        assert_eq!(updated, 1);
        assert_eq!(groups[0].target, None);
        assert_eq!(groups[1].target, Some(5));
        assert_eq!(issue_move(&mut groups, &[], 5), 0);
    }

    #[test]
    fn test_stacks_and_selection() {
        let mut groups = vec![group("a", 1), group("b", 1), group("c", 1), group("d", 2)];
        groups[2].faction = "Red".to_string();

        let all = stacks(&groups);
        assert_eq!(all.len(), 3);
        let blue_1 = StackKey {
            region: 1,
            faction: "Blue".to_string(),
        };
        assert_eq!(all[&blue_1], vec![GroupId::from("a"), GroupId::from("b")]);

        assert_eq!(select_from_stack(&groups, 1, "Blue", 1), vec![GroupId::from("a")]);
        assert_eq!(select_from_stack(&groups, 1, "Blue", 10).len(), 2);
        assert!(select_from_stack(&groups, 3, "Blue", 10).is_empty());
    }

    #[test]
    fn test_group_json_shape() {
        let json = r#"{"id":"u1","name":"88th Armor","kind":"armor","faction":"Iran Regime",
            "formation":"ag_iran_1","region":101}"#;
        let g: MobileGroup = serde_json::from_str(json).unwrap();
        assert_eq!(g.id, GroupId::from("u1"));
        assert_eq!(g.kind, UnitKind::Armor);
        assert_eq!(g.phase(), Phase::Idle);
    }
}
