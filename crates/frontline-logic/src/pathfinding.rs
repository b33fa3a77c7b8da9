//! Pure pathfinding over the region adjacency graph.
//!
//! `NavGraph` holds a dense adjacency list built from the partition's
//! neighbor sets and answers shortest-hop queries with BFS. Neighbor order
//! is kept exactly as stored, so ties resolve the same way every time.

use std::collections::{HashMap, VecDeque};

use crate::partition::Region;
use crate::RegionId;

/// Read-only navigation graph over regions.
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    /// region id → dense index
    index: HashMap<RegionId, usize>,
    ids: Vec<RegionId>,
    /// dense index → neighbor indices, in stored order
    adj: Vec<Vec<usize>>,
}

impl NavGraph {
    /// Build a navigation graph from generated regions.
    pub fn from_regions(regions: &[Region]) -> Self {
        Self::from_adjacency(
            regions
                .iter()
                .map(|r| (r.id, r.neighbors.iter().copied().collect::<Vec<_>>())),
        )
    }

    /// Build a graph from `(id, neighbors)` lists, keeping neighbor order.
    ///
    /// Ids that only appear as neighbors become nodes with no edges of their
    /// own.
    pub fn from_adjacency<I, N>(list: I) -> Self
    where
        I: IntoIterator<Item = (RegionId, N)>,
        N: IntoIterator<Item = RegionId>,
    {
        let mut graph = Self::default();
        for (id, neighbors) in list {
            let from = graph.intern(id);
            for n in neighbors {
                let to = graph.intern(n);
                graph.adj[from].push(to);
            }
        }
        graph
    }

    /// Build an undirected graph from edge pairs, in the order given.
    pub fn from_edges(edges: &[(RegionId, RegionId)]) -> Self {
        let mut graph = Self::default();
        for &(a, b) in edges {
            let ia = graph.intern(a);
            let ib = graph.intern(b);
            graph.adj[ia].push(ib);
            graph.adj[ib].push(ia);
        }
        graph
    }

    fn intern(&mut self, id: RegionId) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.ids.len();
        self.index.insert(id, i);
        self.ids.push(id);
        self.adj.push(Vec::new());
        i
    }

    /// First step on a shortest-hop path from `start` to `target`.
    ///
    /// Returns `start` when already there, and also when `target` cannot be
    /// reached; the caller reads that as "cannot advance".
    pub fn next_hop(&self, start: RegionId, target: RegionId) -> RegionId {
        self.find_path(start, target)
            .and_then(|path| path.first().copied())
            .unwrap_or(start)
    }

    /// Regions entered on the way from `start` to `target`, excluding `start`.
    ///
    /// Returns empty vec if same region. Returns `None` if unreachable.
    pub fn find_path(&self, start: RegionId, target: RegionId) -> Option<Vec<RegionId>> {
        if start == target {
            return Some(vec![]);
        }
        let from = *self.index.get(&start)?;
        let to = *self.index.get(&target)?;
        let path = self.bfs(from, to)?;
        Some(path.into_iter().map(|i| self.ids[i]).collect())
    }

    /// Number of hops between two regions, if connected.
    pub fn hop_distance(&self, start: RegionId, target: RegionId) -> Option<usize> {
        self.find_path(start, target).map(|p| p.len())
    }

    /// Neighbors of a region, in stored order.
    pub fn neighbors(&self, id: RegionId) -> impl Iterator<Item = RegionId> + '_ {
        self.index
            .get(&id)
            .map(|&i| self.adj[i].as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&j| self.ids[j])
    }

    /// Check if a region exists in the graph.
    pub fn has_region(&self, id: RegionId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of regions in the graph.
    pub fn region_count(&self) -> usize {
        self.ids.len()
    }

    /// Connected components, each listed in discovery order.
    pub fn components(&self) -> Vec<Vec<RegionId>> {
        let mut seen = vec![false; self.ids.len()];
        let mut components = Vec::new();
        for start in 0..self.ids.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut members = vec![self.ids[start]];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for &next in &self.adj[current] {
                    if !seen[next] {
                        seen[next] = true;
                        members.push(self.ids[next]);
                        queue.push_back(next);
                    }
                }
            }
            components.push(members);
        }
        components
    }

    fn bfs(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let mut parent: Vec<Option<usize>> = vec![None; self.ids.len()];
        let mut visited = vec![false; self.ids.len()];
        let mut queue = VecDeque::new();
        visited[from] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &next in &self.adj[current] {
                if next == to {
                    let mut path = vec![next];
                    let mut step = current;
                    while step != from {
                        path.push(step);
                        step = parent[step]?;
                    }
                    path.reverse();
                    return Some(path);
                }
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}
