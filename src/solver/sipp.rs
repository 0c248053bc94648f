use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};
use tracing::{debug, instrument};

use super::constraint_table::ConstraintTable;
use super::reservation_table::{Interval, ReservationTable};
use crate::common::{Agent, Path, MAX_TIMESTEP};
use crate::map::Map;
use crate::stat::Stats;

// Search nodes live in one arena per low-level call and are addressed by
// handle; parents are handles, so the whole pointer graph is dropped at once
// on every exit path.
#[derive(Debug, Clone)]
struct SippNode {
    position: (usize, usize),
    g_cost: usize,
    h_cost: usize,
    parent: Option<u32>,
    timestep: usize,
    interval: Interval,
    num_of_conflicts: usize,
    is_goal: bool,
    wait_at_goal: bool,
    in_openlist: bool,
}

impl SippNode {
    fn f_cost(&self) -> usize {
        self.g_cost + self.h_cost
    }
}

// Nodes reached within the same safe interval collapse to one state.
type NodeKey = ((usize, usize), usize, bool); // (position, interval.hi, is_goal)

// Heap entries snapshot the node keys they were pushed with; an entry whose
// snapshot no longer matches the node is stale and skipped on pop.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FocalEntry {
    num_of_conflicts: usize,
    f_cost: usize,
    g_cost: usize,
    handle: u32,
}

impl Ord for FocalEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: fewer conflicts, then smaller f, then
        // larger g pops first.
        other
            .num_of_conflicts
            .cmp(&self.num_of_conflicts)
            .then_with(|| other.f_cost.cmp(&self.f_cost))
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

impl PartialOrd for FocalEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenEntry {
    f_cost: usize,
    num_of_conflicts: usize,
    g_cost: usize,
    handle: u32,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.num_of_conflicts.cmp(&self.num_of_conflicts))
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct SippSearch<'a, 'b> {
    map: &'a Map,
    agent: &'a Agent,
    constraint_table: &'a ConstraintTable<'b>,
    reservation_table: ReservationTable<'a, 'b>,
    nodes: Vec<SippNode>,
    node_table: HashMap<NodeKey, u32>,
    focal_list: BinaryHeap<FocalEntry>,
    open_list: BinaryHeap<OpenEntry>,
    holding_time: usize,
    min_f_val: usize,
    w: f64,
}

impl<'a, 'b> SippSearch<'a, 'b> {
    fn new(map: &'a Map, agent: &'a Agent, constraint_table: &'a ConstraintTable<'b>) -> Self {
        SippSearch {
            map,
            agent,
            constraint_table,
            reservation_table: ReservationTable::new(constraint_table),
            nodes: Vec::new(),
            node_table: HashMap::new(),
            focal_list: BinaryHeap::new(),
            open_list: BinaryHeap::new(),
            holding_time: 0,
            min_f_val: 0,
            w: 1.0,
        }
    }

    fn heuristic(&self, pos: (usize, usize)) -> usize {
        self.map.heuristic[self.agent.id][pos.0][pos.1]
    }

    fn alloc(&mut self, node: SippNode, stats: &mut Stats) -> u32 {
        let handle = self.nodes.len() as u32;
        self.nodes.push(node);
        stats.num_ll_generated += 1;
        handle
    }

    fn key(node: &SippNode) -> NodeKey {
        (node.position, node.interval.hi, node.is_goal)
    }

    fn focal_entry(&self, handle: u32) -> FocalEntry {
        let node = &self.nodes[handle as usize];
        FocalEntry {
            num_of_conflicts: node.num_of_conflicts,
            f_cost: node.f_cost(),
            g_cost: node.g_cost,
            handle,
        }
    }

    fn open_entry(&self, handle: u32) -> OpenEntry {
        let node = &self.nodes[handle as usize];
        OpenEntry {
            f_cost: node.f_cost(),
            num_of_conflicts: node.num_of_conflicts,
            g_cost: node.g_cost,
            handle,
        }
    }

    fn start_node(&mut self, stats: &mut Stats) -> Option<u32> {
        if self.heuristic(self.agent.start) >= MAX_TIMESTEP {
            return None;
        }
        let first = self
            .reservation_table
            .get_first_safe_interval(self.agent.start)?;
        if first.lo > 0 {
            return None;
        }
        let h_cost = self.heuristic(self.agent.start).max(self.holding_time);
        let start = SippNode {
            position: self.agent.start,
            g_cost: 0,
            h_cost,
            parent: None,
            timestep: 0,
            interval: first,
            num_of_conflicts: 0,
            is_goal: false,
            wait_at_goal: false,
            in_openlist: true,
        };
        let handle = self.alloc(start, stats);
        self.node_table
            .insert(Self::key(&self.nodes[handle as usize]), handle);
        Some(handle)
    }

    /// Walk the parent chain, filling waits between consecutive arrivals.
    fn construct_path(&self, handle: u32) -> Path {
        let mut path = vec![(0, 0); self.nodes[handle as usize].timestep + 1];
        let mut curr = handle;
        while let Some(parent) = self.nodes[curr as usize].parent {
            let node = &self.nodes[curr as usize];
            let prev = &self.nodes[parent as usize];
            for slot in path.iter_mut().take(node.timestep).skip(prev.timestep + 1) {
                *slot = prev.position;
            }
            path[node.timestep] = node.position;
            curr = parent;
        }
        debug_assert_eq!(self.nodes[curr as usize].timestep, 0);
        path[0] = self.nodes[curr as usize].position;
        path
    }

    /// Dedupe against `(position, interval.hi, is_goal)`: keep the earlier
    /// arrival, break ties on fewer conflicts; reopened or updated nodes are
    /// re-pushed and stale heap entries die on pop.
    fn insert_or_update(&mut self, node: SippNode, with_open_list: bool, stats: &mut Stats) {
        let key = Self::key(&node);
        match self.node_table.get(&key) {
            None => {
                let handle = self.alloc(node, stats);
                self.node_table.insert(key, handle);
                self.push_node(handle, with_open_list);
            }
            Some(&existing) => {
                let known = &self.nodes[existing as usize];
                if known.timestep > node.timestep
                    || (known.timestep == node.timestep
                        && known.num_of_conflicts > node.num_of_conflicts)
                {
                    self.nodes[existing as usize] = SippNode {
                        in_openlist: true,
                        ..node
                    };
                    self.push_node(existing, with_open_list);
                }
            }
        }
    }

    fn push_node(&mut self, handle: u32, with_open_list: bool) {
        if with_open_list {
            self.open_list.push(self.open_entry(handle));
            let f_cost = self.nodes[handle as usize].f_cost();
            if f_cost as f64 <= self.w * self.min_f_val as f64 {
                self.focal_list.push(self.focal_entry(handle));
            }
        } else {
            self.focal_list.push(self.focal_entry(handle));
        }
    }

    fn pop_focal(&mut self, stats: &mut Stats) -> Option<u32> {
        while let Some(entry) = self.focal_list.pop() {
            let handle = entry.handle;
            if self.nodes[handle as usize].in_openlist && entry == self.focal_entry(handle) {
                self.nodes[handle as usize].in_openlist = false;
                stats.num_ll_expanded += 1;
                return Some(handle);
            }
        }
        None
    }

    fn child(
        &self,
        interval: Interval,
        parent_handle: u32,
        next_position: (usize, usize),
        base_h: usize,
        is_wait: bool,
    ) -> SippNode {
        let parent = &self.nodes[parent_handle as usize];
        let arrival = (parent.timestep + 1).max(interval.lo);
        let h_cost = base_h.max(parent.f_cost().saturating_sub(arrival)); // path max
        let num_of_conflicts = parent.num_of_conflicts
            + if is_wait {
                interval.num_of_collisions
            } else {
                interval.num_of_collisions * (arrival - parent.timestep)
            };
        SippNode {
            position: next_position,
            g_cost: arrival,
            h_cost,
            parent: Some(parent_handle),
            timestep: arrival,
            interval,
            num_of_conflicts,
            is_goal: false,
            wait_at_goal: is_wait && next_position == self.agent.goal,
            in_openlist: true,
        }
    }

    /// Conflict-minimizing search: one focal queue whose ordering is the
    /// conflicts-first key.
    fn find_path(&mut self, stats: &mut Stats) -> Path {
        self.holding_time = self
            .constraint_table
            .get_holding_time(self.agent.goal, self.constraint_table.length_min);
        let Some(start) = self.start_node(stats) else {
            return Vec::new();
        };
        self.focal_list.push(self.focal_entry(start));

        while let Some(handle) = self.pop_focal(stats) {
            let curr = self.nodes[handle as usize].clone();
            if curr.is_goal {
                return self.construct_path(curr.parent.unwrap());
            }
            if curr.position == self.agent.goal
                && !curr.wait_at_goal
                && curr.timestep >= self.holding_time
            {
                let future_collisions = self
                    .constraint_table
                    .get_future_num_of_collisions(self.agent.goal, curr.timestep);
                if future_collisions == 0 {
                    return self.construct_path(handle);
                }
                // Stopping here means eating every later crossing; keep the
                // option around as a priced goal state.
                let mut goal_node = curr.clone();
                goal_node.is_goal = true;
                goal_node.parent = Some(handle);
                goal_node.num_of_conflicts += future_collisions;
                goal_node.in_openlist = true;
                self.insert_or_update(goal_node, false, stats);
            }
            for next_position in self.map.grid[curr.position.0][curr.position.1]
                .neighbors
                .clone()
            {
                let base_h = self.heuristic(next_position);
                if base_h >= MAX_TIMESTEP {
                    continue;
                }
                for interval in self.reservation_table.get_safe_intervals(
                    curr.position,
                    next_position,
                    curr.timestep + 1,
                    curr.interval.hi + 1,
                ) {
                    let arrival = (curr.timestep + 1).max(interval.lo);
                    if arrival + base_h > self.constraint_table.length_max {
                        break;
                    }
                    let child = self.child(interval, handle, next_position, base_h, false);
                    self.insert_or_update(child, false, stats);
                }
            }
            if let Some(interval) = self
                .reservation_table
                .find_safe_interval(curr.position, curr.interval.hi)
            {
                let child = self.child(interval, handle, curr.position, curr.h_cost, true);
                self.insert_or_update(child, false, stats);
            }
        }

        Vec::new()
    }

    /// Bounded-suboptimal search: OPEN ordered by f, FOCAL holds the open
    /// nodes within `w * min_f_val` ordered by conflicts. Returns the path
    /// and the final lower bound.
    fn find_suboptimal_path(&mut self, lowerbound: usize, w: f64, stats: &mut Stats) -> (Path, usize) {
        self.w = w;
        self.holding_time = self
            .constraint_table
            .get_holding_time(self.agent.goal, self.constraint_table.length_min);
        let Some(start) = self.start_node(stats) else {
            return (Vec::new(), 0);
        };
        self.min_f_val = self
            .holding_time
            .max(self.nodes[start as usize].f_cost())
            .max(lowerbound);
        self.open_list.push(self.open_entry(start));
        self.focal_list.push(self.focal_entry(start));

        loop {
            if !self.update_focal_list() {
                break;
            }
            let Some(handle) = self.pop_focal(stats) else {
                break;
            };
            let curr = self.nodes[handle as usize].clone();
            if curr.position == self.agent.goal
                && !curr.wait_at_goal
                && curr.timestep >= self.holding_time
            {
                return (self.construct_path(handle), self.min_f_val);
            }
            for next_position in self.map.grid[curr.position.0][curr.position.1]
                .neighbors
                .clone()
            {
                let base_h = self.heuristic(next_position);
                if base_h >= MAX_TIMESTEP {
                    continue;
                }
                for interval in self.reservation_table.get_safe_intervals(
                    curr.position,
                    next_position,
                    curr.timestep + 1,
                    curr.interval.hi + 1,
                ) {
                    let child = self.child(interval, handle, next_position, base_h, false);
                    if child.f_cost() > self.constraint_table.length_max {
                        continue;
                    }
                    self.insert_or_update(child, true, stats);
                }
            }
            if let Some(interval) = self
                .reservation_table
                .find_safe_interval(curr.position, curr.interval.hi)
            {
                let child = self.child(interval, handle, curr.position, self.heuristic(curr.position), true);
                if child.f_cost() <= self.constraint_table.length_max {
                    self.insert_or_update(child, true, stats);
                }
            }
        }

        (Vec::new(), self.min_f_val)
    }

    /// Purge stale OPEN heads; when the minimum f rose, promote every open
    /// node that newly fits under `w * min_f_val` into FOCAL.
    fn update_focal_list(&mut self) -> bool {
        while let Some(head) = self.open_list.peek() {
            let handle = head.handle;
            if self.nodes[handle as usize].in_openlist && *head == self.open_entry(handle) {
                break;
            }
            self.open_list.pop();
        }
        let Some(head) = self.open_list.peek() else {
            return false;
        };
        let head_f = head.f_cost;
        if head_f > self.min_f_val {
            let old_bound = self.w * self.min_f_val as f64;
            let new_bound = self.w * head_f as f64;
            let promoted: Vec<u32> = (0..self.nodes.len() as u32)
                .filter(|&handle| {
                    let node = &self.nodes[handle as usize];
                    let f_cost = node.f_cost() as f64;
                    node.in_openlist && f_cost > old_bound && f_cost <= new_bound
                })
                .collect();
            for handle in promoted {
                self.focal_list.push(self.focal_entry(handle));
            }
            self.min_f_val = head_f;
        }
        true
    }
}

/// Path minimizing the number of soft conflicts with the installed paths,
/// ties broken by length. Empty when no path exists within `length_max`.
#[instrument(skip_all, name = "sipp_find_path", fields(agent = agent.id), level = "debug")]
pub fn find_path(
    map: &Map,
    agent: &Agent,
    constraint_table: &ConstraintTable,
    stats: &mut Stats,
) -> Path {
    let mut search = SippSearch::new(map, agent, constraint_table);
    let path = search.find_path(stats);
    debug!(
        "agent {} path cost {} over {} generated nodes",
        agent.id,
        path.len().saturating_sub(1),
        search.nodes.len()
    );
    path
}

/// Shortest path within suboptimality factor `w`, minimizing conflicts among
/// the candidates. Also returns the proven lower bound on the optimal cost.
#[instrument(skip_all, name = "sipp_find_suboptimal_path", fields(agent = agent.id), level = "debug")]
pub fn find_suboptimal_path(
    map: &Map,
    agent: &Agent,
    constraint_table: &ConstraintTable,
    lowerbound: usize,
    w: f64,
    stats: &mut Stats,
) -> (Path, usize) {
    let mut search = SippSearch::new(map, agent, constraint_table);
    search.find_suboptimal_path(lowerbound, w, stats)
}

pub fn find_optimal_path(
    map: &Map,
    agent: &Agent,
    constraint_table: &ConstraintTable,
    lowerbound: usize,
    stats: &mut Stats,
) -> Path {
    find_suboptimal_path(map, agent, constraint_table, lowerbound, 1.0, stats).0
}

#[derive(Clone, Eq, Debug, PartialEq)]
struct TravelNode {
    f_cost: usize,
    g_cost: usize,
    position: (usize, usize),
    time_step: usize,
}

impl Ord for TravelNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then_with(|| other.g_cost.cmp(&self.g_cost))
            .then_with(|| self.position.cmp(&other.position))
            .then_with(|| self.time_step.cmp(&other.time_step))
    }
}

impl PartialOrd for TravelNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest travel time under hard constraints only. Past the last
/// constrained timestep the clock freezes and waits are forbidden, which
/// prunes unbounded waiting. MAX_TIMESTEP when nothing beats `upper_bound`.
pub fn travel_time(
    map: &Map,
    start: (usize, usize),
    goal: (usize, usize),
    constraint_table: &ConstraintTable,
    upper_bound: usize,
) -> usize {
    let static_timestep = constraint_table.get_max_timestep();
    let mut open_list = BTreeSet::new();
    let mut closed_list = HashSet::new();

    open_list.insert(TravelNode {
        f_cost: map.manhattan(start, goal),
        g_cost: 0,
        position: start,
        time_step: 0,
    });

    while let Some(current) = open_list.pop_first() {
        if !closed_list.insert((current.position, current.time_step)) {
            continue;
        }
        if current.position == goal {
            return current.g_cost;
        }

        let frozen = current.time_step >= static_timestep;
        let mut next_positions = map.get_neighbors(current.position.0, current.position.1);
        next_positions.push(current.position);
        for next_position in next_positions {
            if frozen && next_position == current.position {
                continue;
            }
            let next_time_step = if frozen {
                current.time_step
            } else {
                current.time_step + 1
            };
            let next_g_cost = current.g_cost + 1;
            if closed_list.contains(&(next_position, next_time_step)) {
                continue;
            }
            if constraint_table.is_constrained(next_position, next_time_step)
                || constraint_table.is_edge_constrained(
                    current.position,
                    next_position,
                    next_time_step,
                )
            {
                continue;
            }
            let h_cost = map.manhattan(next_position, goal);
            if next_g_cost + h_cost >= upper_bound {
                continue;
            }
            open_list.insert(TravelNode {
                f_cost: next_g_cost + h_cost,
                g_cost: next_g_cost,
                position: next_position,
                time_step: next_time_step,
            });
        }
    }

    MAX_TIMESTEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::paths_conflict;
    use crate::solver::path_table::PathTable;

    fn open_map(agents: &[Agent]) -> Map {
        Map::from_ascii(
            "...
             ...
             ...",
            agents,
        )
    }

    #[test]
    fn test_find_path_shortest_on_empty_grid() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = open_map(&[agent.clone()]);
        let constraint_table = ConstraintTable::new();
        let mut stats = Stats::default();

        let path = find_path(&map, &agent, &constraint_table, &mut stats);
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], agent.start);
        assert_eq!(*path.last().unwrap(), agent.goal);
        assert!(stats.num_ll_generated > 0);
    }

    #[test]
    fn test_find_path_dodges_installed_path() {
        let blocker = Agent {
            id: 0,
            start: (0, 0),
            goal: (0, 2),
        };
        let agent = Agent {
            id: 1,
            start: (0, 2),
            goal: (0, 0),
        };
        let map = Map::from_ascii(
            ".....
             .....",
            &[blocker.clone(), agent.clone()],
        );

        let mut path_table = PathTable::new(2, 5);
        let blocker_path = vec![(0, 0), (0, 1), (0, 2)];
        path_table.insert_path(blocker.id, &blocker_path);

        let constraint_table = ConstraintTable::with_conflict_avoidance(&path_table, MAX_TIMESTEP);
        let mut stats = Stats::default();
        let path = find_path(&map, &agent, &constraint_table, &mut stats);

        assert!(!path.is_empty());
        assert_eq!(*path.last().unwrap(), agent.goal);
        assert!(!paths_conflict(&path, &blocker_path));
    }

    #[test]
    fn test_find_path_outwaits_goal_crossing() {
        // Another agent crosses this agent's goal at t = 3; parking early
        // would eat that collision, so the planner arrives afterwards.
        let crosser = Agent {
            id: 0,
            start: (1, 0),
            goal: (1, 2),
        };
        let agent = Agent {
            id: 1,
            start: (0, 0),
            goal: (0, 2),
        };
        let map = Map::from_ascii(
            "...
             ...",
            &[crosser.clone(), agent.clone()],
        );

        let mut path_table = PathTable::new(2, 3);
        let crosser_path = vec![(1, 0), (1, 1), (1, 2), (0, 2), (1, 2)];
        path_table.insert_path(crosser.id, &crosser_path);

        let constraint_table = ConstraintTable::with_conflict_avoidance(&path_table, MAX_TIMESTEP);
        let mut stats = Stats::default();
        let path = find_path(&map, &agent, &constraint_table, &mut stats);

        assert_eq!(*path.last().unwrap(), agent.goal);
        assert_eq!(path.len(), 5);
        assert!(!paths_conflict(&path, &crosser_path));
    }

    #[test]
    fn test_find_path_empty_when_length_capped() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = open_map(&[agent.clone()]);
        let mut constraint_table = ConstraintTable::new();
        constraint_table.length_max = 3; // four moves are needed
        let mut stats = Stats::default();

        let path = find_path(&map, &agent, &constraint_table, &mut stats);
        assert!(path.is_empty());
    }

    #[test]
    fn test_find_path_empty_when_goal_unreachable() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = Map::from_ascii(
            "..@
             .@@
             @@.",
            &[agent.clone()],
        );
        let constraint_table = ConstraintTable::new();
        let mut stats = Stats::default();

        let path = find_path(&map, &agent, &constraint_table, &mut stats);
        assert!(path.is_empty());
    }

    #[test]
    fn test_find_path_is_idempotent() {
        let blocker = Agent {
            id: 0,
            start: (2, 0),
            goal: (0, 0),
        };
        let agent = Agent {
            id: 1,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = open_map(&[blocker.clone(), agent.clone()]);

        let mut path_table = PathTable::new(3, 3);
        path_table.insert_path(blocker.id, &vec![(2, 0), (1, 0), (0, 0)]);

        let constraint_table = ConstraintTable::with_conflict_avoidance(&path_table, MAX_TIMESTEP);
        let mut stats = Stats::default();
        let first = find_path(&map, &agent, &constraint_table, &mut stats);
        let second = find_path(&map, &agent, &constraint_table, &mut stats);
        assert_eq!(first, second);
    }

    #[test]
    fn test_suboptimal_path_respects_bound() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (0, 2),
        };
        let map = Map::from_ascii("...", &[agent.clone()]);
        let mut constraint_table = ConstraintTable::new();
        // The middle cell is blocked at t = 1, so one wait is forced.
        constraint_table.insert_vertex_constraint((0, 1), 1, 2);

        for w in [1.0, 2.0] {
            let mut stats = Stats::default();
            let (path, min_f_val) =
                find_suboptimal_path(&map, &agent, &constraint_table, 0, w, &mut stats);
            assert_eq!(*path.last().unwrap(), agent.goal);
            let cost = path.len() - 1;
            assert_eq!(cost, 3);
            assert!(cost as f64 <= w * min_f_val as f64);
            assert!(min_f_val >= 2);
        }
    }

    #[test]
    fn test_optimal_path_matches_heuristic_on_open_grid() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 1),
        };
        let map = open_map(&[agent.clone()]);
        let constraint_table = ConstraintTable::new();
        let mut stats = Stats::default();

        let path = find_optimal_path(&map, &agent, &constraint_table, 0, &mut stats);
        assert_eq!(path.len() - 1, 3);
    }

    #[test]
    fn test_travel_time_freezes_after_constraints() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (0, 2),
        };
        let map = Map::from_ascii("...", &[agent.clone()]);

        let constraint_table = ConstraintTable::new();
        assert_eq!(
            travel_time(&map, (0, 0), (0, 2), &constraint_table, MAX_TIMESTEP),
            2
        );

        let mut delayed = ConstraintTable::new();
        delayed.insert_vertex_constraint((0, 1), 1, 2);
        assert_eq!(travel_time(&map, (0, 0), (0, 2), &delayed, MAX_TIMESTEP), 3);

        // Nothing below the upper bound.
        assert_eq!(travel_time(&map, (0, 0), (0, 2), &constraint_table, 2), MAX_TIMESTEP);
    }
}
