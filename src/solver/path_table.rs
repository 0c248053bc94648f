use std::collections::BTreeSet;

use crate::common::{Path, MAX_TIMESTEP};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CellOccupancy {
    // Occupant agent ids per timestep; trailing empty slots are trimmed so
    // that inserting and deleting the same path is an exact round trip.
    timeline: Vec<Vec<usize>>,
    // Agent parked here forever from the given timestep on.
    goal: Option<(usize, usize)>,
}

/// Time-expanded occupancy of all installed paths, with enough bookkeeping to
/// count soft collisions against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    cells: Vec<Vec<CellOccupancy>>,
}

impl PathTable {
    pub fn new(height: usize, width: usize) -> Self {
        PathTable {
            cells: vec![vec![CellOccupancy::default(); width]; height],
        }
    }

    pub fn insert_path(&mut self, agent: usize, path: &Path) {
        for (t, &(x, y)) in path.iter().enumerate() {
            let cell = &mut self.cells[x][y];
            if cell.timeline.len() <= t {
                cell.timeline.resize(t + 1, Vec::new());
            }
            // Occupant lists stay sorted so the table contents never depend
            // on insertion order.
            if let Err(slot) = cell.timeline[t].binary_search(&agent) {
                cell.timeline[t].insert(slot, agent);
            }
        }
        let &(gx, gy) = path.last().unwrap();
        let goal_cell = &mut self.cells[gx][gy];
        debug_assert!(goal_cell.goal.is_none());
        goal_cell.goal = Some((path.len() - 1, agent));
    }

    pub fn delete_path(&mut self, agent: usize, path: &Path) {
        for (t, &(x, y)) in path.iter().enumerate() {
            let cell = &mut self.cells[x][y];
            debug_assert!(cell.timeline[t].contains(&agent));
            cell.timeline[t].retain(|&occupant| occupant != agent);
        }
        let &(gx, gy) = path.last().unwrap();
        let goal_cell = &mut self.cells[gx][gy];
        debug_assert_eq!(goal_cell.goal, Some((path.len() - 1, agent)));
        goal_cell.goal = None;
        for &(x, y) in path {
            let cell = &mut self.cells[x][y];
            while cell.timeline.last().is_some_and(|slot| slot.is_empty()) {
                cell.timeline.pop();
            }
        }
    }

    pub(crate) fn timeline(&self, pos: (usize, usize)) -> &[Vec<usize>] {
        &self.cells[pos.0][pos.1].timeline
    }

    pub(crate) fn goal_at(&self, pos: (usize, usize)) -> Option<(usize, usize)> {
        self.cells[pos.0][pos.1].goal
    }

    pub(crate) fn makespan(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .map(|cell| cell.timeline.len())
            .max()
            .unwrap_or(0)
    }

    /// Earliest time >= `earliest` from which an agent could sit at `pos`
    /// forever without meeting any installed path again. MAX_TIMESTEP when
    /// another agent parks here.
    pub fn get_holding_time(&self, pos: (usize, usize), earliest: usize) -> usize {
        let cell = &self.cells[pos.0][pos.1];
        if cell.goal.is_some() {
            return MAX_TIMESTEP;
        }
        let last_occupied = cell
            .timeline
            .iter()
            .rposition(|occupants| !occupants.is_empty());
        match last_occupied {
            Some(t) => earliest.max(t + 1),
            None => earliest,
        }
    }

    /// Occupancies at `pos` strictly after `time` by installed paths.
    pub fn get_future_num_of_collisions(&self, pos: (usize, usize), time: usize) -> usize {
        let cell = &self.cells[pos.0][pos.1];
        debug_assert!(cell.goal.is_none());
        cell.timeline
            .iter()
            .skip(time + 1)
            .map(|occupants| occupants.len())
            .sum()
    }

    /// Agents an arrival at `to` from `from` at time `t` would collide with
    /// (vertex, swap, and parked-goal probes).
    pub(crate) fn get_conflicting_agents(
        &self,
        from: (usize, usize),
        to: (usize, usize),
        t: usize,
        conflicting: &mut BTreeSet<usize>,
    ) {
        let to_cell = &self.cells[to.0][to.1];
        if let Some(occupants) = to_cell.timeline.get(t) {
            conflicting.extend(occupants.iter().copied());
        }
        if t >= 1 && from != to {
            if let (Some(leaving), Some(entering)) = (
                to_cell.timeline.get(t - 1),
                self.cells[from.0][from.1].timeline.get(t),
            ) {
                conflicting.extend(leaving.iter().filter(|id| entering.contains(id)));
            }
        }
        if let Some((park_time, agent)) = to_cell.goal {
            if park_time < t {
                conflicting.insert(agent);
            }
        }
    }
}
