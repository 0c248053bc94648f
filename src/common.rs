use serde::{Deserialize, Serialize};
use std::cmp::{max, min};
use tracing::{debug, error};

use crate::map::Map;

/// Timesteps at or above this value stand for "never".
pub const MAX_TIMESTEP: usize = usize::MAX / 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    pub start: (usize, usize),
    pub goal: (usize, usize),
}

impl Agent {
    pub fn verify(&self, map: &Map) -> bool {
        map.is_passable(self.start.0, self.start.1) && map.is_passable(self.goal.0, self.goal.1)
    }
}

pub type Path = Vec<(usize, usize)>;

/// Number of moves, waits included.
pub fn path_cost(path: &Path) -> usize {
    path.len().saturating_sub(1)
}

/// Position at time `t`; agents park at their last cell forever.
pub(crate) fn location_at(path: &Path, t: usize) -> (usize, usize) {
    path[min(t, path.len() - 1)]
}

/// Vertex or swap conflict between two installed paths.
pub(crate) fn paths_conflict(path_1: &Path, path_2: &Path) -> bool {
    let horizon = max(path_1.len(), path_2.len());
    for t in 0..horizon {
        let pos_1 = location_at(path_1, t);
        let pos_2 = location_at(path_2, t);
        if pos_1 == pos_2 {
            return true;
        }
        if t >= 1 && pos_1 == location_at(path_2, t - 1) && pos_2 == location_at(path_1, t - 1) {
            return true;
        }
    }
    false
}

/// Pairwise enumeration over all paths, used to cross-check the collision graph.
pub(crate) fn count_colliding_pairs(paths: &[Path]) -> usize {
    let mut count = 0;
    for i in 0..paths.len() {
        for j in (i + 1)..paths.len() {
            if paths_conflict(&paths[i], &paths[j]) {
                count += 1;
            }
        }
    }
    count
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub paths: Vec<Path>,
}

impl Solution {
    /// Per-path consistency: endpoints match the agent, every step is a
    /// 4-neighbor move or a wait over passable cells. Inter-agent collisions
    /// are counted separately since a feasibility solver may hand back a
    /// still-colliding plan.
    pub fn verify(&self, map: &Map, agents: &[Agent]) -> bool {
        if self.paths.len() != agents.len() {
            error!("incomplete solution");
            return false;
        }

        for (path, agent) in self.paths.iter().zip(agents.iter()) {
            if path.first() != Some(&agent.start) || path.last() != Some(&agent.goal) {
                error!(
                    "endpoints failed: path start {:?} path end {:?}, but agent start {:?} agent goal {:?}",
                    path.first(),
                    path.last(),
                    agent.start,
                    agent.goal
                );
                return false;
            }

            for &(x, y) in path {
                if !map.is_passable(x, y) {
                    error!("impossible move through ({x}, {y})");
                    return false;
                }
            }

            for window in path.windows(2) {
                if let [first, second] = window {
                    if !are_neighbors(*first, *second) {
                        error!("move step failed between {first:?} and {second:?}");
                        return false;
                    }
                }
            }
        }

        true
    }

    pub fn sum_of_costs(&self) -> usize {
        self.paths.iter().map(path_cost).sum()
    }

    pub fn log_solution(&self, solver: &str) {
        let mut formatted_solution = String::new();
        for (index, path) in self.paths.iter().enumerate() {
            formatted_solution.push_str(&format!(" agent{}:\n", index));
            for (t, &(x, y)) in path.iter().enumerate() {
                formatted_solution
                    .push_str(&format!("   - x: {}\n     y: {}\n     t: {}\n", x, y, t));
            }
        }
        debug!("{} solution:\n{}", solver, formatted_solution);
    }
}

fn are_neighbors(pos1: (usize, usize), pos2: (usize, usize)) -> bool {
    (pos1.0 == pos2.0 && (max(pos1.1, pos2.1) - min(pos1.1, pos2.1)) == 1)
        || (pos1.1 == pos2.1 && (max(pos1.0, pos2.0) - min(pos1.0, pos2.0)) == 1)
        || (pos1.0 == pos2.0 && pos1.1 == pos2.1)
}
