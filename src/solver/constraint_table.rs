use std::collections::HashMap;

use super::path_table::PathTable;
use crate::common::MAX_TIMESTEP;

/// Hard vertex/edge constraints plus an optional conflict avoidance table:
/// the installed paths of everyone else, which may be traversed at a price.
pub struct ConstraintTable<'a> {
    pub length_min: usize,
    pub length_max: usize,
    ct: HashMap<(usize, usize), Vec<(usize, usize)>>,
    ect: HashMap<((usize, usize), (usize, usize)), Vec<(usize, usize)>>,
    cat: Option<&'a PathTable>,
}

impl<'a> ConstraintTable<'a> {
    pub fn new() -> Self {
        ConstraintTable {
            length_min: 0,
            length_max: MAX_TIMESTEP,
            ct: HashMap::new(),
            ect: HashMap::new(),
            cat: None,
        }
    }

    pub fn with_conflict_avoidance(path_table: &'a PathTable, length_max: usize) -> Self {
        ConstraintTable {
            length_min: 0,
            length_max,
            ct: HashMap::new(),
            ect: HashMap::new(),
            cat: Some(path_table),
        }
    }

    /// Forbid `pos` during `[lo, hi)`.
    pub fn insert_vertex_constraint(&mut self, pos: (usize, usize), lo: usize, hi: usize) {
        self.ct.entry(pos).or_default().push((lo, hi));
    }

    /// Forbid arriving at `to` from `from` during `[lo, hi)`.
    pub fn insert_edge_constraint(
        &mut self,
        from: (usize, usize),
        to: (usize, usize),
        lo: usize,
        hi: usize,
    ) {
        self.ect.entry((from, to)).or_default().push((lo, hi));
    }

    pub fn is_constrained(&self, pos: (usize, usize), t: usize) -> bool {
        self.ct
            .get(&pos)
            .is_some_and(|ranges| ranges.iter().any(|&(lo, hi)| lo <= t && t < hi))
    }

    pub fn is_edge_constrained(&self, from: (usize, usize), to: (usize, usize), t: usize) -> bool {
        self.ect
            .get(&(from, to))
            .is_some_and(|ranges| ranges.iter().any(|&(lo, hi)| lo <= t && t < hi))
    }

    /// Earliest time >= `earliest` from which no hard constraint forbids
    /// sitting at `pos` forever. Soft goal pressure is priced by the planner
    /// through `get_future_num_of_collisions` instead.
    pub fn get_holding_time(&self, pos: (usize, usize), earliest: usize) -> usize {
        let mut holding_time = earliest;
        if let Some(ranges) = self.ct.get(&pos) {
            for &(_, hi) in ranges {
                holding_time = holding_time.max(hi);
            }
        }
        holding_time
    }

    /// Everything is static past this timestep.
    pub fn get_max_timestep(&self) -> usize {
        let hard = self
            .ct
            .values()
            .chain(self.ect.values())
            .flatten()
            .map(|&(_, hi)| hi)
            .filter(|&hi| hi < MAX_TIMESTEP)
            .max()
            .unwrap_or(0);
        let soft = self.cat.map_or(0, |path_table| path_table.makespan());
        hard.max(soft).max(self.length_min)
    }

    pub fn get_future_num_of_collisions(&self, pos: (usize, usize), time: usize) -> usize {
        self.cat
            .map_or(0, |path_table| path_table.get_future_num_of_collisions(pos, time))
    }

    /// Swap against some installed path when arriving at `to` from `from` at `t`.
    pub(crate) fn has_soft_edge_conflict(
        &self,
        from: (usize, usize),
        to: (usize, usize),
        t: usize,
    ) -> bool {
        if t == 0 || from == to {
            return false;
        }
        let Some(path_table) = self.cat else {
            return false;
        };
        match (
            path_table.timeline(to).get(t - 1),
            path_table.timeline(from).get(t),
        ) {
            (Some(leaving), Some(entering)) => {
                leaving.iter().any(|agent| entering.contains(agent))
            }
            _ => false,
        }
    }

    pub(crate) fn vertex_ranges(&self, pos: (usize, usize)) -> &[(usize, usize)] {
        self.ct.get(&pos).map_or(&[], |ranges| ranges.as_slice())
    }

    pub(crate) fn conflict_avoidance(&self) -> Option<&'a PathTable> {
        self.cat
    }
}

impl Default for ConstraintTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_edge_queries() {
        let mut table = ConstraintTable::new();
        table.insert_vertex_constraint((1, 1), 2, 4);
        table.insert_edge_constraint((0, 0), (0, 1), 3, 4);

        assert!(!table.is_constrained((1, 1), 1));
        assert!(table.is_constrained((1, 1), 2));
        assert!(table.is_constrained((1, 1), 3));
        assert!(!table.is_constrained((1, 1), 4));

        assert!(table.is_edge_constrained((0, 0), (0, 1), 3));
        assert!(!table.is_edge_constrained((0, 1), (0, 0), 3));
        assert!(!table.is_edge_constrained((0, 0), (0, 1), 4));
    }

    #[test]
    fn test_holding_time_over_hard_ranges() {
        let mut table = ConstraintTable::new();
        assert_eq!(table.get_holding_time((2, 2), 0), 0);
        assert_eq!(table.get_holding_time((2, 2), 5), 5);

        table.insert_vertex_constraint((2, 2), 1, 3);
        table.insert_vertex_constraint((2, 2), 6, 9);
        assert_eq!(table.get_holding_time((2, 2), 0), 9);
    }

    #[test]
    fn test_max_timestep_covers_cat() {
        let mut path_table = PathTable::new(3, 3);
        path_table.insert_path(0, &vec![(0, 0), (0, 1), (0, 2), (1, 2)]);

        let mut table = ConstraintTable::with_conflict_avoidance(&path_table, MAX_TIMESTEP);
        table.insert_edge_constraint((0, 0), (0, 1), 5, 6);
        assert_eq!(table.get_max_timestep(), 6);
    }
}
