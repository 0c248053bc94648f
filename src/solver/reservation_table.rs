use std::collections::HashMap;

use super::constraint_table::ConstraintTable;
use crate::common::MAX_TIMESTEP;

/// Half-open timestep range `[lo, hi)` during which a cell is free of hard
/// vertex constraints, weighted by how many installed paths cross it there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub lo: usize,
    pub hi: usize,
    pub num_of_collisions: usize,
}

/// Per-cell safe interval lists derived lazily from a constraint table.
pub struct ReservationTable<'a, 'b> {
    constraint_table: &'a ConstraintTable<'b>,
    sit: HashMap<(usize, usize), Vec<Interval>>,
}

impl<'a, 'b> ReservationTable<'a, 'b> {
    pub fn new(constraint_table: &'a ConstraintTable<'b>) -> Self {
        ReservationTable {
            constraint_table,
            sit: HashMap::new(),
        }
    }

    pub fn get_first_safe_interval(&mut self, pos: (usize, usize)) -> Option<Interval> {
        self.ensure_intervals(pos);
        self.sit[&pos].first().copied()
    }

    /// The safe interval containing `t_min`, clipped to start there. Drives
    /// the wait successor of the search.
    pub fn find_safe_interval(&mut self, pos: (usize, usize), t_min: usize) -> Option<Interval> {
        if t_min >= self.constraint_table.length_max.min(MAX_TIMESTEP - 1) {
            return None;
        }
        self.ensure_intervals(pos);
        for interval in &self.sit[&pos] {
            if interval.lo <= t_min && t_min < interval.hi {
                return Some(Interval {
                    lo: t_min,
                    hi: interval.hi,
                    num_of_collisions: interval.num_of_collisions,
                });
            }
            if t_min < interval.lo {
                break;
            }
        }
        None
    }

    /// Safe intervals at `to` reachable by leaving `from` somewhere in
    /// `[lower_bound - 1, upper_bound - 1)`, in order of increasing start.
    /// Hard edge constraints delay the earliest arrival; a soft swap at the
    /// head of an otherwise clean interval splits it off with weight 1.
    pub fn get_safe_intervals(
        &mut self,
        from: (usize, usize),
        to: (usize, usize),
        lower_bound: usize,
        upper_bound: usize,
    ) -> Vec<Interval> {
        let mut result = Vec::new();
        if lower_bound >= upper_bound {
            return result;
        }
        self.ensure_intervals(to);
        let constraint_table = self.constraint_table;
        for interval in &self.sit[&to] {
            if lower_bound >= interval.hi {
                continue;
            }
            if upper_bound <= interval.lo {
                break;
            }
            let window_lo = lower_bound.max(interval.lo);
            let window_hi = upper_bound.min(interval.hi);
            let arrival = (window_lo..window_hi)
                .find(|&t| !constraint_table.is_edge_constrained(from, to, t));
            let Some(t1) = arrival else {
                continue;
            };
            if interval.num_of_collisions > 0 {
                result.push(Interval {
                    lo: t1,
                    hi: interval.hi,
                    num_of_collisions: interval.num_of_collisions,
                });
                continue;
            }
            match (t1..window_hi).find(|&t| !constraint_table.has_soft_edge_conflict(from, to, t)) {
                Some(t2) if t2 == t1 => result.push(Interval {
                    lo: t1,
                    hi: interval.hi,
                    num_of_collisions: 0,
                }),
                Some(t2) => {
                    result.push(Interval {
                        lo: t1,
                        hi: t2,
                        num_of_collisions: 1,
                    });
                    result.push(Interval {
                        lo: t2,
                        hi: interval.hi,
                        num_of_collisions: 0,
                    });
                }
                None => result.push(Interval {
                    lo: t1,
                    hi: interval.hi,
                    num_of_collisions: 1,
                }),
            }
        }
        result
    }

    fn ensure_intervals(&mut self, pos: (usize, usize)) {
        if self.sit.contains_key(&pos) {
            return;
        }
        let intervals = build_intervals(self.constraint_table, pos);
        self.sit.insert(pos, intervals);
    }
}

fn build_intervals(constraint_table: &ConstraintTable, pos: (usize, usize)) -> Vec<Interval> {
    // Complement of the hard vertex ranges.
    let mut hard: Vec<(usize, usize)> = constraint_table.vertex_ranges(pos).to_vec();
    hard.sort_unstable();
    let mut safe_ranges = Vec::new();
    let mut cursor = 0;
    for (lo, hi) in hard {
        if lo > cursor {
            safe_ranges.push((cursor, lo));
        }
        cursor = cursor.max(hi);
    }
    if cursor < MAX_TIMESTEP {
        safe_ranges.push((cursor, MAX_TIMESTEP));
    }

    // Soft occupancy counts from the installed paths, parked goals included.
    let (counts, tail) = match constraint_table.conflict_avoidance() {
        None => (Vec::new(), 0),
        Some(path_table) => {
            let goal = path_table.goal_at(pos);
            let counts: Vec<usize> = path_table
                .timeline(pos)
                .iter()
                .enumerate()
                .map(|(t, occupants)| {
                    let parked = matches!(goal, Some((park_time, _)) if t > park_time);
                    occupants.len() + usize::from(parked)
                })
                .collect();
            (counts, usize::from(goal.is_some()))
        }
    };
    let count_at = |t: usize| counts.get(t).copied().unwrap_or(tail);

    // Split every safe range into maximal runs of constant weight.
    let mut intervals = Vec::new();
    for (lo, hi) in safe_ranges {
        let mut start = lo;
        while start < hi {
            let weight = count_at(start);
            let end = if start >= counts.len() {
                hi
            } else {
                let mut end = start + 1;
                while end < hi && end < counts.len() && counts[end] == weight {
                    end += 1;
                }
                if end == counts.len() && end < hi && tail == weight {
                    hi
                } else {
                    end
                }
            };
            intervals.push(Interval {
                lo: start,
                hi: end,
                num_of_collisions: weight,
            });
            start = end;
        }
    }
    intervals
}
