use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub runtime: f64,
    pub initial_solution_runtime: f64,
    pub initial_sum_of_costs: usize,
    pub sum_of_costs: usize,
    pub average_group_size: f64,
    pub num_of_failures: usize,
    pub num_ll_generated: usize,
    pub num_ll_expanded: usize,
}

impl Stats {
    pub fn print(&self, num_of_colliding_pairs: usize) {
        info!(
            "Runtime {:.3}s (initial {:.3}s) Sum of costs {} (initial {}) Colliding pairs {} Average group size {:.2} Failures {} Low level generated nodes {}",
            self.runtime,
            self.initial_solution_runtime,
            self.sum_of_costs,
            self.initial_sum_of_costs,
            num_of_colliding_pairs,
            self.average_group_size,
            self.num_of_failures,
            self.num_ll_generated
        );
    }
}

// One record per repair iteration, plus one for the initial solution.
#[derive(Debug, Clone)]
pub struct IterationStats {
    pub runtime: f64,
    pub num_of_colliding_pairs: usize,
    pub group_size: usize,
    pub strategy: &'static str,
    pub accepted: bool,
}
