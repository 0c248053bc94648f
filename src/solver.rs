mod constraint_table;
mod ilns;
mod path_table;
mod reservation_table;
mod sipp;

pub use constraint_table::ConstraintTable;
pub use ilns::InitLns;
pub use path_table::PathTable;
pub use reservation_table::{Interval, ReservationTable};
pub use sipp::{find_optimal_path, find_path, find_suboptimal_path, travel_time};
