//! Pure logic behind the site's interactive figures.

pub mod comparison;
pub mod roi;

pub use comparison::{Metric, SOLUTIONS, Solution, bar_percent, best, format_cost};
pub use roi::{CountUp, FacilitySize, RoiEstimate, RoiInput, estimate};
