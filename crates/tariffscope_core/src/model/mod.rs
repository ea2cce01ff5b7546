mod cell;
mod grid;
pub mod metadata;
mod step;
mod table;

pub use cell::{Cell, Delta, ReferenceMode, Side, ZERO_REFERENCE_RELATIVE_DELTA};
pub use grid::{Grid, GridRow};
pub use metadata::Metadata;
pub use step::SimulationStep;
pub use table::{DEFAULT_DURATION_YEARS, Table};
