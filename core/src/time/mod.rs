pub mod grid;
pub mod ticks;

pub use self::grid::{Grid, Rounding};
pub use self::ticks::TicksTime;
