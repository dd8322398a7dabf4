pub mod calendar;
pub mod time;

pub use calendar::*;
pub use time::*;
