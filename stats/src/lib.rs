pub mod aggregate;
pub mod calendar;
pub mod service;
pub mod window;

pub use calendar::{DayBucket, MonthBucket, WeekBucket, YearBucket};
pub use service::{AvailablePeriods, StatsService, StatsSummary};
pub use window::Period;
