//! Status-effect uptime per target

mod aggregator;


pub use aggregator::{UptimeAggregator, fallback_ability_name, sort_by_uptime};
