pub mod nbp;
pub mod throttle;
