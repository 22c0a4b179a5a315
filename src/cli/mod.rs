pub mod chart;
pub mod currencies;
pub mod current;
pub mod overview;
pub mod setup;
pub mod show;
pub mod ui;
