pub mod logging;
pub mod sink;
pub mod tracker;
