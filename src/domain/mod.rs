pub mod events;
pub mod models;
pub mod normalize;
pub mod settings;
