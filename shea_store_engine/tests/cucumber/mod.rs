pub mod setups;
pub mod steps;

pub use store_world::StoreWorld;
