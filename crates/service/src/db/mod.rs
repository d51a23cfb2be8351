//! SeaORM-backed persistence functions used by the repository implementations.

pub mod promotion_store;
