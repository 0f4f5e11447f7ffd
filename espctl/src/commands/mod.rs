//! Command implementations

pub mod cart;
pub mod health;
pub mod products;
pub mod reviews;
pub mod stats;
pub mod users;
