//! HTTP request handlers for the Espresso Emporium API

pub mod admin;
pub mod cart;
pub mod health;
pub mod products;
pub mod reviews;
pub mod users;
