//! Entities, value objects, and the ports the application layer depends on.

pub mod booking;
pub mod listing;
pub mod money;
pub mod payment;
pub mod ports;
pub mod user;
