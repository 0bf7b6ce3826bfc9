pub mod auth;
pub mod barrier;
pub mod extension;
pub mod health;
pub mod notification;
pub mod payment;
pub mod penalty;
pub mod reservation;
pub mod slot;
pub mod user;
pub mod v1;
