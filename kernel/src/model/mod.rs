pub mod auth;
pub mod barrier;
pub mod extension;
pub mod id;
pub mod notification;
pub mod payment;
pub mod penalty;
pub mod reservation;
pub mod role;
pub mod slot;
pub mod tariff;
pub mod user;
