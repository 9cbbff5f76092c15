pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod donors;
pub mod health;
pub mod insights;
pub mod profile;
pub mod stock;
pub mod transactions;
pub mod users;
