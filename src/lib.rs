//! Booking-management web application: a public booking form with email
//! confirmations and a session-authenticated admin dashboard, backed by
//! interchangeable postgres/sqlite stores.

pub mod config;
pub mod db;
pub mod error;
pub mod sessions;
pub mod state;

pub mod models {
    pub mod admin;
    pub mod booking;
    pub mod session;
}

pub mod repositories {
    pub mod postgres;
    pub mod sqlite;
    pub mod store;
}

pub mod services {
    pub mod auth;
    pub mod bookings;
    pub mod mailer;
}

pub mod handlers {
    pub mod admin;
    pub mod bookings;
    pub mod contact;
    pub mod health;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod rate_limit;
}

pub mod validation {
    pub mod booking;
    pub mod contact;
}
