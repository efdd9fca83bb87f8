pub mod admin;
pub mod affiliate;
pub mod availability;
pub mod booking;
pub mod course;
pub mod gym;
pub mod health;
