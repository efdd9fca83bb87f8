pub mod affiliate;
pub mod bookings;
pub mod course;
pub mod gym;
pub mod money;
pub mod schedule;
pub mod user;
