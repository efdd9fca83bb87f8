pub mod affiliate_service;
pub mod availability_service;
pub mod booking_service;
pub mod pricing_service;
