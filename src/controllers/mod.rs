pub mod appointment_controller;
pub mod auth_controller;
pub mod booking_controller;
pub mod catalog_controller;
pub mod maintenance_controller;
