pub mod appointment_dto;
pub mod booking_dto;
pub mod common;
pub mod maintenance_dto;
