pub mod booking;
pub mod dashboard;
pub mod examination;
pub mod nav_item;
pub mod payment;
pub mod service;
pub mod treatment;
pub mod user;
