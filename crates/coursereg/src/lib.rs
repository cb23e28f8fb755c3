//! Course listing service that ranks each course's registration priority
//! tier for a given student.

pub mod catalog;
pub mod config;
pub mod form;
pub mod priority;
pub mod server;
pub mod table;
pub mod types;
