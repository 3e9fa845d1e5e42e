pub mod badges;
pub mod common;
pub mod community;
pub mod config;
pub mod log;
pub mod report;
pub mod status;
pub mod user;
