pub mod attendees;
pub mod badges;
pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod register;
pub mod report;
pub mod scan;
pub mod sessions;
