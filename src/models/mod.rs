pub mod attendee;
pub mod scan;
pub mod session;
