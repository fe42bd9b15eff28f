pub mod attendance;
pub mod bundle;
pub mod classes;
pub mod core;
pub mod dashboard;
pub mod session;
pub mod students;
