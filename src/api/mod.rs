pub mod attendance;
pub mod seed;
pub mod students;
