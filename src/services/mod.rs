pub mod aggregation;
pub mod avatar;
pub mod faculty;
pub mod student;
