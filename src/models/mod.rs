pub mod address;
pub mod job;
pub mod score;
pub mod window;
pub mod worker;
