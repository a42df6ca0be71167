pub mod assignment;
pub mod conflict;
pub mod explain;
pub mod queue;
pub mod recommend;
pub mod scoring;
