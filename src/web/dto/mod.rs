pub mod course;
pub mod lessons;
pub mod progress;
pub mod quiz;
