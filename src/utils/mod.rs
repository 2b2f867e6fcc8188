pub mod clock;
pub use clock::Clock;

pub mod signal;
