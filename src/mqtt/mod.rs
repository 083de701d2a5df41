pub mod publisher;

pub use publisher::run_publisher;
