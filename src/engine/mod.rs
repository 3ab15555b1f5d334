//! Engine module - sequential plan execution over a browsing session

pub mod executor;

pub use executor::Engine;
