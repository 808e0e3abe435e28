pub mod matches;
pub mod review;
pub mod staging;

pub use review::SharedEngine;
