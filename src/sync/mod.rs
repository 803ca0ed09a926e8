//! Stream synchronization.

mod approx_time;

pub use approx_time::ApproxTimeSync;
