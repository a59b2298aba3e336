pub mod cancellation;
pub mod counters;
pub mod network;
pub mod reachability;
pub mod sampler;
