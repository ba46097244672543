pub mod config;
pub mod fan_out;
pub mod metrics;
pub mod state;
pub mod ttl_cache;
pub mod upstream;
