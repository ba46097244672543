use std::sync::Arc;

use prometheus::Registry;
use reqwest::Client;

use crate::utils::{
    config::Config,
    fan_out::FanOutCoordinator,
    metrics::{PrometheusTelemetry, Telemetry},
    ttl_cache::TtlCache,
    upstream::{HttpUpstream, Upstream},
};

pub struct AppState {
    pub config: Config,
    pub cache: TtlCache,
    pub coordinator: FanOutCoordinator,
    pub telemetry: Arc<dyn Telemetry>,
    pub registry: Registry,
}

impl AppState {
    pub fn init(config: Config) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let telemetry = Arc::new(PrometheusTelemetry::new(&registry)?);
        let upstream = Arc::new(HttpUpstream::new(
            Client::new(),
            &config.provider_base_url,
        ));
        let cache = match config.cache_sweep_interval {
            Some(interval) => TtlCache::with_sweep(interval),
            None => TtlCache::new(),
        };

        Ok(Self::with_parts(config, cache, upstream, telemetry, registry))
    }

    pub fn with_parts(
        config: Config,
        cache: TtlCache,
        upstream: Arc<dyn Upstream>,
        telemetry: Arc<dyn Telemetry>,
        registry: Registry,
    ) -> Self {
        let coordinator =
            FanOutCoordinator::new(upstream, &config.tracked_unit, config.upstream_timeout);
        AppState {
            config,
            cache,
            coordinator,
            telemetry,
            registry,
        }
    }
}
