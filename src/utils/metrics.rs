use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use tracing::error;

use crate::models::error::FetchErrorClass;

/// Side-channel hooks the recommendation path reports into.
pub trait Telemetry: Send + Sync {
    fn cache_hit(&self);
    fn cache_miss(&self);
    fn fetch_error(&self, class: FetchErrorClass);
    fn log(&self, message: &str);
}

pub struct PrometheusTelemetry {
    cache_hits: IntCounter,
    cache_misses: IntCounter,
    errors: IntCounterVec,
}

impl PrometheusTelemetry {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let cache_hits = IntCounter::new("exchangerate_cache_hits_total", "Cache hits")?;
        let cache_misses = IntCounter::new("exchangerate_cache_misses_total", "Cache misses")?;
        let errors = IntCounterVec::new(
            Opts::new(
                "exchangerate_http_client_errors_total",
                "HTTP client errors",
            ),
            &["err_type"],
        )?;

        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;
        registry.register(Box::new(errors.clone()))?;

        Ok(Self {
            cache_hits,
            cache_misses,
            errors,
        })
    }
}

impl Telemetry for PrometheusTelemetry {
    fn cache_hit(&self) {
        self.cache_hits.inc();
    }

    fn cache_miss(&self) {
        self.cache_misses.inc();
    }

    fn fetch_error(&self, class: FetchErrorClass) {
        self.errors.with_label_values(&[class.label()]).inc();
    }

    fn log(&self, message: &str) {
        error!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_exported_by_the_registry() {
        let registry = Registry::new();
        let telemetry = PrometheusTelemetry::new(&registry).unwrap();
        telemetry.cache_hit();
        telemetry.cache_miss();
        telemetry.cache_miss();
        telemetry.fetch_error(FetchErrorClass::Validation);

        let families = registry.gather();
        let value = |name: &str| {
            families
                .iter()
                .find(|f| f.get_name() == name)
                .map(|f| f.get_metric()[0].get_counter().get_value())
        };
        assert_eq!(value("exchangerate_cache_hits_total"), Some(1.0));
        assert_eq!(value("exchangerate_cache_misses_total"), Some(2.0));
        assert_eq!(value("exchangerate_http_client_errors_total"), Some(1.0));
    }

    #[test]
    fn registering_twice_fails() {
        let registry = Registry::new();
        PrometheusTelemetry::new(&registry).unwrap();
        assert!(PrometheusTelemetry::new(&registry).is_err());
    }
}
