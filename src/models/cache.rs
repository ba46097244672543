use chrono::{DateTime, Duration, Utc};

#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// A non-positive `ttl` yields an entry that is already expired. A `ttl` past the
    /// representable range never expires.
    pub fn new(value: T, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).unwrap_or(if ttl > Duration::zero() {
            DateTime::<Utc>::MAX_UTC
        } else {
            now
        });
        Self { value, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
