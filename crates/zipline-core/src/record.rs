use crate::shortcode::ShortCode;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lifetime for anonymous submissions: 7 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(604_800);

/// A caller-specified expiry duration overriding the default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTtl {
    pub days: u64,
    pub hours: u64,
}

impl CustomTtl {
    pub fn new(days: u64, hours: u64) -> Self {
        Self { days, hours }
    }

    /// Total lifetime as a duration, or `None` when the requested
    /// values overflow a second count. The fields are caller-supplied,
    /// so the arithmetic must not be trusted to stay in range. Zero
    /// means the caller supplied an empty TTL; the shortening service
    /// rejects both cases.
    pub fn as_duration(&self) -> Option<Duration> {
        let secs = self
            .days
            .checked_mul(86_400)?
            .checked_add(self.hours.checked_mul(3_600)?)?;
        Some(Duration::from_secs(secs))
    }
}

/// A stored URL record, owned by the durable store.
///
/// Records are created once and never mutated; they die by TTL expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The unique short code for this mapping.
    pub code: ShortCode,
    /// The original URL that was shortened.
    pub original_url: String,
    /// Whether the expiry was caller-specified rather than the default.
    /// Reuse lookups only match records where this is `false`.
    pub is_custom_ttl: bool,
    /// When the record was created.
    pub created_at: Timestamp,
    /// Lifetime from creation, in whole seconds.
    pub expire_after: Duration,
}

impl UrlRecord {
    /// The instant at which this record is logically dead.
    ///
    /// A lifetime beyond the representable range clamps to the maximum
    /// instant instead of wrapping.
    pub fn expires_at(&self) -> Timestamp {
        let lifetime = SignedDuration::try_from(self.expire_after).unwrap_or(SignedDuration::MAX);
        self.created_at
            .saturating_add(lifetime)
            .unwrap_or(Timestamp::MAX)
    }

    /// Whether the record has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at()
    }

    /// The lifetime left as of `now`, or `None` if already expired.
    ///
    /// This bounds the TTL of any cache entry populated from this
    /// record: the cache must never outlive the durable record.
    pub fn remaining_ttl(&self, now: Timestamp) -> Option<Duration> {
        let remaining = self.expires_at().duration_since(now);
        if remaining.is_positive() {
            Some(Duration::from_secs(remaining.as_secs() as u64))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(created_at: Timestamp, expire_after: Duration) -> UrlRecord {
        UrlRecord {
            code: ShortCode::new_unchecked("abc12345"),
            original_url: "https://example.com".to_string(),
            is_custom_ttl: false,
            created_at,
            expire_after,
        }
    }

    #[test]
    fn custom_ttl_converts_to_seconds() {
        let ttl = CustomTtl::new(1, 2);
        assert_eq!(ttl.as_duration(), Some(Duration::from_secs(86_400 + 7_200)));
        assert_eq!(CustomTtl::new(0, 0).as_duration(), Some(Duration::ZERO));
    }

    #[test]
    fn custom_ttl_overflow_is_reported_not_wrapped() {
        assert_eq!(CustomTtl::new(u64::MAX / 86_400 + 1, 0).as_duration(), None);
        assert_eq!(CustomTtl::new(0, u64::MAX / 3_600 + 1).as_duration(), None);
        // Each term fits on its own; the sum does not.
        assert_eq!(
            CustomTtl::new(u64::MAX / 86_400, u64::MAX / 3_600).as_duration(),
            None
        );
    }

    #[test]
    fn expires_at_saturates_on_extreme_lifetimes() {
        let created = Timestamp::from_second(0).unwrap();
        let rec = record(created, Duration::from_secs(u64::MAX));

        assert_eq!(rec.expires_at(), Timestamp::MAX);
        assert!(!rec.is_expired(Timestamp::from_second(1_000_000).unwrap()));
    }

    #[test]
    fn expires_at_offsets_creation() {
        let created = Timestamp::from_second(1_000).unwrap();
        let rec = record(created, Duration::from_secs(3_600));
        assert_eq!(rec.expires_at(), Timestamp::from_second(4_600).unwrap());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let created = Timestamp::from_second(0).unwrap();
        let rec = record(created, Duration::from_secs(3_600));

        let just_before = Timestamp::from_second(3_599).unwrap();
        let at_expiry = Timestamp::from_second(3_600).unwrap();

        assert!(!rec.is_expired(just_before));
        assert!(rec.is_expired(at_expiry));
    }

    #[test]
    fn remaining_ttl_shrinks_with_time() {
        let created = Timestamp::from_second(0).unwrap();
        let rec = record(created, DEFAULT_TTL);

        let later = Timestamp::from_second(604_800 - 60).unwrap();
        assert_eq!(rec.remaining_ttl(later), Some(Duration::from_secs(60)));

        let expired = Timestamp::from_second(604_800).unwrap();
        assert_eq!(rec.remaining_ttl(expired), None);
    }
}
