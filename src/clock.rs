use time::OffsetDateTime;

/// Request-scoped time source. Handlers read the clock once per request and
/// pass the instant down, so services never capture ambient time themselves.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[cfg(test)]
pub struct FixedClock(pub OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use time::OffsetDateTime;

    #[test]
    fn fixed_clock_returns_the_pinned_instant() {
        let instant = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
