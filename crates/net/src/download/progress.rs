//! Coarse download progress reporting

use std::time::{Duration, Instant};

/// Percentage points the download must advance before another report
const REPORT_STEP: u64 = 20;

/// One progress report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub percent: u64,
    pub bytes_downloaded: u64,
    /// Bytes since the previous report divided by the time since then
    pub bytes_per_sec: f64,
}

/// Tracks received bytes and decides when a report is due
///
/// Without a known content length no reports are produced.
#[derive(Debug, Clone)]
pub struct ProgressMeter {
    total: Option<u64>,
    received: u64,
    last_percent: u64,
    last_received: u64,
    last_report: Instant,
}

impl ProgressMeter {
    #[must_use]
    pub fn new(total: Option<u64>) -> Self {
        Self::starting_at(total, Instant::now())
    }

    #[must_use]
    pub fn starting_at(total: Option<u64>, now: Instant) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            received: 0,
            last_percent: 0,
            last_received: 0,
            last_report: now,
        }
    }

    #[must_use]
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Record a chunk of `len` bytes
    pub fn record(&mut self, len: u64) -> Option<ProgressSample> {
        self.record_at(len, Instant::now())
    }

    /// Record a chunk of `len` bytes observed at `now`
    pub fn record_at(&mut self, len: u64, now: Instant) -> Option<ProgressSample> {
        self.received += len;
        let total = self.total?;

        let percent = ceil_percent(self.received, total);
        if percent.saturating_sub(self.last_percent) <= REPORT_STEP {
            return None;
        }

        let elapsed = now
            .saturating_duration_since(self.last_report)
            .max(Duration::from_millis(1));
        #[allow(clippy::cast_precision_loss)]
        let bytes_per_sec = (self.received - self.last_received) as f64 / elapsed.as_secs_f64();

        self.last_percent = percent;
        self.last_received = self.received;
        self.last_report = now;

        Some(ProgressSample {
            percent,
            bytes_downloaded: self.received,
            bytes_per_sec,
        })
    }
}

fn ceil_percent(received: u64, total: u64) -> u64 {
    let scaled = u128::from(received) * 100;
    let total = u128::from(total);
    u64::try_from(scaled.div_ceil(total)).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_every_twenty_points() {
        let start = Instant::now();
        let mut meter = ProgressMeter::starting_at(Some(1000), start);

        // 10% then 20%: not more than 20 points yet
        assert!(meter.record_at(100, start).is_none());
        assert!(meter.record_at(100, start).is_none());

        let sample = meter
            .record_at(10, start + Duration::from_secs(2))
            .unwrap();
        assert_eq!(sample.percent, 21);
        assert_eq!(sample.bytes_downloaded, 210);
        assert!((sample.bytes_per_sec - 105.0).abs() < 1e-9);

        // Baseline moved to 21%
        assert!(meter
            .record_at(200, start + Duration::from_secs(3))
            .is_none());
        let sample = meter
            .record_at(590, start + Duration::from_secs(4))
            .unwrap();
        assert_eq!(sample.percent, 100);
        assert!((sample.bytes_per_sec - 395.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounds_up() {
        let start = Instant::now();
        let mut meter = ProgressMeter::starting_at(Some(300), start);
        // 21.33% rounds up to 22
        let sample = meter.record_at(64, start).unwrap();
        assert_eq!(sample.percent, 22);
    }

    #[test]
    fn test_unknown_length_never_reports() {
        let mut meter = ProgressMeter::new(None);
        assert!(meter.record(1 << 20).is_none());
        assert_eq!(meter.received(), 1 << 20);

        let mut meter = ProgressMeter::new(Some(0));
        assert!(meter.record(10).is_none());
    }
}
