use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters shared by every in-flight message.
#[derive(Debug, Default)]
pub struct Stats {
    cordoned: AtomicU64,
    ignored: AtomicU64,
    skipped: AtomicU64,
    undecodable: AtomicU64,
    exhausted: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatsSnapshot {
    pub cordoned: u64,
    pub ignored: u64,
    pub skipped: u64,
    pub undecodable: u64,
    pub exhausted: u64,
}

impl Stats {
    pub fn record_cordoned(&self) {
        self.cordoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_undecodable(&self) {
        self.undecodable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cordoned: self.cordoned.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            undecodable: self.undecodable.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
        }
    }

    pub fn log_summary(&self) {
        let StatsSnapshot {
            cordoned,
            ignored,
            skipped,
            undecodable,
            exhausted,
        } = self.snapshot();
        tracing::info!(
            cordoned,
            ignored,
            skipped,
            undecodable,
            exhausted,
            "Message processing summary"
        );
    }
}
