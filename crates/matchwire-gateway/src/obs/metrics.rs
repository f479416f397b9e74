use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic counter.
#[derive(Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, v: u64) {
        self.0.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter\n{name} {}", self.get());
    }
}

/// Up/down gauge.
#[derive(Default)]
pub struct Gauge(AtomicI64);

impl Gauge {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge\n{name} {}", self.get());
    }
}

/// Counter split by a static kind label (frame type).
#[derive(Default)]
pub struct KindCounter(DashMap<&'static str, AtomicU64>);

impl KindCounter {
    pub fn inc(&self, kind: &'static str) {
        self.0
            .entry(kind)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, kind: &'static str) -> u64 {
        self.0
            .get(kind)
            .map(|v| v.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for e in self.0.iter() {
            let _ = writeln!(out, "{name}{{kind=\"{}\"}} {}", e.key(), e.value().load(Ordering::Relaxed));
        }
    }
}

// 1ms .. 500ms; dispatch is a map lookup plus at most one store round-trip.
const BUCKETS_MS: [u64; 6] = [1, 5, 10, 50, 100, 500];

/// Fixed-bucket latency histogram (milliseconds).
pub struct Histogram {
    count: AtomicU64,
    sum_ms: AtomicU64,
    buckets: [AtomicU64; 6],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_ms: AtomicU64::new(0),
            buckets: Default::default(),
        }
    }
}

impl Histogram {
    pub fn observe(&self, d: Duration) {
        let ms = d.as_millis() as u64;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_ms.fetch_add(ms, Ordering::Relaxed);
        for (i, &le) in BUCKETS_MS.iter().enumerate() {
            if ms <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for (i, &le) in BUCKETS_MS.iter().enumerate() {
            let _ = writeln!(
                out,
                "{name}_bucket{{le=\"{le}\"}} {}",
                self.buckets[i].load(Ordering::Relaxed)
            );
        }
        let count = self.count.load(Ordering::Relaxed);
        let _ = writeln!(out, "{name}_bucket{{le=\"+Inf\"}} {count}");
        let _ = writeln!(out, "{name}_sum {}", self.sum_ms.load(Ordering::Relaxed));
        let _ = writeln!(out, "{name}_count {count}");
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub connections_opened: Counter,
    pub connections_active: Gauge,
    pub frames_in: KindCounter,
    pub frames_delivered: Counter,
    pub frames_dropped: Counter,
    pub decode_errors: Counter,
    pub dispatch_errors: KindCounter,
    pub dispatch_duration: Histogram,
}

impl GatewayMetrics {
    /// Record a fan-out outcome: `delivered` of `requested` recipients.
    pub fn note_delivery(&self, delivered: usize, requested: usize) {
        self.frames_delivered.add(delivered as u64);
        self.frames_dropped
            .add(requested.saturating_sub(delivered) as u64);
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self, online_now: usize) -> String {
        let mut out = String::new();
        self.connections_opened
            .render("matchwire_connections_opened_total", &mut out);
        self.connections_active
            .render("matchwire_connections_active", &mut out);
        self.frames_in.render("matchwire_frames_in_total", &mut out);
        self.frames_delivered
            .render("matchwire_frames_delivered_total", &mut out);
        self.frames_dropped
            .render("matchwire_frames_dropped_total", &mut out);
        self.decode_errors
            .render("matchwire_decode_errors_total", &mut out);
        self.dispatch_errors
            .render("matchwire_dispatch_errors_total", &mut out);
        self.dispatch_duration
            .render("matchwire_dispatch_duration_ms", &mut out);
        let _ = writeln!(
            out,
            "# TYPE matchwire_online_users gauge\nmatchwire_online_users {online_now}"
        );
        out
    }
}
