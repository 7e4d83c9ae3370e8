//! Notification composition and best-effort fan-out.
//!
//! Composition is pure formatting over query-layer outputs: the refresh
//! pipeline and any conversational front-end both call into here, and
//! nothing here reaches back into either of them. Delivery goes through
//! the [`Transport`] trait; the only real implementation lives with the
//! external messaging layer.
//!
//! Fan-out is best-effort: a recipient that fails is logged and counted,
//! never aborts the loop. Sends are paced with a rate limiter because the
//! upstream messaging API throttles bursty senders.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use dataset_ingestor::models::NationDay;

use crate::weekly::{WeeklyAggregate, WeeklySummary};

/// A subscriber identifier (a chat id for the messaging transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriberId(pub i64);

/// A composed notification: text plus an optional chart payload the
/// transport may render and attach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Human-readable body.
    pub text: String,
    /// Optional chart data.
    pub chart: Option<ChartSpec>,
}

/// Chart data handed to the transport; rendering is not this crate's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Chart title.
    pub title: String,
    /// (label, value) points in display order.
    pub points: Vec<(String, i64)>,
}

/// Failure delivering to one recipient.
#[derive(Debug, Error)]
#[error("delivery to subscriber {subscriber} failed: {message}")]
pub struct TransportError {
    /// The recipient that could not be reached.
    pub subscriber: i64,
    /// Transport detail.
    pub message: String,
}

/// Outbound delivery seam. Implemented by the external messaging layer.
pub trait Transport {
    /// Deliver one message to one recipient.
    fn send(&self, recipient: SubscriberId, message: &Message) -> Result<(), TransportError>;
}

/// Outcome of a [`broadcast`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Recipients reached.
    pub sent: usize,
    /// Recipients that errored (errors were swallowed).
    pub failed: usize,
}

/// Deliver `message` to every recipient, best-effort, at most
/// `messages_per_second` sends per second.
pub fn broadcast(
    transport: &dyn Transport,
    recipients: &[SubscriberId],
    message: &Message,
    messages_per_second: u32,
) -> DeliveryReport {
    let quota = Quota::per_second(NonZeroU32::new(messages_per_second).unwrap_or(nonzero!(30u32)));
    let limiter = RateLimiter::direct(quota);

    let mut report = DeliveryReport { sent: 0, failed: 0 };
    for recipient in recipients {
        while limiter.check().is_err() {
            std::thread::sleep(Duration::from_millis(50));
        }
        match transport.send(*recipient, message) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(subscriber = recipient.0, error = %e, "notification delivery failed");
                report.failed += 1;
            }
        }
    }
    info!(sent = report.sent, failed = report.failed, "broadcast finished");
    report
}

/// The data-update broadcast sent after a successful refresh: latest
/// national counters plus a weekly-trend chart payload.
///
/// `window` is the recent national window (oldest first); `weekly_trend`
/// is the national weekly series, most recent first, as returned by
/// [`crate::weekly::weekly_cases`].
pub fn compose_refresh_notification(
    window: &[NationDay],
    weekly_trend: &[WeeklyAggregate],
) -> Message {
    let mut text = String::from("COVID-19 Italy data update\n");
    if let Some(latest) = window.last() {
        text.push_str(&format!("{}\n\n", latest.date.format("%a %d %B %H:%M")));
        text.push_str("National figures:\n");
        text.push_str(&format!("New cases: {}\n", latest.new_cases));
        text.push_str(&format!(
            "Currently positive: {} ({:+})\n",
            latest.currently_positive, latest.currently_positive_change
        ));
        text.push_str(&format!("Recovered: {}\n", latest.recovered));
        text.push_str(&format!("Deceased: {}\n", latest.deceased));
        text.push_str(&format!("Total cases: {}\n", latest.total_cases));
    }
    text.push_str("\nSend /help for details");

    // Chart points read left to right, oldest week first.
    let points: Vec<(String, i64)> = weekly_trend
        .iter()
        .rev()
        .map(|w| (format!("W{:02} {}", w.iso_week, w.iso_year), w.new_cases))
        .collect();
    let chart = (!points.is_empty()).then(|| ChartSpec {
        title: "Weekly new cases (Italy)".to_string(),
        points,
    });

    Message { text, chart }
}

/// The condensed weekly trend report: one line per region, grouped by
/// macro-area, each prefixed with its trend glyphs.
pub fn compose_weekly_notification(summary: &WeeklySummary) -> Message {
    let mut text = format!(
        "Weekly new-case trend\nWeek {} - {}\n\n",
        summary.nation.week_start.format("%d %b"),
        summary.nation.week_end.format("%d %b"),
    );

    let (dir, accel) = glyphs_or_placeholder(summary.nation.trend());
    text.push_str(&format!("{dir} {accel} Italia 🇮🇹\n"));

    for (area, entries) in &summary.areas {
        text.push_str(&format!("\n{area}:\n"));
        for (region, aggregate) in entries {
            let (dir, accel) = glyphs_or_placeholder(aggregate.trend());
            text.push_str(&format!("{dir} {accel} {region}\n"));
        }
    }

    text.push_str("\nSend /weekly to explore the details");
    Message { text, chart: None }
}

fn glyphs_or_placeholder(trend: Option<crate::weekly::Trend>) -> (&'static str, &'static str) {
    trend.map(|t| t.glyphs()).unwrap_or(("▫️", "▫️"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FlakyTransport {
        // Fail every recipient whose id is even.
        log: RefCell<Vec<i64>>,
    }

    impl Transport for FlakyTransport {
        fn send(&self, recipient: SubscriberId, _message: &Message) -> Result<(), TransportError> {
            self.log.borrow_mut().push(recipient.0);
            if recipient.0 % 2 == 0 {
                Err(TransportError {
                    subscriber: recipient.0,
                    message: "blocked".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn broadcast_counts_failures_without_aborting() {
        let transport = FlakyTransport {
            log: RefCell::new(Vec::new()),
        };
        let recipients: Vec<SubscriberId> = (1..=6).map(SubscriberId).collect();
        let message = Message {
            text: "hi".into(),
            chart: None,
        };
        let report = broadcast(&transport, &recipients, &message, 1000);
        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 3);
        // Every recipient was attempted, failures notwithstanding.
        assert_eq!(transport.log.borrow().len(), 6);
    }

    #[test]
    fn refresh_notification_mentions_latest_counters() {
        use chrono::NaiveDate;
        let day = NationDay {
            date: NaiveDate::from_ymd_opt(2020, 11, 5)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
            new_cases: 34505,
            currently_positive: 472348,
            currently_positive_change: 23642,
            recovered: 322925,
            deceased: 40192,
            total_cases: 824879,
        };
        let message = compose_refresh_notification(&[day], &[]);
        assert!(message.text.contains("New cases: 34505"));
        assert!(message.text.contains("(+23642)"));
        assert!(message.chart.is_none());
    }
}
