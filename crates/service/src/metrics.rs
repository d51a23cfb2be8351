use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static PROMOTIONS_SAVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "promo_service_promotions_saved_total",
        "Total promotions created or updated"
    )
    .expect("register promotions_saved_total")
});

pub static NOTIFICATIONS_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "promo_service_notifications_sent_total",
        "Total promotion notifications handed to the dispatcher successfully"
    )
    .expect("register notifications_sent_total")
});

pub static NOTIFICATION_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "promo_service_notification_failures_total",
        "Total promotion notifications rejected by the dispatcher"
    )
    .expect("register notification_failures_total")
});

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, String> {
    // Touch the counters so they are exported even before first use.
    Lazy::force(&PROMOTIONS_SAVED_TOTAL);
    Lazy::force(&NOTIFICATIONS_SENT_TOTAL);
    Lazy::force(&NOTIFICATION_FAILURES_TOTAL);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("metrics encode error: {e}"))?;
    String::from_utf8(buffer).map_err(|e| format!("metrics encode error: {e}"))
}
