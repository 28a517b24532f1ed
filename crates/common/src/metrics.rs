use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

/// Pet registrations and edits, labelled by `operation` and `outcome`.
pub static PET_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "volta_pet_writes_total",
        "Pet registrations and edits by outcome",
        &["operation", "outcome"]
    )
    .expect("register pet_writes_total")
});

/// Login attempts labelled by `outcome` (ok, unknown_user, bad_password, error).
pub static LOGINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "volta_logins_total",
        "Login attempts by outcome",
        &["outcome"]
    )
    .expect("register logins_total")
});

/// Deletions requested from the external image host, labelled by `outcome`.
pub static IMAGE_RELEASES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "volta_image_releases_total",
        "Image host deletions by outcome",
        &["outcome"]
    )
    .expect("register image_releases_total")
});

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        LOGINS_TOTAL.with_label_values(&["ok"]).inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("volta_logins_total"));
    }
}
