//! Runtime wiring: live capture mode and offline replay mode.
//!
//! Both modes drive the same `TrustFilter`; the live mode runs the pcap
//! loop on a blocking thread and forwards accepted frames through the
//! injector, the replay mode feeds hex-encoded frames from a file.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::task::spawn_blocking;
use tracing::{error, info, warn};

use grindvakt_blacklist::BlacklistPolicy;
use grindvakt_capture::{run_capture_loop, Injector};
use grindvakt_config::GrindvaktConfig;
use grindvakt_crl::RevocationStore;
use grindvakt_telemetry::{AuditLog, MetricsRecorder};

use crate::error::EngineError;
use crate::filter::{FilterStats, TrustFilter};

/// Current wall-clock time in Unix milliseconds.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

fn build_filter(
    config: &GrindvaktConfig,
    metrics: Arc<MetricsRecorder>,
    audit: Arc<AuditLog>,
) -> TrustFilter {
    let mut store = RevocationStore::new(
        &config.crl.path,
        Duration::from_secs(config.crl.reload_interval_secs),
    );
    // Fail-open at startup too: an unreadable CRL means empty sets until
    // the next successful reload.
    if let Err(e) = store.reload() {
        warn!("Cannot load CRL file {}: {e}", config.crl.path.display());
    }

    let policy = BlacklistPolicy {
        violation_threshold: config.blacklist.violation_threshold,
        violation_window: Duration::from_secs(config.blacklist.violation_window_secs),
        blacklist_duration: Duration::from_secs(config.blacklist.duration_secs),
    };

    TrustFilter::new(store, policy, config.telemetry.stats_interval, metrics, audit)
}

fn audit_banner(audit: &AuditLog, config: &GrindvaktConfig) {
    audit.note(&"=".repeat(60));
    audit.note("CRL FILTER WITH BLACKLIST STARTED");
    audit.note(&format!(
        "Interface IN: {}, Interface OUT: {}",
        config.capture.ingress_interface, config.capture.egress_interface
    ));
    audit.note(&format!("CRL File: {}", config.crl.path.display()));
    audit.note(&format!(
        "Blacklist Config: {} violations in {}s = {}s ban",
        config.blacklist.violation_threshold,
        config.blacklist.violation_window_secs,
        config.blacklist.duration_secs
    ));
    audit.note(&"=".repeat(60));
}

/// Live mode: capture on the ingress interface, filter, forward accepted
/// frames to the egress interface. Blocks until ctrl-c; the in-flight
/// message finishes, then final aggregate statistics are emitted.
pub async fn run_live(config: GrindvaktConfig) -> Result<(), EngineError> {
    info!(
        "Listening on {}, forwarding to {}",
        config.capture.ingress_interface, config.capture.egress_interface
    );
    info!(
        "Blacklist policy: {} violations in {}s = {}s ban",
        config.blacklist.violation_threshold,
        config.blacklist.violation_window_secs,
        config.blacklist.duration_secs
    );

    let metrics = Arc::new(MetricsRecorder::new());
    let audit = Arc::new(AuditLog::open(&config.telemetry.audit_log_path)?);
    audit_banner(&audit, &config);

    let mut filter = build_filter(&config, metrics, audit);
    let mut injector = Injector::open(&config.capture.egress_interface)?;

    let terminate = Arc::new(AtomicBool::new(false));
    {
        let terminate = terminate.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested, finishing in-flight message");
                terminate.store(true, Ordering::Relaxed);
            }
        });
    }

    let capture = config.capture.clone();
    let worker = spawn_blocking(move || {
        let result = run_capture_loop(
            &capture.ingress_interface,
            capture.buffer_size,
            capture.promiscuous,
            &terminate,
            |packet| {
                let verdict = filter.process(&packet.data, unix_millis());
                if verdict.is_accept() {
                    if let Err(e) = injector.send(&packet.data) {
                        // Lost after being counted accepted; no retry.
                        error!("Error forwarding packet: {e}");
                    }
                }
            },
        );
        (filter, result)
    });

    let (filter, result) = worker
        .await
        .map_err(|e| EngineError::Runtime(format!("Capture task panicked: {e}")))?;
    filter.log_final_stats();
    result?;
    Ok(())
}

/// Replay mode: feeds hex-encoded frames (whitespace-separated) from a
/// file through the pipeline with real timestamps. No forwarding.
pub async fn run_replay<P: AsRef<Path>>(
    config: GrindvaktConfig,
    frames_path: P,
) -> Result<FilterStats, EngineError> {
    let metrics = Arc::new(MetricsRecorder::new());
    let audit = Arc::new(AuditLog::open(&config.telemetry.audit_log_path)?);
    audit_banner(&audit, &config);

    let mut filter = build_filter(&config, metrics, audit);

    let text = fs::read_to_string(frames_path)?;
    for (index, token) in text.split_whitespace().enumerate() {
        match hex::decode(token) {
            Ok(frame) => {
                let verdict = filter.process(&frame, unix_millis());
                info!("frame {index}: {verdict:?} ({} bytes)", frame.len());
            }
            Err(e) => warn!("frame {index}: invalid hex, skipped ({e})"),
        }
    }

    filter.log_final_stats();
    Ok(*filter.stats())
}
