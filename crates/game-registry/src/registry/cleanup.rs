//! Background index cleanup

use super::ServiceRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run [`ServiceRegistry::cleanup_dead_services`] every `interval` until
/// `shutdown` flips to `true` or its sender is dropped
pub fn spawn_cleanup_task(
    registry: Arc<ServiceRegistry>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        tracing::info!(interval_secs = interval.as_secs(), "Registry cleanup task started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match registry.cleanup_dead_services().await {
                        Ok(report) if report.removed > 0 => {
                            tracing::info!(
                                removed = report.removed,
                                live_endpoints = report.live_endpoints,
                                "Cleanup pass finished"
                            );
                        }
                        Ok(report) => {
                            tracing::debug!(live_endpoints = report.live_endpoints, "Cleanup pass found nothing stale");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Cleanup pass failed");
                        }
                    }
                }
            }
        }

        tracing::info!("Registry cleanup task stopped");
    })
}
