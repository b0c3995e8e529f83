use std::time::Duration;
use tracing::{info, warn};

use jar_api::AppState;

/// Background task that deletes expired sessions on a fixed interval.
pub async fn run_cleanup_loop(state: AppState, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let task_state = state.clone();
        let result = tokio::task::spawn_blocking(move || {
            task_state.db.delete_expired_sessions(chrono::Utc::now())
        })
        .await;

        match result {
            Ok(Ok(count)) => {
                if count > 0 {
                    info!("Cleanup: removed {} expired sessions", count);
                }
            }
            Ok(Err(e)) => warn!("Cleanup error: {}", e),
            Err(e) => warn!("Cleanup task join error: {}", e),
        }
    }
}
