use std::time::Duration;

use log::*;
use shea_store_engine::{SessionApi, SessionStore};
use tokio::task::JoinHandle;

/// Starts the session reaper, which deletes expired sessions every `interval`. Do not await the returned JoinHandle,
/// as it will run indefinitely.
pub fn start_session_reaper(store: SessionStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let api = SessionApi::new(store);
        info!("🕰️ Session reaper started. Expired sessions are purged every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            trace!("🕰️ Running expired session purge");
            match api.purge_expired().await {
                Ok(count) => debug!("🕰️ {count} expired sessions purged"),
                Err(e) => error!("🕰️ Error running expired session purge: {e}"),
            }
        }
    })
}
