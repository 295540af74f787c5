//! Structured-log consumer for the change stream.
//!
//! Subscribes to the [`EventBus`](crate::bus::EventBus) and writes one
//! log line per change. Runs as a long-lived background task and shuts
//! down when the bus sender is dropped.

use tokio::sync::broadcast;

use crate::bus::ChangeNotice;

/// Background service that logs every change notice.
pub struct ChangeLogger;

impl ChangeLogger {
    /// Run the logging loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(mut receiver: broadcast::Receiver<ChangeNotice>) {
        loop {
            match receiver.recv().await {
                Ok(notice) => {
                    tracing::info!(
                        shop_id = notice.shop_id,
                        campaign_id = notice.campaign_id,
                        item_id = notice.item_id,
                        kind = %notice.kind,
                        old = %notice.old_value,
                        new = %notice.new_value,
                        "Campaign change",
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change logger lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change logger shutting down");
                    break;
                }
            }
        }
    }
}
