// visitors who never come back would otherwise stay in the registry forever;
// this worker periodically drops the ones idle for longer than the ttl

use std::sync::Arc;
use std::time::Duration;

use crate::configuration::WaitlistSettings;
use crate::registry::SignupRegistry;
use crate::waitlist::WaitlistStore;

async fn expire_visitors_loop<S: WaitlistStore>(
    registry: &SignupRegistry<S>,
    ttl: Duration,
    interval: Duration,
) -> Result<(), anyhow::Error> {
    loop {
        let evicted = registry.expire_idle(ttl);
        if evicted > 0 {
            tracing::info!(evicted, remaining = registry.len(), "Evicted idle visitors");
        }
        tokio::time::sleep(interval).await;
    }
}

/// To be run as a separate worker, next to the API
pub async fn init_expiry_worker<S: WaitlistStore>(
    registry: Arc<SignupRegistry<S>>,
    cfg: WaitlistSettings,
) -> Result<(), anyhow::Error> {
    expire_visitors_loop(&registry, cfg.visitor_ttl(), cfg.expiry_interval()).await
}
