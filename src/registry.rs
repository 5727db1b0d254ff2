use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

use uuid::Uuid;

use crate::configuration::WaitlistSettings;
use crate::waitlist::ToastQueue;
use crate::waitlist::WaitlistSignup;
use crate::waitlist::WaitlistStore;

/// A visitor's signup modal, reporting into their own toast queue
pub type Signup<S> = WaitlistSignup<S, ToastQueue>;

/// One `WaitlistSignup` per visitor, keyed by the id kept in their session.
/// All instances share the same store.
pub struct SignupRegistry<S> {
    store: Option<Arc<S>>,
    source: String,
    timeout: Duration,
    visitors: Mutex<HashMap<Uuid, (Arc<Signup<S>>, Instant)>>,
}

impl<S: WaitlistStore> SignupRegistry<S> {
    pub fn new(
        store: Option<S>,
        cfg: &WaitlistSettings,
    ) -> Self {
        Self {
            store: store.map(Arc::new),
            source: cfg.source.clone(),
            timeout: cfg.submit_timeout(),
            visitors: Mutex::new(HashMap::new()),
        }
    }

    /// The visitor's signup, created on first sight. Marks the visitor as
    /// active.
    pub fn visitor(
        &self,
        id: Uuid,
    ) -> Arc<Signup<S>> {
        let mut visitors = self.lock();
        let (signup, last_seen) = visitors.entry(id).or_insert_with(|| {
            let signup = WaitlistSignup::new(self.store.clone(), ToastQueue::default())
                .with_source(self.source.clone())
                .with_timeout(self.timeout);
            (Arc::new(signup), Instant::now())
        });
        *last_seen = Instant::now();
        signup.clone()
    }

    /// Forget visitors idle for at least `ttl`. A visitor is kept regardless
    /// while a submission of theirs is in flight, or while a request still
    /// holds their signup. Returns the number evicted.
    pub fn expire_idle(
        &self,
        ttl: Duration,
    ) -> usize {
        let mut visitors = self.lock();
        let before = visitors.len();
        visitors.retain(|_, (signup, last_seen)| {
            last_seen.elapsed() < ttl || signup.is_submitting() || Arc::strong_count(signup) > 1
        });
        before - visitors.len()
    }

    pub fn is_configured(&self) -> bool { self.store.is_some() }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, (Arc<Signup<S>>, Instant)>> {
        self.visitors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
