use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient, non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(
        title: &str,
        description: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(
        title: &str,
        description: &str,
    ) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }
}

/// Where outcomes get reported
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        toast: Toast,
    );
}

/// Toasts waiting for the visitor's next page load. Clones share the same
/// queue, so a toast pushed after the modal was closed (or the request that
/// started the submission went away) is still delivered.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue(Arc<Mutex<VecDeque<Toast>>>);

impl ToastQueue {
    /// Take every pending toast, oldest first
    pub fn drain(&self) -> Vec<Toast> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    pub fn len(&self) -> usize { self.0.lock().unwrap_or_else(PoisonError::into_inner).len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Notifier for ToastQueue {
    fn notify(
        &self,
        toast: Toast,
    ) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(toast);
    }
}
