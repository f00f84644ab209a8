//! Link activation handlers and their detached validation.
//!
//! An [`Activation`] is attached to an anchor's fragment as soon as the fragment
//! is built. Whether the target can be opened is checked by a detached task;
//! until that task resolves the handler is inert, and a rejected or failed
//! check leaves it inert forever. Rendered output never waits for validation.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::AbortHandle;

use crate::error::NavigationError;

/// Boxed future returned by [`LinkNavigator::can_open`].
pub type NavFuture =
    Pin<Box<dyn Future<Output = Result<bool, NavigationError>> + Send + 'static>>;

/// Host facility that validates and opens link targets.
pub trait LinkNavigator: Send + Sync + 'static {
    /// Check whether `target` can be opened. Runs detached from rendering.
    fn can_open(&self, target: &str) -> NavFuture;

    /// Open `target`. Only called after `can_open` resolved to `true`.
    fn open(&self, target: &str);
}

/// Validation state of an [`Activation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationState {
    /// Validation has not finished.
    Pending,
    /// Target validated; activation opens it.
    Live,
    /// Target rejected or validation failed; activation does nothing.
    Rejected,
}

impl ActivationState {
    fn from_u8(value: u8) -> Self {
        match value {
            STATE_LIVE => Self::Live,
            STATE_REJECTED => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

const STATE_PENDING: u8 = 0;
const STATE_LIVE: u8 = 1;
const STATE_REJECTED: u8 = 2;

#[derive(Debug)]
struct ActivationSlot {
    state: AtomicU8,
    resolved: Notify,
    task: OnceLock<AbortHandle>,
}

impl Drop for ActivationSlot {
    fn drop(&mut self) {
        if let Some(task) = self.task.get() {
            task.abort();
        }
    }
}

impl ActivationSlot {
    fn resolve(&self, live: bool) {
        let state = if live { STATE_LIVE } else { STATE_REJECTED };
        self.state.store(state, Ordering::Release);
        self.resolved.notify_waiters();
    }

    fn state(&self) -> ActivationState {
        ActivationState::from_u8(self.state.load(Ordering::Acquire))
    }
}

/// Press handler for a link fragment.
///
/// Clones share the same validation slot. Equality compares targets only.
#[derive(Clone)]
pub struct Activation {
    target: Arc<str>,
    navigator: Arc<dyn LinkNavigator>,
    slot: Arc<ActivationSlot>,
}

impl Activation {
    /// Create a handler for `target` and start validating it in the background.
    pub fn spawn(target: &str, navigator: Arc<dyn LinkNavigator>) -> Self {
        let activation = Self {
            target: Arc::from(target),
            navigator,
            slot: Arc::new(ActivationSlot {
                state: AtomicU8::new(STATE_PENDING),
                resolved: Notify::new(),
                task: OnceLock::new(),
            }),
        };
        spawn_validation(&activation);
        activation
    }

    /// Link target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current validation state.
    pub fn state(&self) -> ActivationState {
        self.slot.state()
    }

    /// Whether activating will open the target.
    pub fn is_live(&self) -> bool {
        self.state() == ActivationState::Live
    }

    /// Open the target if validation succeeded. Returns whether it was opened.
    pub fn activate(&self) -> bool {
        if !self.is_live() {
            log::debug!("Ignoring activation of unvalidated link {}", self.target);
            return false;
        }
        self.navigator.open(&self.target);
        true
    }

    /// Wait until validation has finished and return the final state.
    pub async fn resolved(&self) -> ActivationState {
        loop {
            let notified = self.slot.resolved.notified();
            let state = self.slot.state();
            if state != ActivationState::Pending {
                return state;
            }
            notified.await;
        }
    }
}

impl PartialEq for Activation {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("target", &self.target)
            .field("state", &self.state())
            .finish()
    }
}

impl Serialize for Activation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.target)
    }
}

/// Run `can_open` detached on the ambient tokio runtime, or on the shared
/// background runtime when there is none.
///
/// The task only holds a weak reference to the slot; dropping the last clone
/// of the activation aborts it.
fn spawn_validation(activation: &Activation) {
    let check = activation.navigator.can_open(&activation.target);
    let weak_slot = Arc::downgrade(&activation.slot);
    let target = Arc::clone(&activation.target);
    let task = async move {
        let outcome = check.await;
        let Some(slot) = weak_slot.upgrade() else {
            return;
        };
        match outcome {
            Ok(true) => slot.resolve(true),
            Ok(false) => {
                log::debug!("Link target rejected: {}", target);
                slot.resolve(false);
            }
            Err(err) => {
                log::debug!("Link validation failed for {}: {}", target, err);
                slot.resolve(false);
            }
        }
    };

    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => match background_handle() {
            Some(handle) => handle.clone(),
            None => {
                log::warn!(
                    "No runtime for link validation; {} stays inert",
                    activation.target
                );
                return;
            }
        },
    };
    let join = handle.spawn(task);
    let _ = activation.slot.task.set(join.abort_handle());
}

/// Handle to a single current-thread runtime driven by one named thread,
/// started on first use.
fn background_handle() -> Option<&'static Handle> {
    static BACKGROUND: OnceLock<Option<Handle>> = OnceLock::new();
    BACKGROUND
        .get_or_init(|| {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::warn!("Cannot start link validation runtime: {}", err);
                    return None;
                }
            };
            let handle = runtime.handle().clone();
            let spawned = std::thread::Builder::new()
                .name("markup-link-check".into())
                .spawn(move || runtime.block_on(std::future::pending::<()>()));
            match spawned {
                Ok(_) => Some(handle),
                Err(err) => {
                    log::warn!("Cannot spawn link validation thread: {}", err);
                    None
                }
            }
        })
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct AllowHttps {
        opened: Mutex<Vec<String>>,
    }

    impl LinkNavigator for AllowHttps {
        fn can_open(&self, target: &str) -> NavFuture {
            let ok = target.starts_with("https://");
            Box::pin(async move { Ok(ok) })
        }

        fn open(&self, target: &str) {
            self.opened.lock().expect("lock").push(target.to_string());
        }
    }

    struct Failing;

    impl LinkNavigator for Failing {
        fn can_open(&self, _target: &str) -> NavFuture {
            Box::pin(async { Err(NavigationError::new("offline")) })
        }

        fn open(&self, _target: &str) {
            panic!("must not open after failed validation");
        }
    }

    #[tokio::test]
    async fn valid_target_becomes_live_and_opens() {
        let nav = Arc::new(AllowHttps::default());
        let activation = Activation::spawn("https://example.com", nav.clone());
        assert_eq!(activation.resolved().await, ActivationState::Live);
        assert!(activation.activate());
        assert_eq!(
            *nav.opened.lock().expect("lock"),
            vec!["https://example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn rejected_target_never_opens() {
        let nav = Arc::new(AllowHttps::default());
        let activation = Activation::spawn("javascript:alert(1)", nav.clone());
        assert_eq!(activation.resolved().await, ActivationState::Rejected);
        assert!(!activation.activate());
        assert!(nav.opened.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn failed_validation_is_swallowed() {
        let activation = Activation::spawn("https://example.com", Arc::new(Failing));
        assert_eq!(activation.resolved().await, ActivationState::Rejected);
        assert!(!activation.activate());
    }

    #[test]
    fn validates_without_an_ambient_runtime() {
        let activation = Activation::spawn("https://example.com", Arc::new(AllowHttps::default()));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        assert_eq!(runtime.block_on(activation.resolved()), ActivationState::Live);
    }

    #[test]
    fn background_runtime_is_shared() {
        let first = background_handle().expect("background runtime");
        let second = background_handle().expect("background runtime");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn dropping_the_activation_aborts_validation() {
        struct Never;
        impl LinkNavigator for Never {
            fn can_open(&self, _target: &str) -> NavFuture {
                Box::pin(std::future::pending())
            }
            fn open(&self, _target: &str) {}
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let _guard = runtime.enter();
        let activation = Activation::spawn("https://example.com", Arc::new(Never));
        let task = activation.slot.task.get().expect("task handle").clone();
        assert!(!task.is_finished());
        drop(activation);
        runtime.block_on(tokio::task::yield_now());
        assert!(task.is_finished());
    }

    #[test]
    fn pending_activation_is_inert() {
        struct Never;
        impl LinkNavigator for Never {
            fn can_open(&self, _target: &str) -> NavFuture {
                Box::pin(std::future::pending())
            }
            fn open(&self, _target: &str) {
                panic!("must not open while pending");
            }
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let _guard = runtime.enter();
        let activation = Activation::spawn("https://example.com", Arc::new(Never));
        assert_eq!(activation.state(), ActivationState::Pending);
        assert!(!activation.activate());
    }

    #[test]
    fn equality_and_serialization_use_the_target() {
        let nav: Arc<dyn LinkNavigator> = Arc::new(AllowHttps::default());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let _guard = runtime.enter();
        let a = Activation::spawn("https://a.example", Arc::clone(&nav));
        let b = Activation::spawn("https://a.example", nav);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).expect("serialize"),
            "\"https://a.example\""
        );
    }
}
