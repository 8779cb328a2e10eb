//! One-shot cancellation signal with a single listener.
//!
//! A token is created per search and shared between the caller's handle and
//! the task running the query. The task registers a listener (interrupting
//! its database connection) for the duration of the query; any thread may
//! call [`CancellationToken::cancel`].

use std::fmt;
use std::sync::{Mutex, PoisonError};

type Listener = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct State {
    listener: Option<Listener>,
    cancelled: bool,
}

#[derive(Default)]
pub struct CancellationToken {
    state: Mutex<State>,
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("CancellationToken")
            .field("cancelled", &state.cancelled)
            .field("has_listener", &state.listener.is_some())
            .finish()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `listener`, replacing (and dropping) any previous one.
    ///
    /// The listener is stored even if the token is already cancelled; use
    /// [`register_unless_cancelled`](Self::register_unless_cancelled) to
    /// guard an operation that is about to start.
    pub fn register(&self, listener: impl FnOnce() + Send + 'static) {
        self.lock().listener = Some(Box::new(listener));
    }

    /// Register `listener` unless the token was already cancelled.
    ///
    /// Returns `false` (and drops the listener) if it was. The check and the
    /// registration happen under one lock, so a concurrent `cancel` either
    /// sees the listener or is seen here.
    pub fn register_unless_cancelled(&self, listener: impl FnOnce() + Send + 'static) -> bool {
        let mut state = self.lock();
        if state.cancelled {
            return false;
        }
        state.listener = Some(Box::new(listener));
        true
    }

    /// Drop the registered listener, if any.
    pub fn unregister(&self) {
        let listener = self.lock().listener.take();
        drop(listener);
    }

    /// Cancel the token, invoking the listener on the calling thread.
    ///
    /// Idempotent: only the first call has any effect.
    pub fn cancel(&self) {
        let listener = {
            let mut state = self.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            state.listener.take()
        };

        tracing::debug!(has_listener = listener.is_some(), "Cancelling");
        // Called outside the lock so the listener may touch the token.
        if let Some(listener) = listener {
            listener();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
