//! # Pocket Todo Runtime
//!
//! Runtime implementation for the Pocket Todo state container.
//!
//! This crate provides the Store: the single place where state lives and
//! the only way to change it.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment; applies actions synchronously
//! - **Subscription**: RAII handle for a post-mutation listener
//! - **Observers**: `watch` / `broadcast` receivers for async view layers
//!
//! ## Example
//!
//! ```ignore
//! use pocket_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let subscription = store.subscribe(|state| render(state));
//!
//! // Apply an action; listeners have run by the time this returns
//! store.send(Action::DoSomething);
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use pocket_todo_core::{action::Action, effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::ThreadId;

/// Metrics recorded by the Store
pub mod metrics;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use pocket_todo_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_action_broadcast_capacity(64);
/// assert_eq!(config.action_broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for each lagging action observer
    pub action_broadcast_capacity: usize,
}

impl StoreConfig {
    /// Default action broadcast capacity
    pub const DEFAULT_ACTION_BROADCAST_CAPACITY: usize = 16;

    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(action_broadcast_capacity: usize) -> Self {
        Self {
            action_broadcast_capacity,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_action_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.action_broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ACTION_BROADCAST_CAPACITY)
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Nothing guarded by the store's mutexes can be left half-updated by a
/// panic, so poisoning carries no information here.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Callback invoked after every applied action
type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Registered post-mutation listeners, in subscription order
struct Listeners<S> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener<S>)>>,
}

impl<S> Listeners<S> {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn insert(&self, listener: Listener<S>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).push((id, listener));
        id
    }

    fn remove(&self, id: u64) {
        lock(&self.entries).retain(|(entry_id, _)| *entry_id != id);
    }

    fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Copy out the current listeners so none of them runs under the lock
    fn snapshot(&self) -> Vec<Listener<S>> {
        lock(&self.entries)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

/// Handle returned by [`Store::subscribe`]
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes
/// the listener. Use [`Subscription::detach`] to keep the listener for as
/// long as the store lives.
#[must_use = "dropping a Subscription immediately unsubscribes its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<S: 'static>(listeners: &Arc<Listeners<S>>, id: u64) -> Self {
        let listeners: Weak<Listeners<S>> = Arc::downgrade(listeners);
        Self {
            cancel: Some(Box::new(move || {
                // The store may already be gone; then there is nothing to remove.
                if let Some(listeners) = listeners.upgrade() {
                    listeners.remove(id);
                }
            })),
        }
    }

    /// Remove the listener; it will not be called again
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the listener registered for the lifetime of the store
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Internal: RAII guard marking the current thread as the active dispatcher
///
/// Cleared on drop so a panicking listener does not leave the store
/// believing a dispatch is still running.
struct DispatchGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl<'a> DispatchGuard<'a> {
    fn claim(owner: &'a Mutex<Option<ThreadId>>, thread: ThreadId) -> Self {
        *lock(owner) = Some(thread);
        Self(owner)
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        *lock(self.0) = None;
    }
}

/// Flatten reducer effects into the actions they send, in order
fn feedback_actions<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
    effects.into_iter().flat_map(Effect::into_actions).collect()
}

/// Store runtime for coordinating reducer execution and listener notification.
pub mod store {
    use super::{
        Action, Arc, DispatchGuard, Listener, Listeners, Mutex, Reducer, StoreConfig,
        Subscription, VecDeque, feedback_actions, lock,
    };
    use crate::metrics::StoreMetrics;
    use pocket_todo_core::SmallVec;
    use std::time::Instant;
    use tokio::sync::{broadcast, watch};

    struct Inner<S, A, E, R> {
        /// State cell; written only inside `apply`
        state: watch::Sender<S>,
        reducer: R,
        environment: E,
        /// Serializes dispatch across threads
        gate: Mutex<()>,
        /// Thread currently dispatching, if any
        dispatcher: Mutex<Option<std::thread::ThreadId>>,
        listeners: Arc<Listeners<S>>,
        action_broadcast: broadcast::Sender<A>,
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (in a `watch` cell so async observers can follow it)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Follow-up effects and listener notification
    ///
    /// Cloning a Store is cheap and yields another handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        inner: Arc<Inner<S, A, E, R>>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Action + Send + Clone + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (state, _) = watch::channel(initial_state);
            // broadcast::channel rejects a zero capacity
            let (action_broadcast, _) = broadcast::channel(config.action_broadcast_capacity.max(1));

            Self {
                inner: Arc::new(Inner {
                    state,
                    reducer,
                    environment,
                    gate: Mutex::new(()),
                    dispatcher: Mutex::new(None),
                    listeners: Arc::new(Listeners::new()),
                    action_broadcast,
                }),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Runs the reducer with (state, action, environment)
        /// 2. Applies actions sent back by the returned effects, in order
        /// 3. Notifies listeners after each applied action
        ///
        /// Everything has happened by the time `send` returns.
        ///
        /// # Ordering
        ///
        /// Actions are applied in the order they are sent. Follow-up actions
        /// from effects run right after the action that produced them. A
        /// listener that calls `send` dispatches in place: its action and
        /// follow-ups are applied (and listeners notified) before that inner
        /// `send` returns, after which the outer dispatch carries on. A
        /// `send` from another thread waits for the running dispatch to
        /// finish.
        ///
        /// # Panics
        ///
        /// A panicking reducer or listener propagates out of `send`, and the
        /// follow-ups of that dispatch not yet applied are dropped. The store
        /// stays usable.
        #[tracing::instrument(skip_all, name = "store_send", fields(action = action.name()))]
        pub fn send(&self, action: A) {
            let inner = &self.inner;
            let current = std::thread::current().id();

            if *lock(&inner.dispatcher) == Some(current) {
                tracing::trace!("Nested dispatch from a listener");
                self.dispatch(action);
                return;
            }

            let _gate = lock(&inner.gate);
            let _dispatcher = DispatchGuard::claim(&inner.dispatcher, current);
            self.dispatch(action);
        }

        /// Apply `action` and, depth-first, every follow-up it leads to
        fn dispatch(&self, action: A) {
            let mut pending = VecDeque::from([action]);
            while let Some(next) = pending.pop_front() {
                let feedback = self.apply(next);
                // Follow-ups run before the rest of what is pending
                for follow_up in feedback.into_iter().rev() {
                    pending.push_front(follow_up);
                }
            }
        }

        /// Apply one action: reduce, broadcast, notify
        ///
        /// Returns the actions sent back by the reducer's effects.
        fn apply(&self, action: A) -> Vec<A> {
            let inner = &self.inner;
            let name = action.name();
            let span = tracing::debug_span!("reducer_execution", action = name);
            let _enter = span.enter();

            let observed = (inner.action_broadcast.receiver_count() > 0).then(|| action.clone());

            let start = Instant::now();
            let mut effects = SmallVec::new();
            inner.state.send_modify(|state| {
                effects = inner.reducer.reduce(state, action, &inner.environment);
            });
            StoreMetrics::record_action(name, start.elapsed());

            let feedback = feedback_actions(effects);
            if !feedback.is_empty() {
                tracing::trace!(count = feedback.len(), "Follow-up actions sent by effects");
                StoreMetrics::record_feedback(feedback.len());
            }

            if let Some(observed) = observed {
                // Err only means every observer has gone away meanwhile
                let _ = inner.action_broadcast.send(observed);
            }

            self.notify();
            feedback
        }

        /// Call every listener with the current state
        fn notify(&self) {
            let listeners: Vec<Listener<S>> = self.inner.listeners.snapshot();
            if listeners.is_empty() {
                return;
            }

            // Listeners get their own copy so they can read or send freely.
            let state = self.inner.state.borrow().clone();
            for listener in &listeners {
                listener(&state);
            }
            StoreMetrics::record_notified(listeners.len());
        }

        /// Read current state via a closure
        ///
        /// The closure gets its own copy of the state, so it may call
        /// [`Store::send`]; it does not see changes made meanwhile.
        ///
        /// ```ignore
        /// let task_count = store.state(|s| s.tasks.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.snapshot();
            f(&state)
        }

        /// Clone out the current state
        #[must_use]
        pub fn snapshot(&self) -> S {
            self.inner.state.borrow().clone()
        }

        /// Register a listener called with the new state after every applied action
        ///
        /// Listeners run synchronously inside [`Store::send`], in
        /// subscription order.
        pub fn subscribe<F>(&self, listener: F) -> Subscription
        where
            F: Fn(&S) + Send + Sync + 'static,
        {
            let id = self.inner.listeners.insert(Arc::new(listener));
            tracing::debug!(listener = id, "Listener subscribed");
            Subscription::new(&self.inner.listeners, id)
        }

        /// Number of registered listeners
        #[must_use]
        pub fn listener_count(&self) -> usize {
            self.inner.listeners.len()
        }

        /// Follow state changes from async code
        ///
        /// The receiver is marked changed after every applied action.
        #[must_use]
        pub fn watch_state(&self) -> watch::Receiver<S> {
            self.inner.state.subscribe()
        }

        /// Subscribe to every action the store applies
        ///
        /// Includes follow-up actions produced by effects. A receiver that
        /// falls more than the configured capacity behind gets
        /// `RecvError::Lagged` and skips ahead.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.inner.action_broadcast.subscribe()
        }
    }
}

pub use store::Store;
