//! Single-writer reactive store.
//!
//! State lives behind a `tokio::sync::watch` channel. The owner mutates it
//! with [`Store::update`]; every update is one atomic transition and wakes
//! all subscribers, so readers never poll for changes.

use tokio::sync::watch;

/// A watch-backed state container.
#[derive(Debug)]
pub struct Store<S> {
    tx: watch::Sender<S>,
}

impl<S> Store<S>
where
    S: Clone + Send + Sync,
{
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Read the current state without cloning it.
    ///
    /// The closure runs while the state is borrowed; keep it short and never
    /// call `update` from inside it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Apply one state transition and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut f = Some(f);
        let mut result = None;
        self.tx.send_modify(|state| {
            if let Some(f) = f.take() {
                result = Some(f(state));
            }
        });
        // send_modify always runs its closure, so the result is always set
        result.expect("send_modify runs its closure exactly once")
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}
