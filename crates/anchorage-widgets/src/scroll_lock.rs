//! Reference-counted document scroll lock.
//!
//! Several overlays may want the page behind them frozen at once. The lock
//! remembers the root `overflow` value the first holder found, sets it to
//! `hidden`, and puts the remembered value back only when the last holder
//! releases, so overlays closing out of order never unlock the page early.

use anchorage_core::Host;
use std::sync::{Arc, Mutex, PoisonError};

const OVERFLOW: &str = "overflow";

#[derive(Debug, Default)]
struct LockState {
    count: usize,
    saved: Option<String>,
    next_token: u64,
}

/// A shared scroll lock. Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    state: Arc<Mutex<LockState>>,
}

/// Proof of one hold on a [`ScrollLock`]; give it back with
/// [`ScrollLock::release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a token without releasing it keeps the page locked"]
pub struct ScrollLockToken {
    id: u64,
}

thread_local! {
    static SHARED: ScrollLock = ScrollLock::new();
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock shared by every overlay created on this thread.
    ///
    /// A host document is driven from a single thread, so this is the one
    /// lock for that document.
    pub fn shared() -> Self {
        SHARED.with(Clone::clone)
    }

    /// Take a hold. The first hold saves the root overflow and hides it.
    pub fn acquire(&self, host: &mut dyn Host) -> ScrollLockToken {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.count == 0 {
            state.saved = host.root_style(OVERFLOW);
            host.set_root_style(OVERFLOW, Some("hidden"));
        }
        state.count += 1;
        state.next_token += 1;
        tracing::debug!(holders = state.count, "scroll lock acquired");
        ScrollLockToken {
            id: state.next_token,
        }
    }

    /// Give a hold back. The last release restores the saved overflow.
    pub fn release(&self, host: &mut dyn Host, token: ScrollLockToken) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.count == 0 {
            tracing::warn!(token = token.id, "scroll lock released while not held");
            return;
        }
        state.count -= 1;
        tracing::debug!(holders = state.count, "scroll lock released");
        if state.count == 0 {
            let saved = state.saved.take();
            host.set_root_style(OVERFLOW, saved.as_deref());
        }
    }

    /// Number of outstanding holds.
    pub fn holders(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }

    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorage_core::{Size, VirtualDocument};

    fn doc() -> VirtualDocument {
        VirtualDocument::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn nested_holds_unlock_on_last_release() {
        let mut doc = doc();
        let lock = ScrollLock::new();
        let first = lock.acquire(&mut doc);
        let second = lock.clone().acquire(&mut doc);
        assert_eq!(doc.root_style("overflow").as_deref(), Some("hidden"));

        lock.release(&mut doc, first);
        assert_eq!(doc.root_style("overflow").as_deref(), Some("hidden"));
        assert!(lock.is_locked());

        lock.release(&mut doc, second);
        assert_eq!(doc.root_style("overflow"), None);
        assert!(!lock.is_locked());
    }

    #[test]
    fn restores_the_original_value() {
        let mut doc = doc();
        doc.set_root_style("overflow", Some("scroll"));
        let lock = ScrollLock::new();
        let token = lock.acquire(&mut doc);
        lock.release(&mut doc, token);
        assert_eq!(doc.root_style("overflow").as_deref(), Some("scroll"));
    }

    #[test]
    fn stray_release_is_ignored() {
        let mut doc = doc();
        let lock = ScrollLock::new();
        let other = ScrollLock::new();
        let token = other.acquire(&mut doc);
        lock.release(&mut doc, token);
        assert_eq!(lock.holders(), 0);
        assert_eq!(doc.root_style("overflow").as_deref(), Some("hidden"));
    }

    #[test]
    fn shared_lock_is_the_same_on_one_thread() {
        let mut doc = doc();
        let a = ScrollLock::shared();
        let b = ScrollLock::shared();
        let token = a.acquire(&mut doc);
        assert_eq!(b.holders(), 1);
        b.release(&mut doc, token);
        assert_eq!(a.holders(), 0);
    }
}
