use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering as AtomicOrdering},
        Arc, Mutex,
    },
};

use crate::utils::{sync::lock, tracing::trace};

type Teardown = Box<dyn FnOnce() + Send>;

/// An idempotent cancellation handle for a subscription.
///
/// Clones share the same underlying handle. Disposing any clone disposes them all, and only the
/// first call runs the attached teardowns.
///
/// # Examples
///
/// ```
/// use std::sync::{
///     atomic::{AtomicUsize, Ordering},
///     Arc,
/// };
///
/// use seqflow::Disposable;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let disposable = Disposable::new({
///     let calls = Arc::clone(&calls);
///     move || {
///         calls.fetch_add(1, Ordering::SeqCst);
///     }
/// });
///
/// disposable.dispose();
/// disposable.dispose();
///
/// assert!(disposable.is_disposed());
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Disposable(Arc<Inner>);

struct Inner {
    closed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

impl Disposable {
    /// A handle that runs `action` the first time it is disposed.
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let disposable = Disposable::empty();
        disposable.add_teardown(Box::new(action));
        disposable
    }

    /// A handle with nothing attached; it only records whether it was disposed.
    pub fn empty() -> Self {
        Disposable(Arc::new(Inner {
            closed: AtomicBool::new(false),
            teardowns: Mutex::new(Vec::new()),
        }))
    }

    /// Cancels the subscription. Calling it again has no further effect.
    pub fn dispose(&self) {
        if self.close() {
            trace!("disposed");
        }
        self.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.0.closed.load(AtomicOrdering::Acquire)
    }

    /// Ties `child` to this handle: disposing this handle disposes `child` too.
    ///
    /// If this handle is already disposed, `child` is disposed immediately.
    pub fn add(&self, child: Disposable) {
        if self.ptr_eq(&child) {
            return;
        }
        self.add_teardown(Box::new(move || child.dispose()));
    }

    /// Whether both handles are clones of the same subscription.
    pub(crate) fn ptr_eq(&self, other: &Disposable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Marks the handle closed without running teardowns. Returns `true` for the first caller.
    pub(crate) fn close(&self) -> bool {
        !self.0.closed.swap(true, AtomicOrdering::AcqRel)
    }

    /// Runs and drops every pending teardown.
    ///
    /// Teardowns are moved out of the lock before they run, so a teardown may re-enter this handle.
    pub(crate) fn release(&self) {
        let teardowns = std::mem::take(&mut *lock(&self.0.teardowns));
        for teardown in teardowns {
            teardown();
        }
    }

    fn add_teardown(&self, teardown: Teardown) {
        {
            let mut teardowns = lock(&self.0.teardowns);
            if !self.is_disposed() {
                teardowns.push(teardown);
                return;
            }
        }
        teardown();
    }
}

impl Default for Disposable {
    fn default() -> Self {
        Disposable::empty()
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Disposable) {
        let count = Arc::new(AtomicUsize::new(0));
        let disposable = Disposable::new({
            let count = Arc::clone(&count);
            move || {
                count.fetch_add(1, AtomicOrdering::SeqCst);
            }
        });
        (count, disposable)
    }

    #[test]
    fn child_is_disposed_with_parent() {
        let parent = Disposable::empty();
        let (count, child) = counter();
        parent.add(child.clone());
        assert!(!child.is_disposed());

        parent.dispose();
        assert!(child.is_disposed());
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn child_added_after_dispose_is_disposed_immediately() {
        let parent = Disposable::empty();
        parent.dispose();
        let (count, child) = counter();
        parent.add(child.clone());
        assert!(child.is_disposed());
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn teardown_may_dispose_its_own_handle() {
        let slot: Arc<Mutex<Option<Disposable>>> = Arc::new(Mutex::new(None));
        let disposable = Disposable::new({
            let slot = Arc::clone(&slot);
            move || {
                if let Some(disposable) = slot.lock().unwrap().take() {
                    disposable.dispose();
                }
            }
        });
        *slot.lock().unwrap() = Some(disposable.clone());

        disposable.dispose();
        assert!(disposable.is_disposed());
    }

    #[test]
    fn adding_itself_is_a_no_op() {
        let disposable = Disposable::empty();
        disposable.add(disposable.clone());
        disposable.dispose();
        assert!(disposable.is_disposed());
    }
}
