//! Ambient current-span scope.
//!
//! The core API passes parent contexts explicitly; nothing in the
//! pipeline consults this module. It exists for call sites where
//! threading a context through every signature is impractical: a caller
//! [`enter`]s a context, deeper code reads it back with [`current`], and
//! the guard restores the previous scope on drop so scopes nest.
//!
//! The scope is strictly thread-local. It does not follow work across
//! `spawn` or `.await` migrations; async code should hold the
//! [`SpanContext`] in its own state instead.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::context::SpanContext;

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<SpanContext>> = const { RefCell::new(None) };
}

/// Makes `context` the calling thread's current span until the returned
/// guard drops.
///
/// ## Example
///
/// ```rust
/// use spanpipe::{SpanContext, scope};
///
/// let context = SpanContext::new_root();
/// {
///     let _guard = scope::enter(context.clone());
///     assert_eq!(scope::current(), Some(context));
/// }
/// assert!(scope::current().is_none());
/// ```
pub fn enter(context: SpanContext) -> ScopeGuard {
    let previous = CURRENT_SCOPE.with(|current| current.replace(Some(context)));
    ScopeGuard {
        previous,
        _not_send: PhantomData,
    }
}

/// Returns the calling thread's current span context, if any.
pub fn current() -> Option<SpanContext> {
    CURRENT_SCOPE.with(|current| current.borrow().clone())
}

/// Restores the previous scope on drop.
///
/// Deliberately `!Send`: the guard must drop on the thread that entered
/// the scope.
#[derive(Debug)]
pub struct ScopeGuard {
    previous: Option<SpanContext>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // The thread-local may already be gone during thread teardown
        let _ = CURRENT_SCOPE.try_with(|current| current.replace(previous));
    }
}
