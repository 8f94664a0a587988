//! Listener lists for behaviour callbacks
//!
//! A [`Signal`] holds independently registered listeners and invokes them in
//! registration order. A listener that returns an error is logged and the
//! remaining listeners still run.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

/// Error type listeners may return.
pub type ListenerError = Box<dyn Error + Send + Sync>;

/// Result returned by every listener.
pub type ListenerResult = Result<(), ListenerError>;

/// Identifies a registered listener so it can be disconnected later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<A> {
    id: ListenerId,
    callback: Box<dyn FnMut(&A) -> ListenerResult>,
}

/// Ordered list of listeners receiving `&A` on every emit.
pub struct Signal<A = ()> {
    name: &'static str,
    listeners: SmallVec<[Listener<A>; 2]>,
    next_id: u64,
}

impl<A> Signal<A> {
    /// Create a signal with no listeners.
    ///
    /// The name only shows up in log output.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: SmallVec::new(),
            next_id: 0,
        }
    }

    /// Register a listener. Listeners run in the order they were connected.
    pub fn connect(&mut self, callback: impl FnMut(&A) -> ListenerResult + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Register a listener that cannot fail.
    pub fn connect_infallible(&mut self, mut callback: impl FnMut(&A) + 'static) -> ListenerId {
        self.connect(move |args| {
            callback(args);
            Ok(())
        })
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        if let Some(pos) = self.listeners.iter().position(|l| l.id == id) {
            self.listeners.remove(pos);
            true
        } else {
            false
        }
    }

    /// Invoke every listener with `args`.
    ///
    /// Returns the number of listeners that failed.
    pub fn emit(&mut self, args: &A) -> usize {
        let mut failures = 0;
        for listener in &mut self.listeners {
            if let Err(e) = (listener.callback)(args) {
                failures += 1;
                log::warn!("{} listener {:?} failed: {e}", self.name, listener.id);
            }
        }
        failures
    }

    /// Number of registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check whether no listener is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remove all listeners
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u32> = Signal::new("test");

        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            signal.connect_infallible(move |value| log.borrow_mut().push(format!("{tag}{value}")));
        }

        assert_eq!(signal.emit(&7), 0);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn test_failing_listener_does_not_stop_others() {
        let hits = Rc::new(RefCell::new(0));
        let mut signal: Signal = Signal::new("test");

        let first = Rc::clone(&hits);
        signal.connect_infallible(move |()| *first.borrow_mut() += 1);
        signal.connect(|()| Err("listener broke".into()));
        let last = Rc::clone(&hits);
        signal.connect_infallible(move |()| *last.borrow_mut() += 1);

        assert_eq!(signal.emit(&()), 1);
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn test_disconnect() {
        let mut signal: Signal = Signal::new("test");
        let id = signal.connect_infallible(|()| {});
        assert_eq!(signal.len(), 1);

        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert!(signal.is_empty());
    }
}
