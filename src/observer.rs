//! Ordered listener registry.
//!
//! [`ObserverList`] keeps listeners in registration order and hands out an
//! [`ObserverHandle`] per listener so it can be removed later. Notification is
//! synchronous: [`ObserverList::for_each`] visits every listener in the order
//! it was added.

/// Handle returned by [`ObserverList::add`], used to unregister a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

/// Registration-ordered set of boxed listeners.
pub struct ObserverList<T: ?Sized> {
    next_handle: u64,
    entries: Vec<(ObserverHandle, Box<T>)>,
}

impl<T: ?Sized> ObserverList<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            entries: Vec::new(),
        }
    }

    /// Register a listener; it is notified after every listener added before it.
    pub fn add(&mut self, observer: Box<T>) -> ObserverHandle {
        let handle = ObserverHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, observer));
        handle
    }

    /// Unregister a listener, returning it if the handle was known.
    pub fn remove(&mut self, handle: ObserverHandle) -> Option<Box<T>> {
        let idx = self.entries.iter().position(|(h, _)| *h == handle)?;
        Some(self.entries.remove(idx).1)
    }

    /// Invoke `f` on every listener in registration order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut T)) {
        for (_, observer) in &mut self.entries {
            f(observer);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for ObserverList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.entries.len())
            .finish()
    }
}
