//! Observable device-capability signals.
//!
//! Capabilities such as "touch is the primary input" or "user prefers
//! reduced motion" can change while the site is open (a tablet gets a
//! keyboard attached, an OS setting flips). Components receive a
//! [`Signal`] handle instead of querying a global, so they can react to
//! changes and tests can inject fixed values.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct SignalInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<dyn Fn(&T)>>,
}

/// A shared, versioned value with change notification.
///
/// Clones share the same inner state. `set` with an equal value is a
/// no-op and does not bump the version.
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

/// Keeps a subscriber alive. Dropping it unsubscribes.
pub struct Subscription {
    _callback: Rc<dyn std::any::Any>,
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Incremented once per value change.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Register a change callback. It fires after every value change for
    /// as long as the returned [`Subscription`] lives.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(f);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Rc::new(callback),
        }
    }

    fn notify(&self) {
        let (value, live) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let live: Vec<Callback<T>> =
                inner.subscribers.iter().filter_map(|w| w.upgrade()).collect();
            (inner.value.clone(), live)
        };
        for cb in live {
            cb(&value);
        }
    }
}

/// Input class of the device, derived from the touch-primary signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Mouse or trackpad: hover reveals tiles.
    Pointer,
    /// Touch-only: scroll focus reveals tiles.
    Touch,
}

/// The two capability signals consumed read-only by the engine.
#[derive(Debug, Clone)]
pub struct DeviceCaps {
    pub touch_primary: Signal<bool>,
    pub reduced_motion: Signal<bool>,
}

impl DeviceCaps {
    pub fn new(touch_primary: bool, reduced_motion: bool) -> Self {
        Self {
            touch_primary: Signal::new(touch_primary),
            reduced_motion: Signal::new(reduced_motion),
        }
    }

    pub fn device_class(&self) -> DeviceClass {
        if self.touch_primary.get() {
            DeviceClass::Touch
        } else {
            DeviceClass::Pointer
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_same_value_is_noop() {
        let s = Signal::new(false);
        s.set(false);
        assert_eq!(s.version(), 0);
        s.set(true);
        assert_eq!(s.version(), 1);
        assert!(s.get());
    }

    #[test]
    fn subscribers_fire_until_dropped() {
        let s = Signal::new(0u32);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = s.subscribe(move |_| h.set(h.get() + 1));
        s.set(1);
        s.set(2);
        assert_eq!(hits.get(), 2);
        drop(sub);
        s.set(3);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn clones_share_state() {
        let caps = DeviceCaps::default();
        let other = caps.clone();
        assert_eq!(caps.device_class(), DeviceClass::Pointer);
        other.touch_primary.set(true);
        assert_eq!(caps.device_class(), DeviceClass::Touch);
    }
}
