use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::InstanceId;

/// Cleanup handle returned by an effect body.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// An effect without cleanup.
    pub fn noop() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Whether a cleanup is still waiting to run.
    pub fn is_pending(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dispose").field(&self.is_pending()).finish()
    }
}

/// Helper to register cleanup inside effect.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// When an effect body runs relative to paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectClass {
    /// Runs synchronously after commit and before paint. Blocks the frame.
    Layout,
    /// Runs after the frame has been painted.
    Passive,
}

impl EffectClass {
    pub fn label(self) -> &'static str {
        match self {
            EffectClass::Layout => "layout",
            EffectClass::Passive => "passive",
        }
    }
}

/// Per-callsite effect state kept in a hook slot across renders.
pub(crate) struct EffectSlot {
    pub class: EffectClass,
    key: RefCell<Option<Box<dyn Any>>>,
    cleanup: RefCell<Option<Dispose>>,
}

impl EffectSlot {
    pub fn new(class: EffectClass) -> Self {
        Self {
            class,
            key: RefCell::new(None),
            cleanup: RefCell::new(None),
        }
    }

    /// Records `key` and reports whether the body must run. `None` means the
    /// effect is not gated and runs after every render.
    pub fn swap_key<K: PartialEq + 'static>(&self, key: Option<K>) -> bool {
        let Some(key) = key else {
            return true;
        };
        let mut last = self.key.borrow_mut();
        let changed = match last.as_ref() {
            None => true,
            Some(prev) => match prev.downcast_ref::<K>() {
                Some(prev) => *prev != key,
                None => {
                    log::warn!("effect key changed type between renders; treating as changed");
                    true
                }
            },
        };
        if changed {
            *last = Some(Box::new(key));
        }
        changed
    }

    /// Keeps `cleanup` for the next re-run or teardown. A noop is not kept.
    pub fn install(&self, cleanup: Dispose) {
        *self.cleanup.borrow_mut() = cleanup.is_pending().then_some(cleanup);
    }

    /// Runs the cleanup left by the previous body. Returns `false` when there
    /// was none to run.
    pub fn run_cleanup(&self) -> bool {
        // Released before running: the cleanup may touch state.
        let cleanup = self.cleanup.borrow_mut().take();
        match cleanup {
            Some(d) if d.is_pending() => {
                d.run();
                true
            }
            _ => false,
        }
    }
}

/// An effect body queued during render, run during commit or after paint.
pub(crate) struct PendingEffect {
    pub instance: InstanceId,
    pub component: &'static str,
    pub index: usize,
    pub slot: Rc<EffectSlot>,
    pub body: Box<dyn FnOnce() -> Dispose>,
}

impl PendingEffect {
    pub fn class(&self) -> EffectClass {
        self.slot.class
    }

    /// Previous invocation's cleanup.
    pub fn cleanup_previous(&self) {
        if self.slot.run_cleanup() {
            log::trace!(
                "{}: cleaned up {} effect #{}",
                self.component,
                self.class().label(),
                self.index
            );
        }
    }

    pub fn run(self) {
        log::trace!(
            "{}: running {} effect #{}",
            self.component,
            self.class().label(),
            self.index
        );
        let cleanup = (self.body)();
        self.slot.install(cleanup);
    }
}
