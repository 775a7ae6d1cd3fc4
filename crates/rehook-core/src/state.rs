use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::InstanceId;

/// Instances that requested a re-render since the last render pass.
#[derive(Default)]
pub(crate) struct UpdateQueue {
    dirty: RefCell<Vec<InstanceId>>,
}

impl UpdateQueue {
    pub fn schedule(&self, id: InstanceId) {
        let mut dirty = self.dirty.borrow_mut();
        if !dirty.contains(&id) {
            dirty.push(id);
        }
    }

    pub fn take(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.dirty.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.dirty.borrow_mut().clear();
    }
}

/// A state cell owned by one component instance.
///
/// Writing a different value schedules a re-render of the owner; writing an
/// equal value is a no-op.
pub struct State<T: 'static> {
    value: Rc<RefCell<T>>,
    owner: InstanceId,
    queue: Weak<UpdateQueue>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            owner: self.owner,
            queue: self.queue.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    pub(crate) fn new(value: T, owner: InstanceId, queue: Weak<UpdateQueue>) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            owner,
            queue,
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn set(&self, v: T) {
        let changed = {
            let mut current = self.value.borrow_mut();
            if *current == v {
                false
            } else {
                *current = v;
                true
            }
        };
        if changed {
            self.request_render();
        } else {
            log::trace!("state write with equal value; skipping re-render");
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    fn request_render(&self) {
        match self.queue.upgrade() {
            Some(queue) => queue.schedule(self.owner),
            None => log::warn!("state updated after its scheduler was dropped"),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("value", &*self.value.borrow())
            .field("owner", &self.owner)
            .finish()
    }
}
