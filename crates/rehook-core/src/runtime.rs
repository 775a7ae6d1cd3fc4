use std::any::Any;
use std::rc::Rc;

use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::effects::{Dispose, EffectClass, EffectSlot, PendingEffect};
use crate::state::{State, UpdateQueue};
use crate::view::{RenderFn, View, ViewKind};

new_key_type! {
    /// Generational id of a mounted component instance.
    pub struct InstanceId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created and rendered, not committed yet.
    Mounting,
    Mounted,
    /// Re-rendered, waiting for commit.
    Rendering,
    /// Dropped from its parent's output; cleanups pending.
    Unmounting,
}

pub(crate) enum Hook {
    State(Box<dyn Any>),
    Effect(Rc<EffectSlot>),
}

impl Hook {
    fn kind(&self) -> &'static str {
        match self {
            Hook::State(_) => "state",
            Hook::Effect(slot) => slot.class.label(),
        }
    }
}

pub(crate) struct Instance {
    pub name: &'static str,
    pub key: Option<String>,
    pub render: RenderFn,
    pub depth: usize,
    pub hooks: Vec<Hook>,
    pub view: View,
    pub children: SmallVec<[InstanceId; 4]>,
    pub status: Lifecycle,
}

impl Instance {
    pub fn new(name: &'static str, key: Option<String>, render: RenderFn, depth: usize) -> Self {
        Self {
            name,
            key,
            render,
            depth,
            hooks: Vec::new(),
            view: View::new(ViewKind::Column),
            children: SmallVec::new(),
            status: Lifecycle::Mounting,
        }
    }

    /// Runs the installed cleanups of one effect class, in registration order.
    pub fn run_cleanups(&self, class: EffectClass) {
        for (index, hook) in self.hooks.iter().enumerate() {
            if let Hook::Effect(slot) = hook
                && slot.class == class
                && slot.run_cleanup()
            {
                log::trace!("{}: teardown of {} effect #{index}", self.name, class.label());
            }
        }
    }
}

/// Composition context handed to a component while it renders.
///
/// Hooks are slot-ordered: the Nth call during a render always refers to
/// the Nth slot, so they must not be called conditionally.
pub struct Cx<'a> {
    id: InstanceId,
    name: &'static str,
    hooks: &'a mut Vec<Hook>,
    cursor: usize,
    queue: &'a Rc<UpdateQueue>,
    effects: &'a mut Vec<PendingEffect>,
    /// Effect slots overwritten by a different hook; cleaned up at commit.
    retired: Vec<Rc<EffectSlot>>,
}

impl<'a> Cx<'a> {
    pub(crate) fn new(
        id: InstanceId,
        name: &'static str,
        hooks: &'a mut Vec<Hook>,
        queue: &'a Rc<UpdateQueue>,
        effects: &'a mut Vec<PendingEffect>,
    ) -> Self {
        Self {
            id,
            name,
            hooks,
            cursor: 0,
            queue,
            effects,
            retired: Vec::new(),
        }
    }

    /// Slot-based state cell, initialised on first render.
    pub fn remember_state<T: Clone + PartialEq + 'static>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> State<T> {
        let cursor = self.next_slot();
        if let Some(Hook::State(b)) = self.hooks.get(cursor)
            && let Some(state) = b.downcast_ref::<State<T>>()
        {
            return state.clone();
        }
        let state = State::new(init(), self.id, Rc::downgrade(self.queue));
        self.put(cursor, Hook::State(Box::new(state.clone())));
        state
    }

    /// Deferred effect: runs after paint whenever `key` changed since the
    /// last committed render. A `()` key runs once, at mount.
    pub fn disposable_effect<K: PartialEq + 'static>(
        &mut self,
        key: K,
        effect: impl FnOnce() -> Dispose + 'static,
    ) {
        self.register(EffectClass::Passive, Some(key), effect);
    }

    /// Deferred effect that runs after every committed render.
    pub fn side_effect(&mut self, effect: impl FnOnce() -> Dispose + 'static) {
        self.register::<()>(EffectClass::Passive, None, effect);
    }

    /// Synchronous effect: runs after commit and before paint whenever `key`
    /// changed. State set here re-renders before anything is painted.
    pub fn layout_effect<K: PartialEq + 'static>(
        &mut self,
        key: K,
        effect: impl FnOnce() -> Dispose + 'static,
    ) {
        self.register(EffectClass::Layout, Some(key), effect);
    }

    /// Synchronous effect that runs after every commit.
    pub fn layout_side_effect(&mut self, effect: impl FnOnce() -> Dispose + 'static) {
        self.register::<()>(EffectClass::Layout, None, effect);
    }

    fn register<K: PartialEq + 'static>(
        &mut self,
        class: EffectClass,
        key: Option<K>,
        body: impl FnOnce() -> Dispose + 'static,
    ) {
        let index = self.next_slot();
        let existing = match self.hooks.get(index) {
            Some(Hook::Effect(slot)) if slot.class == class => Some(slot.clone()),
            _ => None,
        };
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = Rc::new(EffectSlot::new(class));
                self.put(index, Hook::Effect(slot.clone()));
                slot
            }
        };

        if slot.swap_key(key) {
            self.effects.push(PendingEffect {
                instance: self.id,
                component: self.name,
                index,
                slot,
                body: Box::new(body),
            });
        } else {
            log::trace!(
                "{}: {} effect #{index} skipped, key unchanged",
                self.name,
                class.label()
            );
        }
    }

    fn next_slot(&mut self) -> usize {
        let cursor = self.cursor;
        self.cursor += 1;
        cursor
    }

    fn put(&mut self, cursor: usize, hook: Hook) {
        if cursor < self.hooks.len() {
            log::warn!(
                "{}: hook #{} changed from {} to {}; replacing. Hooks must run in the same order every render.",
                self.name,
                cursor,
                self.hooks[cursor].kind(),
                hook.kind()
            );
            if let Hook::Effect(old) = std::mem::replace(&mut self.hooks[cursor], hook) {
                self.retired.push(old);
            }
        } else {
            self.hooks.push(hook);
        }
    }

    /// Ends the render and hands back the effect slots it displaced.
    pub(crate) fn finish(self) -> Vec<Rc<EffectSlot>> {
        if self.cursor < self.hooks.len() {
            log::warn!(
                "{}: rendered {} hooks, previous render had {}",
                self.name,
                self.cursor,
                self.hooks.len()
            );
        }
        self.retired
    }
}
