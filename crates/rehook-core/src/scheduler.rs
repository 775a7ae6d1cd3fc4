use std::collections::HashSet;
use std::rc::Rc;

use slotmap::SlotMap;
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use crate::effects::{EffectClass, EffectSlot, PendingEffect};
use crate::error::{Result, RuntimeError};
use crate::render_api::{Frame, FrameRecorder, RenderBackend};
use crate::runtime::{Cx, Instance, InstanceId, Lifecycle};
use crate::state::UpdateQueue;
use crate::view::{RenderFn, View, ViewKind};

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Render passes allowed in one flush before it is aborted.
    pub max_update_depth: usize,
    /// Layout effects taking longer than this per pass are reported.
    pub slow_layout_budget: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_update_depth: 50,
            slow_layout_budget: Duration::from_millis(16),
        }
    }
}

/// Counters for the most recent flush.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    pub render_passes: usize,
    pub commits: usize,
    pub paints: usize,
    pub layout_ms: f32,
}

#[derive(Default)]
struct Pass {
    rendered: HashSet<InstanceId>,
    mounted: Vec<InstanceId>,
    /// Pre-order: parents before their children.
    removed: Vec<InstanceId>,
    /// Children before parents, registration order within an instance.
    effects: Vec<PendingEffect>,
    /// Effect slots displaced by a hook-order change during render.
    retired: Vec<Rc<EffectSlot>>,
}

impl Pass {
    fn is_empty(&self) -> bool {
        self.rendered.is_empty() && self.removed.is_empty()
    }
}

/// Work a commit leaves for after paint.
struct PassiveWork {
    removed: Vec<InstanceId>,
    effects: Vec<PendingEffect>,
}

/// Owns the component tree and drives render → commit → layout effects →
/// paint → passive effects until no updates are pending.
pub struct Scheduler<B: RenderBackend = FrameRecorder> {
    config: RuntimeConfig,
    instances: SlotMap<InstanceId, Instance>,
    root: Option<InstanceId>,
    queue: Rc<UpdateQueue>,
    committed: Option<View>,
    backend: B,
    frame_count: u64,
    last_frame: Option<Frame>,
    metrics: Metrics,
}

impl Scheduler<FrameRecorder> {
    pub fn headless() -> Self {
        Self::new(FrameRecorder::new())
    }
}

impl Default for Scheduler<FrameRecorder> {
    fn default() -> Self {
        Self::headless()
    }
}

impl<B: RenderBackend> Scheduler<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, RuntimeConfig::default())
    }

    pub fn with_config(backend: B, config: RuntimeConfig) -> Self {
        Self {
            config,
            instances: SlotMap::with_key(),
            root: None,
            queue: Rc::new(UpdateQueue::default()),
            committed: None,
            backend,
            frame_count: 0,
            last_frame: None,
            metrics: Metrics::default(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Host tree of the latest commit, which may not have been painted yet.
    pub fn committed(&self) -> Option<&View> {
        self.committed.as_ref()
    }

    pub fn root(&self) -> Option<InstanceId> {
        self.root
    }

    /// `None` once the instance has been discarded.
    pub fn lifecycle(&self, id: InstanceId) -> Option<Lifecycle> {
        self.instances.get(id).map(|i| i.status)
    }

    /// First live instance of the named component.
    pub fn find(&self, name: &str) -> Option<InstanceId> {
        self.instances
            .iter()
            .find(|(_, i)| i.name == name && i.status != Lifecycle::Unmounting)
            .map(|(id, _)| id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Mounts `render` as the root component, replacing any previous root.
    pub fn mount(
        &mut self,
        name: &'static str,
        render: impl Fn(&mut Cx<'_>) -> View + 'static,
    ) -> Result<InstanceId> {
        if self.root.is_some() {
            self.unmount()?;
        }
        let mut pass = Pass::default();
        let render: RenderFn = Rc::new(render);
        let id = self.mount_instance(name, None, render, 0, &mut pass);
        self.root = Some(id);
        self.run(pass)?;
        Ok(id)
    }

    /// Clicks the button labelled `label` in the last painted frame.
    pub fn click(&mut self, label: &str) -> Result<()> {
        let handler = self
            .last_frame
            .as_ref()
            .and_then(|f| f.hit_region_by_label(label))
            .and_then(|h| h.on_click.clone())
            .ok_or_else(|| RuntimeError::NoSuchButton(label.to_string()))?;
        log::debug!("click '{label}'");
        handler();
        self.flush()
    }

    /// Processes pending state updates to completion.
    pub fn flush(&mut self) -> Result<()> {
        self.run(Pass::default())
    }

    /// Tears the whole tree down, running every installed cleanup.
    pub fn unmount(&mut self) -> Result<()> {
        let root = self.root.take().ok_or(RuntimeError::NotMounted)?;
        self.metrics = Metrics::default();
        self.queue.clear();

        let mut pass = Pass::default();
        self.begin_unmount(root, &mut pass);
        let passive = self.commit(pass);
        self.paint();
        self.run_passive(passive);

        // cleanups may still write to state of discarded instances
        self.queue.clear();
        Ok(())
    }

    fn run(&mut self, mut pass: Pass) -> Result<()> {
        self.metrics = Metrics::default();
        let mut needs_paint = false;

        loop {
            if pass.is_empty() {
                if self.queue.is_empty() {
                    break;
                }
                if self.metrics.render_passes >= self.config.max_update_depth {
                    self.queue.clear();
                    if needs_paint {
                        self.paint();
                    }
                    log::warn!(
                        "aborting flush after {} render passes; state never settled",
                        self.metrics.render_passes
                    );
                    return Err(RuntimeError::UpdateDepthExceeded {
                        limit: self.config.max_update_depth,
                    });
                }
                self.render_dirty(&mut pass);
                if pass.is_empty() {
                    continue;
                }
            }

            self.metrics.render_passes += 1;
            let passive = self.commit(std::mem::take(&mut pass));
            needs_paint = true;

            if self.queue.is_empty() {
                self.paint();
                needs_paint = false;
            } else {
                // Re-render before anything is painted. Passive work of this
                // commit still has to run first.
                log::debug!("layout effect scheduled an update; skipping paint");
            }
            self.run_passive(passive);
        }

        if needs_paint {
            self.paint();
        }

        log::debug!(
            "flush done: {} passes, {} commits, {} paints, layout {:.3} ms",
            self.metrics.render_passes,
            self.metrics.commits,
            self.metrics.paints,
            self.metrics.layout_ms
        );
        Ok(())
    }

    fn render_dirty(&mut self, pass: &mut Pass) {
        let mut dirty = self.queue.take();
        dirty.retain(|id| match self.instances.get(*id) {
            Some(inst) if inst.status != Lifecycle::Unmounting => true,
            _ => {
                log::warn!("ignoring state update on an unmounted component");
                false
            }
        });
        dirty.sort_by_key(|id| self.instances.get(*id).map_or(0, |i| i.depth));

        for id in dirty {
            if pass.rendered.contains(&id) {
                continue;
            }
            // an ancestor rendered earlier in this pass may have dropped it
            if self
                .instances
                .get(id)
                .is_none_or(|i| i.status == Lifecycle::Unmounting)
            {
                continue;
            }
            self.render_instance(id, pass);
        }
    }

    fn mount_instance(
        &mut self,
        name: &'static str,
        key: Option<String>,
        render: RenderFn,
        depth: usize,
        pass: &mut Pass,
    ) -> InstanceId {
        let id = self
            .instances
            .insert(Instance::new(name, key, render, depth));
        log::debug!("{name}: mounting");
        pass.mounted.push(id);
        self.render_instance(id, pass);
        id
    }

    fn render_instance(&mut self, id: InstanceId, pass: &mut Pass) {
        let Some(inst) = self.instances.get_mut(id) else {
            return;
        };
        if inst.status == Lifecycle::Mounted {
            inst.status = Lifecycle::Rendering;
        }
        let name = inst.name;
        let render = inst.render.clone();
        let mut hooks = std::mem::take(&mut inst.hooks);
        let mut effects = Vec::new();

        let view = {
            let mut cx = Cx::new(id, name, &mut hooks, &self.queue, &mut effects);
            let view = render(&mut cx);
            pass.retired.extend(cx.finish());
            view
        };
        pass.rendered.insert(id);
        log::trace!("{name}: rendered, {} effects queued", effects.len());

        self.reconcile(id, &view, pass);
        if let Some(inst) = self.instances.get_mut(id) {
            inst.hooks = hooks;
            inst.view = view;
        }
        // after the children's, so children's effects run first
        pass.effects.extend(effects);
    }

    /// Matches the component nodes of `view` against `parent`'s current
    /// children: matches re-render, new nodes mount, leftovers unmount.
    fn reconcile(&mut self, parent: InstanceId, view: &View, pass: &mut Pass) {
        let wanted = view.components();
        let (depth, previous) = match self.instances.get_mut(parent) {
            Some(inst) => (inst.depth, std::mem::take(&mut inst.children)),
            None => return,
        };
        let mut previous: Vec<Option<InstanceId>> = previous.into_iter().map(Some).collect();
        let mut next: SmallVec<[InstanceId; 4]> = SmallVec::new();

        for (position, (name, key, render)) in wanted.into_iter().enumerate() {
            let child = match self.take_match(&mut previous, position, name, key.as_deref()) {
                Some(child) => {
                    if let Some(inst) = self.instances.get_mut(child) {
                        inst.render = render;
                    }
                    if !pass.rendered.contains(&child) {
                        self.render_instance(child, pass);
                    }
                    child
                }
                None => self.mount_instance(name, key, render, depth + 1, pass),
            };
            next.push(child);
        }

        for child in previous.into_iter().flatten() {
            self.begin_unmount(child, pass);
        }
        if let Some(inst) = self.instances.get_mut(parent) {
            inst.children = next;
        }
    }

    /// Keyed children match by name and key; unkeyed ones by name and position.
    fn take_match(
        &self,
        previous: &mut [Option<InstanceId>],
        position: usize,
        name: &str,
        key: Option<&str>,
    ) -> Option<InstanceId> {
        let index = (0..previous.len()).find(|&i| {
            previous[i]
                .and_then(|id| self.instances.get(id))
                .is_some_and(|inst| {
                    inst.name == name
                        && inst.key.as_deref() == key
                        && (key.is_some() || i == position)
                })
        })?;
        previous[index].take()
    }

    fn begin_unmount(&mut self, id: InstanceId, pass: &mut Pass) {
        let Some(inst) = self.instances.get_mut(id) else {
            return;
        };
        inst.status = Lifecycle::Unmounting;
        log::debug!("{}: unmounting", inst.name);
        let children = inst.children.clone();
        pass.removed.push(id);
        for child in children {
            self.begin_unmount(child, pass);
        }
    }

    fn commit(&mut self, pass: Pass) -> PassiveWork {
        let committed = self.root.map(|root| self.expand(root));
        self.committed = committed;
        self.metrics.commits += 1;

        let (layout, passive): (Vec<_>, Vec<_>) = pass
            .effects
            .into_iter()
            .partition(|e| e.class() == EffectClass::Layout);

        for slot in &pass.retired {
            if slot.run_cleanup() {
                log::trace!("cleaned up displaced {} effect", slot.class.label());
            }
        }
        for id in &pass.removed {
            if let Some(inst) = self.instances.get(*id) {
                inst.run_cleanups(EffectClass::Layout);
            }
        }
        for effect in &layout {
            effect.cleanup_previous();
        }

        let started = Instant::now();
        for effect in layout {
            effect.run();
        }
        let elapsed = started.elapsed();
        self.metrics.layout_ms += elapsed.as_secs_f32() * 1000.0;
        if elapsed > self.config.slow_layout_budget {
            log::warn!(
                "layout effects blocked paint for {:.1} ms (budget {:.1} ms)",
                elapsed.as_secs_f32() * 1000.0,
                self.config.slow_layout_budget.as_secs_f32() * 1000.0
            );
        }

        for id in &pass.mounted {
            if let Some(inst) = self.instances.get_mut(*id)
                && inst.status == Lifecycle::Mounting
            {
                log::debug!("{}: mounted", inst.name);
                inst.status = Lifecycle::Mounted;
            }
        }
        for id in &pass.rendered {
            if let Some(inst) = self.instances.get_mut(*id)
                && inst.status == Lifecycle::Rendering
            {
                inst.status = Lifecycle::Mounted;
            }
        }

        PassiveWork {
            removed: pass.removed,
            effects: passive,
        }
    }

    fn expand(&self, id: InstanceId) -> View {
        let Some(inst) = self.instances.get(id) else {
            return View::new(ViewKind::Column);
        };
        let mut children = inst.children.iter().copied();
        let body = self.expand_view(&inst.view, &mut children);
        View::new(ViewKind::Instance {
            name: inst.name,
            id,
        })
        .with_children(vec![body])
    }

    fn expand_view(&self, view: &View, children: &mut impl Iterator<Item = InstanceId>) -> View {
        match &view.kind {
            ViewKind::Component { .. } => match children.next() {
                Some(child) => self.expand(child),
                None => View::new(ViewKind::Column),
            },
            kind => {
                let mut kids = Vec::with_capacity(view.children.len());
                for child in &view.children {
                    kids.push(self.expand_view(child, children));
                }
                View::new(kind.clone()).with_children(kids)
            }
        }
    }

    fn paint(&mut self) {
        self.frame_count += 1;
        let frame = Frame::paint(self.frame_count, self.committed.as_ref());
        log::trace!("paint frame {}: {:?}", frame.number, frame.scene.nodes);
        self.backend.frame(&frame);
        self.last_frame = Some(frame);
        self.metrics.paints += 1;
    }

    fn run_passive(&mut self, work: PassiveWork) {
        for id in &work.removed {
            if let Some(inst) = self.instances.get(*id) {
                inst.run_cleanups(EffectClass::Passive);
            }
        }
        for id in work.removed {
            if let Some(inst) = self.instances.remove(id) {
                log::debug!("{}: unmounted", inst.name);
            }
        }

        let effects: Vec<PendingEffect> = work
            .effects
            .into_iter()
            .filter(|e| self.instances.contains_key(e.instance))
            .collect();
        for effect in &effects {
            effect.cleanup_previous();
        }
        for effect in effects {
            effect.run();
        }
    }
}
