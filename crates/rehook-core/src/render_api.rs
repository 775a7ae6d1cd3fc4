use std::rc::Rc;

use crate::view::{Scene, SceneNode, View, ViewKind};

/// A painted frame: what the user sees plus where they can click.
#[derive(Clone, Debug)]
pub struct Frame {
    pub number: u64,
    pub scene: Scene,
    pub hit_regions: Vec<HitRegion>,
}

#[derive(Clone)]
pub struct HitRegion {
    pub id: u64,
    pub label: String,
    pub on_click: Option<Rc<dyn Fn()>>,
}

impl std::fmt::Debug for HitRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRegion")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

impl Frame {
    /// Flattens a committed tree into scene nodes in document order.
    pub fn paint(number: u64, root: Option<&View>) -> Self {
        let mut frame = Frame {
            number,
            scene: Scene::default(),
            hit_regions: Vec::new(),
        };
        if let Some(root) = root {
            frame.walk(root);
        }
        frame
    }

    fn walk(&mut self, view: &View) {
        match &view.kind {
            ViewKind::Text { text } => {
                self.scene.nodes.push(SceneNode::Text { text: text.clone() });
            }
            ViewKind::Button { text, on_click } => {
                self.scene.nodes.push(SceneNode::Button { text: text.clone() });
                self.hit_regions.push(HitRegion {
                    id: self.hit_regions.len() as u64,
                    label: text.clone(),
                    on_click: on_click.clone(),
                });
            }
            ViewKind::Component { name, .. } => {
                log::warn!("paint: unexpanded component '{name}' in committed tree");
            }
            ViewKind::Column | ViewKind::Instance { .. } => {}
        }
        for child in &view.children {
            self.walk(child);
        }
    }

    pub fn hit_region_by_label(&self, label: &str) -> Option<&HitRegion> {
        self.hit_regions.iter().find(|h| h.label == label)
    }

    /// First text node starting with `prefix`, with the prefix stripped.
    pub fn text_after(&self, prefix: &str) -> Option<&str> {
        self.scene.texts().find_map(|t| t.strip_prefix(prefix))
    }
}

/// Receives every painted frame.
pub trait RenderBackend {
    fn frame(&mut self, frame: &Frame);
}

/// Backend that keeps every painted frame, for tests and transcripts.
#[derive(Default, Debug)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl RenderBackend for FrameRecorder {
    fn frame(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}
