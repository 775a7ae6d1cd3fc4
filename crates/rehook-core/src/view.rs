use std::rc::Rc;

use crate::{Cx, InstanceId};

pub type Callback = Rc<dyn Fn()>;
pub type RenderFn = Rc<dyn Fn(&mut Cx<'_>) -> View>;

#[derive(Clone)]
pub enum ViewKind {
    Column,
    Text {
        text: String,
    },
    Button {
        text: String,
        on_click: Option<Callback>,
    },
    /// A child component, rendered by the scheduler into its own instance.
    Component {
        name: &'static str,
        key: Option<String>,
        render: RenderFn,
    },
    /// A committed component boundary; only appears in the committed tree.
    Instance {
        name: &'static str,
        id: InstanceId,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Button { text, .. } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &"<callback>")
                .finish(),
            ViewKind::Component { name, key, .. } => f
                .debug_struct("Component")
                .field("name", name)
                .field("key", key)
                .finish(),
            ViewKind::Instance { name, id } => f
                .debug_struct("Instance")
                .field("name", name)
                .field("id", id)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub kind: ViewKind,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            children: vec![],
        }
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    /// Child components in document order. Component nodes are leaves.
    pub(crate) fn components(&self) -> Vec<(&'static str, Option<String>, RenderFn)> {
        let mut out = Vec::new();
        self.collect_components(&mut out);
        out
    }

    fn collect_components(&self, out: &mut Vec<(&'static str, Option<String>, RenderFn)>) {
        match &self.kind {
            ViewKind::Component { name, key, render } => {
                out.push((*name, key.clone(), render.clone()));
            }
            _ => {
                for child in &self.children {
                    child.collect_components(out);
                }
            }
        }
    }
}

/// What a frame shows.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneNode {
    Text { text: String },
    Button { text: String },
}

impl Scene {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn buttons(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Button { text } => Some(text.as_str()),
            _ => None,
        })
    }
}
