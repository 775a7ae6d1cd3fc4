#![allow(non_snake_case)]
//! Widgets and child components.

use std::rc::Rc;

use rehook_core::*;

pub fn Column(children: Vec<View>) -> View {
    View::new(ViewKind::Column).with_children(children)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: Some(Rc::new(on_click)),
    })
}

/// Child component. Matched against the previous render by name and position.
pub fn Component(name: &'static str, render: impl Fn(&mut Cx<'_>) -> View + 'static) -> View {
    View::new(ViewKind::Component {
        name,
        key: None,
        render: Rc::new(render),
    })
}

/// Child component matched by name and `key`, so it keeps its state when
/// siblings are reordered.
pub fn Keyed(
    key: impl Into<String>,
    name: &'static str,
    render: impl Fn(&mut Cx<'_>) -> View + 'static,
) -> View {
    View::new(ViewKind::Component {
        name,
        key: Some(key.into()),
        render: Rc::new(render),
    })
}

/// Renders `child` only when `cond` holds, leaving an empty slot otherwise.
pub fn Show(cond: bool, child: impl FnOnce() -> View) -> Option<View> {
    cond.then(child)
}

pub trait ViewExt: Sized {
    fn child(self, child: impl Into<Option<View>>) -> Self;
}

impl ViewExt for View {
    fn child(mut self, child: impl Into<Option<View>>) -> Self {
        if let Some(child) = child.into() {
            self.children.push(child);
        }
        self
    }
}
