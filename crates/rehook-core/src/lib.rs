//! # Components, State, and Effects
//!
//! Rehook runs function components through an explicit scheduler so the
//! order of every phase is observable. The pieces:
//!
//! - `Cx`: composition context handed to a component while it renders.
//! - `State<T>`: a slot-based state cell; writes schedule a re-render.
//! - effect hooks: `layout_effect` (before paint) and `disposable_effect` /
//!   `side_effect` (after paint), each with a cleanup.
//! - `Scheduler`: owns the instance tree and runs
//!   render → commit → layout effects → paint → passive effects.
//!
//! ## A component
//!
//! ```rust
//! use rehook_core::*;
//!
//! fn Clicker(cx: &mut Cx) -> View {
//!     let clicks = cx.remember_state(|| 0u32);
//!     let n = clicks.get();
//!
//!     cx.disposable_effect(n, move || {
//!         log::info!("clicks: {n}");
//!         on_unmount(move || log::info!("leaving {n}"))
//!     });
//!
//!     View::new(ViewKind::Button {
//!         text: format!("Clicked {n}"),
//!         on_click: Some(std::rc::Rc::new(move || clicks.update(|c| *c += 1))),
//!     })
//! }
//!
//! let mut sched = Scheduler::headless();
//! sched.mount("Clicker", Clicker).unwrap();
//! sched.click("Clicked 0").unwrap();
//! assert_eq!(sched.backend().frames().len(), 2);
//! ```
//!
//! ## Effect timing
//!
//! - Keyed effects run when the key differs (`PartialEq`) from the previous
//!   render; a `()` key runs once, at mount. `side_effect` runs every time.
//! - Before a body runs again, the cleanup of its previous run executes.
//! - On unmount every installed cleanup runs once, layout cleanups during the
//!   commit and passive cleanups after paint.
//! - A state write inside a layout effect re-renders before the frame is
//!   painted, so intermediate values never reach the screen. The same write
//!   in a passive effect lands one frame later.

#![allow(non_snake_case)]

pub mod console;
pub mod effects;
pub mod error;
pub mod prelude;
pub mod render_api;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod view;

pub use console::*;
pub use effects::{Dispose, EffectClass, on_unmount};
pub use error::*;
pub use render_api::*;
pub use runtime::{Cx, InstanceId, Lifecycle};
pub use scheduler::*;
pub use state::State;
pub use view::*;
