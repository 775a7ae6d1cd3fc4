pub use crate::console::{Console, Marker};
pub use crate::effects::{Dispose, EffectClass, on_unmount};
pub use crate::error::{Result, RuntimeError};
pub use crate::render_api::{Frame, FrameRecorder, HitRegion, RenderBackend};
pub use crate::runtime::{Cx, InstanceId, Lifecycle};
pub use crate::scheduler::{Metrics, RuntimeConfig, Scheduler};
pub use crate::state::State;
pub use crate::view::{Callback, RenderFn, Scene, SceneNode, View, ViewKind};
