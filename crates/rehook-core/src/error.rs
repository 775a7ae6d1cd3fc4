use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// State kept changing for more render passes than allowed in one flush,
    /// usually an effect that sets state unconditionally.
    #[error(
        "maximum update depth exceeded: more than {limit} render passes in one flush; \
         an effect keeps updating state it depends on"
    )]
    UpdateDepthExceeded { limit: usize },

    #[error("no button labelled '{0}' in the last painted frame")]
    NoSuchButton(String),

    #[error("nothing is mounted")]
    NotMounted,
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
