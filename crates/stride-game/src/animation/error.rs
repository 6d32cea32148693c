use super::Track;

/// Errors raised when configuring or driving the animation blender
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    #[error("no clip named '{clip}' for track {track}")]
    MissingClip { track: Track, clip: String },

    #[error("track {track} has time scale {scale}, it must be positive and finite")]
    InvalidTimeScale { track: Track, scale: f32 },

    #[error("track {0} is not registered")]
    UnknownTrack(Track),

    #[error("cannot play an empty one-shot chain")]
    EmptyChain,

    #[error("track {0} repeats and cannot be part of a one-shot chain")]
    RepeatingInChain(Track),
}
