//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`StageError`] covers every reported condition:
//! - Invalid input to the clip registry (empty clip sets, unknown models or clips)
//! - Invalid choreography requests (empty waypoint lists, bad durations)
//! - Dead scene node handles
//! - Configuration loading and validation failures
//!
//! None of these are fatal to the frame loop. Operations that fail leave
//! all state untouched, log a diagnostic and return the error so callers
//! can tell "handled no-op" apart from success.
//!
//! ```rust,ignore
//! use stagehand::errors::{StageError, Result};
//!
//! fn start(stage: &mut Stage, model: NodeHandle) -> Result<()> {
//!     stage.play_animation(model, "run")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeHandle;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum StageError {
    // ========================================================================
    // Clip Registry Errors
    // ========================================================================
    /// A model was registered with no animation clips.
    #[error("Cannot register animations for {model:?}: clip set is empty")]
    EmptyClipSet {
        /// The model root that was being registered
        model: NodeHandle,
    },

    /// No playback controller exists for the model.
    #[error("No animation mixer registered for model {0:?}")]
    ModelNotRegistered(NodeHandle),

    /// The model has a mixer but no clip with that name.
    #[error("Animation clip '{clip}' not found on model {model:?}")]
    ClipNotFound {
        /// The model root
        model: NodeHandle,
        /// The requested clip name
        clip: String,
    },

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// The node handle does not refer to a live node.
    #[error("Scene node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    // ========================================================================
    // Choreography Errors
    // ========================================================================
    /// A camera path was requested with no waypoints.
    #[error("Camera path has no waypoints")]
    EmptyPath,

    /// A curve needs at least two control points.
    #[error("Curve needs at least 2 points, got {0}")]
    DegenerateCurve(usize),

    /// A duration was zero, negative or not finite.
    #[error("Invalid duration: {0}")]
    InvalidDuration(f32),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Config values out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, StageError>`.
pub type Result<T> = std::result::Result<T, StageError>;
