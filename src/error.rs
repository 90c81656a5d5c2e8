//! Error types for raster processing.
//!
//! Every precondition of the separation, dither and packing stages is checked
//! at the API boundary and reported through [`Error`]. Once a page has been
//! initialized the per-row transforms only fail on row-shape mismatches.

use thiserror::Error;

/// Main error type for raster operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A logical channel index past the end of the registered channels.
    #[error("Channel index {0} out of range")]
    ChannelOutOfRange(usize),

    /// A subchannel index past the end of a logical channel.
    #[error("Subchannel index {subchannel} out of range for channel {channel}")]
    SubchannelOutOfRange { channel: usize, subchannel: usize },

    /// A numeric parameter outside its accepted range.
    ///
    /// Strengths must lie in (0, 1], densities in [0, 1], cutoffs and ink
    /// limits must be non-negative, hue angles in [0, 6).
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },

    /// Subchannels of a logical channel were registered out of strength order.
    #[error("Subchannel strengths of channel {0} must not decrease")]
    UnorderedSubchannels(usize),

    /// A logical channel has no subchannel at page start.
    #[error("Channel {0} has no subchannels")]
    EmptyChannel(usize),

    #[error("Channels {first} and {second} share hue angle {angle}")]
    DuplicateHueAngle {
        first: usize,
        second: usize,
        angle: f64,
    },

    #[error("Hue angle is only valid on extra channels, not on channel {0}")]
    HueAngleOnProcessChannel(usize),

    /// Hue redistribution needs the cyan, magenta and yellow channels.
    #[error("Hue angles require cyan, magenta and yellow channels")]
    MissingProcessChannels,

    #[error("Too many physical channels: {0} (maximum is 64)")]
    TooManyChannels(usize),

    #[error("Channel group has not been initialized for a page")]
    NotInitialized,

    /// A row handed to a per-scanline transform has the wrong length.
    #[error("Row length mismatch: expected {expected}, found {actual}")]
    RowLength { expected: usize, actual: usize },

    /// A caller-supplied output buffer cannot hold the worst-case result.
    #[error("Buffer too small for worst-case expansion: need {needed} bytes, have {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("Unsupported layout: {n} planes at {bits} bits per pixel")]
    UnsupportedShape { n: usize, bits: usize },

    #[error("Invalid dither levels: {0}")]
    InvalidLevels(String),

    #[error("Invalid dither matrix: {0}")]
    InvalidMatrix(String),

    /// Invalid configuration parameter.
    ///
    /// Raised when a named setting cannot be parsed or when the pipeline
    /// stages disagree about their shape.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),

    #[error("Malformed PackBits data at offset {0}")]
    MalformedPackBits(usize),

    /// The job was cancelled between two scanlines.
    #[error("Job cancelled")]
    Cancelled,
}
