//! Error types for channel operations.
//!
//! Everything that queries or mutates channel metadata reports through this
//! taxonomy so callers can match on the failure. The FIF file-reading path
//! keeps `anyhow` (see [`crate::fiff`]); the two meet in binaries and tests
//! where `?` converts freely.

use thiserror::Error;

use crate::pick::TYPE_LABELS;

/// Result type alias for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Channel-operation failures.
#[derive(Error, Debug)]
pub enum Error {
    /// A channel-type label outside the valid set was passed.
    #[error("invalid channel type '{given}'; must be one of {TYPE_LABELS}")]
    InvalidType {
        /// The label as received.
        given: String,
    },

    /// A referenced channel name does not exist in the measurement info.
    #[error("channel '{0}' does not exist in the measurement info")]
    UnknownChannel(String),

    /// A rename batch would leave two channels with the same name.
    #[error("rename would create duplicate channel name '{0}'")]
    DuplicateName(String),

    /// A typed rename asked for a forbidden sensor-type change.
    #[error("unsupported conversion for channel '{channel}': {reason}")]
    UnsupportedConversion {
        /// Channel the rename targeted.
        channel: String,
        /// Which rule rejected the change.
        reason: String,
    },

    /// A channel's kind/coil combination maps to no known sensor category.
    #[error("channel '{name}' has unrecognized kind {kind} (coil type {coil_type})")]
    Unclassifiable {
        /// Channel name.
        name: String,
        /// FIFF kind code.
        kind: i32,
        /// FIFF coil-type code.
        coil_type: i32,
    },

    /// A channel position outside the record was selected.
    #[error("channel index {index} out of range for {n_chan} channels")]
    IndexOutOfRange {
        /// The offending position.
        index: usize,
        /// Number of channels in the record.
        n_chan: usize,
    },

    /// An operation needed sample data the container does not hold.
    #[error("no data available: {0}")]
    NoData(&'static str),

    /// A data array does not match the channel count the info describes.
    #[error("data has {got} entries along channel axis {axis} but info describes {expected} channels")]
    ShapeMismatch {
        /// Length of the channel axis as given.
        got: usize,
        /// Channel count in the measurement info.
        expected: usize,
        /// Which axis carries channels for this container variant.
        axis: usize,
    },
}
