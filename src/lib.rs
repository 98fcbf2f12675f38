//! # chankit — EEG/MEG channel management in pure Rust
//!
//! `chankit` keeps the channel dimension of electrophysiology recordings
//! consistent while you classify, equalize, drop and rename channels.  The
//! semantics follow [MNE](https://mne.tools): a recording is a measurement
//! container (continuous [`Raw`], segmented [`Epochs`], averaged [`Evoked`])
//! carrying a [`MeasInfo`] with per-channel FIFF metadata, and every channel
//! operation keeps names, bads, data rows and the projection matrix aligned.
//!
//! ## What lives where
//!
//! ```text
//! fiff::       native FIF reader (tags → tree → MeasInfo → Raw)
//! pick::       effective channel types, info subsetting
//! coils::      coil classes, MEG hardware-family inference
//! channels::   ChannelOps trait, equalize / drop / rename
//! epochs::     trials container  [E, C, T]
//! evoked::     averaged container [C, T]
//! ```
//!
//! ## Quick start
//!
//! ```
//! use chankit::{create_info, equalize_channels, rename_channels};
//! use chankit::{Alias, ChannelOps, ChannelType, Raw};
//! use ndarray::Array2;
//!
//! // Two recordings that only partially share electrodes.
//! let info_a = create_info(
//!     &[("Fz", ChannelType::Eeg), ("Cz", ChannelType::Eeg), ("Pz", ChannelType::Eeg)],
//!     250.0,
//! )?;
//! let info_b = create_info(&[("Fz", ChannelType::Eeg), ("Cz", ChannelType::Eeg)], 250.0)?;
//! let mut a = Raw::from_data(info_a, Array2::zeros((3, 100)))?;
//! let mut b = Raw::from_data(info_b, Array2::zeros((2, 100)))?;
//!
//! // Reduce both to the channels they share.
//! let dropped = equalize_channels(&mut [&mut a, &mut b])?;
//! assert!(dropped.contains("Pz"));
//! assert_eq!(a.ch_names(), b.ch_names());
//! assert!(a.contains("eeg")?);
//!
//! // Rename in place; positions and bad-channel entries follow.
//! rename_channels(&mut a.info, &[("Cz".to_string(), Alias::name("Cz-ref"))])?;
//! assert_eq!(a.ch_names(), ["Fz", "Cz-ref"]);
//! # Ok::<(), chankit::Error>(())
//! ```
//!
//! ## Reading FIF files
//!
//! ```no_run
//! use chankit::{infer_meg_system, open_raw, ChannelOps};
//!
//! let mut raw = open_raw("data/sample_raw.fif")?;
//! println!(
//!     "{} channels @ {} Hz on a {} system",
//!     raw.info.n_chan,
//!     raw.info.sfreq,
//!     infer_meg_system(&raw.info),
//! );
//!
//! // Drop the channels the file marks bad, then load only the survivors.
//! let bads = raw.info.bads.clone();
//! let bad_refs: Vec<&str> = bads.iter().map(String::as_str).collect();
//! raw.drop_channels(&bad_refs)?;
//! raw.preload()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod channels;
pub mod coils;
pub mod epochs;
pub mod error;
pub mod evoked;
pub mod fiff;
pub mod pick;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `chankit::Foo` without having to know the internal module layout.

// channels — the trait and the cross-container operations
pub use channels::{
    contains_ch_type, equalize_channels, rename_channels, Alias, ChannelOps, ContainerKind,
};

// coils — coil classes and hardware inference
pub use coils::{coil_class, infer_meg_system, CoilClass, MegSystem};

// containers
pub use epochs::Epochs;
pub use evoked::Evoked;
pub use fiff::{open_raw, Raw};

// error taxonomy
pub use error::{Error, Result};

// fiff — measurement info and reader entry points
pub use fiff::{create_info, read_meas_info, ChannelInfo, MeasInfo};

// pick — type resolution and info subsetting
pub use pick::{channel_type, pick_info, ChannelType};
