//! FIFF file format reader.
//!
//! Implements reading of `.fif` EEG/MEG recordings compatible with
//! [MNE](https://mne.tools).
//!
//! # Quick start
//! ```no_run
//! use chankit::fiff::raw::open_raw;
//!
//! let mut raw = open_raw("data/sample_raw.fif").unwrap();
//! println!("{} channels @ {} Hz", raw.info.n_chan, raw.info.sfreq);
//! raw.preload().unwrap();
//! let data = raw.data().unwrap();  // [n_chan, n_times] f64
//! ```
pub mod constants;
pub mod info;
pub mod raw;
pub mod tag;
pub mod tree;

// Re-export the most commonly used items.
pub use info::{create_info, read_bad_channels, read_meas_info, ChannelInfo, MeasInfo};
pub use raw::{open_raw, BufferRecord, Raw};
pub use tag::{
    read_directory, read_f32, read_i32, read_raw_bytes, read_string, read_tag_header, TagHeader,
};
pub use tree::{read_tree, scan_directory, try_load_directory, Node};
