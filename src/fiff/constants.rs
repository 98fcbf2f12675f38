//! FIFF format constants.
//!
//! Names follow the standard FIFF nomenclature (`FIFFB_*` block kinds,
//! `FIFF_*` tag kinds, `FIFFT_*` payload types, `FIFFV_*` enum values) so
//! they can be cross-checked against the published format documentation.
//!
//! The FIFF format is a self-describing binary file format used by Elekta /
//! Neuromag MEG and EEG systems and adopted by MNE as its primary I/O
//! format.  Every piece of data in a FIF file is wrapped in a **tag** — a
//! 16-byte header (`kind`, `type`, `size`, `next`) followed by a payload.
//! Tags are grouped into **blocks** by `FIFF_BLOCK_START` / `FIFF_BLOCK_END`
//! sentinel tags, forming a tree.

#![allow(dead_code)]

// ── Block kinds ───────────────────────────────────────────────────────────
//
// A block is opened by a FIFF_BLOCK_START tag whose i32 payload is the block
// kind, and closed by a matching FIFF_BLOCK_END tag.

/// Root / top-level block (rarely used explicitly).
pub const FIFFB_ROOT:           i32 = 999;
/// Measurement block — top-level container for one recording.
pub const FIFFB_MEAS:           i32 = 100;
/// Measurement-info block — channel metadata, sfreq, bad channels, etc.
pub const FIFFB_MEAS_INFO:      i32 = 101;
/// Raw (continuous) data block.
pub const FIFFB_RAW_DATA:       i32 = 102;
/// Processed data block.
pub const FIFFB_PROCESSED_DATA: i32 = 103;
/// Evoked / averaged data block.
pub const FIFFB_EVOKED:         i32 = 104;
/// Continuous data block (alias used by some acquisition systems).
pub const FIFFB_CONTINUOUS_DATA: i32 = 112;
/// MNE-specific extension block.
pub const FIFFB_MNE:            i32 = 350;
/// MNE bad-channel list block (holds one `FIFF_MNE_CH_NAME_LIST` tag).
pub const FIFFB_MNE_BAD_CHANNELS: i32 = 359;
/// MNE epochs block.
pub const FIFFB_MNE_EPOCHS:     i32 = 373;

// ── Tag kinds — structural ─────────────────────────────────────────────────

/// Unique file identifier (first tag in every FIF file).
pub const FIFF_FILE_ID:         i32 = 100;
/// Pointer to the embedded tag directory (second tag, payload = byte offset).
pub const FIFF_DIR_POINTER:     i32 = 101;
/// Opens a new block; payload = block kind (i32).
pub const FIFF_BLOCK_START:     i32 = 104;
/// Closes the most recently opened block.
pub const FIFF_BLOCK_END:       i32 = 105;

// ── Tag kinds — measurement info ──────────────────────────────────────────

/// Number of channels (i32).
pub const FIFF_NCHAN:           i32 = 200;
/// Sampling frequency in Hz (f32).
pub const FIFF_SFREQ:           i32 = 201;
/// Channel info struct (one per channel; see [`super::info::ChannelInfo`]).
pub const FIFF_CH_INFO:         i32 = 203;
/// Free-text comment / description (string).
pub const FIFF_COMMENT:         i32 = 206;
/// Index of the first sample in acquisition time (i32).
pub const FIFF_FIRST_SAMPLE:    i32 = 208;
/// Index of the last sample in acquisition time (i32).
pub const FIFF_LAST_SAMPLE:     i32 = 209;
/// Online lowpass cutoff in Hz (f32); may be NaN if not set.
pub const FIFF_LOWPASS:         i32 = 219;
/// Colon-separated list of bad channel names (string, legacy location).
pub const FIFF_BAD_CHS:         i32 = 220;
/// Online highpass cutoff in Hz (f32); may be NaN if not set.
pub const FIFF_HIGHPASS:        i32 = 223;
/// Power-line frequency in Hz (f32).
pub const FIFF_LINE_FREQ:       i32 = 235;
/// Recording description — alias for `FIFF_COMMENT`.
pub const FIFF_DESCRIPTION:     i32 = FIFF_COMMENT;
/// Colon-separated channel name list (string, used inside MNE blocks).
pub const FIFF_MNE_CH_NAME_LIST: i32 = 3507;

// ── Tag kinds — data buffers ───────────────────────────────────────────────

/// One buffer of raw signal samples (interleaved `[n_samp, n_chan]`,
/// big-endian, type = `FIFFT_FLOAT` or `FIFFT_DOUBLE` or `FIFFT_SHORT`).
pub const FIFF_DATA_BUFFER:     i32 = 300;
/// Skip `n` complete buffers (inter-buffer gap; payload = n as i32).
pub const FIFF_DATA_SKIP:       i32 = 301;

// ── Tag payload types (the `type` field of a tag header) ──────────────────

/// Big-endian signed 16-bit integer.
pub const FIFFT_SHORT:             u32 = 2;
/// Big-endian signed 32-bit integer.
pub const FIFFT_INT:               u32 = 3;
/// Big-endian IEEE 754 single-precision float (4 bytes).
pub const FIFFT_FLOAT:             u32 = 4;
/// Big-endian IEEE 754 double-precision float (8 bytes).
pub const FIFFT_DOUBLE:            u32 = 5;
/// Latin-1 (ISO 8859-1) string, **not** NUL-terminated.
pub const FIFFT_STRING:            u32 = 10;
/// 16-bit DAU packed sample (same wire width as `FIFFT_SHORT`).
pub const FIFFT_DAU_PACK16:        u32 = 16;
/// 96-byte channel info struct (see [`super::info::ChannelInfo`]).
pub const FIFFT_CH_INFO_STRUCT:    u32 = 30;
/// File-ID struct.
pub const FIFFT_ID_STRUCT:         u32 = 31;
/// Tag-directory entry struct (16 bytes per entry).
pub const FIFFT_DIR_ENTRY_STRUCT:  u32 = 32;

// ── `next` field sentinels in a tag header ────────────────────────────────

/// The next tag follows immediately: `next_pos = pos + 16 + size`.
pub const FIFFV_NEXT_SEQ:  i32 = 0;
/// There is no next tag (end of sequence / block).
pub const FIFFV_NEXT_NONE: i32 = -1;

// ── Channel kind codes (`ChannelInfo::kind`) ──────────────────────────────

/// MEG magnetometer or gradiometer channel.
pub const FIFFV_MEG_CH:     i32 = 1;
/// EEG scalp-potential channel.
pub const FIFFV_EEG_CH:     i32 = 2;
/// Stimulus / trigger channel.
pub const FIFFV_STIM_CH:    i32 = 3;
/// Electro-oculogram channel.
pub const FIFFV_EOG_CH:     i32 = 202;
/// MEG reference (compensation) channel.
pub const FIFFV_REF_MEG_CH: i32 = 301;
/// Electromyogram channel.
pub const FIFFV_EMG_CH:     i32 = 302;
/// Electrocardiogram channel.
pub const FIFFV_ECG_CH:     i32 = 402;
/// Miscellaneous auxiliary channel.
pub const FIFFV_MISC_CH:    i32 = 502;
/// Respiration monitor channel.
pub const FIFFV_RESP_CH:    i32 = 602;
/// Stereo-EEG depth electrode channel (no dedicated type label here).
pub const FIFFV_SEEG_CH:    i32 = 802;
/// System status channel.
pub const FIFFV_SYST_CH:    i32 = 900;
/// Electrocorticography channel (no dedicated type label here).
pub const FIFFV_ECOG_CH:    i32 = 902;
/// Internal active shielding channel.
pub const FIFFV_IAS_CH:     i32 = 910;
/// Flux excitation channel.
pub const FIFFV_EXCI_CH:    i32 = 920;

// ── Channel units (`ChannelInfo::unit`) ───────────────────────────────────

/// Volts.
pub const FIFF_UNIT_V:   i32 = 107;
/// Tesla (magnetometers).
pub const FIFF_UNIT_T:   i32 = 112;
/// Tesla / metre (gradiometers).
pub const FIFF_UNIT_T_M: i32 = 201;

// ── Coil type codes (`ChannelInfo::coil_type`, low 16 bits significant) ───

/// No coil / not applicable.
pub const FIFFV_COIL_NONE:               i32 = 0;
/// Plain EEG electrode.
pub const FIFFV_COIL_EEG:                i32 = 1;
/// Neuromag-122 planar gradiometer.
pub const FIFFV_COIL_NM_122:             i32 = 2;
/// Ideal point magnetometer.
pub const FIFFV_COIL_POINT_MAGNETOMETER: i32 = 2000;
/// Generic axial gradiometer, 5 cm baseline.
pub const FIFFV_COIL_AXIAL_GRAD_5CM:     i32 = 2001;
/// Vectorview planar gradiometer, wound coil.
pub const FIFFV_COIL_VV_PLANAR_W:        i32 = 3011;
/// Vectorview planar gradiometer, type T1.
pub const FIFFV_COIL_VV_PLANAR_T1:       i32 = 3012;
/// Vectorview planar gradiometer, type T2.
pub const FIFFV_COIL_VV_PLANAR_T2:       i32 = 3013;
/// Vectorview planar gradiometer, type T3.
pub const FIFFV_COIL_VV_PLANAR_T3:       i32 = 3014;
/// Vectorview magnetometer, wound coil.
pub const FIFFV_COIL_VV_MAG_W:           i32 = 3021;
/// Vectorview magnetometer, type T1.
pub const FIFFV_COIL_VV_MAG_T1:          i32 = 3022;
/// Vectorview magnetometer, type T2.
pub const FIFFV_COIL_VV_MAG_T2:          i32 = 3023;
/// Vectorview magnetometer, type T3.
pub const FIFFV_COIL_VV_MAG_T3:          i32 = 3024;
/// 4D/BTi Magnes magnetometer.
pub const FIFFV_COIL_MAGNES_MAG:         i32 = 4001;
/// 4D/BTi Magnes axial gradiometer.
pub const FIFFV_COIL_MAGNES_GRAD:        i32 = 4002;
/// CTF axial gradiometer.
pub const FIFFV_COIL_CTF_GRAD:           i32 = 5001;
/// KIT/Yokogawa axial gradiometer.
pub const FIFFV_COIL_KIT_GRAD:           i32 = 6001;
/// BabySQUID magnetometer.
pub const FIFFV_COIL_BABY_MAG:           i32 = 7001;
/// BabySQUID axial gradiometer.
pub const FIFFV_COIL_BABY_GRAD:          i32 = 7002;

// ── Helpers ───────────────────────────────────────────────────────────────

/// Return the number of bytes occupied by one sample of the given tag type.
///
/// Returns `None` for types that do not represent scalar numeric samples
/// (e.g. strings, structs).
///
/// # Examples
///
/// ```
/// use chankit::fiff::constants::{bytes_per_sample, FIFFT_FLOAT, FIFFT_DOUBLE, FIFFT_SHORT};
/// assert_eq!(bytes_per_sample(FIFFT_FLOAT),  Some(4));
/// assert_eq!(bytes_per_sample(FIFFT_DOUBLE), Some(8));
/// assert_eq!(bytes_per_sample(FIFFT_SHORT),  Some(2));
/// assert_eq!(bytes_per_sample(99),            None);
/// ```
pub fn bytes_per_sample(tag_type: u32) -> Option<usize> {
    match tag_type {
        FIFFT_DAU_PACK16 | FIFFT_SHORT  => Some(2),
        FIFFT_FLOAT | FIFFT_INT         => Some(4),
        FIFFT_DOUBLE                    => Some(8),
        _                               => None,
    }
}
