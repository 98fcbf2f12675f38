//! Raw FIF recordings.
//!
//! # Opening a file
//! 1. Load the tag directory (fast path: embedded dir tag; slow path: scan).
//! 2. Build the block tree from the directory.
//! 3. Read `MeasInfo` from `FIFFB_MEAS_INFO`.
//! 4. Find the `FIFFB_RAW_DATA` (or `FIFFB_CONTINUOUS_DATA`) node.
//! 5. Walk its tag entries to collect data-buffer records.
//!
//! Data stays on disk until [`Raw::preload`]; channel operations before that
//! only touch metadata, and the `picks` table keeps track of which stored
//! channel each current row refers to, so a later preload reads exactly the
//! surviving channels.
//!
//! # Calibration
//! ```text
//! calibrated_f64[ch, t] = raw_value[t, ch] × info.chs[ch].cal × info.chs[ch].range
//! ```
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use ndarray::{Array2, Axis};
use tracing::debug;

use super::constants::*;
use super::info::{read_meas_info, MeasInfo};
use super::tag::{read_i32, TagHeader};
use super::tree::{read_tree, scan_directory, try_load_directory};
use crate::channels::{check_projector, keep_indices, subset_projector, ChannelOps, ContainerKind};
use crate::error::{self, Error};
use crate::pick::pick_info;

// ── Buffer record ─────────────────────────────────────────────────────────

/// Metadata for one raw-data buffer block in the file.
#[derive(Debug, Clone)]
pub struct BufferRecord {
    /// Tag header for this buffer (use `.pos + 16` to seek to data).
    pub tag:        TagHeader,
    /// Absolute first sample index (in acquisition time; may include initial skip).
    pub first_samp: u64,
    /// Number of samples in this buffer.
    pub n_samp:     usize,
}

// ── Raw ──────────────────────────────────────────────────────────────────

/// A continuous recording, file-backed or in-memory.
#[derive(Debug, Clone)]
pub struct Raw {
    /// Measurement info (channels, sfreq, …).
    pub info:       MeasInfo,
    /// First sample index in acquisition time.
    pub first_samp: u64,
    /// Last sample index (inclusive) in acquisition time.
    pub last_samp:  u64,
    /// Stored-file row for each current channel; row `i` of the data comes
    /// from file channel `picks[i]`.
    picks:      Vec<usize>,
    /// Channel count of the on-disk buffer layout (fixed at open time).
    n_chan_file: usize,
    /// Backing file, if any (`None` for in-memory recordings).
    path:       Option<PathBuf>,
    /// Buffer table: one record per contiguous data block in the file.
    buffers:    Vec<BufferRecord>,
    /// Preloaded `[n_chan, n_times]` samples.
    data:       Option<Array2<f64>>,
    /// Signal-space projection matrix over channel pairs, `[n_chan, n_chan]`.
    projector:  Option<Array2<f64>>,
}

impl Raw {
    /// Build an in-memory recording from `[n_chan, n_times]` data.
    pub fn from_data(info: MeasInfo, data: Array2<f64>) -> error::Result<Self> {
        if data.nrows() != info.n_chan {
            return Err(Error::ShapeMismatch {
                got: data.nrows(),
                expected: info.n_chan,
                axis: 0,
            });
        }
        let n_chan = info.n_chan;
        let last_samp = (data.ncols() as u64).saturating_sub(1);
        Ok(Raw {
            info,
            first_samp: 0,
            last_samp,
            picks: (0..n_chan).collect(),
            n_chan_file: n_chan,
            path: None,
            buffers: Vec::new(),
            data: Some(data),
            projector: None,
        })
    }

    /// Total number of time points.
    #[inline]
    pub fn n_times(&self) -> usize {
        (self.last_samp - self.first_samp + 1) as usize
    }

    /// Total duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.n_times() as f64 / self.info.sfreq
    }

    /// Backing file, if this recording came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored-file channel positions of the current selection.
    pub fn picks(&self) -> &[usize] {
        &self.picks
    }

    /// Number of data buffers (including skip gaps).
    pub fn n_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Preloaded data, if [`Raw::preload`] has run (or the recording was
    /// built in memory).
    pub fn data(&self) -> Option<&Array2<f64>> {
        self.data.as_ref()
    }

    /// Current projection matrix, if one is set.
    pub fn projector(&self) -> Option<&Array2<f64>> {
        self.projector.as_ref()
    }

    /// Attach a `[n_chan, n_chan]` projection matrix.
    pub fn set_projector(&mut self, proj: Array2<f64>) -> error::Result<()> {
        check_projector(self.info.n_chan, &proj)?;
        self.projector = Some(proj);
        Ok(())
    }

    /// Read every data buffer into a `[n_chan, n_times]` f64 array with
    /// calibration, honoring the current channel selection.
    ///
    /// A no-op when the data is already in memory.
    pub fn preload(&mut self) -> Result<()> {
        if self.data.is_some() {
            return Ok(());
        }
        let path = match &self.path {
            Some(p) => p.clone(),
            None => bail!("recording has no backing file to load from"),
        };
        let n_t  = self.n_times();
        let cals = self.info.cals();
        let mut out = Array2::<f64>::zeros((self.picks.len(), n_t));

        let file = File::open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let mut t_offset: usize = 0;

        for buf in &self.buffers {
            let n_samp = buf.n_samp;
            let data = read_buffer_data(
                &mut reader, &buf.tag, n_samp, self.n_chan_file, &self.picks, &cals,
            )?;
            out.slice_mut(ndarray::s![.., t_offset..t_offset + n_samp])
               .assign(&data);
            t_offset += n_samp;
        }
        if t_offset != n_t {
            bail!("buffer totals ({t_offset}) don't match n_times ({n_t})");
        }
        self.data = Some(out);
        Ok(())
    }
}

impl ChannelOps for Raw {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Raw
    }

    fn info(&self) -> &MeasInfo {
        &self.info
    }

    fn drop_channels(&mut self, names: &[&str]) -> error::Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        let keep = keep_indices(&self.info, names)?;
        self.picks = keep.iter().map(|&i| self.picks[i]).collect();
        if let Some(proj) = &self.projector {
            self.projector = Some(subset_projector(proj, &keep));
        }
        if let Some(data) = &self.data {
            self.data = Some(data.select(Axis(self.kind().channel_axis()), &keep));
        }
        self.info = pick_info(&self.info, &keep)?;
        debug!("raw now has {} of {} stored channels", self.info.n_chan, self.n_chan_file);
        Ok(())
    }
}

// ── Reader entry point ────────────────────────────────────────────────────

/// Open a FIF file and return a `Raw` without preloading data.
pub fn open_raw<P: AsRef<Path>>(path: P) -> Result<Raw> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    // 1. Load tag directory ------------------------------------------------
    let directory = match try_load_directory(&mut reader)? {
        Some(d) => d,
        None    => scan_directory(&mut reader)?,
    };

    // 2. Build block tree --------------------------------------------------
    let tree = read_tree(&mut reader, &directory)?;

    // 3. Read measurement info --------------------------------------------
    let info = read_meas_info(&mut reader, &tree)?;

    // 4. Find raw data block -----------------------------------------------
    let meas_node = tree
        .find_block(FIFFB_MEAS)
        .ok_or_else(|| anyhow::anyhow!("FIFFB_MEAS not found"))?;

    let raw_node = meas_node
        .find_block(FIFFB_RAW_DATA)
        .or_else(|| meas_node.find_block(FIFFB_CONTINUOUS_DATA))
        .ok_or_else(|| anyhow::anyhow!("no raw-data block in FIF file"))?;

    // 5. Walk data directory -----------------------------------------------
    let nchan = info.n_chan;
    let mut first_samp: u64 = 0;
    let mut first_skip: usize = 0;
    let mut nskip: usize = 0;
    let mut buffers: Vec<BufferRecord> = Vec::new();
    let mut first = true;

    // Pre-scan for FIFF_FIRST_SAMPLE before any DATA_BUFFER.
    for ent in &raw_node.entries {
        if ent.kind == FIFF_FIRST_SAMPLE {
            first_samp = read_i32(&mut reader, ent)? as u64;
        }
    }

    for ent in &raw_node.entries {
        match ent.kind {
            FIFF_FIRST_SAMPLE => {} // already consumed above
            FIFF_DATA_SKIP if first => {
                first_skip = read_i32(&mut reader, ent)? as usize;
                first = false;
            }
            FIFF_DATA_BUFFER => {
                first = false;
                let bps = bytes_per_sample(ent.ftype)
                    .ok_or_else(|| anyhow::anyhow!("unknown buffer type {}", ent.ftype))?;
                let n_samp = ent.size as usize / (bps * nchan);

                // Apply first_skip (only once, before the first real buffer).
                if first_skip > 0 {
                    first_samp += (n_samp * first_skip) as u64;
                    first_skip = 0;
                }

                // Pending inter-buffer skip → emit a null gap.
                if nskip > 0 {
                    let gap_samp = n_samp * nskip;
                    // We represent gaps by a tag with kind=-1 (no real data).
                    let gap_tag = TagHeader { kind: -1, ftype: 0, size: 0, next: -1, pos: 0 };
                    buffers.push(BufferRecord {
                        tag: gap_tag,
                        first_samp,
                        n_samp: gap_samp,
                    });
                    first_samp += gap_samp as u64;
                    nskip = 0;
                }

                buffers.push(BufferRecord { tag: *ent, first_samp, n_samp });
                first_samp += n_samp as u64;
            }
            FIFF_DATA_SKIP => {
                nskip += read_i32(&mut reader, ent)? as usize;
            }
            _ => {}
        }
    }

    if buffers.is_empty() {
        bail!("no FIFF_DATA_BUFFER tags found in raw-data block");
    }

    let last_samp = first_samp - 1;
    // Recompute first_samp from buffers (it was mutated above).
    let actual_first = buffers[0].first_samp;

    Ok(Raw {
        first_samp: actual_first,
        last_samp,
        picks: (0..nchan).collect(),
        n_chan_file: nchan,
        path: Some(path.to_path_buf()),
        buffers,
        data: None,
        projector: None,
        info,
    })
}

// ── Buffer data reader ───────────────────────────────────────────────────

/// Read one data buffer and return `[picks.len(), n_samp]` f64 with calibration.
///
/// The on-disk layout is `[n_samp, n_chan_file]` (row-major, big-endian) —
/// i.e. interleaved channels.  `cals` is indexed by output row, `picks` maps
/// output rows to stored columns.
fn read_buffer_data<R: Read + Seek>(
    reader:      &mut R,
    tag:         &TagHeader,
    n_samp:      usize,
    n_chan_file: usize,
    picks:       &[usize],
    cals:        &[f64],
) -> Result<Array2<f64>> {
    // Gap buffers (kind == -1) → return zeros.
    if tag.kind < 0 {
        return Ok(Array2::<f64>::zeros((picks.len(), n_samp)));
    }
    reader
        .seek(std::io::SeekFrom::Start(tag.data_pos()))
        .with_context(|| format!("seek to buffer data @ {:#x}", tag.data_pos()))?;

    let mut out = Array2::<f64>::zeros((picks.len(), n_samp));
    let mut frame = vec![0f64; n_chan_file];
    for t in 0..n_samp {
        read_frame(reader, tag.ftype, &mut frame)?;
        for (row, &src) in picks.iter().enumerate() {
            out[[row, t]] = frame[src] * cals[row];
        }
    }
    Ok(out)
}

/// Read one interleaved sample frame (all stored channels at one instant).
fn read_frame<R: Read>(reader: &mut R, ftype: u32, frame: &mut [f64]) -> Result<()> {
    match ftype {
        FIFFT_FLOAT => {
            let mut buf = [0u8; 4];
            for v in frame.iter_mut() {
                reader.read_exact(&mut buf)?;
                *v = f32::from_be_bytes(buf) as f64;
            }
        }
        FIFFT_DOUBLE => {
            let mut buf = [0u8; 8];
            for v in frame.iter_mut() {
                reader.read_exact(&mut buf)?;
                *v = f64::from_be_bytes(buf);
            }
        }
        FIFFT_INT => {
            let mut buf = [0u8; 4];
            for v in frame.iter_mut() {
                reader.read_exact(&mut buf)?;
                *v = i32::from_be_bytes(buf) as f64;
            }
        }
        FIFFT_SHORT | FIFFT_DAU_PACK16 => {
            let mut buf = [0u8; 2];
            for v in frame.iter_mut() {
                reader.read_exact(&mut buf)?;
                *v = i16::from_be_bytes(buf) as f64;
            }
        }
        other => bail!("unsupported buffer type {other}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiff::info::create_info;
    use crate::pick::ChannelType;
    use ndarray::array;

    fn four_channel_raw() -> Raw {
        let info = create_info(
            &[
                ("EEG 001", ChannelType::Eeg),
                ("EEG 002", ChannelType::Eeg),
                ("EOG 061", ChannelType::Eog),
                ("STI 014", ChannelType::Stim),
            ],
            250.0,
        )
        .unwrap();
        let data = array![
            [0.0, 1.0, 2.0],
            [10.0, 11.0, 12.0],
            [20.0, 21.0, 22.0],
            [30.0, 31.0, 32.0],
        ];
        Raw::from_data(info, data).unwrap()
    }

    #[test]
    fn from_data_rejects_wrong_row_count() {
        let info = create_info(&[("EEG 001", ChannelType::Eeg)], 100.0).unwrap();
        let err = Raw::from_data(info, Array2::zeros((2, 5))).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { got: 2, expected: 1, axis: 0 }));
    }

    #[test]
    fn from_data_sets_sample_range() {
        let raw = four_channel_raw();
        assert_eq!(raw.first_samp, 0);
        assert_eq!(raw.last_samp, 2);
        assert_eq!(raw.n_times(), 3);
        assert_eq!(raw.picks(), &[0, 1, 2, 3]);
        assert!(raw.path().is_none());
    }

    #[test]
    fn drop_remaps_picks_and_rows() {
        let mut raw = four_channel_raw();
        raw.drop_channels(&["EEG 002", "STI 014"]).unwrap();

        assert_eq!(raw.info.n_chan, 2);
        assert_eq!(raw.info.ch_names(), vec!["EEG 001", "EOG 061"]);
        assert_eq!(raw.picks(), &[0, 2]);
        let data = raw.data().unwrap();
        assert_eq!(data.nrows(), 2);
        assert_eq!(data[[0, 1]], 1.0);
        assert_eq!(data[[1, 1]], 21.0);
    }

    #[test]
    fn drop_unknown_name_is_an_error_and_leaves_state() {
        let mut raw = four_channel_raw();
        let err = raw.drop_channels(&["EEG 001", "MEG 0113"]).unwrap_err();
        assert!(matches!(err, Error::UnknownChannel(name) if name == "MEG 0113"));
        assert_eq!(raw.info.n_chan, 4);
        assert_eq!(raw.picks(), &[0, 1, 2, 3]);
    }

    #[test]
    fn empty_drop_is_a_no_op() {
        let mut raw = four_channel_raw();
        raw.drop_channels(&[]).unwrap();
        assert_eq!(raw.info.n_chan, 4);
    }

    #[test]
    fn projector_follows_drop() {
        let mut raw = four_channel_raw();
        let proj = Array2::from_shape_fn((4, 4), |(i, j)| (i * 10 + j) as f64);
        raw.set_projector(proj).unwrap();
        raw.drop_channels(&["EEG 002"]).unwrap();

        let proj = raw.projector().unwrap();
        assert_eq!(proj.shape(), &[3, 3]);
        // Rows/cols 0, 2, 3 of the original survive.
        assert_eq!(proj[[0, 0]], 0.0);
        assert_eq!(proj[[1, 1]], 22.0);
        assert_eq!(proj[[2, 1]], 32.0);
    }

    #[test]
    fn set_projector_rejects_wrong_shape() {
        let mut raw = four_channel_raw();
        assert!(raw.set_projector(Array2::zeros((3, 4))).is_err());
        assert!(raw.set_projector(Array2::zeros((4, 3))).is_err());
        assert!(raw.set_projector(Array2::zeros((4, 4))).is_ok());
    }

    #[test]
    fn preload_on_in_memory_raw_is_a_no_op() {
        let mut raw = four_channel_raw();
        raw.preload().unwrap();
        assert_eq!(raw.data().unwrap().shape(), &[4, 3]);
    }
}
