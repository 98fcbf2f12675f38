//! Measurement info read from a FIF file.
//!
//! We read only the fields needed for channel management; acquisition
//! details (HPI coils, coordinate transforms, CTF compensations, …) are
//! intentionally omitted.
use std::io::{Read, Seek};
use anyhow::{bail, Result};
use tracing::warn;

use super::constants::*;
use super::tag::*;
use super::tree::Node;
use crate::error::{self, Error};
use crate::pick::ChannelType;

// ── Channel info ─────────────────────────────────────────────────────────

/// Channel info, parsed from a `FIFFT_CH_INFO_STRUCT` (30) tag.
///
/// On-disk layout (big-endian, 96 bytes total):
/// ```text
///  4  scanno       i32
///  4  logno        i32
///  4  kind         i32
///  4  range        f32
///  4  cal          f32
///  4  coil_type    i32
/// 48  loc          12 × f32
///  4  unit         i32
///  4  unit_mul     i32
/// 16  ch_name      16 × u8 (null-padded Latin-1)
/// ─────────────────
/// 96 bytes
/// ```
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub scan_no:   i32,
    pub log_no:    i32,
    /// FIFF kind code (`FIFFV_MEG_CH`, `FIFFV_EEG_CH`, …).
    pub kind:      i32,
    pub range:     f32,
    pub cal:       f32,
    /// FIFF coil-type code; distinguishes magnetometers from gradiometers.
    pub coil_type: i32,
    /// Position + orientation: `[x, y, z, nx0, ny0, nz0, …]` in metres.
    pub loc:       [f32; 12],
    /// FIFF unit code (`FIFF_UNIT_T`, `FIFF_UNIT_T_M`, `FIFF_UNIT_V`, …).
    pub unit:      i32,
    pub unit_mul:  i32,
    pub name:      String,
}

impl ChannelInfo {
    /// Calibration factor applied to raw integer/float samples: `cal × range`.
    #[inline]
    pub fn calibration(&self) -> f64 {
        (self.cal as f64) * (self.range as f64)
    }

    /// Parse from the 96-byte payload of a FIFFT_CH_INFO_STRUCT tag.
    ///
    /// Layout: scanno(4) + logno(4) + kind(4) + range(4) + cal(4) +
    ///         coil_type(4) + loc(48) + unit(4) + unit_mul(4) + ch_name(16) = 96
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        if raw.len() < 96 {
            bail!("ch_info payload too short: {} bytes (need 96)", raw.len());
        }
        let scan_no   = i32::from_be_bytes(raw[0..4].try_into().unwrap());
        let log_no    = i32::from_be_bytes(raw[4..8].try_into().unwrap());
        let kind      = i32::from_be_bytes(raw[8..12].try_into().unwrap());
        let range     = f32::from_be_bytes(raw[12..16].try_into().unwrap());
        let cal       = f32::from_be_bytes(raw[16..20].try_into().unwrap());
        let coil_type = i32::from_be_bytes(raw[20..24].try_into().unwrap());
        let mut loc   = [0f32; 12];
        for (i, v) in loc.iter_mut().enumerate() {
            *v = f32::from_be_bytes(raw[24 + i * 4..24 + i * 4 + 4].try_into().unwrap());
        }
        let unit      = i32::from_be_bytes(raw[72..76].try_into().unwrap());
        let unit_mul  = i32::from_be_bytes(raw[76..80].try_into().unwrap());
        // Channel name: null-terminated Latin-1, 16 bytes
        let name_bytes = &raw[80..96];
        let end = name_bytes.iter().position(|&b| b == 0).unwrap_or(16);
        let name = name_bytes[..end].iter().map(|&b| b as char).collect();
        Ok(ChannelInfo { scan_no, log_no, kind, range, cal, coil_type, loc, unit, unit_mul, name })
    }
}

// ── Measurement info ─────────────────────────────────────────────────────

/// Measurement metadata extracted from `FIFFB_MEAS_INFO`.
///
/// One instance travels with every container (raw, epochs, evoked); the
/// channel operations in [`crate::channels`] keep `chs` and `bads`
/// consistent with whatever data array the container carries.
#[derive(Debug, Clone)]
pub struct MeasInfo {
    /// Channel count; always equal to `chs.len()`.
    pub n_chan:    usize,
    pub sfreq:     f64,
    pub lowpass:   Option<f64>,
    pub highpass:  Option<f64>,
    pub line_freq: Option<f64>,
    /// Per-channel metadata, in data-row order.
    pub chs:       Vec<ChannelInfo>,
    /// Names of channels marked bad; always a subset of the channel names.
    pub bads:      Vec<String>,
    pub description: Option<String>,
}

impl MeasInfo {
    /// Calibration array `[n_chan]`: `cal[i] = chs[i].cal * chs[i].range`.
    pub fn cals(&self) -> Vec<f64> {
        self.chs.iter().map(|c| c.calibration()).collect()
    }

    /// Channel names in order.
    pub fn ch_names(&self) -> Vec<&str> {
        self.chs.iter().map(|c| c.name.as_str()).collect()
    }
}

// ── Construction ─────────────────────────────────────────────────────────

/// Build a `MeasInfo` from scratch for in-memory containers.
///
/// Each entry is a `(name, type)` pair; names must be unique.  Calibration
/// is the identity and coil/unit codes take per-type defaults, so the result
/// behaves like already-calibrated data.
pub fn create_info(channels: &[(&str, ChannelType)], sfreq: f64) -> error::Result<MeasInfo> {
    let mut chs = Vec::with_capacity(channels.len());
    for (i, (name, ch_type)) in channels.iter().enumerate() {
        if channels[..i].iter().any(|(n, _)| n == name) {
            return Err(Error::DuplicateName((*name).to_string()));
        }
        chs.push(ChannelInfo {
            scan_no: i as i32 + 1,
            log_no: i as i32 + 1,
            kind: ch_type.fiff_kind(),
            range: 1.0,
            cal: 1.0,
            coil_type: ch_type.default_coil(),
            loc: [0.0; 12],
            unit: ch_type.default_unit(),
            unit_mul: 0,
            name: (*name).to_string(),
        });
    }
    Ok(MeasInfo {
        n_chan: chs.len(),
        sfreq,
        lowpass: None,
        highpass: None,
        line_freq: None,
        chs,
        bads: Vec::new(),
        description: None,
    })
}

// ── Readers ──────────────────────────────────────────────────────────────

/// Read the bad-channel list stored in an MNE extension block under `node`.
///
/// Returns an empty list when the block or its name-list tag is absent.
pub fn read_bad_channels<R: Read + Seek>(reader: &mut R, node: &Node) -> Result<Vec<String>> {
    let block = match node.find_block(FIFFB_MNE_BAD_CHANNELS) {
        Some(b) => b,
        None => return Ok(Vec::new()),
    };
    let tag = match block.find_tag(FIFF_MNE_CH_NAME_LIST) {
        Some(t) => t,
        None => return Ok(Vec::new()),
    };
    let s = read_string(reader, tag)?;
    Ok(split_name_list(&s))
}

/// Split a colon-separated FIFF channel-name list.
fn split_name_list(s: &str) -> Vec<String> {
    s.split(':')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read `MeasInfo` from an open FIF file given the tree.
pub fn read_meas_info<R: Read + Seek>(reader: &mut R, tree: &Node) -> Result<MeasInfo> {
    // Navigate to FIFFB_MEAS_INFO
    let meas_node = tree
        .find_block(FIFFB_MEAS)
        .ok_or_else(|| anyhow::anyhow!("FIFFB_MEAS block not found"))?;
    let info_node = meas_node
        .find_block(FIFFB_MEAS_INFO)
        .ok_or_else(|| anyhow::anyhow!("FIFFB_MEAS_INFO block not found"))?;

    let mut n_chan      = None::<usize>;
    let mut sfreq       = None::<f64>;
    let mut lowpass     = None::<f64>;
    let mut highpass    = None::<f64>;
    let mut line_freq   = None::<f64>;
    let mut chs         = Vec::<ChannelInfo>::new();
    let mut bads        = Vec::<String>::new();
    let mut description = None::<String>;

    for ent in &info_node.entries {
        match ent.kind {
            FIFF_NCHAN => {
                n_chan = Some(read_i32(reader, ent)? as usize);
            }
            FIFF_SFREQ => {
                sfreq = Some(read_f32(reader, ent)? as f64);
            }
            FIFF_LOWPASS => {
                let v = read_f32(reader, ent)?;
                if v.is_finite() {
                    lowpass = Some(v as f64);
                }
            }
            FIFF_HIGHPASS => {
                let v = read_f32(reader, ent)?;
                if v.is_finite() {
                    highpass = Some(v as f64);
                }
            }
            FIFF_LINE_FREQ => {
                let v = read_f32(reader, ent)?;
                if v.is_finite() {
                    line_freq = Some(v as f64);
                }
            }
            FIFF_CH_INFO => {
                let raw = read_raw_bytes(reader, ent)?;
                chs.push(ChannelInfo::from_bytes(&raw)?);
            }
            FIFF_BAD_CHS => {
                // Legacy location: colon-separated list tag in the info block.
                let s = read_string(reader, ent)?;
                bads = split_name_list(&s);
            }
            FIFF_DESCRIPTION => {
                description = Some(read_string(reader, ent)?);
            }
            _ => {}
        }
    }

    // MNE writes bads in their own sub-block; prefer that over the legacy tag.
    let mne_bads = read_bad_channels(reader, info_node)?;
    if !mne_bads.is_empty() {
        bads = mne_bads;
    }

    let n_chan = n_chan.ok_or_else(|| anyhow::anyhow!("FIFF_NCHAN not found"))?;
    let sfreq  = sfreq.ok_or_else(|| anyhow::anyhow!("FIFF_SFREQ not found"))?;

    if chs.len() != n_chan {
        bail!("expected {n_chan} ch_info structs, got {}", chs.len());
    }

    // A bad name that matches no channel would break every downstream
    // operation that keys on it; drop it here with a warning.
    bads.retain(|b| {
        let known = chs.iter().any(|c| &c.name == b);
        if !known {
            warn!("ignoring unknown bad channel '{b}'");
        }
        known
    });

    Ok(MeasInfo { n_chan, sfreq, lowpass, highpass, line_freq, chs, bads, description })
}
