//! Channel-type resolution and measurement-info subsetting.
//!
//! A channel's *effective type* is derived from its FIFF kind code, with the
//! MEG kind split into magnetometers and gradiometers by coil class (or, for
//! unknown coils, by unit).  The string labels follow the usual lowercase
//! convention (`"eeg"`, `"grad"`, `"ref_meg"`, …).

use std::fmt;
use std::str::FromStr;

use crate::coils::{coil_class, CoilClass};
use crate::error::{Error, Result};
use crate::fiff::constants::*;
use crate::fiff::info::MeasInfo;

/// Valid channel-type labels, in canonical order.
///
/// Must agree with [`ChannelType::ALL`]; `tests` below keeps them in sync.
pub const TYPE_LABELS: &str =
    "grad, mag, eeg, stim, eog, emg, ecg, ref_meg, resp, exci, ias, syst, misc";

/// Effective sensor category of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// MEG gradiometer.
    Grad,
    /// MEG magnetometer.
    Mag,
    /// EEG electrode.
    Eeg,
    /// Stimulus / trigger line.
    Stim,
    /// Electro-oculogram.
    Eog,
    /// Electromyogram.
    Emg,
    /// Electrocardiogram.
    Ecg,
    /// MEG reference sensor.
    RefMeg,
    /// Respiration monitor.
    Resp,
    /// Flux excitation.
    Exci,
    /// Internal active shielding.
    Ias,
    /// System status.
    Syst,
    /// Anything else worth keeping.
    Misc,
}

impl ChannelType {
    /// Every valid type, in the order of [`TYPE_LABELS`].
    pub const ALL: [ChannelType; 13] = [
        ChannelType::Grad,
        ChannelType::Mag,
        ChannelType::Eeg,
        ChannelType::Stim,
        ChannelType::Eog,
        ChannelType::Emg,
        ChannelType::Ecg,
        ChannelType::RefMeg,
        ChannelType::Resp,
        ChannelType::Exci,
        ChannelType::Ias,
        ChannelType::Syst,
        ChannelType::Misc,
    ];

    /// Lowercase label for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelType::Grad   => "grad",
            ChannelType::Mag    => "mag",
            ChannelType::Eeg    => "eeg",
            ChannelType::Stim   => "stim",
            ChannelType::Eog    => "eog",
            ChannelType::Emg    => "emg",
            ChannelType::Ecg    => "ecg",
            ChannelType::RefMeg => "ref_meg",
            ChannelType::Resp   => "resp",
            ChannelType::Exci   => "exci",
            ChannelType::Ias    => "ias",
            ChannelType::Syst   => "syst",
            ChannelType::Misc   => "misc",
        }
    }

    /// FIFF kind code channels of this type are stored under.
    ///
    /// `Grad` and `Mag` share `FIFFV_MEG_CH`; the split lives in the coil
    /// type, not the kind.
    pub fn fiff_kind(self) -> i32 {
        match self {
            ChannelType::Grad | ChannelType::Mag => FIFFV_MEG_CH,
            ChannelType::Eeg    => FIFFV_EEG_CH,
            ChannelType::Stim   => FIFFV_STIM_CH,
            ChannelType::Eog    => FIFFV_EOG_CH,
            ChannelType::Emg    => FIFFV_EMG_CH,
            ChannelType::Ecg    => FIFFV_ECG_CH,
            ChannelType::RefMeg => FIFFV_REF_MEG_CH,
            ChannelType::Resp   => FIFFV_RESP_CH,
            ChannelType::Exci   => FIFFV_EXCI_CH,
            ChannelType::Ias    => FIFFV_IAS_CH,
            ChannelType::Syst   => FIFFV_SYST_CH,
            ChannelType::Misc   => FIFFV_MISC_CH,
        }
    }

    /// Default unit code for a freshly created channel of this type.
    pub(crate) fn default_unit(self) -> i32 {
        match self {
            ChannelType::Mag => FIFF_UNIT_T,
            ChannelType::Grad => FIFF_UNIT_T_M,
            ChannelType::RefMeg => FIFF_UNIT_T,
            _ => FIFF_UNIT_V,
        }
    }

    /// Default coil-type code for a freshly created channel of this type.
    pub(crate) fn default_coil(self) -> i32 {
        match self {
            ChannelType::Mag => FIFFV_COIL_VV_MAG_T3,
            ChannelType::Grad => FIFFV_COIL_VV_PLANAR_T1,
            ChannelType::RefMeg => FIFFV_COIL_POINT_MAGNETOMETER,
            ChannelType::Eeg => FIFFV_COIL_EEG,
            _ => FIFFV_COIL_NONE,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ChannelType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| Error::InvalidType { given: s.to_string() })
    }
}

// ── Type resolution ──────────────────────────────────────────────────────

/// Resolve the effective type of the channel at position `idx`.
///
/// MEG channels consult the coil-class table first; coils the table does not
/// know fall back on the unit (Tesla → magnetometer, Tesla/metre →
/// gradiometer).  Kinds with no matching label (sEEG, ECoG, …) are an
/// [`Error::Unclassifiable`].
pub fn channel_type(info: &MeasInfo, idx: usize) -> Result<ChannelType> {
    let ch = info.chs.get(idx).ok_or(Error::IndexOutOfRange {
        index: idx,
        n_chan: info.n_chan,
    })?;
    let unknown = || Error::Unclassifiable {
        name: ch.name.clone(),
        kind: ch.kind,
        coil_type: ch.coil_type,
    };
    match ch.kind {
        FIFFV_MEG_CH => match coil_class(ch.coil_type) {
            Some(CoilClass::Magnetometer) => Ok(ChannelType::Mag),
            Some(CoilClass::Gradiometer) => Ok(ChannelType::Grad),
            None => match ch.unit {
                FIFF_UNIT_T => Ok(ChannelType::Mag),
                FIFF_UNIT_T_M => Ok(ChannelType::Grad),
                _ => Err(unknown()),
            },
        },
        FIFFV_REF_MEG_CH => Ok(ChannelType::RefMeg),
        FIFFV_EEG_CH  => Ok(ChannelType::Eeg),
        FIFFV_STIM_CH => Ok(ChannelType::Stim),
        FIFFV_EOG_CH  => Ok(ChannelType::Eog),
        FIFFV_EMG_CH  => Ok(ChannelType::Emg),
        FIFFV_ECG_CH  => Ok(ChannelType::Ecg),
        FIFFV_RESP_CH => Ok(ChannelType::Resp),
        FIFFV_MISC_CH => Ok(ChannelType::Misc),
        FIFFV_EXCI_CH => Ok(ChannelType::Exci),
        FIFFV_IAS_CH  => Ok(ChannelType::Ias),
        FIFFV_SYST_CH => Ok(ChannelType::Syst),
        _ => Err(unknown()),
    }
}

// ── Info subsetting ──────────────────────────────────────────────────────

/// Build a new `MeasInfo` keeping only the channels at `sel`, in that order.
///
/// Bads are filtered to the surviving names; everything else is copied.
pub fn pick_info(info: &MeasInfo, sel: &[usize]) -> Result<MeasInfo> {
    let mut chs = Vec::with_capacity(sel.len());
    for &idx in sel {
        let ch = info.chs.get(idx).ok_or(Error::IndexOutOfRange {
            index: idx,
            n_chan: info.n_chan,
        })?;
        chs.push(ch.clone());
    }
    let bads = info
        .bads
        .iter()
        .filter(|b| chs.iter().any(|c| &c.name == *b))
        .cloned()
        .collect();
    Ok(MeasInfo {
        n_chan: chs.len(),
        sfreq: info.sfreq,
        lowpass: info.lowpass,
        highpass: info.highpass,
        line_freq: info.line_freq,
        chs,
        bads,
        description: info.description.clone(),
    })
}
