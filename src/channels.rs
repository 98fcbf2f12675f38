//! Channel-set operations shared by every measurement container.
//!
//! The containers ([`Raw`](crate::fiff::raw::Raw), [`Epochs`](crate::epochs::Epochs),
//! [`Evoked`](crate::evoked::Evoked)) each carry a [`MeasInfo`] plus a data
//! array whose channel axis differs per variant.  [`ChannelOps`] is the
//! common surface: name listing, type membership and channel removal.  The
//! free functions here implement the cross-container work —
//! [`equalize_channels`] reduces a mixed set of containers to their shared
//! channels, [`rename_channels`] rewrites names (and, in narrow cases,
//! types) on an info in place.

use std::collections::{BTreeSet, HashSet};

use ndarray::{Array2, Axis};
use tracing::info;

use crate::error::{Error, Result};
use crate::fiff::info::{ChannelInfo, MeasInfo};
use crate::pick::{channel_type, ChannelType};

// ── Container variants ───────────────────────────────────────────────────

/// Which measurement container variant an operation is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Continuous recording, data `[n_chan, n_times]`.
    Raw,
    /// Segmented trials, data `[n_epochs, n_chan, n_times]`.
    Epochs,
    /// Averaged response, data `[n_chan, n_times]`.
    Evoked,
}

impl ContainerKind {
    /// Position of the channel axis in the variant's data array.
    pub fn channel_axis(self) -> usize {
        match self {
            ContainerKind::Raw | ContainerKind::Evoked => 0,
            ContainerKind::Epochs => 1,
        }
    }
}

// ── The container trait ──────────────────────────────────────────────────

/// Common channel surface of the measurement containers.
///
/// Object safe: [`equalize_channels`] works over `&mut [&mut dyn ChannelOps]`
/// so raws, epochs and evokeds can be mixed in one call.
pub trait ChannelOps {
    /// Container variant tag; selects the channel axis for data subsetting.
    fn kind(&self) -> ContainerKind;

    /// Measurement metadata.
    fn info(&self) -> &MeasInfo;

    /// Remove the named channels, keeping metadata and data index-aligned.
    ///
    /// Every name must exist; an unknown name is an error and leaves the
    /// container untouched.  An empty list is a no-op.
    fn drop_channels(&mut self, names: &[&str]) -> Result<()>;

    /// Channel names in canonical index order.
    fn ch_names(&self) -> Vec<&str> {
        self.info().ch_names()
    }

    /// Whether any channel has the given effective type.
    ///
    /// Accepts the composite label `"meg"` (magnetometer or gradiometer) on
    /// top of the labels [`contains_ch_type`] takes.
    fn contains(&self, ch_type: &str) -> Result<bool> {
        if ch_type == "meg" {
            Ok(contains_ch_type(self.info(), "mag")? || contains_ch_type(self.info(), "grad")?)
        } else {
            contains_ch_type(self.info(), ch_type)
        }
    }
}

// ── Type membership ──────────────────────────────────────────────────────

/// True iff at least one channel's effective type matches `ch_type`.
///
/// `ch_type` must be a single valid label; a channel whose type cannot be
/// resolved fails the query rather than being skipped.
pub fn contains_ch_type(info: &MeasInfo, ch_type: &str) -> Result<bool> {
    let wanted: ChannelType = ch_type.parse()?;
    for idx in 0..info.n_chan {
        if channel_type(info, idx)? == wanted {
            return Ok(true);
        }
    }
    Ok(false)
}

// ── Index helpers ────────────────────────────────────────────────────────

/// Resolve a strict drop list into the ascending list of retained positions.
///
/// Every name must exist; the first unmatched name aborts before anything is
/// touched.  Duplicate names in the list are tolerated.
pub(crate) fn keep_indices(info: &MeasInfo, to_drop: &[&str]) -> Result<Vec<usize>> {
    let names = info.ch_names();
    let mut dropped = vec![false; names.len()];
    for name in to_drop {
        let idx = names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::UnknownChannel((*name).to_string()))?;
        dropped[idx] = true;
    }
    Ok((0..names.len()).filter(|&i| !dropped[i]).collect())
}

/// Validate a `[n_chan, n_chan]` projection matrix against an info.
pub(crate) fn check_projector(n_chan: usize, proj: &Array2<f64>) -> Result<()> {
    if proj.nrows() != n_chan {
        return Err(Error::ShapeMismatch { got: proj.nrows(), expected: n_chan, axis: 0 });
    }
    if proj.ncols() != n_chan {
        return Err(Error::ShapeMismatch { got: proj.ncols(), expected: n_chan, axis: 1 });
    }
    Ok(())
}

/// Subset a square channel-pair matrix symmetrically.
pub(crate) fn subset_projector(proj: &Array2<f64>, keep: &[usize]) -> Array2<f64> {
    proj.select(Axis(0), keep).select(Axis(1), keep)
}

// ── Equalization ─────────────────────────────────────────────────────────

/// Reduce all containers to their common channel subset, in place.
///
/// The retained set is the intersection of every container's channel names.
/// Each container keeps its own relative channel order; only membership is
/// equalized.  Returns the union of dropped names.
///
/// All-or-nothing is **not** guaranteed across containers: a failure while
/// dropping (which cannot arise from name resolution, since the drop lists
/// are computed from the containers themselves) may leave earlier containers
/// already reduced.
pub fn equalize_channels(candidates: &mut [&mut dyn ChannelOps]) -> Result<BTreeSet<String>> {
    info!("identifying common channels across {} containers", candidates.len());

    // Largest container first (ties: earliest) fixes the iteration order of
    // the retained set; membership is order-independent anyway.
    let mut template = 0;
    for (i, c) in candidates.iter().enumerate() {
        if c.info().n_chan > candidates[template].info().n_chan {
            template = i;
        }
    }

    // Phase 1, read-only: per-container drop lists as owned strings.
    let mut drop_lists: Vec<Vec<String>> = Vec::with_capacity(candidates.len());
    {
        let name_sets: Vec<HashSet<&str>> = candidates
            .iter()
            .map(|c| c.ch_names().into_iter().collect())
            .collect();
        let retained: HashSet<&str> = candidates[template]
            .ch_names()
            .into_iter()
            .filter(|name| name_sets.iter().all(|s| s.contains(name)))
            .collect();
        for c in candidates.iter() {
            let to_drop: Vec<String> = c
                .ch_names()
                .into_iter()
                .filter(|name| !retained.contains(name))
                .map(str::to_string)
                .collect();
            drop_lists.push(to_drop);
        }
    }

    // Phase 2: apply the drops.
    let mut dropped = BTreeSet::new();
    for (c, to_drop) in candidates.iter_mut().zip(&drop_lists) {
        if to_drop.is_empty() {
            continue;
        }
        let refs: Vec<&str> = to_drop.iter().map(String::as_str).collect();
        c.drop_channels(&refs)?;
        dropped.extend(to_drop.iter().cloned());
    }

    if dropped.is_empty() {
        info!("all channels already shared; nothing dropped");
    } else {
        info!("dropped {} channel(s) total: {:?}", dropped.len(), dropped);
    }
    Ok(dropped)
}

// ── Renaming ─────────────────────────────────────────────────────────────

/// New identity for one channel in a [`rename_channels`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alias {
    /// New name only.
    Name(String),
    /// New name plus a new sensor type (restricted; see [`rename_channels`]).
    NameAndType(String, String),
}

impl Alias {
    /// Rename without changing the sensor type.
    pub fn name(new: impl Into<String>) -> Self {
        Alias::Name(new.into())
    }

    /// Rename and reclassify.
    pub fn with_type(new: impl Into<String>, ch_type: impl Into<String>) -> Self {
        Alias::NameAndType(new.into(), ch_type.into())
    }
}

/// Kinds a typed rename may start from or land on.
const CONVERTIBLE: [ChannelType; 5] = [
    ChannelType::Eeg,
    ChannelType::Eog,
    ChannelType::Emg,
    ChannelType::Ecg,
    ChannelType::Misc,
];

/// Check a typed rename against the conversion rules; returns the new FIFF
/// kind code.
fn validate_conversion(ch: &ChannelInfo, wanted: ChannelType) -> Result<i32> {
    if !CONVERTIBLE.iter().any(|t| t.fiff_kind() == ch.kind) {
        return Err(Error::UnsupportedConversion {
            channel: ch.name.clone(),
            reason: format!("will not change a channel of kind code {}", ch.kind),
        });
    }
    if !CONVERTIBLE.contains(&wanted) {
        return Err(Error::UnsupportedConversion {
            channel: ch.name.clone(),
            reason: format!("cannot change a channel to type '{wanted}'"),
        });
    }
    if wanted == ChannelType::Eeg {
        return Err(Error::UnsupportedConversion {
            channel: ch.name.clone(),
            reason: "cannot create eeg channels this way".to_string(),
        });
    }
    Ok(wanted.fiff_kind())
}

/// First name that appears twice, if any.
fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(names.len());
    for n in names {
        if !seen.insert(n.as_str()) {
            return Some(n.as_str());
        }
    }
    None
}

/// Rename channels (and optionally retype them) in place.
///
/// Each `(old_name, alias)` entry maps an existing channel to its new
/// identity.  Old names are resolved against the state before the call, so
/// entries never see each other's effects; positions and all other metadata
/// are preserved, and bad-channel entries follow their channel.
///
/// Type changes are deliberately narrow: only channels whose current kind is
/// eeg/eog/emg/ecg/misc may change, only to eog/emg/ecg/misc.  Everything
/// else (MEG kinds above all, where a kind change without coil geometry
/// would corrupt the record) is an [`Error::UnsupportedConversion`].
///
/// The whole batch is validated up front, including the duplicate check
/// against the simulated post-state; on any error the info is unchanged.
pub fn rename_channels(info: &mut MeasInfo, alias: &[(String, Alias)]) -> Result<()> {
    let original: Vec<String> = info.chs.iter().map(|c| c.name.clone()).collect();

    let mut simulated = original.clone();
    let mut planned: Vec<(usize, String, Option<i32>)> = Vec::with_capacity(alias.len());
    for (old, target) in alias {
        let idx = original
            .iter()
            .position(|n| n == old)
            .ok_or_else(|| Error::UnknownChannel(old.clone()))?;
        let (new_name, new_kind) = match target {
            Alias::Name(new) => (new.clone(), None),
            Alias::NameAndType(new, ch_type) => {
                let wanted: ChannelType = ch_type.parse()?;
                let kind = validate_conversion(&info.chs[idx], wanted)?;
                (new.clone(), Some(kind))
            }
        };
        simulated[idx] = new_name.clone();
        planned.push((idx, new_name, new_kind));
    }
    if let Some(dup) = first_duplicate(&simulated) {
        return Err(Error::DuplicateName(dup.to_string()));
    }

    for (idx, new_name, new_kind) in planned {
        info.chs[idx].name = new_name;
        if let Some(kind) = new_kind {
            info.chs[idx].kind = kind;
        }
    }

    // Bads track channels, not strings: remap each entry through the
    // position its old name had.
    let bads = info
        .bads
        .iter()
        .map(|b| match original.iter().position(|n| n == b) {
            Some(i) => info.chs[i].name.clone(),
            None => b.clone(),
        })
        .collect();
    info.bads = bads;

    Ok(())
}
