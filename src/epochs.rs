//! Segmented trials.
//!
//! An [`Epochs`] holds zero or more fixed-length windows cut from a
//! continuous recording, as a `[n_epochs, n_chan, n_times]` array.  The
//! channel axis is the middle one; everything channel-related otherwise
//! behaves exactly like [`Raw`](crate::fiff::raw::Raw).

use ndarray::{s, Array2, Array3, Axis};
use tracing::debug;

use crate::channels::{check_projector, keep_indices, subset_projector, ChannelOps, ContainerKind};
use crate::error::{Error, Result};
use crate::fiff::info::MeasInfo;
use crate::fiff::raw::Raw;
use crate::pick::pick_info;

/// Trials container, data `[n_epochs, n_chan, n_times]`.
#[derive(Debug, Clone)]
pub struct Epochs {
    /// Measurement info; `n_chan` matches the middle data axis.
    pub info: MeasInfo,
    /// Epoch start time in seconds relative to the event.
    pub tmin: f64,
    data:      Option<Array3<f64>>,
    projector: Option<Array2<f64>>,
}

impl Epochs {
    /// Build from an already-materialized trials array.
    pub fn from_data(info: MeasInfo, data: Array3<f64>, tmin: f64) -> Result<Self> {
        if data.shape()[1] != info.n_chan {
            return Err(Error::ShapeMismatch {
                got: data.shape()[1],
                expected: info.n_chan,
                axis: 1,
            });
        }
        Ok(Epochs { info, tmin, data: Some(data), projector: None })
    }

    /// Metadata-only epochs (no trials loaded).
    pub fn from_info(info: MeasInfo, tmin: f64) -> Self {
        Epochs { info, tmin, data: None, projector: None }
    }

    /// Cut a preloaded recording into non-overlapping windows of
    /// `epoch_samples` samples (must be non-zero); trailing samples that do
    /// not fill a complete window are discarded.
    pub fn segment(raw: &Raw, epoch_samples: usize) -> Result<Self> {
        let data = raw
            .data()
            .ok_or(Error::NoData("segmenting needs a preloaded recording"))?;
        let (n_ch, n_t) = data.dim();
        let n_epochs = n_t / epoch_samples;
        let mut out = Array3::<f64>::zeros((n_epochs, n_ch, epoch_samples));
        for e in 0..n_epochs {
            let start = e * epoch_samples;
            out.slice_mut(s![e, .., ..])
                .assign(&data.slice(s![.., start..start + epoch_samples]));
        }
        debug!("segmented {} sample(s) into {} epoch(s)", n_t, n_epochs);
        Epochs::from_data(raw.info.clone(), out, 0.0)
    }

    /// Number of trials (0 when no data is loaded).
    pub fn n_epochs(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.shape()[0])
    }

    /// Samples per trial (0 when no data is loaded).
    pub fn n_times(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.shape()[2])
    }

    /// Trials array, if loaded.
    pub fn data(&self) -> Option<&Array3<f64>> {
        self.data.as_ref()
    }

    /// Current projection matrix, if one is set.
    pub fn projector(&self) -> Option<&Array2<f64>> {
        self.projector.as_ref()
    }

    /// Attach a `[n_chan, n_chan]` projection matrix.
    pub fn set_projector(&mut self, proj: Array2<f64>) -> Result<()> {
        check_projector(self.info.n_chan, &proj)?;
        self.projector = Some(proj);
        Ok(())
    }
}

impl ChannelOps for Epochs {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Epochs
    }

    fn info(&self) -> &MeasInfo {
        &self.info
    }

    fn drop_channels(&mut self, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        let keep = keep_indices(&self.info, names)?;
        if let Some(proj) = &self.projector {
            self.projector = Some(subset_projector(proj, &keep));
        }
        if let Some(data) = &self.data {
            self.data = Some(data.select(Axis(self.kind().channel_axis()), &keep));
        }
        self.info = pick_info(&self.info, &keep)?;
        Ok(())
    }
}
