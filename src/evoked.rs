//! Averaged responses.
//!
//! An [`Evoked`] is the across-trial mean of an [`Epochs`], shaped
//! `[n_chan, n_times]` with the channel axis first, and carries the number
//! of averaged trials in `nave`.

use ndarray::{Array2, Axis};

use crate::channels::{check_projector, keep_indices, subset_projector, ChannelOps, ContainerKind};
use crate::epochs::Epochs;
use crate::error::{Error, Result};
use crate::fiff::info::MeasInfo;
use crate::pick::pick_info;

/// Averaged-response container, data `[n_chan, n_times]`.
#[derive(Debug, Clone)]
pub struct Evoked {
    /// Measurement info; `n_chan` matches the first data axis.
    pub info: MeasInfo,
    /// Start time in seconds relative to the event.
    pub tmin: f64,
    /// Number of trials averaged into this response.
    pub nave: usize,
    data:      Array2<f64>,
    projector: Option<Array2<f64>>,
}

impl Evoked {
    /// Build from an already-averaged array.
    pub fn from_data(info: MeasInfo, data: Array2<f64>, tmin: f64, nave: usize) -> Result<Self> {
        if data.nrows() != info.n_chan {
            return Err(Error::ShapeMismatch {
                got: data.nrows(),
                expected: info.n_chan,
                axis: 0,
            });
        }
        Ok(Evoked { info, tmin, nave, data, projector: None })
    }

    /// Average loaded epochs into an evoked response.
    pub fn from_epochs(epochs: &Epochs) -> Result<Self> {
        let data = epochs
            .data()
            .ok_or(Error::NoData("averaging needs loaded epochs"))?;
        let mean = data
            .mean_axis(Axis(0))
            .ok_or(Error::NoData("cannot average zero epochs"))?;
        Evoked::from_data(epochs.info.clone(), mean, epochs.tmin, epochs.n_epochs())
    }

    /// Samples per channel.
    pub fn n_times(&self) -> usize {
        self.data.ncols()
    }

    /// Averaged data.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
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

impl ChannelOps for Evoked {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Evoked
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
        self.data = self.data.select(Axis(self.kind().channel_axis()), &keep);
        self.info = pick_info(&self.info, &keep)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiff::info::create_info;
    use crate::pick::ChannelType;
    use ndarray::Array3;

    fn info2() -> MeasInfo {
        create_info(&[("Fz", ChannelType::Eeg), ("Cz", ChannelType::Eeg)], 250.0).unwrap()
    }

    #[test]
    fn from_data_checks_rows() {
        let err = Evoked::from_data(info2(), Array2::zeros((3, 5)), 0.0, 1).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { got: 3, expected: 2, axis: 0 }));
    }

    #[test]
    fn averaging_epochs() {
        // Two trials whose mean is trivially checkable.
        let data = Array3::from_shape_fn((2, 2, 3), |(e, c, t)| {
            if e == 0 { (c * 10 + t) as f64 } else { (c * 10 + t) as f64 + 2.0 }
        });
        let epochs = Epochs::from_data(info2(), data, -0.2).unwrap();
        let evoked = Evoked::from_epochs(&epochs).unwrap();

        assert_eq!(evoked.nave, 2);
        approx::assert_abs_diff_eq!(evoked.tmin, -0.2, epsilon = 1e-12);
        assert_eq!(evoked.n_times(), 3);
        assert_eq!(evoked.data()[[1, 2]], 13.0); // ((12) + (14)) / 2
    }

    #[test]
    fn averaging_unloaded_epochs_fails() {
        let epochs = Epochs::from_info(info2(), 0.0);
        assert!(matches!(
            Evoked::from_epochs(&epochs),
            Err(Error::NoData(_))
        ));
    }

    #[test]
    fn drop_selects_first_axis() {
        let mut evoked = Evoked::from_data(
            info2(),
            Array2::from_shape_fn((2, 4), |(c, t)| (c * 100 + t) as f64),
            0.0,
            5,
        )
        .unwrap();
        evoked.drop_channels(&["Fz"]).unwrap();
        assert_eq!(evoked.info.ch_names(), vec!["Cz"]);
        assert_eq!(evoked.data().shape(), &[1, 4]);
        assert_eq!(evoked.data()[[0, 3]], 103.0);
        assert_eq!(evoked.nave, 5);
    }
}
