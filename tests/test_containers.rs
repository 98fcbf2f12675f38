mod common;

use common::{eeg_raw, raw_fif_bytes, FifChannel};
use ndarray::Array2;
use tempfile::tempdir;

use chankit::{open_raw, rename_channels, Alias, ChannelOps, Epochs, Error, Evoked};

#[test]
fn segment_and_average_in_memory() {
    let raw = eeg_raw(&["Fz", "Cz"], 10);

    let epochs = Epochs::segment(&raw, 4).unwrap();
    assert_eq!(epochs.n_epochs(), 2, "10 samples / 4 → 2 epochs, 2 dropped");
    assert_eq!(epochs.n_times(), 4);

    let evoked = Evoked::from_epochs(&epochs).unwrap();
    assert_eq!(evoked.nave, 2);
    // Columns t and t+4 average to t+2 on every channel.
    approx::assert_abs_diff_eq!(evoked.data()[[1, 1]], 1003.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(evoked.data()[[0, 0]], 2.0, epsilon = 1e-9);
}

#[test]
fn segment_requires_loaded_data() {
    let dir = tempdir().unwrap();
    let chs = vec![FifChannel::eeg("EEG 001")];
    let data = Array2::from_shape_fn((1, 8), |(_, t)| t as f32);
    let bytes = raw_fif_bytes(&chs, 250.0, &[], &data, 1, None);
    let path = dir.path().join("lazy.fif");
    std::fs::write(&path, bytes).unwrap();

    let raw = open_raw(&path).unwrap();
    let err = Epochs::segment(&raw, 4).unwrap_err();
    assert!(matches!(err, Error::NoData(_)));
}

#[test]
fn pipeline_from_disk() {
    let dir = tempdir().unwrap();
    let chs = vec![
        FifChannel::eeg("EEG 001"),
        FifChannel::eeg("EEG 002"),
        FifChannel::stim("STI 014"),
    ];
    let data = Array2::from_shape_fn((3, 8), |(c, t)| (100 * c + t) as f32);
    let bytes = raw_fif_bytes(&chs, 250.0, &[], &data, 2, None);
    let path = dir.path().join("pipeline.fif");
    std::fs::write(&path, bytes).unwrap();

    let mut raw = open_raw(&path).unwrap();
    raw.drop_channels(&["STI 014"]).unwrap();
    raw.preload().unwrap();

    let epochs = Epochs::segment(&raw, 2).unwrap();
    assert_eq!(epochs.n_epochs(), 4);
    assert_eq!(epochs.info.ch_names(), vec!["EEG 001", "EEG 002"]);

    let evoked = Evoked::from_epochs(&epochs).unwrap();
    assert_eq!(evoked.nave, 4);
    // Channel 1, offset 0: mean of {100, 102, 104, 106}.
    approx::assert_abs_diff_eq!(evoked.data()[[1, 0]], 103.0, epsilon = 1e-4);
}

#[test]
fn rename_flows_into_derived_containers() {
    let mut raw = eeg_raw(&["Fz", "Cz"], 8);
    rename_channels(&mut raw.info, &[("Fz".to_string(), Alias::name("FZ"))]).unwrap();

    let epochs = Epochs::segment(&raw, 4).unwrap();
    assert_eq!(epochs.ch_names(), vec!["FZ", "Cz"]);

    let evoked = Evoked::from_epochs(&epochs).unwrap();
    assert_eq!(evoked.ch_names(), vec!["FZ", "Cz"]);
}

#[test]
fn drop_on_derived_containers_keeps_time_axes() {
    let raw = eeg_raw(&["Fz", "Cz", "Pz"], 12);
    let mut epochs = Epochs::segment(&raw, 3).unwrap();
    epochs.drop_channels(&["Cz"]).unwrap();
    assert_eq!(epochs.data().unwrap().shape(), &[4, 2, 3]);
    assert_eq!(epochs.n_times(), 3);

    let mut evoked = Evoked::from_epochs(&epochs).unwrap();
    evoked.drop_channels(&["Pz"]).unwrap();
    assert_eq!(evoked.data().shape(), &[1, 3]);
    assert_eq!(evoked.ch_names(), vec!["Fz"]);
}
