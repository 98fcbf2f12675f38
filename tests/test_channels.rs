mod common;

use common::{eeg_epochs, eeg_evoked, eeg_raw};
use std::collections::BTreeSet;

use chankit::{equalize_channels, ChannelOps};

#[test]
fn equalize_two_raws_drops_the_difference() {
    let mut a = eeg_raw(&["Fz", "Cz", "Pz", "Oz"], 6);
    let mut b = eeg_raw(&["Fz", "Cz", "Pz"], 6);

    let dropped = equalize_channels(&mut [&mut a, &mut b]).unwrap();

    assert_eq!(dropped, BTreeSet::from(["Oz".to_string()]));
    assert_eq!(a.ch_names(), vec!["Fz", "Cz", "Pz"]);
    assert_eq!(b.ch_names(), vec!["Fz", "Cz", "Pz"]);
    assert_eq!(a.data().unwrap().nrows(), 3);
}

#[test]
fn equalize_preserves_per_container_order() {
    let mut a = eeg_raw(&["a", "b", "c"], 4);
    let mut b = eeg_raw(&["c", "a", "b"], 4);

    let dropped = equalize_channels(&mut [&mut a, &mut b]).unwrap();

    assert!(dropped.is_empty());
    assert_eq!(a.ch_names(), vec!["a", "b", "c"]);
    assert_eq!(b.ch_names(), vec!["c", "a", "b"]);
}

#[test]
fn equalize_mixed_container_kinds() {
    let mut raw = eeg_raw(&["Fz", "Cz", "Pz", "Oz"], 6);
    let mut epochs = eeg_epochs(&["Cz", "Pz", "T7"], 2, 4);
    let mut evoked = eeg_evoked(&["Pz", "Cz", "M1"], 4);

    let dropped = equalize_channels(&mut [&mut raw, &mut epochs, &mut evoked]).unwrap();

    assert_eq!(
        dropped,
        BTreeSet::from(["Fz".into(), "Oz".into(), "T7".into(), "M1".into()])
    );
    assert_eq!(raw.ch_names(), vec!["Cz", "Pz"]);
    assert_eq!(epochs.ch_names(), vec!["Cz", "Pz"]);
    assert_eq!(evoked.ch_names(), vec!["Pz", "Cz"]);

    // Data follows on each variant's channel axis.
    assert_eq!(raw.data().unwrap().shape(), &[2, 6]);
    assert_eq!(epochs.data().unwrap().shape(), &[2, 2, 4]);
    assert_eq!(evoked.data().shape(), &[2, 4]);
    // Raw kept stored channels 1 and 2; epochs kept 0 and 1; evoked 0 and 1.
    assert_eq!(raw.data().unwrap()[[0, 5]], 1005.0);
    assert_eq!(epochs.data().unwrap()[[1, 1, 2]], 101_002.0);
    assert_eq!(evoked.data()[[1, 3]], 1003.0);
}

#[test]
fn equalize_with_empty_intersection_empties_every_container() {
    let mut a = eeg_raw(&["a", "b"], 3);
    let mut b = eeg_raw(&["c"], 3);

    let dropped = equalize_channels(&mut [&mut a, &mut b]).unwrap();

    assert_eq!(dropped.len(), 3);
    assert_eq!(a.info.n_chan, 0);
    assert_eq!(b.info.n_chan, 0);
    assert_eq!(a.data().unwrap().nrows(), 0);
}

#[test]
fn equalize_single_container_is_a_no_op() {
    let mut a = eeg_raw(&["Fz", "Cz"], 4);
    let dropped = equalize_channels(&mut [&mut a]).unwrap();
    assert!(dropped.is_empty());
    assert_eq!(a.info.n_chan, 2);
}

#[test]
fn bads_follow_their_channels_through_equalize() {
    let mut a = eeg_raw(&["Fz", "Cz", "Oz"], 3);
    a.info.bads = vec!["Oz".to_string(), "Cz".to_string()];
    let mut b = eeg_raw(&["Fz", "Cz"], 3);

    equalize_channels(&mut [&mut a, &mut b]).unwrap();

    // Oz left with its channel; Cz stays marked bad.
    assert_eq!(a.info.bads, vec!["Cz"]);
}

#[test]
fn contains_spans_container_kinds() {
    let raw = eeg_raw(&["Fz"], 3);
    assert!(raw.contains("eeg").unwrap());
    assert!(!raw.contains("meg").unwrap());
    assert!(!raw.contains("stim").unwrap());

    let epochs = eeg_epochs(&["Fz"], 1, 2);
    assert!(epochs.contains("eeg").unwrap());

    let evoked = eeg_evoked(&["Fz"], 2);
    assert!(evoked.contains("eeg").unwrap());
    assert!(evoked.contains("bogus").is_err());
}
