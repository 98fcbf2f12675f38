/// Shared helpers: synthetic FIF byte streams and fixture containers.
use ndarray::{Array2, Array3};

use chankit::fiff::constants::*;
use chankit::{create_info, ChannelType, Epochs, Evoked, MeasInfo, Raw};

// ── FIF serialization ────────────────────────────────────────────────────

/// Append one tag (16-byte big-endian header + payload) to a byte stream.
#[allow(unused)]
pub fn push_tag(buf: &mut Vec<u8>, kind: i32, ftype: u32, payload: &[u8], last: bool) {
    buf.extend_from_slice(&kind.to_be_bytes());
    buf.extend_from_slice(&ftype.to_be_bytes());
    buf.extend_from_slice(&(payload.len() as i32).to_be_bytes());
    let next = if last { FIFFV_NEXT_NONE } else { FIFFV_NEXT_SEQ };
    buf.extend_from_slice(&next.to_be_bytes());
    buf.extend_from_slice(payload);
}

/// One channel of a synthetic recording.
#[allow(unused)]
#[derive(Clone, Copy)]
pub struct FifChannel {
    pub name: &'static str,
    pub kind: i32,
    pub coil: i32,
    pub unit: i32,
    pub cal:  f32,
}

#[allow(unused)]
impl FifChannel {
    pub fn eeg(name: &'static str) -> Self {
        FifChannel { name, kind: FIFFV_EEG_CH, coil: FIFFV_COIL_EEG, unit: FIFF_UNIT_V, cal: 1.0 }
    }

    pub fn grad(name: &'static str) -> Self {
        FifChannel {
            name,
            kind: FIFFV_MEG_CH,
            coil: FIFFV_COIL_VV_PLANAR_T1,
            unit: FIFF_UNIT_T_M,
            cal:  1.0,
        }
    }

    pub fn mag(name: &'static str) -> Self {
        FifChannel {
            name,
            kind: FIFFV_MEG_CH,
            coil: FIFFV_COIL_VV_MAG_T3,
            unit: FIFF_UNIT_T,
            cal:  1.0,
        }
    }

    pub fn stim(name: &'static str) -> Self {
        FifChannel { name, kind: FIFFV_STIM_CH, coil: FIFFV_COIL_NONE, unit: FIFF_UNIT_V, cal: 1.0 }
    }

    pub fn with_cal(mut self, cal: f32) -> Self {
        self.cal = cal;
        self
    }

    /// Serialize as a 96-byte FIFFT_CH_INFO_STRUCT payload (range fixed at 1).
    pub fn to_bytes(self) -> Vec<u8> {
        assert!(self.name.len() < 16, "FIFF channel names are at most 15 bytes");
        let mut raw = vec![0u8; 96];
        raw[8..12].copy_from_slice(&self.kind.to_be_bytes());
        raw[12..16].copy_from_slice(&1_f32.to_be_bytes());
        raw[16..20].copy_from_slice(&self.cal.to_be_bytes());
        raw[20..24].copy_from_slice(&self.coil.to_be_bytes());
        raw[72..76].copy_from_slice(&self.unit.to_be_bytes());
        raw[80..80 + self.name.len()].copy_from_slice(self.name.as_bytes());
        raw
    }
}

/// Serialize a complete raw recording:
/// `MEAS { MEAS_INFO { nchan, sfreq, ch_info…, bads }, RAW_DATA { buffers } }`.
///
/// `data` is `[n_chan, n_times]`; its columns are split evenly into
/// `n_buffers` FIFFT_FLOAT buffers (interleaved `[n_samp, n_chan]` frames).
/// Values are written uncalibrated, so a loaded channel reads back as
/// `data[ch] × cal[ch]`.
#[allow(unused)]
pub fn raw_fif_bytes(
    chs: &[FifChannel],
    sfreq: f32,
    bads: &[&str],
    data: &Array2<f32>,
    n_buffers: usize,
    first_samp: Option<i32>,
) -> Vec<u8> {
    assert_eq!(data.nrows(), chs.len(), "data rows must match channel count");
    assert_eq!(data.ncols() % n_buffers, 0, "columns must split evenly into buffers");
    let n_chan = chs.len();
    let n_per = data.ncols() / n_buffers;

    let mut buf = Vec::new();
    push_tag(&mut buf, FIFF_BLOCK_START, FIFFT_INT, &FIFFB_MEAS.to_be_bytes(), false);
    push_tag(&mut buf, FIFF_BLOCK_START, FIFFT_INT, &FIFFB_MEAS_INFO.to_be_bytes(), false);
    push_tag(&mut buf, FIFF_NCHAN, FIFFT_INT, &(n_chan as i32).to_be_bytes(), false);
    push_tag(&mut buf, FIFF_SFREQ, FIFFT_FLOAT, &sfreq.to_be_bytes(), false);
    for ch in chs {
        push_tag(&mut buf, FIFF_CH_INFO, FIFFT_CH_INFO_STRUCT, &ch.to_bytes(), false);
    }
    if !bads.is_empty() {
        push_tag(&mut buf, FIFF_BLOCK_START, FIFFT_INT, &FIFFB_MNE_BAD_CHANNELS.to_be_bytes(), false);
        push_tag(&mut buf, FIFF_MNE_CH_NAME_LIST, FIFFT_STRING, bads.join(":").as_bytes(), false);
        push_tag(&mut buf, FIFF_BLOCK_END, FIFFT_INT, &FIFFB_MNE_BAD_CHANNELS.to_be_bytes(), false);
    }
    push_tag(&mut buf, FIFF_BLOCK_END, FIFFT_INT, &FIFFB_MEAS_INFO.to_be_bytes(), false);

    push_tag(&mut buf, FIFF_BLOCK_START, FIFFT_INT, &FIFFB_RAW_DATA.to_be_bytes(), false);
    if let Some(fs) = first_samp {
        push_tag(&mut buf, FIFF_FIRST_SAMPLE, FIFFT_INT, &fs.to_be_bytes(), false);
    }
    for b in 0..n_buffers {
        let mut payload = Vec::with_capacity(n_per * n_chan * 4);
        for t in b * n_per..(b + 1) * n_per {
            for c in 0..n_chan {
                payload.extend_from_slice(&data[[c, t]].to_be_bytes());
            }
        }
        push_tag(&mut buf, FIFF_DATA_BUFFER, FIFFT_FLOAT, &payload, false);
    }
    push_tag(&mut buf, FIFF_BLOCK_END, FIFFT_INT, &FIFFB_RAW_DATA.to_be_bytes(), false);
    push_tag(&mut buf, FIFF_BLOCK_END, FIFFT_INT, &FIFFB_MEAS.to_be_bytes(), true);
    buf
}

// ── In-memory fixtures ───────────────────────────────────────────────────

/// All-EEG `MeasInfo` with the given names.
#[allow(unused)]
pub fn eeg_info(names: &[&str], sfreq: f64) -> MeasInfo {
    let pairs: Vec<(&str, ChannelType)> =
        names.iter().map(|&n| (n, ChannelType::Eeg)).collect();
    create_info(&pairs, sfreq).unwrap()
}

/// In-memory raw with `data[c, t] = 1000c + t`.
#[allow(unused)]
pub fn eeg_raw(names: &[&str], n_times: usize) -> Raw {
    let data = Array2::from_shape_fn((names.len(), n_times), |(c, t)| (1000 * c + t) as f64);
    Raw::from_data(eeg_info(names, 250.0), data).unwrap()
}

/// In-memory epochs with `data[e, c, t] = 100_000e + 1000c + t`.
#[allow(unused)]
pub fn eeg_epochs(names: &[&str], n_epochs: usize, n_times: usize) -> Epochs {
    let data = Array3::from_shape_fn((n_epochs, names.len(), n_times), |(e, c, t)| {
        (100_000 * e + 1000 * c + t) as f64
    });
    Epochs::from_data(eeg_info(names, 250.0), data, 0.0).unwrap()
}

/// In-memory evoked with `data[c, t] = 1000c + t`.
#[allow(unused)]
pub fn eeg_evoked(names: &[&str], n_times: usize) -> Evoked {
    let data = Array2::from_shape_fn((names.len(), n_times), |(c, t)| (1000 * c + t) as f64);
    Evoked::from_data(eeg_info(names, 250.0), data, 0.0, 1).unwrap()
}
