//! MEG coil classes and hardware-family inference.
//!
//! Two static tables drive this module: a coil-class table that splits MEG
//! channels into magnetometers and gradiometers (used by
//! [`crate::pick::channel_type`]), and an ordered rule table consulted
//! first-match by [`infer_meg_system`] to name the acquisition hardware.
//! Only the low 16 bits of a coil code are significant; vendors stash flags
//! in the upper half.

use std::fmt;
use tracing::debug;

use crate::fiff::constants::*;
use crate::fiff::info::MeasInfo;

// ── Coil classes ─────────────────────────────────────────────────────────

/// Physical class of a MEG sensor coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoilClass {
    Magnetometer,
    Gradiometer,
}

/// Classify a coil-type code, or `None` for codes the table does not know.
pub fn coil_class(coil_type: i32) -> Option<CoilClass> {
    use CoilClass::*;
    match coil_type & 0xFFFF {
        FIFFV_COIL_NM_122
        | FIFFV_COIL_AXIAL_GRAD_5CM
        | FIFFV_COIL_VV_PLANAR_W..=FIFFV_COIL_VV_PLANAR_T3
        | FIFFV_COIL_MAGNES_GRAD
        | FIFFV_COIL_CTF_GRAD
        | FIFFV_COIL_KIT_GRAD
        | FIFFV_COIL_BABY_GRAD => Some(Gradiometer),
        FIFFV_COIL_POINT_MAGNETOMETER
        | FIFFV_COIL_VV_MAG_W..=FIFFV_COIL_VV_MAG_T3
        | FIFFV_COIL_MAGNES_MAG
        | FIFFV_COIL_BABY_MAG => Some(Magnetometer),
        _ => None,
    }
}

// ── System inference ─────────────────────────────────────────────────────

/// Detected MEG hardware family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MegSystem {
    /// Neuromag 122-channel planar system.
    Neuromag122,
    /// Elekta/Neuromag Vectorview 306-channel system.  Also the fallback
    /// when no rule matches.
    #[default]
    Vectorview306,
    /// 4D/BTi Magnes 2500 WH (magnetometers, < ~150 MEG channels).
    Magnes2500wh,
    /// 4D/BTi Magnes 3600 WH (the larger sibling).
    Magnes3600wh,
    /// CTF 275-channel system.
    Ctf275,
    /// KIT/Yokogawa system.
    Kit,
    /// BabySQUID infant system.
    BabySquid,
}

impl MegSystem {
    /// Conventional short label for this system.
    pub fn label(self) -> &'static str {
        match self {
            MegSystem::Neuromag122   => "122m",
            MegSystem::Vectorview306 => "306m",
            MegSystem::Magnes2500wh  => "Magnes_2500wh",
            MegSystem::Magnes3600wh  => "Magnes_3600wh",
            MegSystem::Ctf275        => "CTF_275",
            MegSystem::Kit           => "KIT",
            MegSystem::BabySquid     => "BabySQUID",
        }
    }
}

impl fmt::Display for MegSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One inference rule: an inclusive coil-code range and the system it
/// implies.  `count_over` switches the verdict on the total MEG channel
/// count; the Magnes 2500/3600 pair shares coil codes and differs only in
/// array size.
struct SystemRule {
    coils:      (i32, i32),
    system:     MegSystem,
    count_over: Option<(usize, MegSystem)>,
}

/// Ordered rule table, consulted first-match per channel.
const SYSTEM_RULES: &[SystemRule] = &[
    SystemRule {
        coils: (FIFFV_COIL_NM_122, FIFFV_COIL_NM_122),
        system: MegSystem::Neuromag122,
        count_over: None,
    },
    SystemRule {
        coils: (3000, 3999),
        system: MegSystem::Vectorview306,
        count_over: None,
    },
    SystemRule {
        coils: (FIFFV_COIL_MAGNES_MAG, FIFFV_COIL_MAGNES_GRAD),
        system: MegSystem::Magnes2500wh,
        count_over: Some((150, MegSystem::Magnes3600wh)),
    },
    SystemRule {
        coils: (FIFFV_COIL_CTF_GRAD, FIFFV_COIL_CTF_GRAD),
        system: MegSystem::Ctf275,
        count_over: None,
    },
    SystemRule {
        coils: (FIFFV_COIL_KIT_GRAD, FIFFV_COIL_KIT_GRAD),
        system: MegSystem::Kit,
        count_over: None,
    },
    SystemRule {
        coils: (FIFFV_COIL_BABY_GRAD, FIFFV_COIL_BABY_GRAD),
        system: MegSystem::BabySquid,
        count_over: None,
    },
];

/// Guess the MEG hardware family from the channel metadata.
///
/// Scans channels in stored order; the first MEG channel whose coil code
/// matches a rule decides.  Records without MEG channels, or with only
/// unrecognized coils, get the Vectorview default.
pub fn infer_meg_system(info: &MeasInfo) -> MegSystem {
    for ch in &info.chs {
        if ch.kind != FIFFV_MEG_CH {
            continue;
        }
        let code = ch.coil_type & 0xFFFF;
        for rule in SYSTEM_RULES {
            if code < rule.coils.0 || code > rule.coils.1 {
                continue;
            }
            let mut system = rule.system;
            if let Some((threshold, larger)) = rule.count_over {
                let n_meg = info.chs.iter().filter(|c| c.kind == FIFFV_MEG_CH).count();
                if n_meg > threshold {
                    system = larger;
                }
            }
            debug!("coil code {code} on '{}' implies {system}", ch.name);
            return system;
        }
    }
    MegSystem::default()
}
