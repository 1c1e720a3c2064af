//! V2.0 measurement interface
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    prelude::{BootTimestamp, Measurement, Snapshot, Version},
    schema::{capped, v1_0, v1_1},
    translate,
};

bitflags! {
    /// V2.0 signal tracking state
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GnssMeasurementState: u32 {
        const STATE_CODE_LOCK = 1 << 0;
        const STATE_BIT_SYNC = 1 << 1;
        const STATE_SUBFRAME_SYNC = 1 << 2;
        const STATE_TOW_DECODED = 1 << 3;
        const STATE_MSEC_AMBIGUOUS = 1 << 4;
        const STATE_SYMBOL_SYNC = 1 << 5;
        const STATE_GLO_STRING_SYNC = 1 << 6;
        const STATE_GLO_TOD_DECODED = 1 << 7;
        const STATE_BDS_D2_BIT_SYNC = 1 << 8;
        const STATE_BDS_D2_SUBFRAME_SYNC = 1 << 9;
        const STATE_GAL_E1BC_CODE_LOCK = 1 << 10;
        const STATE_GAL_E1C_2ND_CODE_LOCK = 1 << 11;
        const STATE_GAL_E1B_PAGE_SYNC = 1 << 12;
        const STATE_SBAS_SYNC = 1 << 13;
        const STATE_TOW_KNOWN = 1 << 14;
        const STATE_GLO_TOD_KNOWN = 1 << 15;
        const STATE_2ND_CODE_LOCK = 1 << 16;
    }
}

bitflags! {
    /// Presence mask of the [ElapsedRealtime]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ElapsedRealtimeFlags: u16 {
        const HAS_TIMESTAMP_NS = 1 << 0;
        const HAS_TIME_UNCERTAINTY_NS = 1 << 1;
    }
}

/// V2.0 constellation identifier (adds IRNSS)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GnssConstellationType {
    #[default]
    Unknown,
    Gps,
    Sbas,
    Glonass,
    Qzss,
    Beidou,
    Galileo,
    Irnss,
}


/// Measurement instant, expressed relative to device boot.
/// Fields are only meaningful along their [ElapsedRealtimeFlags].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElapsedRealtime {
    pub flags: ElapsedRealtimeFlags,
    pub timestamp_ns: u64,
    pub time_uncertainty_ns: f64,
}

impl From<Option<BootTimestamp>> for ElapsedRealtime {
    fn from(timestamp: Option<BootTimestamp>) -> Self {
        match timestamp {
            Some(ts) => Self {
                flags: ElapsedRealtimeFlags::HAS_TIMESTAMP_NS
                    | ElapsedRealtimeFlags::HAS_TIME_UNCERTAINTY_NS,
                timestamp_ns: ts.timestamp_ns,
                time_uncertainty_ns: ts.time_uncertainty_ns as f64,
            },
            None => Self::default(),
        }
    }
}

impl ElapsedRealtime {
    /// True when the timestamp could be resolved
    pub fn has_timestamp(&self) -> bool {
        self.flags.contains(ElapsedRealtimeFlags::HAS_TIMESTAMP_NS)
    }
}

/// V2.0 [GnssMeasurement]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssMeasurement {
    pub v1_1: v1_1::GnssMeasurement,
    pub code_type: String,
    pub state: GnssMeasurementState,
    pub constellation: GnssConstellationType,
}

impl GnssMeasurement {
    pub fn compose(m: &Measurement) -> Self {
        Self {
            v1_1: v1_1::GnssMeasurement::compose(m),
            code_type: translate::code_type(m.code_type, &m.other_code_type_name),
            state: translate::state_v2_0(m.state),
            constellation: translate::constellation_v2_0(m.sv_type),
        }
    }
}

/// V2.0 [GnssData]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssData {
    pub measurements: Vec<GnssMeasurement>,
    pub clock: v1_0::GnssClock,
    pub elapsed_realtime: ElapsedRealtime,
}

impl GnssData {
    /// Composes V2.0 [GnssData], with the [ElapsedRealtime]
    /// resolved by the adapter.
    pub fn compose(snapshot: &Snapshot, elapsed_realtime: ElapsedRealtime) -> Self {
        Self {
            measurements: capped(Version::V2_0, snapshot)
                .map(GnssMeasurement::compose)
                .collect(),
            clock: v1_0::GnssClock::compose(&snapshot.clock),
            elapsed_realtime,
        }
    }
}
