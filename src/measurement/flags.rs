//! Engine side bit masks
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Presence mask of a [Measurement](crate::prelude::Measurement):
    /// a numeric field is only meaningful when its bit is set.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct MeasurementFlags: u32 {
        const SV_ID = 1 << 0;
        const SV_TYPE = 1 << 1;
        const STATE = 1 << 2;
        const RECEIVED_SV_TIME = 1 << 3;
        const RECEIVED_SV_TIME_UNCERTAINTY = 1 << 4;
        const CARRIER_TO_NOISE = 1 << 5;
        const PSEUDORANGE_RATE = 1 << 6;
        const PSEUDORANGE_RATE_UNCERTAINTY = 1 << 7;
        const ADR_STATE = 1 << 8;
        const ADR = 1 << 9;
        const ADR_UNCERTAINTY = 1 << 10;
        const CARRIER_FREQUENCY = 1 << 11;
        const CARRIER_CYCLES = 1 << 12;
        const CARRIER_PHASE = 1 << 13;
        const CARRIER_PHASE_UNCERTAINTY = 1 << 14;
        const MULTIPATH_INDICATOR = 1 << 15;
        const SIGNAL_TO_NOISE_RATIO = 1 << 16;
        const AUTOMATIC_GAIN_CONTROL = 1 << 17;
        const FULL_ISB = 1 << 18;
        const FULL_ISB_UNCERTAINTY = 1 << 19;
        const SATELLITE_ISB = 1 << 20;
        const SATELLITE_ISB_UNCERTAINTY = 1 << 21;
    }
}

impl MeasurementFlags {
    /// Fields that are always reported: they have no client presence bit
    pub const UNGATED: Self = Self::SV_ID
        .union(Self::SV_TYPE)
        .union(Self::STATE)
        .union(Self::RECEIVED_SV_TIME)
        .union(Self::RECEIVED_SV_TIME_UNCERTAINTY)
        .union(Self::CARRIER_TO_NOISE)
        .union(Self::PSEUDORANGE_RATE)
        .union(Self::PSEUDORANGE_RATE_UNCERTAINTY)
        .union(Self::ADR_STATE)
        .union(Self::ADR)
        .union(Self::ADR_UNCERTAINTY)
        .union(Self::MULTIPATH_INDICATOR);
}

bitflags! {
    /// Signal tracking state of a measurement
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct StateMask: u32 {
        const CODE_LOCK = 1 << 0;
        const BIT_SYNC = 1 << 1;
        const SUBFRAME_SYNC = 1 << 2;
        const TOW_DECODED = 1 << 3;
        const MSEC_AMBIGUOUS = 1 << 4;
        const SYMBOL_SYNC = 1 << 5;
        const GLO_STRING_SYNC = 1 << 6;
        const GLO_TOD_DECODED = 1 << 7;
        const BDS_D2_BIT_SYNC = 1 << 8;
        const BDS_D2_SUBFRAME_SYNC = 1 << 9;
        const GAL_E1BC_CODE_LOCK = 1 << 10;
        const GAL_E1C_2ND_CODE_LOCK = 1 << 11;
        const GAL_E1B_PAGE_SYNC = 1 << 12;
        const SBAS_SYNC = 1 << 13;
        const TOW_KNOWN = 1 << 14;
        const GLO_TOD_KNOWN = 1 << 15;
        const SECOND_CODE_LOCK = 1 << 16;
    }
}

bitflags! {
    /// Accumulated delta range (carrier phase tracking) state
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct AdrStateMask: u16 {
        const VALID = 1 << 0;
        const RESET = 1 << 1;
        const CYCLE_SLIP = 1 << 2;
        const HALF_CYCLE_RESOLVED = 1 << 3;
    }
}

bitflags! {
    /// Presence mask of the snapshot [Clock](crate::prelude::Clock)
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ClockFlags: u32 {
        const LEAP_SECOND = 1 << 0;
        const TIME_UNCERTAINTY = 1 << 1;
        const FULL_BIAS = 1 << 2;
        const BIAS = 1 << 3;
        const BIAS_UNCERTAINTY = 1 << 4;
        const DRIFT = 1 << 5;
        const DRIFT_UNCERTAINTY = 1 << 6;
        const ELAPSED_REAL_TIME = 1 << 7;
    }
}

impl ClockFlags {
    /// Flags required to derive the measurement instant from UTC time
    pub const UTC_RECONCILIATION: Self = Self::LEAP_SECOND
        .union(Self::FULL_BIAS)
        .union(Self::BIAS)
        .union(Self::BIAS_UNCERTAINTY);
}
