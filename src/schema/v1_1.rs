//! V1.1 measurement interface
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    prelude::{Measurement, Snapshot, Version},
    schema::{capped, v1_0},
    translate,
};

bitflags! {
    /// V1.1 accumulated delta range state
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GnssAccumulatedDeltaRangeState: u16 {
        const ADR_STATE_VALID = 1 << 0;
        const ADR_STATE_RESET = 1 << 1;
        const ADR_STATE_CYCLE_SLIP = 1 << 2;
        const ADR_STATE_HALF_CYCLE_RESOLVED = 1 << 3;
    }
}

/// V1.1 [GnssMeasurement]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssMeasurement {
    pub v1_0: v1_0::GnssMeasurement,
    pub accumulated_delta_range_state: GnssAccumulatedDeltaRangeState,
}

impl GnssMeasurement {
    pub fn compose(m: &Measurement) -> Self {
        Self {
            v1_0: v1_0::GnssMeasurement::compose(m),
            accumulated_delta_range_state: translate::adr_state_v1_1(m.adr_state),
        }
    }
}

/// V1.1 [GnssData]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssData {
    pub measurements: Vec<GnssMeasurement>,
    pub clock: v1_0::GnssClock,
}

impl GnssData {
    pub fn compose(snapshot: &Snapshot) -> Self {
        Self {
            measurements: capped(Version::V1_1, snapshot)
                .map(GnssMeasurement::compose)
                .collect(),
            clock: v1_0::GnssClock::compose(&snapshot.clock),
        }
    }
}
