//! Engine to client translation: bit masks, enums and code names.
//!
//! Bit masks are translated through tables of `(engine bit, client bit)`
//! pairs. Engine bits missing from a table do not exist in that interface
//! version and are dropped. The widest table of each concept is checked
//! at compile time to cover every engine bit.
use bitflags::Flags;

use crate::{
    constants::{
        BDS_SV_PRN_MIN, GAL_SV_PRN_MIN, GLO_FCN_OFFSET, GLO_SV_PRN_MIN, GLO_UNKNOWN_SLOT,
        MAX_CODE_TYPE_NAME_LEN, NAVIC_SV_PRN_MIN,
    },
    prelude::{
        AdrStateMask, ClockFlags, CodeType, Constellation, Measurement, MeasurementFlags,
        MultipathIndicator, StateMask,
    },
    schema::{v1_0, v1_1, v2_0, v2_1},
};

/// Verifies at compile time that a table covers every bit of its engine type,
/// `except` for bits that have no client counterpart.
macro_rules! assert_covers_all {
    ($table:expr, $engine:ty) => {
        assert_covers_all!($table, $engine, <$engine>::empty());
    };
    ($table:expr, $engine:ty, $except:expr) => {
        const _: () = {
            let mut bits = $except.bits();
            let mut i = 0;
            while i < $table.len() {
                bits |= $table[i].0.bits();
                i += 1;
            }
            assert!(
                bits == <$engine>::all().bits(),
                "translation table does not cover every engine bit"
            );
        };
    };
}

/// Translation table: pairs of `(engine bit, client bit)`
pub type BitTable<I, E> = &'static [(I, E)];

/// Translates `mask` through `table`
pub fn map_bits<I: Flags + Copy, E: Flags + Copy>(table: &[(I, E)], mask: I) -> E {
    table
        .iter()
        .filter(|(engine, _)| mask.contains(*engine))
        .fold(E::empty(), |acc, (_, client)| acc.union(*client))
}

/// Translates a client `mask` back through `table`
pub fn unmap_bits<I: Flags + Copy, E: Flags + Copy>(table: &[(I, E)], mask: E) -> I {
    table
        .iter()
        .filter(|(_, client)| mask.contains(*client))
        .fold(I::empty(), |acc, (engine, _)| acc.union(*engine))
}

/// Measurement presence bits known to V1.0 (up to V2.0)
pub const MEASUREMENT_FLAGS_V1_0: BitTable<MeasurementFlags, v1_0::GnssMeasurementFlags> = &[
    (
        MeasurementFlags::SIGNAL_TO_NOISE_RATIO,
        v1_0::GnssMeasurementFlags::HAS_SNR,
    ),
    (
        MeasurementFlags::CARRIER_FREQUENCY,
        v1_0::GnssMeasurementFlags::HAS_CARRIER_FREQUENCY,
    ),
    (
        MeasurementFlags::CARRIER_CYCLES,
        v1_0::GnssMeasurementFlags::HAS_CARRIER_CYCLES,
    ),
    (
        MeasurementFlags::CARRIER_PHASE,
        v1_0::GnssMeasurementFlags::HAS_CARRIER_PHASE,
    ),
    (
        MeasurementFlags::CARRIER_PHASE_UNCERTAINTY,
        v1_0::GnssMeasurementFlags::HAS_CARRIER_PHASE_UNCERTAINTY,
    ),
    (
        MeasurementFlags::AUTOMATIC_GAIN_CONTROL,
        v1_0::GnssMeasurementFlags::HAS_AUTOMATIC_GAIN_CONTROL,
    ),
];

/// Measurement presence bits known to V2.1
pub const MEASUREMENT_FLAGS_V2_1: BitTable<MeasurementFlags, v2_1::GnssMeasurementFlags> = &[
    (
        MeasurementFlags::SIGNAL_TO_NOISE_RATIO,
        v2_1::GnssMeasurementFlags::HAS_SNR,
    ),
    (
        MeasurementFlags::CARRIER_FREQUENCY,
        v2_1::GnssMeasurementFlags::HAS_CARRIER_FREQUENCY,
    ),
    (
        MeasurementFlags::CARRIER_CYCLES,
        v2_1::GnssMeasurementFlags::HAS_CARRIER_CYCLES,
    ),
    (
        MeasurementFlags::CARRIER_PHASE,
        v2_1::GnssMeasurementFlags::HAS_CARRIER_PHASE,
    ),
    (
        MeasurementFlags::CARRIER_PHASE_UNCERTAINTY,
        v2_1::GnssMeasurementFlags::HAS_CARRIER_PHASE_UNCERTAINTY,
    ),
    (
        MeasurementFlags::AUTOMATIC_GAIN_CONTROL,
        v2_1::GnssMeasurementFlags::HAS_AUTOMATIC_GAIN_CONTROL,
    ),
    (
        MeasurementFlags::FULL_ISB,
        v2_1::GnssMeasurementFlags::HAS_FULL_ISB,
    ),
    (
        MeasurementFlags::FULL_ISB_UNCERTAINTY,
        v2_1::GnssMeasurementFlags::HAS_FULL_ISB_UNCERTAINTY,
    ),
    (
        MeasurementFlags::SATELLITE_ISB,
        v2_1::GnssMeasurementFlags::HAS_SATELLITE_ISB,
    ),
    (
        MeasurementFlags::SATELLITE_ISB_UNCERTAINTY,
        v2_1::GnssMeasurementFlags::HAS_SATELLITE_ISB_UNCERTAINTY,
    ),
];

/// Tracking state bits known to V1.0
pub const STATE_V1_0: BitTable<StateMask, v1_0::GnssMeasurementState> = &[
    (StateMask::CODE_LOCK, v1_0::GnssMeasurementState::STATE_CODE_LOCK),
    (StateMask::BIT_SYNC, v1_0::GnssMeasurementState::STATE_BIT_SYNC),
    (
        StateMask::SUBFRAME_SYNC,
        v1_0::GnssMeasurementState::STATE_SUBFRAME_SYNC,
    ),
    (
        StateMask::TOW_DECODED,
        v1_0::GnssMeasurementState::STATE_TOW_DECODED,
    ),
    (
        StateMask::MSEC_AMBIGUOUS,
        v1_0::GnssMeasurementState::STATE_MSEC_AMBIGUOUS,
    ),
    (
        StateMask::SYMBOL_SYNC,
        v1_0::GnssMeasurementState::STATE_SYMBOL_SYNC,
    ),
    (
        StateMask::GLO_STRING_SYNC,
        v1_0::GnssMeasurementState::STATE_GLO_STRING_SYNC,
    ),
    (
        StateMask::GLO_TOD_DECODED,
        v1_0::GnssMeasurementState::STATE_GLO_TOD_DECODED,
    ),
    (
        StateMask::BDS_D2_BIT_SYNC,
        v1_0::GnssMeasurementState::STATE_BDS_D2_BIT_SYNC,
    ),
    (
        StateMask::BDS_D2_SUBFRAME_SYNC,
        v1_0::GnssMeasurementState::STATE_BDS_D2_SUBFRAME_SYNC,
    ),
    (
        StateMask::GAL_E1BC_CODE_LOCK,
        v1_0::GnssMeasurementState::STATE_GAL_E1BC_CODE_LOCK,
    ),
    (
        StateMask::GAL_E1C_2ND_CODE_LOCK,
        v1_0::GnssMeasurementState::STATE_GAL_E1C_2ND_CODE_LOCK,
    ),
    (
        StateMask::GAL_E1B_PAGE_SYNC,
        v1_0::GnssMeasurementState::STATE_GAL_E1B_PAGE_SYNC,
    ),
    (StateMask::SBAS_SYNC, v1_0::GnssMeasurementState::STATE_SBAS_SYNC),
];

/// Tracking state bits known to V2.0 (and V2.1)
pub const STATE_V2_0: BitTable<StateMask, v2_0::GnssMeasurementState> = &[
    (StateMask::CODE_LOCK, v2_0::GnssMeasurementState::STATE_CODE_LOCK),
    (StateMask::BIT_SYNC, v2_0::GnssMeasurementState::STATE_BIT_SYNC),
    (
        StateMask::SUBFRAME_SYNC,
        v2_0::GnssMeasurementState::STATE_SUBFRAME_SYNC,
    ),
    (
        StateMask::TOW_DECODED,
        v2_0::GnssMeasurementState::STATE_TOW_DECODED,
    ),
    (
        StateMask::MSEC_AMBIGUOUS,
        v2_0::GnssMeasurementState::STATE_MSEC_AMBIGUOUS,
    ),
    (
        StateMask::SYMBOL_SYNC,
        v2_0::GnssMeasurementState::STATE_SYMBOL_SYNC,
    ),
    (
        StateMask::GLO_STRING_SYNC,
        v2_0::GnssMeasurementState::STATE_GLO_STRING_SYNC,
    ),
    (
        StateMask::GLO_TOD_DECODED,
        v2_0::GnssMeasurementState::STATE_GLO_TOD_DECODED,
    ),
    (
        StateMask::BDS_D2_BIT_SYNC,
        v2_0::GnssMeasurementState::STATE_BDS_D2_BIT_SYNC,
    ),
    (
        StateMask::BDS_D2_SUBFRAME_SYNC,
        v2_0::GnssMeasurementState::STATE_BDS_D2_SUBFRAME_SYNC,
    ),
    (
        StateMask::GAL_E1BC_CODE_LOCK,
        v2_0::GnssMeasurementState::STATE_GAL_E1BC_CODE_LOCK,
    ),
    (
        StateMask::GAL_E1C_2ND_CODE_LOCK,
        v2_0::GnssMeasurementState::STATE_GAL_E1C_2ND_CODE_LOCK,
    ),
    (
        StateMask::GAL_E1B_PAGE_SYNC,
        v2_0::GnssMeasurementState::STATE_GAL_E1B_PAGE_SYNC,
    ),
    (StateMask::SBAS_SYNC, v2_0::GnssMeasurementState::STATE_SBAS_SYNC),
    (StateMask::TOW_KNOWN, v2_0::GnssMeasurementState::STATE_TOW_KNOWN),
    (
        StateMask::GLO_TOD_KNOWN,
        v2_0::GnssMeasurementState::STATE_GLO_TOD_KNOWN,
    ),
    (
        StateMask::SECOND_CODE_LOCK,
        v2_0::GnssMeasurementState::STATE_2ND_CODE_LOCK,
    ),
];

/// ADR state bits known to V1.0
pub const ADR_STATE_V1_0: BitTable<AdrStateMask, v1_0::GnssAccumulatedDeltaRangeState> = &[
    (
        AdrStateMask::VALID,
        v1_0::GnssAccumulatedDeltaRangeState::ADR_STATE_VALID,
    ),
    (
        AdrStateMask::RESET,
        v1_0::GnssAccumulatedDeltaRangeState::ADR_STATE_RESET,
    ),
    (
        AdrStateMask::CYCLE_SLIP,
        v1_0::GnssAccumulatedDeltaRangeState::ADR_STATE_CYCLE_SLIP,
    ),
];

/// ADR state bits known to V1.1 and later
pub const ADR_STATE_V1_1: BitTable<AdrStateMask, v1_1::GnssAccumulatedDeltaRangeState> = &[
    (
        AdrStateMask::VALID,
        v1_1::GnssAccumulatedDeltaRangeState::ADR_STATE_VALID,
    ),
    (
        AdrStateMask::RESET,
        v1_1::GnssAccumulatedDeltaRangeState::ADR_STATE_RESET,
    ),
    (
        AdrStateMask::CYCLE_SLIP,
        v1_1::GnssAccumulatedDeltaRangeState::ADR_STATE_CYCLE_SLIP,
    ),
    (
        AdrStateMask::HALF_CYCLE_RESOLVED,
        v1_1::GnssAccumulatedDeltaRangeState::ADR_STATE_HALF_CYCLE_RESOLVED,
    ),
];

/// Clock presence bits. [ClockFlags::ELAPSED_REAL_TIME] has no client
/// counterpart: it is consumed by the elapsed realtime resolution.
pub const CLOCK_FLAGS: BitTable<ClockFlags, v1_0::GnssClockFlags> = &[
    (ClockFlags::LEAP_SECOND, v1_0::GnssClockFlags::HAS_LEAP_SECOND),
    (
        ClockFlags::TIME_UNCERTAINTY,
        v1_0::GnssClockFlags::HAS_TIME_UNCERTAINTY,
    ),
    (ClockFlags::FULL_BIAS, v1_0::GnssClockFlags::HAS_FULL_BIAS),
    (ClockFlags::BIAS, v1_0::GnssClockFlags::HAS_BIAS),
    (
        ClockFlags::BIAS_UNCERTAINTY,
        v1_0::GnssClockFlags::HAS_BIAS_UNCERTAINTY,
    ),
    (ClockFlags::DRIFT, v1_0::GnssClockFlags::HAS_DRIFT),
    (
        ClockFlags::DRIFT_UNCERTAINTY,
        v1_0::GnssClockFlags::HAS_DRIFT_UNCERTAINTY,
    ),
];

assert_covers_all!(
    MEASUREMENT_FLAGS_V2_1,
    MeasurementFlags,
    MeasurementFlags::UNGATED
);
assert_covers_all!(STATE_V2_0, StateMask);
assert_covers_all!(ADR_STATE_V1_1, AdrStateMask);
assert_covers_all!(CLOCK_FLAGS, ClockFlags, ClockFlags::ELAPSED_REAL_TIME);

pub fn measurement_flags_v1_0(flags: MeasurementFlags) -> v1_0::GnssMeasurementFlags {
    map_bits(MEASUREMENT_FLAGS_V1_0, flags)
}

pub fn measurement_flags_v2_1(flags: MeasurementFlags) -> v2_1::GnssMeasurementFlags {
    map_bits(MEASUREMENT_FLAGS_V2_1, flags)
}

pub fn state_v1_0(state: StateMask) -> v1_0::GnssMeasurementState {
    map_bits(STATE_V1_0, state)
}

pub fn state_v2_0(state: StateMask) -> v2_0::GnssMeasurementState {
    map_bits(STATE_V2_0, state)
}

pub fn adr_state_v1_0(state: AdrStateMask) -> v1_0::GnssAccumulatedDeltaRangeState {
    map_bits(ADR_STATE_V1_0, state)
}

pub fn adr_state_v1_1(state: AdrStateMask) -> v1_1::GnssAccumulatedDeltaRangeState {
    map_bits(ADR_STATE_V1_1, state)
}

pub fn clock_flags(flags: ClockFlags) -> v1_0::GnssClockFlags {
    map_bits(CLOCK_FLAGS, flags)
}

/// Narrows a [Constellation] to V1.0. Every augmentation system is
/// reported as SBAS, IRNSS does not exist in V1.0.
pub fn constellation_v1_0(constellation: Option<Constellation>) -> v1_0::GnssConstellationType {
    match constellation_v2_0(constellation) {
        v2_0::GnssConstellationType::Gps => v1_0::GnssConstellationType::Gps,
        v2_0::GnssConstellationType::Sbas => v1_0::GnssConstellationType::Sbas,
        v2_0::GnssConstellationType::Glonass => v1_0::GnssConstellationType::Glonass,
        v2_0::GnssConstellationType::Qzss => v1_0::GnssConstellationType::Qzss,
        v2_0::GnssConstellationType::Beidou => v1_0::GnssConstellationType::Beidou,
        v2_0::GnssConstellationType::Galileo => v1_0::GnssConstellationType::Galileo,
        v2_0::GnssConstellationType::Irnss | v2_0::GnssConstellationType::Unknown => {
            v1_0::GnssConstellationType::Unknown
        },
    }
}

/// Converts a [Constellation] to V2.0 (and later).
pub fn constellation_v2_0(constellation: Option<Constellation>) -> v2_0::GnssConstellationType {
    match constellation {
        Some(Constellation::GPS) => v2_0::GnssConstellationType::Gps,
        Some(Constellation::Glonass) => v2_0::GnssConstellationType::Glonass,
        Some(Constellation::QZSS) => v2_0::GnssConstellationType::Qzss,
        Some(Constellation::BeiDou) => v2_0::GnssConstellationType::Beidou,
        Some(Constellation::Galileo) => v2_0::GnssConstellationType::Galileo,
        Some(Constellation::IRNSS) => v2_0::GnssConstellationType::Irnss,
        Some(Constellation::SBAS) => v2_0::GnssConstellationType::Sbas,
        Some(c) if c.is_sbas() => v2_0::GnssConstellationType::Sbas,
        _ => v2_0::GnssConstellationType::Unknown,
    }
}

/// Converts a V2.0 constellation back to [Constellation].
/// SBAS is reported as the generic [Constellation::SBAS].
pub fn constellation_from_v2_0(constellation: v2_0::GnssConstellationType) -> Option<Constellation> {
    match constellation {
        v2_0::GnssConstellationType::Gps => Some(Constellation::GPS),
        v2_0::GnssConstellationType::Sbas => Some(Constellation::SBAS),
        v2_0::GnssConstellationType::Glonass => Some(Constellation::Glonass),
        v2_0::GnssConstellationType::Qzss => Some(Constellation::QZSS),
        v2_0::GnssConstellationType::Beidou => Some(Constellation::BeiDou),
        v2_0::GnssConstellationType::Galileo => Some(Constellation::Galileo),
        v2_0::GnssConstellationType::Irnss => Some(Constellation::IRNSS),
        v2_0::GnssConstellationType::Unknown => None,
    }
}

pub fn multipath_v1_0(indicator: MultipathIndicator) -> v1_0::GnssMultipathIndicator {
    match indicator {
        MultipathIndicator::Unknown => v1_0::GnssMultipathIndicator::IndicatorUnknown,
        MultipathIndicator::Present => v1_0::GnssMultipathIndicator::IndicatorPresent,
        MultipathIndicator::NotPresent => v1_0::GnssMultipathIndicator::IndicatorNotPresent,
    }
}

/// Client satellite identifier: engine ids are global, clients expect
/// a number within each constellation. GLONASS satellites with unknown
/// orbit slot are identified by their frequency channel instead.
pub fn svid(m: &Measurement) -> i16 {
    let id = match m.sv_type {
        Some(Constellation::Glonass) => {
            if m.sv_id == GLO_UNKNOWN_SLOT {
                m.glo_frequency as u16 + GLO_FCN_OFFSET
            } else {
                m.sv_id.saturating_sub(GLO_SV_PRN_MIN) + 1
            }
        },
        Some(Constellation::BeiDou) => m.sv_id.saturating_sub(BDS_SV_PRN_MIN) + 1,
        Some(Constellation::Galileo) => m.sv_id.saturating_sub(GAL_SV_PRN_MIN) + 1,
        Some(Constellation::IRNSS) => m.sv_id.saturating_sub(NAVIC_SV_PRN_MIN) + 1,
        _ => m.sv_id,
    };
    i16::try_from(id).unwrap_or(i16::MAX)
}

/// Code type name: the letter itself for single letter codes,
/// the (capped) free-text name for [CodeType::Other].
/// The free-text name is ignored for any other code.
pub fn code_type(code: CodeType, other_name: &str) -> String {
    match code.letter() {
        Some(letter) => letter.to_string(),
        None => other_name.chars().take(MAX_CODE_TYPE_NAME_LEN).collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn older_tables_are_subsets() {
        for (engine, _) in STATE_V1_0 {
            assert!(STATE_V2_0.iter().any(|(e, _)| e == engine));
        }
        for (engine, _) in ADR_STATE_V1_0 {
            assert!(ADR_STATE_V1_1.iter().any(|(e, _)| e == engine));
        }
        for (engine, _) in MEASUREMENT_FLAGS_V1_0 {
            assert!(MEASUREMENT_FLAGS_V2_1.iter().any(|(e, _)| e == engine));
        }
    }

    #[test]
    fn ungated_measurement_fields() {
        let gated = MEASUREMENT_FLAGS_V2_1
            .iter()
            .fold(MeasurementFlags::empty(), |acc, (engine, _)| acc | *engine);

        assert!(gated.intersection(MeasurementFlags::UNGATED).is_empty());
        assert_eq!(gated | MeasurementFlags::UNGATED, MeasurementFlags::all());

        // ungated bits never reach the client mask
        assert!(measurement_flags_v2_1(MeasurementFlags::UNGATED).is_empty());
        assert!(measurement_flags_v1_0(MeasurementFlags::UNGATED).is_empty());
    }

    #[test]
    fn dropped_bits() {
        let state = StateMask::CODE_LOCK | StateMask::SECOND_CODE_LOCK | StateMask::TOW_KNOWN;
        assert_eq!(
            state_v1_0(state),
            v1_0::GnssMeasurementState::STATE_CODE_LOCK
        );
        assert_eq!(
            state_v2_0(state),
            v2_0::GnssMeasurementState::STATE_CODE_LOCK
                | v2_0::GnssMeasurementState::STATE_2ND_CODE_LOCK
                | v2_0::GnssMeasurementState::STATE_TOW_KNOWN
        );

        let adr = AdrStateMask::VALID | AdrStateMask::HALF_CYCLE_RESOLVED;
        assert_eq!(
            adr_state_v1_0(adr),
            v1_0::GnssAccumulatedDeltaRangeState::ADR_STATE_VALID
        );
        assert_eq!(
            adr_state_v1_1(adr),
            v1_1::GnssAccumulatedDeltaRangeState::ADR_STATE_VALID
                | v1_1::GnssAccumulatedDeltaRangeState::ADR_STATE_HALF_CYCLE_RESOLVED
        );

        assert!(clock_flags(ClockFlags::ELAPSED_REAL_TIME).is_empty());
    }
}
