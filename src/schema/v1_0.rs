//! V1.0 measurement interface
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    prelude::{Clock, Measurement, MeasurementFlags, Snapshot, Version},
    schema::{capped, gated},
    translate,
};

bitflags! {
    /// Presence mask of a V1.0 [GnssMeasurement]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GnssMeasurementFlags: u32 {
        const HAS_SNR = 1 << 0;
        const HAS_CARRIER_FREQUENCY = 1 << 9;
        const HAS_CARRIER_CYCLES = 1 << 10;
        const HAS_CARRIER_PHASE = 1 << 11;
        const HAS_CARRIER_PHASE_UNCERTAINTY = 1 << 12;
        const HAS_AUTOMATIC_GAIN_CONTROL = 1 << 13;
    }
}

bitflags! {
    /// V1.0 signal tracking state
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
    }
}

bitflags! {
    /// V1.0 accumulated delta range state
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GnssAccumulatedDeltaRangeState: u16 {
        const ADR_STATE_VALID = 1 << 0;
        const ADR_STATE_RESET = 1 << 1;
        const ADR_STATE_CYCLE_SLIP = 1 << 2;
    }
}

bitflags! {
    /// Presence mask of the [GnssClock]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GnssClockFlags: u16 {
        const HAS_LEAP_SECOND = 1 << 0;
        const HAS_TIME_UNCERTAINTY = 1 << 1;
        const HAS_FULL_BIAS = 1 << 2;
        const HAS_BIAS = 1 << 3;
        const HAS_BIAS_UNCERTAINTY = 1 << 4;
        const HAS_DRIFT = 1 << 5;
        const HAS_DRIFT_UNCERTAINTY = 1 << 6;
    }
}

/// V1.0 constellation identifier
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
}


/// V1.0 multipath indicator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GnssMultipathIndicator {
    #[default]
    IndicatorUnknown,
    IndicatorPresent,
    IndicatorNotPresent,
}

/// V1.0 [GnssMeasurement]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssMeasurement {
    pub flags: GnssMeasurementFlags,
    pub svid: i16,
    pub constellation: GnssConstellationType,
    pub time_offset_ns: f64,
    pub state: GnssMeasurementState,
    pub received_sv_time_in_ns: i64,
    pub received_sv_time_uncertainty_in_ns: i64,
    pub c_n0_dbhz: f64,
    pub pseudorange_rate_mps: f64,
    pub pseudorange_rate_uncertainty_mps: f64,
    pub accumulated_delta_range_state: GnssAccumulatedDeltaRangeState,
    pub accumulated_delta_range_m: f64,
    pub accumulated_delta_range_uncertainty_m: f64,
    pub carrier_frequency_hz: f32,
    pub carrier_cycles: i64,
    pub carrier_phase: f64,
    pub carrier_phase_uncertainty: f64,
    pub multipath_indicator: GnssMultipathIndicator,
    pub snr_db: f64,
    pub agc_level_db: f64,
}

impl GnssMeasurement {
    /// Composes the V1.0 [GnssMeasurement]. Optional fields are only
    /// copied along their presence bit.
    pub fn compose(m: &Measurement) -> Self {
        Self {
            flags: translate::measurement_flags_v1_0(m.flags),
            svid: translate::svid(m),
            constellation: translate::constellation_v1_0(m.sv_type),
            time_offset_ns: m.time_offset_ns,
            state: translate::state_v1_0(m.state),
            received_sv_time_in_ns: m.received_sv_time_ns,
            received_sv_time_uncertainty_in_ns: m.received_sv_time_uncertainty_ns,
            c_n0_dbhz: m.carrier_to_noise_dbhz,
            pseudorange_rate_mps: m.pseudorange_rate_mps,
            pseudorange_rate_uncertainty_mps: m.pseudorange_rate_uncertainty_mps,
            accumulated_delta_range_state: translate::adr_state_v1_0(m.adr_state),
            accumulated_delta_range_m: m.adr_m,
            accumulated_delta_range_uncertainty_m: m.adr_uncertainty_m,
            carrier_frequency_hz: gated(
                m.flags,
                MeasurementFlags::CARRIER_FREQUENCY,
                m.carrier_frequency_hz as f32,
            ),
            carrier_cycles: gated(m.flags, MeasurementFlags::CARRIER_CYCLES, m.carrier_cycles),
            carrier_phase: gated(m.flags, MeasurementFlags::CARRIER_PHASE, m.carrier_phase),
            carrier_phase_uncertainty: gated(
                m.flags,
                MeasurementFlags::CARRIER_PHASE_UNCERTAINTY,
                m.carrier_phase_uncertainty,
            ),
            multipath_indicator: translate::multipath_v1_0(m.multipath),
            snr_db: gated(m.flags, MeasurementFlags::SIGNAL_TO_NOISE_RATIO, m.snr_db),
            agc_level_db: gated(
                m.flags,
                MeasurementFlags::AUTOMATIC_GAIN_CONTROL,
                m.agc_level_db,
            ),
        }
    }
}

/// [GnssClock] shared by all interface versions
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssClock {
    pub gnss_clock_flags: GnssClockFlags,
    pub leap_second: i16,
    pub time_ns: i64,
    pub time_uncertainty_ns: f64,
    pub full_bias_ns: i64,
    pub bias_ns: f64,
    pub bias_uncertainty_ns: f64,
    pub drift_nsps: f64,
    pub drift_uncertainty_nsps: f64,
    pub hw_clock_discontinuity_count: u32,
}

impl GnssClock {
    /// Composes the [GnssClock]
    pub fn compose(clock: &Clock) -> Self {
        Self {
            gnss_clock_flags: translate::clock_flags(clock.flags),
            leap_second: clock.leap_second,
            time_ns: clock.time_ns,
            time_uncertainty_ns: clock.time_uncertainty_ns,
            full_bias_ns: clock.full_bias_ns,
            bias_ns: clock.bias_ns,
            bias_uncertainty_ns: clock.bias_uncertainty_ns,
            drift_nsps: clock.drift_nsps,
            drift_uncertainty_nsps: clock.drift_uncertainty_nsps,
            hw_clock_discontinuity_count: clock.hw_clock_discontinuity_count,
        }
    }
}

/// V1.0 [GnssData]: at most [Version::max_measurements] measurements
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssData {
    pub measurement_count: u32,
    pub measurements: Vec<GnssMeasurement>,
    pub clock: GnssClock,
}

impl GnssData {
    /// Composes V1.0 [GnssData]. Measurements beyond the V1.0 capacity
    /// are dropped.
    pub fn compose(snapshot: &Snapshot) -> Self {
        let measurements = capped(Version::V1_0, snapshot)
            .map(GnssMeasurement::compose)
            .collect::<Vec<_>>();

        Self {
            measurement_count: measurements.len() as u32,
            measurements,
            clock: GnssClock::compose(&snapshot.clock),
        }
    }
}
