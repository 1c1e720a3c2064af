//! V2.1 measurement interface: inter signal biases
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    prelude::{Clock, Measurement, MeasurementFlags, ReferenceSignal, Snapshot, Version},
    schema::{
        capped, gated,
        v1_0,
        v2_0::{self, ElapsedRealtime},
    },
    translate,
};

bitflags! {
    /// Presence mask of a V2.1 [GnssMeasurement]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GnssMeasurementFlags: u32 {
        const HAS_SNR = 1 << 0;
        const HAS_CARRIER_FREQUENCY = 1 << 9;
        const HAS_CARRIER_CYCLES = 1 << 10;
        const HAS_CARRIER_PHASE = 1 << 11;
        const HAS_CARRIER_PHASE_UNCERTAINTY = 1 << 12;
        const HAS_AUTOMATIC_GAIN_CONTROL = 1 << 13;
        const HAS_FULL_ISB = 1 << 16;
        const HAS_FULL_ISB_UNCERTAINTY = 1 << 17;
        const HAS_SATELLITE_ISB = 1 << 18;
        const HAS_SATELLITE_ISB_UNCERTAINTY = 1 << 19;
    }
}

/// Signal description, used as inter signal bias reference
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssSignalType {
    pub constellation: v2_0::GnssConstellationType,
    pub carrier_frequency_hz: f64,
    pub code_type: String,
}

impl GnssSignalType {
    pub fn compose(signal: &ReferenceSignal) -> Self {
        Self {
            constellation: translate::constellation_v2_0(signal.sv_type),
            carrier_frequency_hz: signal.carrier_frequency_hz,
            code_type: translate::code_type(signal.code_type, &signal.other_code_type_name),
        }
    }
}

/// V2.1 [GnssMeasurement]. Each bias term is only present along its flag.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssMeasurement {
    pub v2_0: v2_0::GnssMeasurement,
    pub flags: GnssMeasurementFlags,
    pub full_inter_signal_bias_ns: f64,
    pub full_inter_signal_bias_uncertainty_ns: f64,
    pub satellite_inter_signal_bias_ns: f64,
    pub satellite_inter_signal_bias_uncertainty_ns: f64,
    pub baseband_cn0_dbhz: f64,
}

impl GnssMeasurement {
    pub fn compose(m: &Measurement) -> Self {
        Self {
            v2_0: v2_0::GnssMeasurement::compose(m),
            flags: translate::measurement_flags_v2_1(m.flags),
            full_inter_signal_bias_ns: gated(m.flags, MeasurementFlags::FULL_ISB, m.full_isb_ns),
            full_inter_signal_bias_uncertainty_ns: gated(
                m.flags,
                MeasurementFlags::FULL_ISB_UNCERTAINTY,
                m.full_isb_uncertainty_ns,
            ),
            satellite_inter_signal_bias_ns: gated(
                m.flags,
                MeasurementFlags::SATELLITE_ISB,
                m.satellite_isb_ns,
            ),
            satellite_inter_signal_bias_uncertainty_ns: gated(
                m.flags,
                MeasurementFlags::SATELLITE_ISB_UNCERTAINTY,
                m.satellite_isb_uncertainty_ns,
            ),
            baseband_cn0_dbhz: m.baseband_carrier_to_noise_dbhz,
        }
    }
}

/// V2.1 [GnssClock]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssClock {
    pub v1_0: v1_0::GnssClock,
    pub reference_signal_type_for_isb: GnssSignalType,
}

impl GnssClock {
    pub fn compose(clock: &Clock) -> Self {
        Self {
            v1_0: v1_0::GnssClock::compose(clock),
            reference_signal_type_for_isb: GnssSignalType::compose(
                &clock.reference_signal_for_isb,
            ),
        }
    }
}

/// V2.1 [GnssData]
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssData {
    pub measurements: Vec<GnssMeasurement>,
    pub clock: GnssClock,
    pub elapsed_realtime: ElapsedRealtime,
}

impl GnssData {
    /// Composes V2.1 [GnssData], with the [ElapsedRealtime]
    /// resolved by the adapter.
    pub fn compose(snapshot: &Snapshot, elapsed_realtime: ElapsedRealtime) -> Self {
        Self {
            measurements: capped(Version::V2_1, snapshot)
                .map(GnssMeasurement::compose)
                .collect(),
            clock: GnssClock::compose(&snapshot.clock),
            elapsed_realtime,
        }
    }
}
