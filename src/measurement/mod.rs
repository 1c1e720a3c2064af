//! Engine (vendor neutral) measurement snapshot
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::SNAPSHOT_MAX_MEASUREMENTS, prelude::Constellation};

mod code;
mod flags;

pub use code::CodeType;
pub use flags::{AdrStateMask, ClockFlags, MeasurementFlags, StateMask};

/// Multipath condition of a signal, as estimated by the engine
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MultipathIndicator {
    #[default]
    Unknown,
    /// Multipath detected
    Present,
    /// No multipath detected
    NotPresent,
}

/// Signal the inter signal biases of a snapshot are expressed against.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceSignal {
    /// [Constellation] of the reference signal, None when unknown
    pub sv_type: Option<Constellation>,
    /// Carrier frequency (Hz)
    pub carrier_frequency_hz: f64,
    /// Ranging [CodeType]
    pub code_type: CodeType,
    /// Free-text code name, only meaningful with [CodeType::Other]
    pub other_code_type_name: String,
}

impl ReferenceSignal {
    /// Builds a new [ReferenceSignal]
    pub fn new(sv_type: Constellation, carrier_frequency_hz: f64, code_type: CodeType) -> Self {
        Self {
            sv_type: Some(sv_type),
            carrier_frequency_hz,
            code_type,
            other_code_type_name: Default::default(),
        }
    }

    /// Copies and returns [ReferenceSignal] with a free-text code name
    pub fn with_other_code_type(&self, name: &str) -> Self {
        let mut s = self.clone();
        s.code_type = CodeType::Other;
        s.other_code_type_name = name.to_string();
        s
    }
}

/// Single signal [Measurement]. Numeric fields are gated by
/// [MeasurementFlags]: a field whose bit is not set must not be used.
/// The `with_` builders set value and presence bit together.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Presence mask
    pub flags: MeasurementFlags,
    /// Satellite identifier, in engine numbering
    pub sv_id: u16,
    /// [Constellation], None when unknown
    pub sv_type: Option<Constellation>,
    /// GLONASS frequency channel number
    pub glo_frequency: u8,
    /// Time offset at which the measurement was taken (ns)
    pub time_offset_ns: f64,
    /// Tracking state
    pub state: StateMask,
    /// Received satellite time (ns)
    pub received_sv_time_ns: i64,
    /// Received satellite time uncertainty (ns)
    pub received_sv_time_uncertainty_ns: i64,
    /// Carrier to noise density at the antenna (dB-Hz)
    pub carrier_to_noise_dbhz: f64,
    /// Carrier to noise density at the baseband (dB-Hz)
    pub baseband_carrier_to_noise_dbhz: f64,
    /// Pseudo range rate (m.s⁻¹)
    pub pseudorange_rate_mps: f64,
    /// Pseudo range rate uncertainty (m.s⁻¹)
    pub pseudorange_rate_uncertainty_mps: f64,
    /// Accumulated delta range state
    pub adr_state: AdrStateMask,
    /// Accumulated delta range (m)
    pub adr_m: f64,
    /// Accumulated delta range uncertainty (m)
    pub adr_uncertainty_m: f64,
    /// Carrier frequency (Hz)
    pub carrier_frequency_hz: f64,
    /// Full carrier cycles count
    pub carrier_cycles: i64,
    /// Fractional carrier phase (cycles)
    pub carrier_phase: f64,
    /// Carrier phase uncertainty (cycles)
    pub carrier_phase_uncertainty: f64,
    /// [MultipathIndicator]
    pub multipath: MultipathIndicator,
    /// Signal to noise ratio (dB)
    pub snr_db: f64,
    /// Automatic gain control level (dB)
    pub agc_level_db: f64,
    /// Ranging [CodeType]
    pub code_type: CodeType,
    /// Free-text code name, only meaningful with [CodeType::Other]
    pub other_code_type_name: String,
    /// Full inter signal bias (ns)
    pub full_isb_ns: f64,
    /// Full inter signal bias uncertainty (ns)
    pub full_isb_uncertainty_ns: f64,
    /// Satellite inter signal bias (ns)
    pub satellite_isb_ns: f64,
    /// Satellite inter signal bias uncertainty (ns)
    pub satellite_isb_uncertainty_ns: f64,
}

impl Measurement {
    /// Creates a new [Measurement] for given satellite,
    /// expressed in engine numbering.
    pub fn new(sv_type: Constellation, sv_id: u16) -> Self {
        Self {
            sv_id,
            sv_type: Some(sv_type),
            flags: MeasurementFlags::SV_ID | MeasurementFlags::SV_TYPE,
            ..Default::default()
        }
    }

    /// Copies and returns [Measurement] with GLONASS frequency channel
    pub fn with_glo_frequency(&self, fcn: u8) -> Self {
        let mut s = self.clone();
        s.glo_frequency = fcn;
        s
    }

    /// Copies and returns [Measurement] with tracking state
    pub fn with_state(&self, state: StateMask) -> Self {
        let mut s = self.clone();
        s.state = state;
        s.flags |= MeasurementFlags::STATE;
        s
    }

    /// Copies and returns [Measurement] with received satellite time (ns)
    pub fn with_received_sv_time(&self, time_ns: i64, uncertainty_ns: i64) -> Self {
        let mut s = self.clone();
        s.received_sv_time_ns = time_ns;
        s.received_sv_time_uncertainty_ns = uncertainty_ns;
        s.flags |= MeasurementFlags::RECEIVED_SV_TIME;
        s.flags |= MeasurementFlags::RECEIVED_SV_TIME_UNCERTAINTY;
        s
    }

    /// Copies and returns [Measurement] with antenna C/N0 (dB-Hz)
    pub fn with_cn0(&self, cn0_dbhz: f64) -> Self {
        let mut s = self.clone();
        s.carrier_to_noise_dbhz = cn0_dbhz;
        s.flags |= MeasurementFlags::CARRIER_TO_NOISE;
        s
    }

    /// Copies and returns [Measurement] with baseband C/N0 (dB-Hz)
    pub fn with_baseband_cn0(&self, cn0_dbhz: f64) -> Self {
        let mut s = self.clone();
        s.baseband_carrier_to_noise_dbhz = cn0_dbhz;
        s
    }

    /// Copies and returns [Measurement] with pseudo range rate (m.s⁻¹)
    pub fn with_pseudorange_rate(&self, rate_mps: f64, uncertainty_mps: f64) -> Self {
        let mut s = self.clone();
        s.pseudorange_rate_mps = rate_mps;
        s.pseudorange_rate_uncertainty_mps = uncertainty_mps;
        s.flags |= MeasurementFlags::PSEUDORANGE_RATE;
        s.flags |= MeasurementFlags::PSEUDORANGE_RATE_UNCERTAINTY;
        s
    }

    /// Copies and returns [Measurement] with accumulated delta range
    pub fn with_adr(&self, state: AdrStateMask, adr_m: f64, uncertainty_m: f64) -> Self {
        let mut s = self.clone();
        s.adr_state = state;
        s.adr_m = adr_m;
        s.adr_uncertainty_m = uncertainty_m;
        s.flags |= MeasurementFlags::ADR_STATE | MeasurementFlags::ADR;
        s.flags |= MeasurementFlags::ADR_UNCERTAINTY;
        s
    }

    /// Copies and returns [Measurement] with carrier frequency (Hz)
    pub fn with_carrier_frequency(&self, frequency_hz: f64) -> Self {
        let mut s = self.clone();
        s.carrier_frequency_hz = frequency_hz;
        s.flags |= MeasurementFlags::CARRIER_FREQUENCY;
        s
    }

    /// Copies and returns [Measurement] with carrier cycles count
    pub fn with_carrier_cycles(&self, cycles: i64) -> Self {
        let mut s = self.clone();
        s.carrier_cycles = cycles;
        s.flags |= MeasurementFlags::CARRIER_CYCLES;
        s
    }

    /// Copies and returns [Measurement] with fractional carrier phase
    /// and its uncertainty (cycles)
    pub fn with_carrier_phase(&self, phase: f64, uncertainty: f64) -> Self {
        let mut s = self.clone();
        s.carrier_phase = phase;
        s.carrier_phase_uncertainty = uncertainty;
        s.flags |= MeasurementFlags::CARRIER_PHASE;
        s.flags |= MeasurementFlags::CARRIER_PHASE_UNCERTAINTY;
        s
    }

    /// Copies and returns [Measurement] with [MultipathIndicator]
    pub fn with_multipath(&self, multipath: MultipathIndicator) -> Self {
        let mut s = self.clone();
        s.multipath = multipath;
        s.flags |= MeasurementFlags::MULTIPATH_INDICATOR;
        s
    }

    /// Copies and returns [Measurement] with SNR (dB)
    pub fn with_snr(&self, snr_db: f64) -> Self {
        let mut s = self.clone();
        s.snr_db = snr_db;
        s.flags |= MeasurementFlags::SIGNAL_TO_NOISE_RATIO;
        s
    }

    /// Copies and returns [Measurement] with AGC level (dB)
    pub fn with_agc_level(&self, agc_db: f64) -> Self {
        let mut s = self.clone();
        s.agc_level_db = agc_db;
        s.flags |= MeasurementFlags::AUTOMATIC_GAIN_CONTROL;
        s
    }

    /// Copies and returns [Measurement] with [CodeType]
    pub fn with_code_type(&self, code_type: CodeType) -> Self {
        let mut s = self.clone();
        s.code_type = code_type;
        s
    }

    /// Copies and returns [Measurement] with free-text code name
    /// ([CodeType::Other])
    pub fn with_other_code_type(&self, name: &str) -> Self {
        let mut s = self.clone();
        s.code_type = CodeType::Other;
        s.other_code_type_name = name.to_string();
        s
    }

    /// Copies and returns [Measurement] with full inter signal bias (ns)
    pub fn with_full_isb(&self, isb_ns: f64) -> Self {
        let mut s = self.clone();
        s.full_isb_ns = isb_ns;
        s.flags |= MeasurementFlags::FULL_ISB;
        s
    }

    /// Copies and returns [Measurement] with full inter signal bias uncertainty (ns)
    pub fn with_full_isb_uncertainty(&self, uncertainty_ns: f64) -> Self {
        let mut s = self.clone();
        s.full_isb_uncertainty_ns = uncertainty_ns;
        s.flags |= MeasurementFlags::FULL_ISB_UNCERTAINTY;
        s
    }

    /// Copies and returns [Measurement] with satellite inter signal bias (ns)
    pub fn with_satellite_isb(&self, isb_ns: f64) -> Self {
        let mut s = self.clone();
        s.satellite_isb_ns = isb_ns;
        s.flags |= MeasurementFlags::SATELLITE_ISB;
        s
    }

    /// Copies and returns [Measurement] with satellite inter signal bias uncertainty (ns)
    pub fn with_satellite_isb_uncertainty(&self, uncertainty_ns: f64) -> Self {
        let mut s = self.clone();
        s.satellite_isb_uncertainty_ns = uncertainty_ns;
        s.flags |= MeasurementFlags::SATELLITE_ISB_UNCERTAINTY;
        s
    }
}

/// Receiver [Clock] state, one per [Snapshot].
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Clock {
    /// Presence mask
    pub flags: ClockFlags,
    /// Leap second (s)
    pub leap_second: i16,
    /// Receiver clock (ns)
    pub time_ns: i64,
    /// Receiver clock uncertainty (ns)
    pub time_uncertainty_ns: f64,
    /// Difference between receiver clock and GPS time (ns)
    pub full_bias_ns: i64,
    /// Sub nanosecond bias (ns)
    pub bias_ns: f64,
    /// Bias uncertainty (ns)
    pub bias_uncertainty_ns: f64,
    /// Clock drift (ns.s⁻¹)
    pub drift_nsps: f64,
    /// Clock drift uncertainty (ns.s⁻¹)
    pub drift_uncertainty_nsps: f64,
    /// Hardware clock discontinuity counter
    pub hw_clock_discontinuity_count: u32,
    /// Engine tick counter, sampled at the measurement instant
    pub elapsed_real_time: u64,
    /// Uncertainty of the elapsed real time sample (ns)
    pub elapsed_real_time_uncertainty_ns: u64,
    /// Signal the inter signal biases are expressed against
    pub reference_signal_for_isb: ReferenceSignal,
}

impl Clock {
    /// Creates a new [Clock] with receiver time (ns)
    pub fn new(time_ns: i64) -> Self {
        Self {
            time_ns,
            ..Default::default()
        }
    }

    /// Copies and returns [Clock] with leap second
    pub fn with_leap_second(&self, leap_second: i16) -> Self {
        let mut s = self.clone();
        s.leap_second = leap_second;
        s.flags |= ClockFlags::LEAP_SECOND;
        s
    }

    /// Copies and returns [Clock] with time uncertainty (ns)
    pub fn with_time_uncertainty(&self, uncertainty_ns: f64) -> Self {
        let mut s = self.clone();
        s.time_uncertainty_ns = uncertainty_ns;
        s.flags |= ClockFlags::TIME_UNCERTAINTY;
        s
    }

    /// Copies and returns [Clock] with full bias, sub nanosecond bias
    /// and bias uncertainty (ns)
    pub fn with_bias(&self, full_bias_ns: i64, bias_ns: f64, uncertainty_ns: f64) -> Self {
        let mut s = self.clone();
        s.full_bias_ns = full_bias_ns;
        s.bias_ns = bias_ns;
        s.bias_uncertainty_ns = uncertainty_ns;
        s.flags |= ClockFlags::FULL_BIAS | ClockFlags::BIAS;
        s.flags |= ClockFlags::BIAS_UNCERTAINTY;
        s
    }

    /// Copies and returns [Clock] with drift and its uncertainty (ns.s⁻¹)
    pub fn with_drift(&self, drift_nsps: f64, uncertainty_nsps: f64) -> Self {
        let mut s = self.clone();
        s.drift_nsps = drift_nsps;
        s.drift_uncertainty_nsps = uncertainty_nsps;
        s.flags |= ClockFlags::DRIFT | ClockFlags::DRIFT_UNCERTAINTY;
        s
    }

    /// Copies and returns [Clock] with hardware discontinuity counter
    pub fn with_discontinuity_count(&self, count: u32) -> Self {
        let mut s = self.clone();
        s.hw_clock_discontinuity_count = count;
        s
    }

    /// Copies and returns [Clock] with engine tick sample and its uncertainty (ns)
    pub fn with_elapsed_real_time(&self, ticks: u64, uncertainty_ns: u64) -> Self {
        let mut s = self.clone();
        s.elapsed_real_time = ticks;
        s.elapsed_real_time_uncertainty_ns = uncertainty_ns;
        s.flags |= ClockFlags::ELAPSED_REAL_TIME;
        s
    }

    /// Copies and returns [Clock] with ISB [ReferenceSignal]
    pub fn with_reference_signal(&self, signal: ReferenceSignal) -> Self {
        let mut s = self.clone();
        s.reference_signal_for_isb = signal;
        s
    }
}

/// [Snapshot] gathers all measurements of one reporting cycle
/// and the receiver [Clock] state. Measurements are kept in insertion
/// order and never exceed [SNAPSHOT_MAX_MEASUREMENTS].
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    measurements: Vec<Measurement>,
    /// Receiver [Clock]
    pub clock: Clock,
}

impl Snapshot {
    /// Builds a new [Snapshot] from a list of [Measurement]s.
    /// Entries beyond [SNAPSHOT_MAX_MEASUREMENTS] are dropped.
    pub fn new(clock: Clock, measurements: Vec<Measurement>) -> Self {
        let mut measurements = measurements;

        if measurements.len() > SNAPSHOT_MAX_MEASUREMENTS {
            warn!(
                "snapshot: too many measurements {}, dropping {}",
                measurements.len(),
                measurements.len() - SNAPSHOT_MAX_MEASUREMENTS
            );
            measurements.truncate(SNAPSHOT_MAX_MEASUREMENTS);
        }

        Self {
            clock,
            measurements,
        }
    }

    /// Appends a [Measurement]. Returns false when the [Snapshot]
    /// is full and the measurement was dropped.
    pub fn push(&mut self, measurement: Measurement) -> bool {
        if self.measurements.len() < SNAPSHOT_MAX_MEASUREMENTS {
            self.measurements.push(measurement);
            true
        } else {
            warn!("snapshot: full, dropping measurement ({})", measurement.sv_id);
            false
        }
    }

    /// Measurements, in insertion order
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// True if this [Snapshot] has no measurement
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}
