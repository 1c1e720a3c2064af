#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod adapter;
mod callback;
mod cfg;
mod constants;
mod error;
mod measurement;
mod producer;
mod time;

// public modules
pub mod schema;
pub mod translate;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::adapter::MeasurementAdapter;
    pub use crate::callback::{
        MeasurementCallbackV1_0, MeasurementCallbackV1_1, MeasurementCallbackV2_0,
        MeasurementCallbackV2_1,
    };
    pub use crate::cfg::{Config, Error as ConfigError, PositioningMode, PowerMode};
    pub use crate::constants::{GNSS_MAX_SVS_COUNT, SNAPSHOT_MAX_MEASUREMENTS};
    pub use crate::error::{DeliveryError, Status};
    pub use crate::measurement::{
        AdrStateMask, Clock, ClockFlags, CodeType, Measurement, MeasurementFlags,
        MultipathIndicator, ReferenceSignal, Snapshot, StateMask,
    };
    pub use crate::producer::{MeasurementSink, PowerSettings, Producer, TrackingOptions};
    pub use crate::schema::Version;
    pub use crate::time::{
        reconcile, BootTimer, BootTimestamp, CurrentTime, HardwareTimer, SystemTime, TimeSource,
    };
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch};
}
