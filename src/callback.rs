//! Client callbacks, one per measurement interface version.
use crate::{error::DeliveryError, schema};

/// V1.0 client
pub trait MeasurementCallbackV1_0: Send + Sync {
    /// Delivers one composed V1.0 record
    fn gnss_measurement_cb(&self, data: schema::v1_0::GnssData) -> Result<(), DeliveryError>;
}

/// V1.1 client
pub trait MeasurementCallbackV1_1: Send + Sync {
    /// Delivers one composed V1.1 record
    fn gnss_measurement_cb(&self, data: schema::v1_1::GnssData) -> Result<(), DeliveryError>;
}

/// V2.0 client
pub trait MeasurementCallbackV2_0: Send + Sync {
    /// Delivers one composed V2.0 record
    fn gnss_measurement_cb(&self, data: schema::v2_0::GnssData) -> Result<(), DeliveryError>;
}

/// V2.1 client
pub trait MeasurementCallbackV2_1: Send + Sync {
    /// Delivers one composed V2.1 record
    fn gnss_measurement_cb(&self, data: schema::v2_1::GnssData) -> Result<(), DeliveryError>;
}
