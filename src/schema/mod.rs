//! Client facing measurement records, one module per interface [Version].
//! Each record embeds the previous version by value: a V2.1 measurement
//! holds a V2.0 measurement, that holds a V1.1 measurement, that holds
//! a V1.0 measurement.
use bitflags::Flags;
use log::warn;

use crate::{
    constants::{GNSS_MAX_SVS_COUNT, SNAPSHOT_MAX_MEASUREMENTS},
    prelude::{Measurement, Snapshot},
};

pub mod v1_0;
pub mod v1_1;
pub mod v2_0;
pub mod v2_1;

/// Measurement interface [Version]. Ordering follows delivery priority:
/// when several clients are registered, the greatest [Version] is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    V1_0,
    V1_1,
    V2_0,
    V2_1,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::V1_0 => write!(f, "v1.0"),
            Self::V1_1 => write!(f, "v1.1"),
            Self::V2_0 => write!(f, "v2.0"),
            Self::V2_1 => write!(f, "v2.1"),
        }
    }
}

impl Version {
    /// All [Version]s, by decreasing delivery priority
    pub const BY_PRIORITY: [Self; 4] = [Self::V2_1, Self::V2_0, Self::V1_1, Self::V1_0];

    /// Maximal number of measurements a record of this [Version] holds
    pub const fn max_measurements(&self) -> usize {
        match self {
            Self::V1_0 => GNSS_MAX_SVS_COUNT,
            Self::V1_1 | Self::V2_0 | Self::V2_1 => SNAPSHOT_MAX_MEASUREMENTS,
        }
    }

    /// True if records of this [Version] carry the elapsed realtime
    pub const fn has_elapsed_realtime(&self) -> bool {
        matches!(self, Self::V2_0 | Self::V2_1)
    }
}

/// Iterates the first [Version::max_measurements] measurements of the
/// [Snapshot], in order. Dropped entries are reported.
pub(crate) fn capped(version: Version, snapshot: &Snapshot) -> impl Iterator<Item = &Measurement> {
    let max = version.max_measurements();

    if snapshot.len() > max {
        warn!(
            "{}: too many measurements {}, clamped to {}",
            version,
            snapshot.len(),
            max
        );
    }

    snapshot.measurements().iter().take(max)
}

/// Returns the value when its presence bit is set, the default value otherwise.
pub(crate) fn gated<F: Flags, T: Default>(flags: F, bit: F, value: T) -> T {
    if flags.contains(bit) {
        value
    } else {
        T::default()
    }
}
