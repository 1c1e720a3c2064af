/// Maximum number of measurements a V1.0 client record can hold
/// (`GnssMax::SVS_COUNT`).
pub const GNSS_MAX_SVS_COUNT: usize = 64;

/// Maximum number of measurements the engine reports per snapshot.
/// Also the capacity of the vector based records (V1.1 and later).
pub const SNAPSHOT_MAX_MEASUREMENTS: usize = 128;

/// Maximum length of a free-text code type name, in characters.
/// Matches the engine's fixed name buffer.
pub const MAX_CODE_TYPE_NAME_LEN: usize = 8;

/// Default measurement reporting period, in milliseconds,
/// when the client did not request one.
pub const DEFAULT_MIN_INTERVAL_MS: u32 = 1000;

/// Offset between the UTC (1970-01-01) and GPST (1980-01-06) epochs,
/// in seconds.
pub const UTC_TO_GPS_EPOCH_SECONDS: i64 = 315_964_800;

/// One second in nanoseconds
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Maximal age (ns) we trust when deriving the elapsed realtime from the
/// UTC time of the engine. A larger age means the system clock was most
/// likely set by hand and does not match GNSS time.
pub const UTC_MAX_TRUSTED_AGE_NANOS: i64 = 100_000_000;

/// Uncertainty floor (ns) of an elapsed realtime derived from UTC time.
pub const UTC_MIN_UNCERTAINTY_NANOS: i64 = 100_000_000;

/// Tick differences (ns) above this value indicate the engine does not
/// share its tick counter with the application processor (dual-die
/// platforms): the inter-domain delta needs to be compensated.
pub const CROSS_DOMAIN_THRESHOLD_NANOS: u64 = 1_000_000_000;

/// GLONASS slot number reported by the engine when the orbit slot is unknown
pub const GLO_UNKNOWN_SLOT: u16 = 255;

/// First GLONASS id in the engine numbering
pub const GLO_SV_PRN_MIN: u16 = 65;

/// GLONASS frequency channel to client svid offset
/// (used when the orbit slot is unknown)
pub const GLO_FCN_OFFSET: u16 = 92;

/// First BeiDou id in the engine numbering
pub const BDS_SV_PRN_MIN: u16 = 201;

/// First Galileo id in the engine numbering
pub const GAL_SV_PRN_MIN: u16 = 301;

/// First IRNSS (NavIC) id in the engine numbering
pub const NAVIC_SV_PRN_MIN: u16 = 401;
