//! Measurement instant reconciliation, against the device boot clock.
use hifitime::Epoch;
use log::{error, trace};

#[cfg(unix)]
use nix::time::{clock_gettime, ClockId};

use crate::{
    constants::{
        CROSS_DOMAIN_THRESHOLD_NANOS, NANOS_PER_SECOND, UTC_MAX_TRUSTED_AGE_NANOS,
        UTC_MIN_UNCERTAINTY_NANOS, UTC_TO_GPS_EPOCH_SECONDS,
    },
    prelude::{Clock, ClockFlags},
};

/// Simultaneous sample of the wall clock and the boot clock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CurrentTime {
    /// Wall clock, nanoseconds since the UNIX epoch
    pub wall_clock_nanos: i64,
    /// Nanoseconds elapsed since device boot
    pub since_boot_nanos: i64,
}

/// [TimeSource] provides [CurrentTime] samples.
pub trait TimeSource: Send + Sync {
    /// Samples both clocks, None when either one is not available.
    fn current_time(&self) -> Option<CurrentTime>;
}

/// [TimeSource] of the running system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTime;

impl SystemTime {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    const BOOT_CLOCK: ClockId = ClockId::CLOCK_BOOTTIME;

    #[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
    const BOOT_CLOCK: ClockId = ClockId::CLOCK_MONOTONIC;

    #[cfg(unix)]
    fn since_boot_nanos() -> Option<i64> {
        let ts = clock_gettime(Self::BOOT_CLOCK)
            .map_err(|e| error!("boot clock not available: {}", e))
            .ok()?;

        (ts.tv_sec() as i64)
            .checked_mul(NANOS_PER_SECOND)?
            .checked_add(ts.tv_nsec() as i64)
    }

    #[cfg(not(unix))]
    fn since_boot_nanos() -> Option<i64> {
        None
    }

    fn wall_clock_nanos() -> Option<i64> {
        let now = Epoch::now().ok()?;
        let nanos = now.to_unix_seconds() * 1.0E9;
        Some(nanos.round() as i64)
    }
}

impl TimeSource for SystemTime {
    fn current_time(&self) -> Option<CurrentTime> {
        let since_boot_nanos = Self::since_boot_nanos()?;
        let wall_clock_nanos = Self::wall_clock_nanos()?;
        Some(CurrentTime {
            wall_clock_nanos,
            since_boot_nanos,
        })
    }
}

/// [HardwareTimer] is the free running counter the engine stamps
/// its [Clock] with.
pub trait HardwareTimer: Send + Sync {
    /// Current counter value
    fn tick_count(&self) -> u64;

    /// Counter frequency (Hz)
    fn frequency_hz(&self) -> u64;

    /// Converts a tick count to nanoseconds
    fn ticks_to_nanos(&self, ticks: u64) -> u64 {
        let freq = self.frequency_hz();
        if freq == 0 {
            return 0;
        }
        let nanos = ticks as u128 * NANOS_PER_SECOND as u128 / freq as u128;
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }

    /// Offset between the counter's time domain and the boot clock (ns).
    fn inter_domain_delta_nanos(&self) -> u64 {
        0
    }
}

/// [HardwareTimer] backed by the boot clock itself:
/// 1 GHz, same time domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootTimer;

impl HardwareTimer for BootTimer {
    fn tick_count(&self) -> u64 {
        SystemTime::since_boot_nanos()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .unwrap_or_default()
    }

    fn frequency_hz(&self) -> u64 {
        NANOS_PER_SECOND as u64
    }
}

/// Measurement instant, expressed on the boot clock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootTimestamp {
    /// Nanoseconds since device boot
    pub timestamp_ns: u64,
    /// Uncertainty (ns)
    pub time_uncertainty_ns: u64,
}

/// Expresses the measurement instant of this [Clock] on the boot clock.
///
/// When the engine stamped the [Clock] with its tick counter, the instant
/// is deduced from the tick age. Otherwise, the instant is deduced from
/// the GPS time the [Clock] resolved, when it is recent enough.
/// Returns None when neither is possible.
pub fn reconcile(
    clock: &Clock,
    now: Option<CurrentTime>,
    timer: &dyn HardwareTimer,
) -> Option<BootTimestamp> {
    let Some(now) = now else {
        trace!("elapsed realtime: current time not available");
        return None;
    };

    if clock.flags.contains(ClockFlags::ELAPSED_REAL_TIME) {
        return reconcile_ticks(clock, now, timer);
    }

    if clock.flags.contains(ClockFlags::UTC_RECONCILIATION) {
        return reconcile_utc(clock, now);
    }

    error!(
        "elapsed realtime: missing clock information ({:?})",
        ClockFlags::UTC_RECONCILIATION.difference(clock.flags)
    );
    None
}

fn reconcile_ticks(clock: &Clock, now: CurrentTime, timer: &dyn HardwareTimer) -> Option<BootTimestamp> {
    if timer.frequency_hz() == 0 {
        error!("elapsed realtime: hardware timer has no frequency");
        return None;
    }

    let ticks = timer.tick_count().saturating_sub(clock.elapsed_real_time);
    let mut diff = timer.ticks_to_nanos(ticks);

    if diff > CROSS_DOMAIN_THRESHOLD_NANOS {
        let delta = timer.inter_domain_delta_nanos();
        if diff >= delta {
            diff -= delta;
        }
    }

    let since_boot = u64::try_from(now.since_boot_nanos).ok()?;

    if since_boot < diff {
        error!(
            "elapsed realtime: measurement age {}ns exceeds boot time {}ns",
            diff, since_boot
        );
        return None;
    }

    let timestamp = BootTimestamp {
        timestamp_ns: since_boot - diff,
        time_uncertainty_ns: clock.elapsed_real_time_uncertainty_ns,
    };

    trace!(
        "elapsed realtime (ticks): age={}ns timestamp={}ns",
        diff,
        timestamp.timestamp_ns
    );

    Some(timestamp)
}

fn reconcile_utc(clock: &Clock, now: CurrentTime) -> Option<BootTimestamp> {
    let gps_nanos = clock
        .time_ns
        .checked_sub(clock.full_bias_ns)?
        .checked_sub(clock.bias_ns as i64)?;

    let measurement_time = gps_nanos
        .checked_sub(clock.leap_second as i64 * NANOS_PER_SECOND)?
        .checked_add(UTC_TO_GPS_EPOCH_SECONDS * NANOS_PER_SECOND)?;

    let age = now.wall_clock_nanos.checked_sub(measurement_time)?;

    if !(0..=UTC_MAX_TRUSTED_AGE_NANOS).contains(&age) {
        trace!("elapsed realtime (utc): untrusted measurement age {}ns", age);
        return None;
    }

    let timestamp = now.since_boot_nanos.checked_sub(age)?;

    let timestamp = BootTimestamp {
        timestamp_ns: u64::try_from(timestamp).ok()?,
        time_uncertainty_ns: age.max(UTC_MIN_UNCERTAINTY_NANOS) as u64,
    };

    trace!(
        "elapsed realtime (utc): age={}ns timestamp={}ns",
        age,
        timestamp.timestamp_ns
    );

    Some(timestamp)
}

#[cfg(test)]
mod test {
    use super::{BootTimer, HardwareTimer, SystemTime, TimeSource};

    #[test]
    #[cfg(unix)]
    fn system_time() {
        let now = SystemTime.current_time().unwrap();
        assert!(now.since_boot_nanos > 0);
        assert!(now.wall_clock_nanos > now.since_boot_nanos);
    }

    #[test]
    fn boot_timer() {
        let timer = BootTimer;
        assert_eq!(timer.ticks_to_nanos(123_456_789), 123_456_789);
        assert_eq!(timer.inter_domain_delta_nanos(), 0);
    }
}
