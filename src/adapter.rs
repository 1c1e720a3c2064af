//! Measurement adapter: client registrations, session control
//! and snapshot fan-out.
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, error, trace};
use parking_lot::Mutex;

use crate::{
    callback::{
        MeasurementCallbackV1_0, MeasurementCallbackV1_1, MeasurementCallbackV2_0,
        MeasurementCallbackV2_1,
    },
    error::{DeliveryError, Status},
    prelude::{
        BootTimer, Clock, Config, HardwareTimer, PowerMode, Producer, Snapshot, SystemTime,
        TimeSource, Version,
    },
    producer::{MeasurementSink, TrackingOptions},
    schema::{
        v1_0, v1_1,
        v2_0::{self, ElapsedRealtime},
        v2_1,
    },
    time,
};

/// Registered client, as selected for one [Snapshot]
enum Selected {
    V1_0(Arc<dyn MeasurementCallbackV1_0>),
    V1_1(Arc<dyn MeasurementCallbackV1_1>),
    V2_0(Arc<dyn MeasurementCallbackV2_0>),
    V2_1(Arc<dyn MeasurementCallbackV2_1>),
}

impl Selected {
    fn version(&self) -> Version {
        match self {
            Self::V1_0(_) => Version::V1_0,
            Self::V1_1(_) => Version::V1_1,
            Self::V2_0(_) => Version::V2_0,
            Self::V2_1(_) => Version::V2_1,
        }
    }
}

/// One slot per interface [Version], plus the session state
#[derive(Default)]
struct Subscribers {
    v1_0: Option<Arc<dyn MeasurementCallbackV1_0>>,
    v1_1: Option<Arc<dyn MeasurementCallbackV1_1>>,
    v2_0: Option<Arc<dyn MeasurementCallbackV2_0>>,
    v2_1: Option<Arc<dyn MeasurementCallbackV2_1>>,
    tracking: bool,
}

impl Subscribers {
    /// Highest priority registered client
    fn select(&self) -> Option<Selected> {
        if let Some(cb) = &self.v2_1 {
            Some(Selected::V2_1(cb.clone()))
        } else if let Some(cb) = &self.v2_0 {
            Some(Selected::V2_0(cb.clone()))
        } else if let Some(cb) = &self.v1_1 {
            Some(Selected::V1_1(cb.clone()))
        } else {
            self.v1_0.as_ref().map(|cb| Selected::V1_0(cb.clone()))
        }
    }

    fn is_registered(&self, version: Version) -> bool {
        match version {
            Version::V1_0 => self.v1_0.is_some(),
            Version::V1_1 => self.v1_1.is_some(),
            Version::V2_0 => self.v2_0.is_some(),
            Version::V2_1 => self.v2_1.is_some(),
        }
    }

    /// Registered [Version]s, by decreasing priority
    fn registered(&self) -> impl Iterator<Item = Version> + '_ {
        Version::BY_PRIORITY
            .into_iter()
            .filter(|version| self.is_registered(*version))
    }
}

/// State shared between the [MeasurementAdapter] and
/// the [MeasurementSink]s it hands out.
pub(crate) struct Shared {
    cfg: Config,
    /// Held across a session change and its [Producer] command,
    /// so the engine sees commands in the order of the state changes.
    session: Mutex<()>,
    subscribers: Mutex<Subscribers>,
    producer: Box<dyn Producer>,
    time_source: Box<dyn TimeSource>,
    timer: Box<dyn HardwareTimer>,
}

impl Shared {
    /// Serves one [Snapshot] to the highest priority client.
    /// Runs on the producer thread.
    pub(crate) fn on_snapshot(&self, snapshot: &Snapshot) {
        let selected = {
            let subscribers = self.subscribers.lock();
            if subscribers.tracking {
                subscribers.select()
            } else {
                None
            }
        };

        let Some(selected) = selected else {
            trace!("snapshot discarded: no active session");
            return;
        };

        let version = selected.version();

        debug!(
            "snapshot: {} measurement(s), delivering {}",
            snapshot.len(),
            version
        );

        let elapsed_realtime = if version.has_elapsed_realtime() {
            self.elapsed_realtime(&snapshot.clock)
        } else {
            ElapsedRealtime::default()
        };

        let delivery = match selected {
            Selected::V1_0(cb) => cb.gnss_measurement_cb(v1_0::GnssData::compose(snapshot)),
            Selected::V1_1(cb) => cb.gnss_measurement_cb(v1_1::GnssData::compose(snapshot)),
            Selected::V2_0(cb) => {
                cb.gnss_measurement_cb(v2_0::GnssData::compose(snapshot, elapsed_realtime))
            },
            Selected::V2_1(cb) => {
                cb.gnss_measurement_cb(v2_1::GnssData::compose(snapshot, elapsed_realtime))
            },
        };

        if let Err(e) = delivery {
            self.delivery_failure(version, e);
        }
    }

    fn elapsed_realtime(&self, clock: &Clock) -> ElapsedRealtime {
        let now = self.time_source.current_time();
        time::reconcile(clock, now, self.timer.as_ref()).into()
    }

    fn delivery_failure(&self, version: Version, e: DeliveryError) {
        error!("{} measurement delivery failure: {}", version, e);
    }
}

/// [MeasurementAdapter] serves engine [Snapshot]s to the measurement
/// clients, each one in its own interface [Version].
///
/// Several clients may be registered at once, one per [Version]:
/// each [Snapshot] is only delivered to the highest [Version].
/// Registration starts the measurement session, [MeasurementAdapter::close]
/// stops it.
pub struct MeasurementAdapter {
    shared: Arc<Shared>,
}

impl MeasurementAdapter {
    /// Creates a new [MeasurementAdapter] on the running system:
    /// the engine stamps its [Clock] with the boot clock.
    pub fn new(cfg: Config, producer: Box<dyn Producer>) -> Self {
        Self::with_time(cfg, producer, Box::new(SystemTime), Box::new(BootTimer))
    }

    /// Creates a new [MeasurementAdapter] with custom [TimeSource]
    /// and [HardwareTimer].
    pub fn with_time(
        cfg: Config,
        producer: Box<dyn Producer>,
        time_source: Box<dyn TimeSource>,
        timer: Box<dyn HardwareTimer>,
    ) -> Self {
        debug!("measurement adapter: {}", cfg);
        Self {
            shared: Arc::new(Shared {
                cfg,
                producer,
                time_source,
                timer,
                session: Mutex::new(()),
                subscribers: Mutex::new(Subscribers::default()),
            }),
        }
    }

    /// [MeasurementSink] the engine reports through
    pub fn sink(&self) -> MeasurementSink {
        MeasurementSink::new(&self.shared)
    }

    /// Registers a V1.0 client
    pub fn set_callback_v1_0(&self, callback: Arc<dyn MeasurementCallbackV1_0>) -> Status {
        let options = self.shared.cfg.tracking_options(PowerMode::Invalid, 0);
        self.register(Version::V1_0, options, |subscribers| {
            subscribers.v1_0.replace(callback).is_none()
        })
    }

    /// Registers a V1.1 client, with desired [PowerMode] and time
    /// between measurements (ms)
    pub fn set_callback_v1_1(
        &self,
        callback: Arc<dyn MeasurementCallbackV1_1>,
        power_mode: PowerMode,
        tbm_ms: u32,
    ) -> Status {
        let options = self.shared.cfg.tracking_options(power_mode, tbm_ms);
        self.register(Version::V1_1, options, |subscribers| {
            subscribers.v1_1.replace(callback).is_none()
        })
    }

    /// Registers a V2.0 client, with desired [PowerMode] and time
    /// between measurements (ms)
    pub fn set_callback_v2_0(
        &self,
        callback: Arc<dyn MeasurementCallbackV2_0>,
        power_mode: PowerMode,
        tbm_ms: u32,
    ) -> Status {
        let options = self.shared.cfg.tracking_options(power_mode, tbm_ms);
        self.register(Version::V2_0, options, |subscribers| {
            subscribers.v2_0.replace(callback).is_none()
        })
    }

    /// Registers a V2.1 client, with desired [PowerMode] and time
    /// between measurements (ms)
    pub fn set_callback_v2_1(
        &self,
        callback: Arc<dyn MeasurementCallbackV2_1>,
        power_mode: PowerMode,
        tbm_ms: u32,
    ) -> Status {
        let options = self.shared.cfg.tracking_options(power_mode, tbm_ms);
        self.register(Version::V2_1, options, |subscribers| {
            subscribers.v2_1.replace(callback).is_none()
        })
    }

    /// Stores the client and (re)starts the session when needed.
    /// `swap` returns true when the slot was empty.
    fn register<F>(&self, version: Version, options: TrackingOptions, swap: F) -> Status
    where
        F: FnOnce(&mut Subscribers) -> bool,
    {
        let _session = self.shared.session.lock();

        let start = {
            let mut subscribers = self.shared.subscribers.lock();
            let new_slot = swap(&mut subscribers);
            let start = new_slot || !subscribers.tracking;
            subscribers.tracking = true;

            debug!(
                "{} client registered (clients: {})",
                version,
                subscribers.registered().join(", ")
            );

            start
        };

        if start {
            debug!("starting measurement session: {:?}", options);
            self.shared.producer.subscribe(self.sink(), options);
        }

        Status::Success
    }

    /// Stops the session. Registered clients are kept, but no longer
    /// served until a new registration. Closing an idle adapter
    /// does nothing.
    pub fn close(&self) -> Status {
        let _session = self.shared.session.lock();

        let stop = {
            let mut subscribers = self.shared.subscribers.lock();
            std::mem::replace(&mut subscribers.tracking, false)
        };

        if stop {
            debug!("stopping measurement session");
            self.shared.producer.unsubscribe();
        } else {
            trace!("close: no active session");
        }

        Status::Success
    }

    /// Serves one [Snapshot], as if reported by the engine
    pub fn on_snapshot(&self, snapshot: &Snapshot) {
        self.shared.on_snapshot(snapshot);
    }

    /// True while a measurement session is active
    pub fn is_tracking(&self) -> bool {
        self.shared.subscribers.lock().tracking
    }

    /// [Version] the next [Snapshot] would be delivered in,
    /// None while idle.
    pub fn active_tier(&self) -> Option<Version> {
        let subscribers = self.shared.subscribers.lock();
        if subscribers.tracking {
            subscribers.select().map(|selected| selected.version())
        } else {
            None
        }
    }
}
