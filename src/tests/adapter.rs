use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration as StdDuration,
};

use parking_lot::Mutex;
use rstest::*;

use crate::{
    prelude::{
        Clock, Config, DeliveryError, Duration, MeasurementAdapter, MeasurementCallbackV1_0,
        MeasurementCallbackV2_1, PositioningMode, PowerMode, PowerSettings, Status,
        TrackingOptions, Version,
    },
    schema::{v1_0, v1_1, v2_0, v2_1},
    tests::{
        callback::Recorder,
        gps_snapshot, init_logger,
        producer::{Command, RecordingProducer},
        time::{FixedTime, TestTimer, SECOND},
    },
};

/// Adapter, 5s after boot, engine tick counter at 5s (1 GHz)
fn build_adapter(cfg: Config) -> (MeasurementAdapter, RecordingProducer) {
    build_adapter_with(cfg, RecordingProducer::default(), boot_time())
}

fn boot_time() -> FixedTime {
    FixedTime::new(1_700_000_000 * SECOND, 5 * SECOND)
}

fn build_adapter_with(
    cfg: Config,
    producer: RecordingProducer,
    time: FixedTime,
) -> (MeasurementAdapter, RecordingProducer) {
    let adapter = MeasurementAdapter::with_time(
        cfg,
        Box::new(producer.clone()),
        Box::new(time),
        Box::new(TestTimer::nanos(5_000_000_000)),
    );
    (adapter, producer)
}

/// Client that runs `action` on the adapter it is attached to,
/// from within its first delivery.
struct ReentrantClient {
    adapter: Mutex<Option<Arc<MeasurementAdapter>>>,
    action: Box<dyn Fn(&MeasurementAdapter) + Send + Sync>,
    deliveries: AtomicUsize,
}

impl ReentrantClient {
    fn new<F>(action: F) -> Arc<Self>
    where
        F: Fn(&MeasurementAdapter) + Send + Sync + 'static,
    {
        Arc::new(Self {
            adapter: Mutex::new(None),
            action: Box::new(action),
            deliveries: AtomicUsize::new(0),
        })
    }

    fn attach(&self, adapter: &Arc<MeasurementAdapter>) {
        *self.adapter.lock() = Some(adapter.clone());
    }

    fn deliveries(&self) -> usize {
        self.deliveries.load(Ordering::SeqCst)
    }

    fn on_delivery(&self) -> Result<(), DeliveryError> {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        let adapter = self.adapter.lock().take();
        if let Some(adapter) = adapter {
            (self.action)(&adapter);
        }
        Ok(())
    }
}

impl MeasurementCallbackV1_0 for ReentrantClient {
    fn gnss_measurement_cb(&self, _: v1_0::GnssData) -> Result<(), DeliveryError> {
        self.on_delivery()
    }
}

impl MeasurementCallbackV2_1 for ReentrantClient {
    fn gnss_measurement_cb(&self, _: v2_1::GnssData) -> Result<(), DeliveryError> {
        self.on_delivery()
    }
}

#[fixture]
fn setup() -> (MeasurementAdapter, RecordingProducer) {
    init_logger();
    build_adapter(Config::default())
}

#[rstest]
fn highest_version_is_served(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, _) = setup;
    let snapshot = gps_snapshot(Clock::new(0), 4);

    assert!(!adapter.is_tracking());
    assert_eq!(adapter.active_tier(), None);

    let v1_0 = Recorder::<v1_0::GnssData>::new();
    assert_eq!(adapter.set_callback_v1_0(v1_0.clone()), Status::Success);
    assert_eq!(adapter.active_tier(), Some(Version::V1_0));

    adapter.on_snapshot(&snapshot);
    assert_eq!(v1_0.count(), 1);

    let v2_1 = Recorder::<v2_1::GnssData>::new();
    assert_eq!(
        adapter.set_callback_v2_1(v2_1.clone(), PowerMode::Invalid, 0),
        Status::Success
    );
    assert_eq!(adapter.active_tier(), Some(Version::V2_1));

    for _ in 0..3 {
        adapter.on_snapshot(&snapshot);
    }

    assert_eq!(v1_0.count(), 1, "legacy client still served");
    assert_eq!(v2_1.count(), 3);

    let record = &v2_1.records()[0];
    assert_eq!(record.measurements.len(), 4);
}

#[rstest]
fn priority_order(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, _) = setup;
    let snapshot = gps_snapshot(Clock::new(0), 1);

    let v2_0 = Recorder::<v2_0::GnssData>::new();
    let v1_1 = Recorder::<v1_1::GnssData>::new();
    let v1_0 = Recorder::<v1_0::GnssData>::new();

    adapter.set_callback_v2_0(v2_0.clone(), PowerMode::Invalid, 0);
    adapter.set_callback_v1_0(v1_0.clone());
    adapter.set_callback_v1_1(v1_1.clone(), PowerMode::Invalid, 0);

    assert_eq!(adapter.active_tier(), Some(Version::V2_0));
    adapter.on_snapshot(&snapshot);

    assert_eq!(v2_0.count(), 1);
    assert_eq!(v1_1.count(), 0);
    assert_eq!(v1_0.count(), 0);
}

#[rstest]
fn close_stops_delivery(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, producer) = setup;
    let snapshot = gps_snapshot(Clock::new(0), 2);

    let v2_1 = Recorder::<v2_1::GnssData>::new();
    adapter.set_callback_v2_1(v2_1.clone(), PowerMode::Invalid, 0);

    assert_eq!(adapter.close(), Status::Success);
    assert!(!adapter.is_tracking());
    assert_eq!(adapter.active_tier(), None);

    adapter.on_snapshot(&snapshot);
    assert_eq!(v2_1.attempts(), 0);

    // idempotent
    assert_eq!(adapter.close(), Status::Success);
    assert_eq!(producer.unsubscriptions(), 1);

    // closing an idle adapter
    let (adapter, producer) = build_adapter(Config::default());
    assert_eq!(adapter.close(), Status::Success);
    assert!(producer.commands().is_empty());
}

#[rstest]
fn session_commands(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, producer) = setup;

    let first = Recorder::<v2_1::GnssData>::new();
    let second = Recorder::<v2_1::GnssData>::new();

    adapter.set_callback_v2_1(first.clone(), PowerMode::Invalid, 0);
    assert_eq!(producer.subscriptions().len(), 1);

    // same tier while tracking: handle replaced only
    adapter.set_callback_v2_1(second.clone(), PowerMode::Invalid, 0);
    assert_eq!(producer.subscriptions().len(), 1);

    adapter.on_snapshot(&gps_snapshot(Clock::new(0), 1));
    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);

    // new tier
    let v1_0 = Recorder::<v1_0::GnssData>::new();
    adapter.set_callback_v1_0(v1_0.clone());
    assert_eq!(producer.subscriptions().len(), 2);

    // registration after close restarts the session
    adapter.close();
    adapter.set_callback_v2_1(first.clone(), PowerMode::Invalid, 0);
    assert!(adapter.is_tracking());

    let commands = producer.commands();
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[2], Command::Unsubscribe);
    assert!(matches!(commands[3], Command::Subscribe(_)));

    adapter.on_snapshot(&gps_snapshot(Clock::new(0), 1));
    assert_eq!(first.count(), 1);
    assert_eq!(v1_0.count(), 0);
}

#[rstest]
fn delivery_failure_is_absorbed(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, _) = setup;
    let snapshot = gps_snapshot(Clock::new(0), 3);

    let client = Recorder::<v1_1::GnssData>::failing(1);
    adapter.set_callback_v1_1(client.clone(), PowerMode::Invalid, 0);

    adapter.on_snapshot(&snapshot);
    assert_eq!(client.attempts(), 1);
    assert_eq!(client.count(), 0);
    assert!(adapter.is_tracking());

    adapter.on_snapshot(&snapshot);
    assert_eq!(client.attempts(), 2);
    assert_eq!(client.count(), 1);
}

#[rstest]
#[case(PowerMode::Invalid, 2000, None)]
#[case(PowerMode::M1, 0, Some(PowerSettings { mode: PowerMode::M1, tbm_ms: 0 }))]
#[case(PowerMode::M4, 2000, Some(PowerSettings { mode: PowerMode::M4, tbm_ms: 2000 }))]
fn power_settings_forwarding(
    #[case] power_mode: PowerMode,
    #[case] tbm_ms: u32,
    #[case] expected: Option<PowerSettings>,
) {
    init_logger();

    let cfg = Config::default()
        .with_min_interval(Duration::from_milliseconds(250.0))
        .with_positioning_mode(PositioningMode::MsBased);

    let (adapter, producer) = build_adapter(cfg);

    let client = Recorder::<v2_0::GnssData>::new();
    adapter.set_callback_v2_0(client, power_mode, tbm_ms);

    assert_eq!(
        producer.subscriptions(),
        vec![TrackingOptions {
            min_interval_ms: 250,
            mode: PositioningMode::MsBased,
            power: expected,
        }]
    );
}

#[rstest]
fn legacy_registration_has_no_power_settings(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, producer) = setup;

    adapter.set_callback_v1_0(Recorder::<v1_0::GnssData>::new());

    let options = producer.subscriptions();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].min_interval_ms, 1000);
    assert!(options[0].power.is_none());
}

#[rstest]
fn elapsed_realtime_resolution(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, _) = setup;

    let v2_1 = Recorder::<v2_1::GnssData>::new();
    adapter.set_callback_v2_1(v2_1.clone(), PowerMode::Invalid, 0);

    // stamped 2s ago
    let clock = Clock::new(0).with_elapsed_real_time(3_000_000_000, 500);
    adapter.on_snapshot(&gps_snapshot(clock, 1));

    // no timing information
    adapter.on_snapshot(&gps_snapshot(Clock::new(0), 1));

    let records = v2_1.records();
    assert_eq!(records.len(), 2);

    let elapsed_realtime = records[0].elapsed_realtime;
    assert!(elapsed_realtime.has_timestamp());
    assert_eq!(elapsed_realtime.timestamp_ns, 3 * SECOND as u64);
    assert_eq!(elapsed_realtime.time_uncertainty_ns, 500.0);

    assert!(!records[1].elapsed_realtime.has_timestamp());
    assert!(records[1].elapsed_realtime.flags.is_empty());
}

#[rstest]
fn producer_sink(setup: (MeasurementAdapter, RecordingProducer)) {
    let (adapter, producer) = setup;
    let snapshot = gps_snapshot(Clock::new(0), 70);

    let v1_0 = Recorder::<v1_0::GnssData>::new();
    adapter.set_callback_v1_0(v1_0.clone());

    let sink = producer.sink().unwrap();
    assert!(sink.deliver(&snapshot));

    let records = v1_0.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].measurement_count, 64);

    drop(adapter);
    assert!(!sink.deliver(&snapshot), "sink kept the adapter alive");
    assert_eq!(v1_0.count(), 1);
}

#[test]
fn close_from_delivery() {
    init_logger();

    let (adapter, producer) = build_adapter(Config::default());
    let adapter = Arc::new(adapter);
    let snapshot = gps_snapshot(Clock::new(0), 2);

    let client = ReentrantClient::new(|adapter| {
        assert_eq!(adapter.close(), Status::Success);
    });

    adapter.set_callback_v2_1(client.clone(), PowerMode::Invalid, 0);
    client.attach(&adapter);

    adapter.on_snapshot(&snapshot);
    assert_eq!(client.deliveries(), 1);
    assert!(!adapter.is_tracking());
    assert_eq!(producer.unsubscriptions(), 1);

    adapter.on_snapshot(&snapshot);
    assert_eq!(client.deliveries(), 1);
}

#[test]
fn registration_from_delivery() {
    init_logger();

    let (adapter, producer) = build_adapter(Config::default());
    let adapter = Arc::new(adapter);
    let snapshot = gps_snapshot(Clock::new(0), 2);

    let v2_1 = Recorder::<v2_1::GnssData>::new();
    let upgrade = v2_1.clone();

    let client = ReentrantClient::new(move |adapter| {
        let status = adapter.set_callback_v2_1(upgrade.clone(), PowerMode::Invalid, 0);
        assert_eq!(status, Status::Success);
    });

    adapter.set_callback_v1_0(client.clone());
    client.attach(&adapter);

    adapter.on_snapshot(&snapshot);
    assert_eq!(client.deliveries(), 1);
    assert_eq!(adapter.active_tier(), Some(Version::V2_1));
    assert_eq!(producer.subscriptions().len(), 2);

    adapter.on_snapshot(&snapshot);
    assert_eq!(client.deliveries(), 1);
    assert_eq!(v2_1.count(), 1);
}

#[test]
fn registration_while_delivering() {
    init_logger();

    const SNAPSHOTS: usize = 200;

    let (adapter, producer) = build_adapter(Config::default());
    let snapshot = gps_snapshot(Clock::new(0), 8);

    let v1_0 = Recorder::<v1_0::GnssData>::new();
    let v1_1 = Recorder::<v1_1::GnssData>::new();
    let v2_0 = Recorder::<v2_0::GnssData>::new();
    let v2_1 = Recorder::<v2_1::GnssData>::new();

    adapter.set_callback_v1_0(v1_0.clone());
    let sink = producer.sink().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..SNAPSHOTS {
                assert!(sink.deliver(&snapshot));
            }
        });

        s.spawn(|| {
            adapter.set_callback_v1_1(v1_1.clone(), PowerMode::Invalid, 0);
            thread::yield_now();
            adapter.set_callback_v2_0(v2_0.clone(), PowerMode::Invalid, 0);
            thread::yield_now();
            adapter.set_callback_v2_1(v2_1.clone(), PowerMode::Invalid, 0);
        });
    });

    // each snapshot served exactly once
    assert_eq!(
        v1_0.count() + v1_1.count() + v2_0.count() + v2_1.count(),
        SNAPSHOTS
    );
    assert_eq!(adapter.active_tier(), Some(Version::V2_1));

    for record in v2_1.records() {
        assert_eq!(record.measurements.len(), 8);
    }
}

#[test]
fn concurrent_session_commands() {
    init_logger();

    let (adapter, producer) = build_adapter_with(
        Config::default(),
        RecordingProducer::slow(StdDuration::from_micros(200)),
        boot_time(),
    );

    thread::scope(|s| {
        for i in 0..4 {
            let adapter = &adapter;
            s.spawn(move || {
                for j in 0..25 {
                    if (i + j) % 2 == 0 {
                        let client = Recorder::<v2_1::GnssData>::new();
                        adapter.set_callback_v2_1(client, PowerMode::Invalid, 0);
                    } else {
                        adapter.close();
                    }
                }
            });
        }
    });

    // the engine sees every start and stop, in order
    let commands = producer.commands();
    assert!(!commands.is_empty());

    for (i, command) in commands.iter().enumerate() {
        if i % 2 == 0 {
            assert!(matches!(command, Command::Subscribe(_)), "{:?}", commands);
        } else {
            assert_eq!(*command, Command::Unsubscribe, "{:?}", commands);
        }
    }

    assert_eq!(
        matches!(commands.last(), Some(Command::Subscribe(_))),
        adapter.is_tracking()
    );
}

#[test]
fn legacy_delivery_does_not_sample_time() {
    init_logger();

    let time = boot_time();
    let reads = time.reads();

    let (adapter, _) = build_adapter_with(Config::default(), RecordingProducer::default(), time);

    let clock = Clock::new(0).with_elapsed_real_time(3_000_000_000, 0);
    let snapshot = gps_snapshot(clock, 1);

    adapter.set_callback_v1_0(Recorder::<v1_0::GnssData>::new());
    adapter.on_snapshot(&snapshot);
    adapter.set_callback_v1_1(Recorder::<v1_1::GnssData>::new(), PowerMode::Invalid, 0);
    adapter.on_snapshot(&snapshot);
    assert_eq!(reads.load(Ordering::SeqCst), 0);

    adapter.set_callback_v2_0(Recorder::<v2_0::GnssData>::new(), PowerMode::Invalid, 0);
    adapter.on_snapshot(&snapshot);
    assert_eq!(reads.load(Ordering::SeqCst), 1);

    adapter.set_callback_v2_1(Recorder::<v2_1::GnssData>::new(), PowerMode::Invalid, 0);
    adapter.on_snapshot(&snapshot);
    assert_eq!(reads.load(Ordering::SeqCst), 2);
}
