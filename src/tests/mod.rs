mod adapter;
mod producer;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{Clock, Constellation, Measurement, Snapshot};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Trace)
            .init();
    });
}

/// Builds a [Snapshot] of `size` GPS measurements, with increasing
/// satellite identifiers (starting at 1).
pub fn gps_snapshot(clock: Clock, size: usize) -> Snapshot {
    let measurements = (0..size)
        .map(|i| {
            Measurement::new(Constellation::GPS, (i + 1) as u16)
                .with_cn0(30.0 + (i % 20) as f64)
                .with_received_sv_time(1_000 + i as i64, 10)
        })
        .collect::<Vec<_>>();

    Snapshot::new(clock, measurements)
}
