//! Engine side of the adapter: the measurement [Producer]
//! and the [MeasurementSink] it reports through.
use std::sync::{Arc, Weak};

use crate::{
    adapter::Shared,
    prelude::{PositioningMode, PowerMode, Snapshot},
};

/// Power settings forwarded along a client [PowerMode]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSettings {
    /// Requested [PowerMode]
    pub mode: PowerMode,
    /// Time between measurements (ms)
    pub tbm_ms: u32,
}

/// [TrackingOptions] the measurement session is started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingOptions {
    /// Reporting period (ms)
    pub min_interval_ms: u32,
    /// [PositioningMode]
    pub mode: PositioningMode,
    /// Only present when the client requested an actual [PowerMode]
    pub power: Option<PowerSettings>,
}

/// [MeasurementSink] is handed to the [Producer] on subscription.
/// It does not keep the adapter alive: snapshots reported after the
/// adapter was dropped are discarded.
#[derive(Clone)]
pub struct MeasurementSink {
    adapter: Weak<Shared>,
}

impl MeasurementSink {
    pub(crate) fn new(shared: &Arc<Shared>) -> Self {
        Self {
            adapter: Arc::downgrade(shared),
        }
    }

    /// Reports a new [Snapshot]. Returns false when the adapter
    /// no longer exists.
    pub fn deliver(&self, snapshot: &Snapshot) -> bool {
        match self.adapter.upgrade() {
            Some(shared) => {
                shared.on_snapshot(snapshot);
                true
            },
            None => false,
        }
    }
}

impl std::fmt::Debug for MeasurementSink {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("MeasurementSink")
            .field("alive", &(self.adapter.strong_count() > 0))
            .finish()
    }
}

/// [Producer] is the positioning engine. Commands are fire and forget:
/// the engine reports its measurements through the [MeasurementSink]
/// from its own thread.
///
/// Commands are issued with the adapter session locked: a [Producer]
/// must not register a client nor close the adapter from within
/// [Producer::subscribe] or [Producer::unsubscribe].
pub trait Producer: Send + Sync {
    /// Starts (or restarts) the measurement session
    fn subscribe(&self, sink: MeasurementSink, options: TrackingOptions);

    /// Stops the measurement session
    fn unsubscribe(&self);
}
