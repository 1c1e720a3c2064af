use std::{sync::Arc, thread, time::Duration};

use parking_lot::Mutex;

use crate::prelude::{MeasurementSink, Producer, TrackingOptions};

/// Session command, as received by the [RecordingProducer]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Subscribe(TrackingOptions),
    Unsubscribe,
}

#[derive(Default)]
struct Inner {
    commands: Vec<Command>,
    sink: Option<MeasurementSink>,
}

/// [Producer] that records the commands it receives.
/// Clones share the same record, so tests keep a handle
/// once the producer was moved into the adapter.
#[derive(Default, Clone)]
pub struct RecordingProducer {
    inner: Arc<Mutex<Inner>>,
    latency: Duration,
}

impl RecordingProducer {
    /// Takes `latency` to process each command
    pub fn slow(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<Command> {
        self.inner.lock().commands.clone()
    }

    pub fn subscriptions(&self) -> Vec<TrackingOptions> {
        self.commands()
            .into_iter()
            .filter_map(|cmd| match cmd {
                Command::Subscribe(opts) => Some(opts),
                Command::Unsubscribe => None,
            })
            .collect()
    }

    pub fn unsubscriptions(&self) -> usize {
        self.commands()
            .iter()
            .filter(|cmd| **cmd == Command::Unsubscribe)
            .count()
    }

    /// Latest [MeasurementSink] received
    pub fn sink(&self) -> Option<MeasurementSink> {
        self.inner.lock().sink.clone()
    }
}

impl Producer for RecordingProducer {
    fn subscribe(&self, sink: MeasurementSink, options: TrackingOptions) {
        thread::sleep(self.latency);
        let mut inner = self.inner.lock();
        inner.commands.push(Command::Subscribe(options));
        inner.sink = Some(sink);
    }

    fn unsubscribe(&self) {
        thread::sleep(self.latency);
        self.inner.lock().commands.push(Command::Unsubscribe);
    }
}
