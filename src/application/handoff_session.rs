// Handoff session - Wires replayed samples into the connection state machine
use crate::application::connection_machine::ConnectionStateMachine;
use crate::application::decision_policy::DecisionPolicy;
use crate::application::replay_driver::ReplayObserver;
use crate::domain::connection::ConnectionSnapshot;
use crate::domain::sample::Sample;
use serde::Serialize;
use tokio::sync::{oneshot, watch};

/// Where the replay currently is, for whoever renders position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayProgress {
    pub samples_delivered: u64,
    pub last_sample: Option<SampleSummary>,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub networks: Vec<String>,
}

impl From<&Sample> for SampleSummary {
    fn from(sample: &Sample) -> Self {
        Self {
            timestamp: sample.timestamp,
            latitude: sample.latitude,
            longitude: sample.longitude,
            networks: sample.network_names(),
        }
    }
}

/// Read side of a session, handed to the presentation layer.
pub struct SessionHandles {
    pub connection: watch::Receiver<ConnectionSnapshot>,
    pub progress: watch::Receiver<ReplayProgress>,
    pub finished: oneshot::Receiver<()>,
}

/// Replay observer that drives a connection state machine.
///
/// Each delivered sample's networks go through one decision cycle; the
/// resulting snapshots and replay progress are published on watch channels.
pub struct HandoffSession {
    machine: ConnectionStateMachine,
    progress: watch::Sender<ReplayProgress>,
    finished: Option<oneshot::Sender<()>>,
}

impl HandoffSession {
    pub fn new(policy: Box<dyn DecisionPolicy>) -> (Self, SessionHandles) {
        let (connection_tx, connection_rx) = watch::channel(ConnectionSnapshot::default());
        let (progress_tx, progress_rx) = watch::channel(ReplayProgress::default());
        let (finished_tx, finished_rx) = oneshot::channel();

        let machine = ConnectionStateMachine::new(policy).with_observer(move |snapshot: &ConnectionSnapshot| {
            connection_tx.send_replace(snapshot.clone());
        });

        let session = Self {
            machine,
            progress: progress_tx,
            finished: Some(finished_tx),
        };
        let handles = SessionHandles {
            connection: connection_rx,
            progress: progress_rx,
            finished: finished_rx,
        };

        (session, handles)
    }

    pub fn machine(&self) -> &ConnectionStateMachine {
        &self.machine
    }
}

impl ReplayObserver for HandoffSession {
    fn sample_delivered(&mut self, sample: &Sample) {
        self.machine.process(&sample.networks);

        self.progress.send_modify(|progress| {
            progress.samples_delivered += 1;
            progress.last_sample = Some(SampleSummary::from(sample));
        });
    }

    fn simulation_finished(&mut self) {
        self.progress.send_modify(|progress| progress.finished = true);

        if let Some(finished) = self.finished.take() {
            let _ = finished.send(());
        }
    }
}
