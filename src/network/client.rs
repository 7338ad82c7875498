use std::error::Error;

use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::{ClientCommand, ClientEvent, DmError, OutgoingMessage};
use crate::storage::OutboxDatabase;

use super::transport::DmTransport;

const COMPLETION_BUFFER: usize = 64;

struct Completion {
    local_id: Uuid,
    outcome: Result<Value, DmError>,
}

/// Background task that turns UI commands into HTTP requests and reports
/// each outcome back as a [`ClientEvent`].
pub struct DmClient {
    transport: DmTransport,
    event_sender: mpsc::Sender<ClientEvent>,
    command_receiver: mpsc::Receiver<ClientCommand>,
    completion_sender: mpsc::Sender<Completion>,
    completion_receiver: mpsc::Receiver<Completion>,
    outbox: Option<OutboxDatabase>,
    in_flight: usize,
}

impl DmClient {
    pub fn new(
        transport: DmTransport,
        event_sender: mpsc::Sender<ClientEvent>,
        command_receiver: mpsc::Receiver<ClientCommand>,
        outbox: Option<OutboxDatabase>,
    ) -> Self {
        let (completion_sender, completion_receiver) = mpsc::channel(COMPLETION_BUFFER);
        Self {
            transport,
            event_sender,
            command_receiver,
            completion_sender,
            completion_receiver,
            outbox,
            in_flight: 0,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        log::info!(
            "DM client started (resource: {}, outbox: {})",
            self.transport.resource(),
            if self.outbox.is_some() { "on" } else { "off" }
        );

        let mut commands_open = true;
        // Requests already on the wire still get reported after the UI hangs up.
        while commands_open || self.in_flight > 0 {
            tokio::select! {
                command = self.command_receiver.recv(), if commands_open => {
                    if let Some(command) = command {
                        self.handle_command(command);
                    } else {
                        log::info!("Command channel closed; waiting for {} request(s)", self.in_flight);
                        commands_open = false;
                    }
                }
                Some(completion) = self.completion_receiver.recv() => {
                    self.in_flight -= 1;
                    self.handle_completion(completion).await;
                }
            }
        }

        log::info!("DM client stopping");
        Ok(())
    }

    fn handle_command(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::SubmitDm { local_id, message } => {
                self.record_pending(local_id, &message);
                self.in_flight += 1;

                let handle = self.transport.add_dm(message, |response| {
                    log::info!("Server answered: {response}");
                });

                let completion_sender = self.completion_sender.clone();
                tokio::spawn(async move {
                    let outcome = match handle.await {
                        Ok(outcome) => outcome,
                        Err(err) => Err(DmError::from(err)),
                    };
                    if completion_sender
                        .send(Completion { local_id, outcome })
                        .await
                        .is_err()
                    {
                        log::debug!("DM client gone before {local_id} completed");
                    }
                });
            }
        }
    }

    async fn handle_completion(&mut self, completion: Completion) {
        let Completion { local_id, outcome } = completion;
        let key = local_id.to_string();

        let event = match outcome {
            Ok(response) => {
                if let Some(outbox) = &self.outbox {
                    if let Err(err) = outbox.mark_delivered(&key) {
                        log::warn!("Failed to update outbox for {key}: {err}");
                    }
                }
                ClientEvent::DmDelivered { local_id, response }
            }
            Err(err) => {
                let error = err.to_string();
                if let Some(outbox) = &self.outbox {
                    if let Err(err) = outbox.mark_failed(&key, &error) {
                        log::warn!("Failed to update outbox for {key}: {err}");
                    }
                }
                ClientEvent::DmFailed { local_id, error }
            }
        };

        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI about {key}: {err}");
        }
    }

    fn record_pending(&self, local_id: Uuid, message: &OutgoingMessage) {
        let Some(outbox) = &self.outbox else {
            return;
        };

        if let Err(err) = outbox.insert_pending(
            &local_id.to_string(),
            &message.target_id.to_string(),
            self.transport.resource().as_path(),
            &message.text,
        ) {
            log::warn!("Failed to record {local_id} in outbox: {err}");
        }
    }
}
