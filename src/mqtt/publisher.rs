use std::time::Duration;

use rumqttc::{AsyncClient, MqttOptions, QoS};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, trace, warn};

use crate::config::MqttConfig;

use super::message::JoyMessage;

/// Fire-and-forget MQTT sink for joy messages.
///
/// Owns the rumqttc client and its event loop in two spawned tasks; the rest
/// of the process only ever sees the mpsc sender side. No acknowledgement is
/// consumed, matching the fire-and-forget publish contract.
pub struct MqttPublisher {}

impl MqttPublisher {
    pub fn spawn(config: MqttConfig, mut messages: mpsc::Receiver<JoyMessage>) -> Self {
        info!(
            "Connecting to MQTT broker at {}:{} (topic '{}')",
            config.host, config.port, config.topic
        );

        let mut options = MqttOptions::new(config.client_id, config.host, config.port);
        options.set_keep_alive(Duration::from_secs(5));
        let (client, mut event_loop) = AsyncClient::new(options, 100);

        // Drive the connection. rumqttc reconnects on the next poll after an
        // error; backing off a little keeps a dead broker from spinning us.
        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(event) => trace!("MQTT event: {:?}", event),
                    Err(e) => {
                        warn!("MQTT connection error: {e}");
                        sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        let topic = config.topic;
        tokio::spawn(async move {
            while let Some(message) = messages.recv().await {
                let payload = match serde_json::to_vec(&message) {
                    Ok(payload) => payload,
                    Err(e) => {
                        error!("Failed to serialize joy message: {e}");
                        continue;
                    }
                };
                debug!("Publishing joy state ({} bytes)", payload.len());
                if let Err(e) = client
                    .publish(topic.clone(), QoS::AtMostOnce, false, payload)
                    .await
                {
                    warn!("Failed to publish joy state: {e}");
                }
            }
            info!("Joy message channel closed, publisher stopping");
        });

        Self {}
    }
}
