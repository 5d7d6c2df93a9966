// src/host/channel.rs
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::host::{HostError, MessageHost, Result};
use crate::models::{GeneratedValue, GeneratorSettings};

/// Messages accepted by the background process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostRequest {
    EditGeneratorSettings { settings: GeneratorSettings },
    GetGeneratorSettings,
    GeneratePassword,
    GetGeneratedHistory,
    #[serde(rename_all = "camelCase")]
    ChangeRootPassword { old_password: String, new_sentence: String },
    CreateVault { name: String },
    Restore { url: String },
}

impl HostRequest {
    fn name(&self) -> &'static str {
        match self {
            HostRequest::EditGeneratorSettings { .. } => "editGeneratorSettings",
            HostRequest::GetGeneratorSettings => "getGeneratorSettings",
            HostRequest::GeneratePassword => "generatePassword",
            HostRequest::GetGeneratedHistory => "getGeneratedHistory",
            HostRequest::ChangeRootPassword { .. } => "changeRootPassword",
            HostRequest::CreateVault { .. } => "createVault",
            HostRequest::Restore { .. } => "restore",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum HostResponse {
    Done,
    Settings(GeneratorSettings),
    Password(Option<String>),
    History(Vec<GeneratedValue>),
    Error(HostError),
}

// Messages cross the channel as JSON, the same way they would cross a
// process boundary.
struct Envelope {
    request: Value,
    reply: oneshot::Sender<Value>,
}

async fn dispatch<H: MessageHost>(host: &H, request: HostRequest) -> HostResponse {
    let outcome = match request {
        HostRequest::EditGeneratorSettings { settings } => {
            host.edit_generator_settings(settings).await.map(|_| HostResponse::Done)
        }
        HostRequest::GetGeneratorSettings => host.generator_settings().await.map(HostResponse::Settings),
        HostRequest::GeneratePassword => host.generate_password().await.map(HostResponse::Password),
        HostRequest::GetGeneratedHistory => host.generated_history().await.map(HostResponse::History),
        HostRequest::ChangeRootPassword { old_password, new_sentence } => host
            .change_root_password(&old_password, &new_sentence)
            .await
            .map(|_| HostResponse::Done),
        HostRequest::CreateVault { name } => host.create_vault(&name).await.map(|_| HostResponse::Done),
        HostRequest::Restore { url } => host.restore(&url).await.map(|_| HostResponse::Done),
    };
    outcome.unwrap_or_else(HostResponse::Error)
}

/// Serve requests for `host` until every client is dropped.
pub fn serve<H>(host: Arc<H>, buffer: usize) -> (HostClient, JoinHandle<()>)
where
    H: MessageHost + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Envelope>(buffer);
    let settings = host.subscribe_settings();

    let server = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let response = match serde_json::from_value::<HostRequest>(envelope.request) {
                Ok(request) => {
                    log::debug!("Host handling {}", request.name());
                    dispatch(host.as_ref(), request).await
                }
                Err(e) => HostResponse::Error(HostError::InvalidRequest(format!("Malformed message: {}", e))),
            };

            let encoded = match serde_json::to_value(&response) {
                Ok(value) => value,
                Err(e) => {
                    log::error!("Failed to encode host response: {}", e);
                    continue;
                }
            };
            if envelope.reply.send(encoded).is_err() {
                log::debug!("Caller went away before the host replied");
            }
        }
        log::info!("Host channel closed");
    });

    (HostClient { tx, settings }, server)
}

/// Front-end side of the host channel.
#[derive(Clone)]
pub struct HostClient {
    tx: mpsc::Sender<Envelope>,
    settings: watch::Receiver<GeneratorSettings>,
}

impl HostClient {
    pub async fn send(&self, request: HostRequest) -> Result<HostResponse> {
        let name = request.name();
        let request = serde_json::to_value(&request)?;
        let (reply, response) = oneshot::channel();

        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| HostError::Channel(format!("host is gone, cannot send {}", name)))?;
        let response = response
            .await
            .map_err(|_| HostError::Channel(format!("no reply to {}", name)))?;

        match serde_json::from_value(response)? {
            HostResponse::Error(e) => Err(e),
            other => Ok(other),
        }
    }

    fn unexpected(response: HostResponse) -> HostError {
        HostError::Channel(format!("unexpected response {:?}", response))
    }
}

#[async_trait]
impl MessageHost for HostClient {
    async fn edit_generator_settings(&self, settings: GeneratorSettings) -> Result<()> {
        match self.send(HostRequest::EditGeneratorSettings { settings }).await? {
            HostResponse::Done => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn generator_settings(&self) -> Result<GeneratorSettings> {
        match self.send(HostRequest::GetGeneratorSettings).await? {
            HostResponse::Settings(settings) => Ok(settings),
            other => Err(Self::unexpected(other)),
        }
    }

    fn subscribe_settings(&self) -> watch::Receiver<GeneratorSettings> {
        self.settings.clone()
    }

    async fn generate_password(&self) -> Result<Option<String>> {
        match self.send(HostRequest::GeneratePassword).await? {
            HostResponse::Password(password) => Ok(password),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn generated_history(&self) -> Result<Vec<GeneratedValue>> {
        match self.send(HostRequest::GetGeneratedHistory).await? {
            HostResponse::History(history) => Ok(history),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn change_root_password(&self, old_password: &str, new_sentence: &str) -> Result<()> {
        let request = HostRequest::ChangeRootPassword {
            old_password: old_password.to_string(),
            new_sentence: new_sentence.to_string(),
        };
        match self.send(request).await? {
            HostResponse::Done => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn create_vault(&self, name: &str) -> Result<()> {
        match self.send(HostRequest::CreateVault { name: name.to_string() }).await? {
            HostResponse::Done => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn restore(&self, url: &str) -> Result<()> {
        match self.send(HostRequest::Restore { url: url.to_string() }).await? {
            HostResponse::Done => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalHost;

    fn client() -> (HostClient, Arc<LocalHost>) {
        let host = Arc::new(LocalHost::new(GeneratorSettings::default(), "root", 10).unwrap());
        let (client, _server) = serve(Arc::clone(&host), 16);
        (client, host)
    }

    #[test]
    fn test_request_wire_shape() {
        let json = serde_json::to_value(HostRequest::ChangeRootPassword {
            old_password: "a".to_string(),
            new_sentence: "b".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "changeRootPassword");
        assert_eq!(json["oldPassword"], "a");
        assert_eq!(json["newSentence"], "b");

        let json = serde_json::to_value(HostRequest::GeneratePassword).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "generatePassword" }));
    }

    #[tokio::test]
    async fn test_client_round_trips() {
        let (client, host) = client();
        let edited = GeneratorSettings::default().with_length(24);
        client.edit_generator_settings(edited.clone()).await.unwrap();
        assert_eq!(client.generator_settings().await.unwrap(), edited);
        assert_eq!(host.generator_settings().await.unwrap(), edited);

        let password = client.generate_password().await.unwrap().unwrap();
        assert_eq!(password.chars().count(), 24);
        assert_eq!(client.generated_history().await.unwrap().len(), 1);

        client.create_vault("Work").await.unwrap();
        assert_eq!(host.vaults().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_cross_the_channel() {
        let (client, _host) = client();
        assert_eq!(
            client.change_root_password("nope", "new sentence").await,
            Err(HostError::Authentication)
        );
        assert!(matches!(client.restore("::").await, Err(HostError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_client_sees_settings_pushes() {
        let (client, host) = client();
        let mut rx = client.subscribe_settings();
        host.edit_generator_settings(GeneratorSettings::default().with_length(8)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().password_length, 8);
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let host = Arc::new(LocalHost::new(GeneratorSettings::default(), "root", 10).unwrap());
        let (client, server) = serve(host, 1);
        server.abort();
        let _ = server.await;
        assert!(matches!(client.generate_password().await, Err(HostError::Channel(_))));
    }
}
