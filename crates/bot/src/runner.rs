//! Long-polling loop for the Telegram Bot API.

use crate::dispatcher::Dispatcher;
use crate::telegram::{ChatTransport, TelegramClient, Update};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Configuration for the polling loop.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,
    /// Pause after a failed poll.
    pub retry_delay_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            retry_delay_ms: 3_000,
        }
    }
}

/// Polls for messages and answers each one on its own task.
pub struct BotRunner {
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    config: RunnerConfig,
}

impl BotRunner {
    /// Creates a new runner.
    pub fn new(
        client: Arc<TelegramClient>,
        dispatcher: Arc<Dispatcher>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            client,
            dispatcher,
            config,
        }
    }

    /// Runs until the task is cancelled. Poll failures are logged and retried.
    pub async fn run(&self) {
        info!(
            poll_timeout_secs = self.config.poll_timeout_secs,
            "Bot is running"
        );
        let mut offset = 0;

        loop {
            match self
                .client
                .get_updates(offset, self.config.poll_timeout_secs)
                .await
            {
                Ok(updates) => {
                    debug!(count = updates.len(), "Received updates");
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        dispatch_update(self.dispatcher.clone(), self.client.clone(), update);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Polling failed, retrying");
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }
}

/// Spawns the reply to one update. Updates without a text message are
/// skipped and yield `None`.
pub fn dispatch_update<T>(
    dispatcher: Arc<Dispatcher>,
    transport: Arc<T>,
    update: Update,
) -> Option<JoinHandle<()>>
where
    T: ChatTransport + 'static,
{
    let message = update.message?;
    let text = message.text?;
    let chat_id = message.chat.id;

    Some(tokio::spawn(async move {
        dispatcher.respond(transport.as_ref(), chat_id, &text).await;
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::testing::*;
    use crate::dispatcher::{TokenAliases, WELCOME};
    use mockito::Matcher;
    use reqwest::Client;
    use tradebot_execution::prelude::*;
    use tradebot_protocols::PayloadBuilder;

    fn dispatcher() -> Arc<Dispatcher> {
        let executor = SwapExecutor::new(
            Arc::new(CountingRegistry::default()),
            Arc::new(CountingSubmitter::default()),
            PayloadBuilder::default(),
            ExecutorConfig::default(),
        );
        Arc::new(Dispatcher::new(
            Arc::new(executor),
            Arc::new(FakeConnector { fail: false }),
            TokenAliases::default(),
        ))
    }

    fn update(json: serde_json::Value) -> Update {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_text_update() {
        let transport = Arc::new(RecordingTransport::default());
        let handle = dispatch_update(
            dispatcher(),
            transport.clone(),
            update(serde_json::json!({
                "update_id": 1,
                "message": { "chat": { "id": 7 }, "text": "/start" }
            })),
        )
        .unwrap();
        handle.await.unwrap();

        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[(7, WELCOME.to_string())]
        );
    }

    #[tokio::test]
    async fn test_skips_updates_without_text() {
        let transport = Arc::new(RecordingTransport::default());
        assert!(dispatch_update(
            dispatcher(),
            transport.clone(),
            update(serde_json::json!({ "update_id": 2 }))
        )
        .is_none());
        assert!(dispatch_update(
            dispatcher(),
            transport,
            update(serde_json::json!({
                "update_id": 3,
                "message": { "chat": { "id": 7 } }
            }))
        )
        .is_none());
    }

    #[tokio::test]
    async fn test_run_retries_and_advances_offset() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", "/bot1:t/getUpdates")
            .match_body(Matcher::PartialJson(serde_json::json!({ "offset": 0 })))
            .with_status(500)
            .with_body(r#"{"ok":false,"error_code":500,"description":"Internal Server Error"}"#)
            .expect(1)
            .create_async()
            .await;
        let batch = server
            .mock("POST", "/bot1:t/getUpdates")
            .match_body(Matcher::PartialJson(serde_json::json!({ "offset": 0 })))
            .with_body(
                serde_json::json!({
                    "ok": true,
                    "result": [
                        { "update_id": 5, "message": { "chat": { "id": 7 }, "text": "/start" } },
                        { "update_id": 6, "message": { "chat": { "id": 8 }, "text": "/start" } }
                    ]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let next = server
            .mock("POST", "/bot1:t/getUpdates")
            .match_body(Matcher::PartialJson(serde_json::json!({ "offset": 7 })))
            .with_body(r#"{"ok":true,"result":[]}"#)
            .expect_at_least(1)
            .create_async()
            .await;
        let replies = server
            .mock("POST", "/bot1:t/sendMessage")
            .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
            .expect(2)
            .create_async()
            .await;

        let runner = BotRunner::new(
            Arc::new(TelegramClient::new(Client::new(), &server.url(), "1:t")),
            dispatcher(),
            RunnerConfig {
                poll_timeout_secs: 0,
                retry_delay_ms: 10,
            },
        );
        let stopped = tokio::time::timeout(Duration::from_millis(500), runner.run()).await;
        assert!(stopped.is_err());

        failing.assert_async().await;
        batch.assert_async().await;
        next.assert_async().await;
        replies.assert_async().await;
    }
}
