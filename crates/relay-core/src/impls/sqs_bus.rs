//! SqsMessageBus - Amazon SQS FIFO キュー（feature `sqs`）
//!
//! - `ordering_group` → `MessageGroupId`
//! - `dedup_token` → `MessageDeduplicationId`
//!
//! `aws_sdk_sqs::Client` は内部にコネクションプールを持つので、プロセスで 1 つ
//! 作って使い回す。

use async_trait::async_trait;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::domain::{BusError, QueueMessage};
use crate::ports::MessageBus;

const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "RequestThrottled",
    "AWS.SimpleQueueService.RequestThrottled",
    "KmsThrottled",
];

const REJECTION_CODES: &[&str] = &[
    "InvalidMessageContents",
    "InvalidParameterValue",
    "MissingParameter",
    "AWS.SimpleQueueService.NonExistentQueue",
    "QueueDoesNotExist",
    "UnsupportedOperation",
];

#[derive(Clone)]
pub struct SqsMessageBus {
    client: aws_sdk_sqs::Client,
}

impl SqsMessageBus {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }

    /// 環境の AWS 設定（環境変数、profile、IMDS）からクライアントを作る
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_sqs::Client::new(&config))
    }
}

#[async_trait]
impl MessageBus for SqsMessageBus {
    async fn enqueue(&self, message: &QueueMessage) -> Result<(), BusError> {
        self.client
            .send_message()
            .queue_url(&message.destination)
            .message_body(&message.body)
            .message_group_id(&message.ordering_group)
            .message_deduplication_id(message.dedup_token.as_str())
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                let code = match &error {
                    SdkError::ServiceError(_) => error.code().map(str::to_string),
                    _ => None,
                };
                classify(code.as_deref(), DisplayErrorContext(&error).to_string())
            })
    }
}

fn classify(code: Option<&str>, detail: String) -> BusError {
    match code {
        Some(code) if THROTTLING_CODES.contains(&code) => BusError::Throttled(detail),
        Some(code) if REJECTION_CODES.contains(&code) => BusError::Rejected(detail),
        _ => BusError::Transport(detail),
    }
}
