use std::time::Duration;

use chrono::{DateTime, Utc};
use interfaces_clay_webhook::index::{post_json, PostWebhookError, WebhookResult};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::steps::leads::models::Lead;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles after each failure.
    pub initial_delay: Duration,
}

#[derive(Debug, Serialize)]
pub struct ClayPayload<'a> {
    pub leads: &'a [Lead],
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Skipped,
    Delivered { attempts: u32, status: u16 },
}

#[derive(Debug, Error)]
pub enum SendToClayError {
    #[error("Rejected by webhook: {status} - {body}")]
    Rejected {
        status: StatusCode,
        body: String,
    },

    #[error("Webhook still failing after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: String,
    },
}

enum Attempt {
    Delivered(StatusCode),
    Retryable(String),
    Rejected(StatusCode, String),
}

fn classify(result: Result<WebhookResult, PostWebhookError>) -> Attempt {
    match result {
        Ok(WebhookResult { status, .. })
            if matches!(status.as_u16(), 200 | 201 | 202) => Attempt::Delivered(status),
        Ok(WebhookResult { status, body })
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() =>
        {
            Attempt::Retryable(format!("{status} - {body}"))
        }
        Ok(WebhookResult { status, body }) => Attempt::Rejected(status, body),
        Err(err) => Attempt::Retryable(err.to_string()),
    }
}

/// Posts the scored leads as one batch. Transport errors, 429 and 5xx are retried
/// with exponential backoff; any other non-2xx answer is final.
pub async fn send_to_clay(
    client: &Client,
    url: Option<&str>,
    leads: &[Lead],
    fetched_at: DateTime<Utc>,
    retry: RetryPolicy,
) -> Result<DeliveryOutcome, SendToClayError> {
    let Some(url) = url else {
        warn!("No CLAY_WEBHOOK_URL set, skipping webhook");
        return Ok(DeliveryOutcome::Skipped);
    };

    info!(count = leads.len(), "Sending leads to Clay");
    let payload = ClayPayload { leads, fetched_at };

    let max_attempts = retry.max_attempts.max(1);
    let mut delay = retry.initial_delay;
    let mut attempt = 1;

    loop {
        match classify(post_json(client, url, &payload).await) {
            Attempt::Delivered(status) => {
                info!(attempts = attempt, status = status.as_u16(), "Sent leads to Clay");
                return Ok(DeliveryOutcome::Delivered {
                    attempts: attempt,
                    status: status.as_u16(),
                });
            }
            Attempt::Rejected(status, body) => {
                return Err(SendToClayError::Rejected { status, body });
            }
            Attempt::Retryable(last) if attempt >= max_attempts => {
                return Err(SendToClayError::RetriesExhausted { attempts: attempt, last });
            }
            Attempt::Retryable(last) => {
                warn!(attempt, delay_ms = delay.as_millis() as u64, "Clay webhook failed: {last}");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, initial_delay: Duration::ZERO }
    }

    fn ok(status: u16) -> Result<WebhookResult, PostWebhookError> {
        Ok(WebhookResult {
            body: "body".into(),
            status: StatusCode::from_u16(status).unwrap(),
        })
    }

    #[test]
    fn accepted_statuses_count_as_delivered() {
        for status in [200, 201, 202] {
            assert!(matches!(classify(ok(status)), Attempt::Delivered(_)));
        }
        assert!(matches!(classify(ok(204)), Attempt::Rejected(..)));
    }

    #[test]
    fn throttling_and_server_errors_are_retryable() {
        for status in [429, 500, 502, 503] {
            assert!(matches!(classify(ok(status)), Attempt::Retryable(_)));
        }
    }

    #[test]
    fn client_errors_are_final() {
        for status in [400, 401, 404, 422] {
            assert!(matches!(classify(ok(status)), Attempt::Rejected(..)));
        }
    }

    #[tokio::test]
    async fn missing_url_skips_delivery() {
        let outcome = send_to_clay(
            &Client::new(),
            None,
            &[],
            Utc::now(),
            no_wait(3),
        )
        .await
        .unwrap();

        assert_eq!(outcome, DeliveryOutcome::Skipped);
    }

    #[tokio::test]
    async fn persistent_server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .expect(2)
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let err = send_to_clay(&Client::new(), Some(url.as_str()), &[], Utc::now(), no_wait(2))
            .await
            .unwrap_err();

        match err {
            SendToClayError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(last.contains("503"));
                assert!(last.contains("busy"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(server.received_requests().await.unwrap_or_default().len(), 2);
    }

    #[tokio::test]
    async fn unreachable_hook_is_retried_until_exhausted() {
        let err = send_to_clay(
            &Client::new(),
            Some("http://127.0.0.1:9/hook"),
            &[],
            Utc::now(),
            no_wait(3),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SendToClayError::RetriesExhausted { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let outcome = send_to_clay(&Client::new(), Some(url.as_str()), &[], Utc::now(), no_wait(0))
            .await
            .unwrap();

        assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 1, status: 201 });
    }
}
