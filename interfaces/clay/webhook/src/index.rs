use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

pub struct WebhookResult {
    pub body: String,
    pub status: StatusCode,
}

pub async fn post_json<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    payload: &T,
) -> Result<WebhookResult, PostWebhookError> {
    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(payload)
        .send()
        .await
        .map_err(|source| PostWebhookError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| PostWebhookError::ResponseRead { source })?;

    Ok(WebhookResult { body, status })
}

#[derive(Debug, Error)]
pub enum PostWebhookError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_payload_as_json() {
        let server = MockServer::start().await;
        let payload = serde_json::json!({ "leads": [], "fetched_at": "2024-05-01T00:00:00Z" });

        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
            .expect(1)
            .mount(&server)
            .await;

        let result = post_json(&Client::new(), &format!("{}/hook", server.uri()), &payload)
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::ACCEPTED);
        assert_eq!(result.body, "queued");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_send_error() {
        let err = post_json(&Client::new(), "http://127.0.0.1:9/hook", &serde_json::json!({}))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, PostWebhookError::RequestSend { .. }));
    }
}
