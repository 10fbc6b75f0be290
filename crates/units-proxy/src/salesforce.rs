use crate::config::Config;
use crate::error::ProxyError;
use crate::metrics::Metrics;
use crate::token::{TokenCache, TokenGrant};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Available units with every field the results cards show.
pub const UNITS_QUERY: &str = "SELECT Id,Name,Complete_Name__c,Bathrooms__c,Bedrooms__c,\
Garden_Area__c,Price__c,Status__c,Location__c,Delivery_Date__c \
FROM Unit__c WHERE Status__c='Available'";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    records: Vec<Value>,
}

/// OAuth password-grant credentials.
#[derive(Clone)]
struct Credentials {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

pub struct SalesforceClient {
    http: reqwest::Client,
    instance_url: String,
    api_version: String,
    credentials: Credentials,
    tokens: TokenCache,
    metrics: Arc<Metrics>,
}

impl SalesforceClient {
    pub fn new(config: &Config, metrics: Arc<Metrics>) -> Self {
        Self {
            http: reqwest::Client::new(),
            instance_url: config.sf_instance_url.trim_end_matches('/').to_string(),
            api_version: config.sf_api_version.clone(),
            credentials: Credentials {
                client_id: config.sf_client_id.clone(),
                client_secret: config.sf_client_secret.clone(),
                username: config.sf_username.clone(),
                password: config.sf_password.clone(),
            },
            tokens: TokenCache::new(),
            metrics,
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/services/oauth2/token", self.instance_url)
    }

    pub fn query_url(&self) -> String {
        format!("{}/services/data/{}/query", self.instance_url, self.api_version)
    }

    async fn request_token(&self) -> Result<TokenGrant, ProxyError> {
        self.metrics.token_refreshes_total.inc();
        let c = &self.credentials;
        let params = [
            ("grant_type", "password"),
            ("client_id", c.client_id.as_str()),
            ("client_secret", c.client_secret.as_str()),
            ("username", c.username.as_str()),
            ("password", c.password.as_str()),
        ];

        let response = self
            .http
            .post(self.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| ProxyError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The body carries the OAuth error code; it holds no secrets.
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Auth(format!("HTTP {status}: {body}")));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| ProxyError::Auth(format!("bad token response: {e}")))
    }

    async fn access_token(&self) -> Result<String, ProxyError> {
        self.tokens
            .get_or_refresh(Instant::now(), || self.request_token())
            .await
    }

    /// Runs [`UNITS_QUERY`] and returns the `records` array untouched.
    pub async fn fetch_units(&self) -> Result<Vec<Value>, ProxyError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.query_url())
            .query(&[("q", UNITS_QUERY)])
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked or rotated session; let the next call log in again.
            self.tokens.invalidate().await;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream(format!("HTTP {status}: {body}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;
        parse_query_response(&body)
    }
}

pub fn parse_query_response(body: &[u8]) -> Result<Vec<Value>, ProxyError> {
    serde_json::from_slice::<QueryResponse>(body)
        .map(|r| r.records)
        .map_err(|e| ProxyError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn client(instance: &str) -> SalesforceClient {
        let config = Config::parse_from([
            "units_proxy",
            "--sf-instance-url",
            instance,
            "--sf-client-id",
            "id",
            "--sf-client-secret",
            "secret",
            "--sf-username",
            "user",
            "--sf-password",
            "pass",
        ]);
        SalesforceClient::new(&config, Arc::new(Metrics::new()))
    }

    #[test]
    fn urls_follow_instance_and_version() {
        let c = client("https://crm.example.com/");
        assert_eq!(c.token_url(), "https://crm.example.com/services/oauth2/token");
        assert_eq!(
            c.query_url(),
            "https://crm.example.com/services/data/v60.0/query"
        );
    }

    #[test]
    fn query_selects_card_fields_of_available_units() {
        assert!(UNITS_QUERY.contains("Delivery_Date__c"));
        assert!(UNITS_QUERY.contains("Complete_Name__c"));
        assert!(UNITS_QUERY.ends_with("WHERE Status__c='Available'"));
        assert!(!UNITS_QUERY.contains("  "));
    }

    #[test]
    fn records_are_passed_through_verbatim() {
        let body = br#"{"totalSize":1,"done":true,"records":[
            {"attributes":{"type":"Unit__c"},"Id":"a01","Price__c":1250000,"Custom__c":"kept"}
        ]}"#;
        let records = parse_query_response(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Custom__c"], "kept");
        assert_eq!(records[0]["attributes"]["type"], "Unit__c");
    }

    #[test]
    fn missing_records_is_a_decode_error() {
        assert!(matches!(
            parse_query_response(br#"{"done":true}"#),
            Err(ProxyError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_instance_fails_auth() {
        let c = client("http://127.0.0.1:9");
        assert!(matches!(c.fetch_units().await, Err(ProxyError::Auth(_))));
        assert_eq!(c.metrics.token_refreshes_total.get(), 1);
    }
}
