use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Command, Mode},
    protocol::{
        CommandsResponse, ServiceStatus, SetModeRequest, StatusResponse, COMMANDS_ROUTE,
        SET_MODE_ROUTE, START_ROUTE, STATUS_ROUTE, STOP_ROUTE,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

/// The external recognition backend, reachable only through its HTTP surface.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    async fn start(&self) -> Result<StatusResponse, ServiceError>;
    async fn stop(&self) -> Result<StatusResponse, ServiceError>;
    async fn set_mode(&self, mode: Mode) -> Result<StatusResponse, ServiceError>;
    /// Drains the pending command queue. An absent `commands` field reads as empty.
    async fn fetch_commands(&self) -> Result<Vec<Command>, ServiceError>;
    async fn status(&self) -> Result<ServiceStatus, ServiceError>;
}

#[derive(Debug, Clone)]
struct Endpoints {
    start: Url,
    stop: Url,
    set_mode: Url,
    commands: Url,
    status: Url,
}

pub struct HttpRecognitionService {
    http: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl HttpRecognitionService {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ServiceError> {
        let invalid = |source| ServiceError::InvalidUrl {
            url: base_url.to_string(),
            source,
        };

        let mut base = Url::parse(base_url.trim()).map_err(invalid)?;
        if base.cannot_be_a_base() {
            return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |route: &str| base.join(route.trim_start_matches('/')).map_err(invalid);
        let endpoints = Endpoints {
            start: join(START_ROUTE)?,
            stop: join(STOP_ROUTE)?,
            set_mode: join(SET_MODE_ROUTE)?,
            commands: join(COMMANDS_ROUTE)?,
            status: join(STATUS_ROUTE)?,
        };

        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(ServiceError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base,
            endpoints,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn exchange<T: DeserializeOwned>(
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|source| ServiceError::Transport { endpoint, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status { endpoint, status });
        }
        let body = response
            .json::<T>()
            .await
            .map_err(|source| ServiceError::Malformed { endpoint, source })?;
        debug!(endpoint, %status, "recognition service exchange");
        Ok(body)
    }
}

#[async_trait]
impl RecognitionService for HttpRecognitionService {
    async fn start(&self) -> Result<StatusResponse, ServiceError> {
        Self::exchange(START_ROUTE, self.http.post(self.endpoints.start.clone())).await
    }

    async fn stop(&self) -> Result<StatusResponse, ServiceError> {
        Self::exchange(STOP_ROUTE, self.http.post(self.endpoints.stop.clone())).await
    }

    async fn set_mode(&self, mode: Mode) -> Result<StatusResponse, ServiceError> {
        Self::exchange(
            SET_MODE_ROUTE,
            self.http
                .post(self.endpoints.set_mode.clone())
                .json(&SetModeRequest { mode }),
        )
        .await
    }

    async fn fetch_commands(&self) -> Result<Vec<Command>, ServiceError> {
        let body: CommandsResponse =
            Self::exchange(COMMANDS_ROUTE, self.http.get(self.endpoints.commands.clone()))
                .await?;
        Ok(body.commands.unwrap_or_default())
    }

    async fn status(&self) -> Result<ServiceStatus, ServiceError> {
        Self::exchange(STATUS_ROUTE, self.http.get(self.endpoints.status.clone())).await
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
