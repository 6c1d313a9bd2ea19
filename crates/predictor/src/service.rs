use std::path::Path;

use artifact::ModelArtifact;
use chrono::{Local, NaiveDate};
use common::{ForecastError, HistoricalStats, InferenceRequest, Result};
use tracing::{error, info, warn};

use crate::{ErrorResponse, ForecastPipeline, ForecastResponse};

/// Lifecycle of the forecasting service.
///
/// `Loading` → `Ready` on a good artifact, `Loading` → `Failed` otherwise.
/// `Failed` is terminal: the artifact is never reloaded.
#[derive(Debug)]
pub enum ServiceState {
    Loading,
    Ready(ForecastPipeline),
    Failed(String),
}

impl ServiceState {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceState::Loading => "loading",
            ServiceState::Ready(_) => "ready",
            ServiceState::Failed(_) => "failed",
        }
    }
}

/// Rendered outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Single-line JSON body for the response channel.
    pub body: String,
    pub success: bool,
}

#[derive(Debug)]
pub struct ForecastService {
    state: ServiceState,
}

impl ForecastService {
    /// Load the artifact at `model_path` and become ready, or record why not.
    pub fn start(model_path: &Path, history: &HistoricalStats) -> Self {
        let mut service = Self {
            state: ServiceState::Loading,
        };
        info!(path = %model_path.display(), state = service.state.name(), "Loading model artifact");

        service.state = match ModelArtifact::load(model_path) {
            Ok(artifact) => ServiceState::Ready(ForecastPipeline::new(artifact, history)),
            Err(e) => {
                error!(path = %model_path.display(), error = %e, "Model artifact failed to load");
                ServiceState::Failed(e.to_string())
            }
        };

        info!(state = service.state.name(), "Forecast service started");
        service
    }

    /// A ready service around an already loaded artifact.
    pub fn with_artifact(artifact: ModelArtifact, history: &HistoricalStats) -> Self {
        Self {
            state: ServiceState::Ready(ForecastPipeline::new(artifact, history)),
        }
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// Why the service could not start, if it could not.
    pub fn startup_error(&self) -> Option<&str> {
        match &self.state {
            ServiceState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Parse `payload` and forecast it against today's date.
    pub fn handle(&self, payload: &str) -> Result<ForecastResponse> {
        self.handle_on(payload, Local::now().date_naive())
    }

    pub fn handle_on(&self, payload: &str, today: NaiveDate) -> Result<ForecastResponse> {
        let pipeline = match &self.state {
            ServiceState::Ready(pipeline) => pipeline,
            ServiceState::Failed(reason) => return Err(ForecastError::NotReady(reason.clone())),
            ServiceState::Loading => {
                return Err(ForecastError::NotReady("model artifact is still loading".into()))
            }
        };

        let request = parse_request(payload)?;
        let result = pipeline.forecast_on(&request, today)?;
        Ok(ForecastResponse::from(&result))
    }

    /// Handle a request and render either the forecast or an error object.
    ///
    /// Failures never leak a partial forecast: the body is exactly one of the two shapes.
    pub fn respond(&self, payload: &str) -> Reply {
        self.respond_on(payload, Local::now().date_naive())
    }

    pub fn respond_on(&self, payload: &str, today: NaiveDate) -> Reply {
        let rendered = self
            .handle_on(payload, today)
            .and_then(|resp| serde_json::to_string(&resp).map_err(ForecastError::from));

        match rendered {
            Ok(body) => Reply {
                body,
                success: true,
            },
            Err(e) => {
                warn!(error = %e, "Forecast request failed");
                Reply {
                    body: render_error(&e),
                    success: false,
                }
            }
        }
    }
}

/// Render any error as the `{"error": ...}` object.
pub fn render_error(err: &ForecastError) -> String {
    serde_json::to_string(&ErrorResponse::new(err))
        .unwrap_or_else(|_| r#"{"error":"failed to render error"}"#.to_string())
}

/// Decode one request object. Anything but a JSON object is an input error.
pub fn parse_request(payload: &str) -> Result<InferenceRequest> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(ForecastError::Input("empty request payload".into()));
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| ForecastError::Input(format!("request is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(ForecastError::Input("request must be a JSON object".into()));
    }

    serde_json::from_value(value)
        .map_err(|e| ForecastError::Input(format!("invalid request field: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let req = parse_request("{}").unwrap();
        assert_eq!(req, InferenceRequest::default());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for payload in ["", "   ", "{hour: 3", "[1, 2]", "42", r#"{"hour": "noon"}"#] {
            let err = parse_request(payload).unwrap_err();
            assert!(matches!(err, ForecastError::Input(_)), "payload {payload:?}");
        }
    }

    #[test]
    fn test_missing_artifact_fails_every_request() {
        let service = ForecastService::start(
            Path::new("/nonexistent/demand_model.json"),
            &HistoricalStats::default(),
        );
        assert!(!service.is_ready());
        assert_eq!(service.state().name(), "failed");
        assert!(service.startup_error().unwrap().contains("load error"));

        let reply = service.respond(r#"{"hour": 12}"#);
        assert!(!reply.success);
        let body: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("model unavailable"));
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}
