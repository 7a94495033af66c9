//! RequestForecastHandler - Command handler for price trend forecasts.

use std::sync::Arc;

use tracing::warn;

use crate::application::registry::SessionRegistry;
use crate::domain::foundation::UserId;
use crate::domain::session::SessionError;
use crate::domain::trend::TrendForecast;
use crate::ports::{ChartArtifact, ChartRenderer};

/// Command to forecast prices over the active report.
#[derive(Debug, Clone)]
pub struct RequestForecastCommand {
    pub user_id: UserId,
    /// Number of future periods to project. Must be at least 1.
    pub horizon: u32,
}

/// Result of a forecast.
#[derive(Debug, Clone)]
pub struct RequestForecastResult {
    pub forecast: TrendForecast,
    /// Rendered chart, when the renderer succeeded. A failed render
    /// does not fail the forecast.
    pub chart: Option<ChartArtifact>,
}

/// Handler for forecasts.
pub struct RequestForecastHandler {
    registry: Arc<SessionRegistry>,
    chart_renderer: Arc<dyn ChartRenderer>,
}

impl RequestForecastHandler {
    pub fn new(registry: Arc<SessionRegistry>, chart_renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            registry,
            chart_renderer,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestForecastCommand,
    ) -> Result<RequestForecastResult, SessionError> {
        // 1. Compute the forecast under the session lock.
        let forecast = {
            let cell = self.registry.get_or_create(&cmd.user_id).await?;
            let mut cell = cell.lock().await;
            cell.session.forecast(cmd.horizon)?
        };

        // 2. Render the chart outside the lock.
        let chart = match self.chart_renderer.render(&forecast).await {
            Ok(artifact) => Some(artifact),
            Err(err) => {
                warn!(user_id = %cmd.user_id, error = %err, "Chart rendering failed");
                None
            }
        };

        Ok(RequestForecastResult { forecast, chart })
    }
}
