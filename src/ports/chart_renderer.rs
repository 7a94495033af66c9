//! Chart Renderer Port - Turns a trend forecast into a shareable chart.
//!
//! Rendering happens outside the core. An implementation may call a
//! hosted charting service or write an image locally; the core only
//! needs something it can hand to the chat layer.

use async_trait::async_trait;

use crate::domain::trend::TrendForecast;

/// A rendered chart ready for delivery to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartArtifact {
    /// URL to a hosted chart image.
    Url(String),
}

/// Port for rendering price-trend charts.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Renders the forecast as a chart artifact.
    async fn render(&self, forecast: &TrendForecast) -> Result<ChartArtifact, ChartError>;
}

/// Chart rendering errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChartError {
    /// The rendering backend failed or was unreachable.
    #[error("chart rendering failed: {0}")]
    RenderFailed(String),
}

impl ChartError {
    /// Creates a render failure error.
    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::RenderFailed(message.into())
    }
}
