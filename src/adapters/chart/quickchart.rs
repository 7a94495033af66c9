//! QuickChart trend chart renderer.
//!
//! Encodes a TrendForecast as a Chart.js line chart and returns a
//! quickchart.io URL for it. The chat transport can send that URL as a
//! photo without this process ever touching image bytes.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};

use crate::domain::trend::TrendForecast;
use crate::ports::{ChartArtifact, ChartError, ChartRenderer};

/// Configuration for the QuickChart renderer.
#[derive(Debug, Clone)]
pub struct QuickChartConfig {
    /// Chart endpoint URL.
    pub base_url: String,

    /// Rendered image width in pixels.
    pub width: u32,

    /// Rendered image height in pixels.
    pub height: u32,
}

impl Default for QuickChartConfig {
    fn default() -> Self {
        Self {
            base_url: "https://quickchart.io/chart".to_string(),
            width: 700,
            height: 400,
        }
    }
}

/// Chart renderer backed by the quickchart.io URL API.
pub struct QuickChartRenderer {
    config: QuickChartConfig,
}

impl QuickChartRenderer {
    /// Creates a new renderer.
    pub fn new(config: QuickChartConfig) -> Self {
        Self { config }
    }

    /// Builds the full chart URL for a forecast.
    fn chart_url(&self, forecast: &TrendForecast) -> Result<String, ChartError> {
        let config_json = serde_json::to_string(&chart_config(forecast)).map_err(|e| {
            ChartError::render_failed(format!("Chart config serialization failed: {}", e))
        })?;

        let width = self.config.width.to_string();
        let height = self.config.height.to_string();
        let url = Url::parse_with_params(
            &self.config.base_url,
            [
                ("c", config_json.as_str()),
                ("w", width.as_str()),
                ("h", height.as_str()),
            ],
        )
        .map_err(|e| ChartError::render_failed(format!("Invalid chart URL: {}", e)))?;

        Ok(url.to_string())
    }
}

#[async_trait]
impl ChartRenderer for QuickChartRenderer {
    async fn render(&self, forecast: &TrendForecast) -> Result<ChartArtifact, ChartError> {
        Ok(ChartArtifact::Url(self.chart_url(forecast)?))
    }
}

/// Builds the Chart.js config: one solid line over the historical
/// periods and one dashed line for the projection, anchored at the last
/// historical point so the two lines connect.
fn chart_config(forecast: &TrendForecast) -> Value {
    let mut labels: Vec<String> = forecast
        .history
        .iter()
        .map(|p| p.period.to_string())
        .collect();
    labels.extend(forecast.projection.iter().map(|p| p.period.to_string()));

    let mut actual: Vec<Value> = forecast
        .history
        .iter()
        .map(|p| json!(p.average_price.round()))
        .collect();
    actual.extend(std::iter::repeat(Value::Null).take(forecast.projection.len()));

    let mut projected: Vec<Value> = vec![Value::Null; forecast.history.len().saturating_sub(1)];
    if let Some(last) = forecast.history.last() {
        projected.push(json!(last.average_price.round()));
    }
    projected.extend(
        forecast
            .projection
            .iter()
            .map(|p| json!(p.predicted_price.round())),
    );

    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "label": "Average sale price",
                    "data": actual,
                    "fill": false,
                    "borderColor": "rgb(54, 162, 235)"
                },
                {
                    "label": "Projected",
                    "data": projected,
                    "fill": false,
                    "borderDash": [6, 4],
                    "borderColor": "rgb(255, 99, 132)"
                }
            ]
        },
        "options": {
            "title": {"display": true, "text": "Price trend"}
        }
    })
}
