//! Chart.js configurations. The browser passes these straight to `new Chart`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::dashboard::StatusCounts;
use crate::models::job::Status;
use crate::views::aggregate::MonthBucket;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<u32>,
    /// One color per slice for doughnuts, a single color for bar series.
    pub background_color: Value,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Value,
}

fn title_plugin(text: &str) -> Value {
    json!({
        "display": true,
        "text": text,
        "font": { "size": 16 }
    })
}

/// Doughnut with one slice per status in display order.
pub fn render_status_chart(counts: &StatusCounts) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: Status::ALL.iter().map(|s| s.label().to_string()).collect(),
            datasets: vec![Dataset {
                label: None,
                data: Status::ALL.iter().map(|s| counts.get(*s)).collect(),
                background_color: json!(Status::ALL.map(Status::color)),
                border_width: 1,
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "position": "right" },
                "title": title_plugin("Application Status Distribution")
            }
        }),
    }
}

/// Stacked bars, one group per month (oldest first), one series per status.
pub fn render_timeline_chart(buckets: &[MonthBucket]) -> ChartSpec {
    let datasets = Status::ALL
        .iter()
        .map(|status| Dataset {
            label: Some(status.label().to_string()),
            data: buckets.iter().map(|b| b.counts.get(*status)).collect(),
            background_color: json!(status.color()),
            border_width: 1,
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            datasets,
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "scales": {
                "x": { "stacked": true },
                "y": {
                    "stacked": true,
                    "beginAtZero": true,
                    "ticks": { "precision": 0 }
                }
            },
            "plugins": {
                "title": title_plugin("Job Applications Timeline")
            }
        }),
    }
}
