//! Plotly figure JSON adapter implementing ChartPort.
//!
//! Produces `{"data": [...], "layout": {...}}`, loadable with
//! `Plotly.newPlot(div, fig.data, fig.layout)`. Undefined values are
//! written as `null`, which Plotly draws as gaps.

use serde::Serialize;

use crate::domain::chart::{Axis, AxisSide, ChartSpec, HoverMode};
use crate::domain::error::CotError;
use crate::ports::chart_port::ChartPort;

#[derive(Debug, Serialize)]
struct Figure<'a> {
    data: Vec<Trace<'a>>,
    layout: Layout<'a>,
}

#[derive(Debug, Serialize)]
struct Trace<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    name: &'a str,
    x: &'a [String],
    y: &'a [Option<f64>],
    #[serde(skip_serializing_if = "Option::is_none")]
    yaxis: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Layout<'a> {
    title: AxisTitle<'a>,
    xaxis: AxisLayout<'a>,
    yaxis: AxisLayout<'a>,
    yaxis2: AxisLayout<'a>,
    hovermode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
}

#[derive(Debug, Serialize)]
struct AxisTitle<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct AxisLayout<'a> {
    title: AxisTitle<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    side: Option<&'static str>,
}

fn side_name(side: AxisSide) -> &'static str {
    match side {
        AxisSide::Left => "left",
        AxisSide::Right => "right",
    }
}

fn figure(chart: &ChartSpec) -> Figure<'_> {
    let data = chart
        .series
        .iter()
        .map(|s| Trace {
            kind: "scatter",
            mode: "lines",
            name: &s.name,
            x: &chart.x,
            y: &s.values,
            yaxis: match s.axis {
                Axis::Primary => None,
                Axis::Secondary => Some("y2"),
            },
        })
        .collect();

    let secondary = &chart.secondary_axis;
    let layout = Layout {
        title: AxisTitle { text: &chart.title },
        xaxis: AxisLayout {
            title: AxisTitle {
                text: &chart.x_title,
            },
            overlaying: None,
            side: None,
        },
        yaxis: AxisLayout {
            title: AxisTitle {
                text: &chart.primary_axis.title,
            },
            overlaying: None,
            side: None,
        },
        yaxis2: AxisLayout {
            title: AxisTitle {
                text: &secondary.title,
            },
            overlaying: secondary.overlaying.then_some("y"),
            side: Some(side_name(secondary.side)),
        },
        hovermode: match chart.hover_mode {
            HoverMode::X => "x",
        },
        width: chart.width,
        height: chart.height,
    };

    Figure { data, layout }
}

pub struct PlotlyJsonAdapter {
    pretty: bool,
}

impl PlotlyJsonAdapter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Default for PlotlyJsonAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPort for PlotlyJsonAdapter {
    fn render(&self, chart: &ChartSpec) -> Result<String, CotError> {
        let fig = figure(chart);
        let result = if self.pretty {
            serde_json::to_string_pretty(&fig)
        } else {
            serde_json::to_string(&fig)
        };
        result.map_err(|e| CotError::Render {
            reason: format!("JSON serialization failed: {}", e),
        })
    }
}
