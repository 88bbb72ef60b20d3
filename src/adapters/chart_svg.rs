//! Static SVG rendering of a dual-axis chart.
//!
//! Primary-axis series are scaled to the left axis range, secondary-axis
//! series to the right one. Undefined values break a line into segments.

use crate::domain::chart::{Axis, ChartSpec, Series};
use crate::domain::error::CotError;
use crate::ports::chart_port::ChartPort;

const DEFAULT_WIDTH: f64 = 1000.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const PADDING: f64 = 60.0;
const STROKES: [&str; 3] = ["#F5B14C", "#47DBCD", "#8C54FF"];

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &ChartSpec) -> Result<String, CotError> {
        Ok(generate_chart_svg(chart))
    }
}

/// Min and max of the defined values of every series on `axis`.
fn axis_range(chart: &ChartSpec, axis: Axis) -> Option<(f64, f64)> {
    let values = chart
        .series
        .iter()
        .filter(|s| s.axis == axis)
        .flat_map(|s| s.values.iter().flatten().copied());

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    (min <= max).then_some((min, max))
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct Frame {
    width: f64,
    height: f64,
    points: usize,
}

impl Frame {
    fn plot_width(&self) -> f64 {
        self.width - 2.0 * PADDING
    }

    fn plot_height(&self) -> f64 {
        self.height - 2.0 * PADDING
    }

    fn x(&self, i: usize) -> f64 {
        if self.points > 1 {
            PADDING + i as f64 * self.plot_width() / (self.points - 1) as f64
        } else {
            PADDING + self.plot_width() / 2.0
        }
    }

    fn y(&self, value: f64, (min, max): (f64, f64)) -> f64 {
        let range = max - min;
        if range > 0.0 {
            self.height - PADDING - (value - min) / range * self.plot_height()
        } else {
            self.height / 2.0
        }
    }
}

/// Polyline segments of one series, split wherever a value is undefined.
fn series_paths(series: &Series, frame: &Frame, range: (f64, f64), stroke: &str) -> String {
    let mut segments: Vec<Vec<String>> = vec![Vec::new()];
    for (i, value) in series.values.iter().enumerate() {
        match value {
            Some(v) => {
                if let Some(segment) = segments.last_mut() {
                    segment.push(format!("{:.1},{:.1}", frame.x(i), frame.y(*v, range)));
                }
            }
            None => segments.push(Vec::new()),
        }
    }

    segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|points| {
            format!(
                r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
                stroke,
                points.join(" ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn generate_chart_svg(chart: &ChartSpec) -> String {
    let frame = Frame {
        width: chart.width.map(f64::from).unwrap_or(DEFAULT_WIDTH),
        height: chart.height.map(f64::from).unwrap_or(DEFAULT_HEIGHT),
        points: chart.x.len(),
    };

    let mut body = Vec::new();

    // axes
    body.push(format!(
        r#"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = frame.height - PADDING
    ));
    body.push(format!(
        r#"<line x1="{r:.0}" y1="{p:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        r = frame.width - PADDING,
        b = frame.height - PADDING
    ));
    body.push(format!(
        r#"<line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        r = frame.width - PADDING,
        b = frame.height - PADDING
    ));

    // titles
    body.push(format!(
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-size="16">{}</text>"#,
        frame.width / 2.0,
        PADDING / 2.0,
        escape_xml(&chart.title)
    ));
    body.push(format!(
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle">{}</text>"#,
        frame.width / 2.0,
        frame.height - PADDING / 4.0,
        escape_xml(&chart.x_title)
    ));
    body.push(format!(
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" transform="rotate(-90 {:.0} {:.0})">{}</text>"#,
        PADDING / 4.0,
        frame.height / 2.0,
        PADDING / 4.0,
        frame.height / 2.0,
        escape_xml(&chart.primary_axis.title)
    ));
    body.push(format!(
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" transform="rotate(90 {:.0} {:.0})">{}</text>"#,
        frame.width - PADDING / 4.0,
        frame.height / 2.0,
        frame.width - PADDING / 4.0,
        frame.height / 2.0,
        escape_xml(&chart.secondary_axis.title)
    ));

    if chart.is_empty() {
        body.push(format!(
            r#"<text x="{:.0}" y="{:.0}" text-anchor="middle">No data in range.</text>"#,
            frame.width / 2.0,
            frame.height / 2.0
        ));
    } else {
        // first and last date labels
        body.push(format!(
            r#"<text x="{:.0}" y="{:.0}" text-anchor="start" font-size="10">{}</text>"#,
            PADDING,
            frame.height - PADDING + 14.0,
            escape_xml(&chart.x[0])
        ));
        body.push(format!(
            r#"<text x="{:.0}" y="{:.0}" text-anchor="end" font-size="10">{}</text>"#,
            frame.width - PADDING,
            frame.height - PADDING + 14.0,
            escape_xml(&chart.x[chart.x.len() - 1])
        ));

        let primary = axis_range(chart, Axis::Primary);
        let secondary = axis_range(chart, Axis::Secondary);

        for (i, series) in chart.series.iter().enumerate() {
            let range = match series.axis {
                Axis::Primary => primary,
                Axis::Secondary => secondary,
            };
            if let Some(range) = range {
                body.push(series_paths(series, &frame, range, STROKES[i % STROKES.len()]));
            }
        }

        for (i, series) in chart.series.iter().enumerate() {
            let y = PADDING + 14.0 * (i as f64 + 1.0);
            body.push(format!(
                r#"<text x="{:.0}" y="{:.0}" font-size="10" fill="{}">{}</text>"#,
                PADDING + 8.0,
                y,
                STROKES[i % STROKES.len()],
                escape_xml(&series.name)
            ));
        }
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">
<rect width="100%" height="100%" fill="white"/>
{}
</svg>
"#,
        frame.width,
        frame.height,
        frame.width,
        frame.height,
        body.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{AxisSide, AxisSpec, HoverMode};

    fn chart(x: &[&str], close: Vec<Option<f64>>, net: Vec<Option<f64>>) -> ChartSpec {
        ChartSpec {
            title: "COT & Cierre".into(),
            x_title: "Fecha".into(),
            x: x.iter().map(|s| s.to_string()).collect(),
            series: vec![
                Series {
                    name: "Cierre".into(),
                    axis: Axis::Secondary,
                    values: close,
                },
                Series {
                    name: "Comerciales".into(),
                    axis: Axis::Primary,
                    values: net,
                },
            ],
            primary_axis: AxisSpec {
                title: "Datos COT".into(),
                side: AxisSide::Left,
                overlaying: false,
            },
            secondary_axis: AxisSpec {
                title: "Cierre".into(),
                side: AxisSide::Right,
                overlaying: true,
            },
            hover_mode: HoverMode::X,
            width: None,
            height: None,
        }
    }

    #[test]
    fn empty_chart_has_placeholder() {
        let svg = generate_chart_svg(&chart(&[], vec![], vec![]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No data in range."));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn one_polyline_per_series() {
        let svg = generate_chart_svg(&chart(
            &["05 Jan 24", "12 Jan 24", "19 Jan 24"],
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(-10.0), Some(0.0), Some(10.0)],
        ));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("05 Jan 24"));
        assert!(svg.contains("19 Jan 24"));
    }

    #[test]
    fn undefined_value_splits_line() {
        let svg = generate_chart_svg(&chart(
            &["a", "b", "c", "d"],
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            vec![Some(1.0), Some(2.0), None, Some(4.0)],
        ));
        assert_eq!(svg.matches("<polyline").count(), 3);
    }

    #[test]
    fn default_dimensions() {
        let svg = generate_chart_svg(&chart(&["a"], vec![Some(1.0)], vec![Some(1.0)]));
        assert!(svg.contains(r#"width="1000""#));
        assert!(svg.contains(r#"height="600""#));
    }

    #[test]
    fn custom_dimensions() {
        let mut c = chart(&["a"], vec![Some(1.0)], vec![Some(1.0)]);
        c.width = Some(800);
        c.height = Some(400);
        let svg = generate_chart_svg(&c);
        assert!(svg.contains(r#"viewBox="0 0 800 400""#));
    }

    #[test]
    fn text_is_escaped() {
        let svg = generate_chart_svg(&chart(&[], vec![], vec![]));
        assert!(svg.contains("COT &amp; Cierre"));
    }

    #[test]
    fn extremes_map_to_plot_edges() {
        let frame = Frame {
            width: 1000.0,
            height: 600.0,
            points: 3,
        };
        assert_eq!(frame.y(0.0, (0.0, 10.0)), 540.0);
        assert_eq!(frame.y(10.0, (0.0, 10.0)), 60.0);
        assert_eq!(frame.x(0), 60.0);
        assert_eq!(frame.x(2), 940.0);
    }

    #[test]
    fn axis_range_ignores_undefined() {
        let c = chart(
            &["a", "b"],
            vec![Some(5.0), None],
            vec![None, Some(-3.0)],
        );
        assert_eq!(axis_range(&c, Axis::Secondary), Some((5.0, 5.0)));
        assert_eq!(axis_range(&c, Axis::Primary), Some((-3.0, -3.0)));
    }
}
