use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{ChartArtifact, ChartFigure, ChartKind, Granularity, PricePoint};

pub const WHITE_TEMPLATE: &str = "plotly_white";

/// Capability that turns a figure into markup the presentation layer can
/// splice into a page. Implementations must not emit a full document.
pub trait ChartBackend: Send + Sync {
    fn embed(&self, figure: &ChartFigure) -> String;
}

/// Builds the closing-price figure for `series` and lets `backend` draw it.
pub fn render(
    series: Vec<PricePoint>,
    kind: ChartKind,
    symbol: &str,
    granularity: Granularity,
    backend: &dyn ChartBackend,
) -> ChartArtifact {
    let interval = granularity.interval_label();
    let figure = match kind {
        ChartKind::Bar => ChartFigure {
            kind,
            title: format!("{} Stock Prices ({}) - Bar Chart", symbol, interval),
            x_axis_label: "Date".to_string(),
            y_axis_label: "Close".to_string(),
            template: None,
            points: series,
        },
        ChartKind::Line => ChartFigure {
            kind,
            title: format!("{} Stock Prices ({}) - Line Chart", symbol, interval),
            x_axis_label: "Date".to_string(),
            y_axis_label: "Price (USD)".to_string(),
            template: Some(WHITE_TEMPLATE.to_string()),
            points: series,
        },
    };

    let markup = backend.embed(&figure);
    ChartArtifact { figure, markup }
}

/// Emits a `<div>` plus an inline `Plotly.newPlot` call. The page embedding
/// the fragment is expected to load plotly.js.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyBackend;

impl PlotlyBackend {
    fn trace(figure: &ChartFigure) -> Value {
        let x: Vec<String> = figure
            .points
            .iter()
            .map(|p| p.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
            .collect();
        let y: Vec<f64> = figure.points.iter().map(|p| p.close).collect();

        match figure.kind {
            ChartKind::Line => json!({
                "type": "scatter",
                "mode": "lines",
                "name": "Close Price",
                "x": x,
                "y": y,
            }),
            ChartKind::Bar => json!({
                "type": "bar",
                "name": "Close",
                "x": x,
                "y": y,
            }),
        }
    }

    fn layout(figure: &ChartFigure) -> Value {
        let mut layout = json!({
            "title": { "text": figure.title },
            "xaxis": { "title": { "text": figure.x_axis_label } },
            "yaxis": { "title": { "text": figure.y_axis_label } },
        });

        // plotly.js has no named templates; spell out the white one
        if figure.template.as_deref() == Some(WHITE_TEMPLATE) {
            layout["paper_bgcolor"] = json!("white");
            layout["plot_bgcolor"] = json!("white");
            layout["xaxis"]["gridcolor"] = json!("#EBF0F8");
            layout["yaxis"]["gridcolor"] = json!("#EBF0F8");
        }

        layout
    }
}

// JSON is inlined into a <script>; "</" must not appear literally.
fn script_safe(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

impl ChartBackend for PlotlyBackend {
    fn embed(&self, figure: &ChartFigure) -> String {
        let div_id = format!("chart-{}", Uuid::new_v4());
        let data = Value::Array(vec![Self::trace(figure)]);

        format!(
            concat!(
                r#"<div id="{id}" class="plotly-graph-div" style="height:100%; width:100%;"></div>"#,
                "\n",
                r#"<script type="text/javascript">Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});</script>"#
            ),
            id = div_id,
            data = script_safe(&data),
            layout = script_safe(&Self::layout(figure)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series() -> Vec<PricePoint> {
        ["2024-01-02", "2024-01-03", "2024-01-04"]
            .iter()
            .zip([158.4, 161.1, 160.0])
            .map(|(d, close)| PricePoint {
                timestamp: NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                close,
            })
            .collect()
    }

    #[test]
    fn test_line_chart_labels_and_template() {
        let artifact = render(series(), ChartKind::Line, "IBM", Granularity::Daily, &PlotlyBackend);
        let figure = &artifact.figure;

        assert_eq!(figure.kind, ChartKind::Line);
        assert_eq!(figure.title, "IBM Stock Prices (daily) - Line Chart");
        assert_eq!(figure.x_axis_label, "Date");
        assert_eq!(figure.y_axis_label, "Price (USD)");
        assert_eq!(figure.template.as_deref(), Some(WHITE_TEMPLATE));
        assert_eq!(figure.points.len(), 3);
    }

    #[test]
    fn test_bar_chart_title_uses_interval() {
        let artifact = render(series(), ChartKind::Bar, "AAPL", Granularity::Intraday, &PlotlyBackend);

        assert_eq!(artifact.figure.title, "AAPL Stock Prices (60min) - Bar Chart");
        assert!(artifact.markup.contains(r#""type":"bar""#));
    }

    #[test]
    fn test_markup_is_an_embeddable_fragment() {
        let artifact = render(series(), ChartKind::Line, "IBM", Granularity::Weekly, &PlotlyBackend);
        let markup = &artifact.markup;

        assert!(markup.starts_with("<div id=\"chart-"));
        assert!(markup.contains("Plotly.newPlot("));
        assert!(markup.contains("IBM Stock Prices (weekly) - Line Chart"));
        assert!(markup.contains(r#""mode":"lines""#));
        assert!(markup.contains("2024-01-02 00:00:00"));
        assert!(!markup.contains("<html"));
        assert!(!markup.contains("<body"));
    }

    #[test]
    fn test_empty_series_still_renders() {
        let artifact = render(Vec::new(), ChartKind::Line, "IBM", Granularity::Daily, &PlotlyBackend);

        assert!(artifact.figure.points.is_empty());
        assert!(artifact.markup.contains(r#""x":[]"#));
    }

    #[test]
    fn test_script_breakout_is_escaped() {
        let figure = ChartFigure {
            kind: ChartKind::Line,
            title: "</script><script>alert(1)</script>".to_string(),
            x_axis_label: "Date".to_string(),
            y_axis_label: "Price (USD)".to_string(),
            template: None,
            points: Vec::new(),
        };

        let markup = PlotlyBackend.embed(&figure);
        assert_eq!(markup.matches("</script>").count(), 1);
    }
}
