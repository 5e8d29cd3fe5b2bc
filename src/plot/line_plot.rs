//! The county line chart: one line per selected county over time, drawn against the
//! national average of the plotted measurement.

use crate::aggregation::aggregator::{COUNTY_COL, DATE_STR_COL};
use crate::config::reference::{ReferenceConfig, YEAR_MONTH_LEVEL};
use crate::plot::error::PlotError;
use crate::plot::line_data::{LineData, INDEX_COL};
use crate::types::statistic::Statistic;
use crate::utils::title_case;
use log::debug;
use plotly::common::{Anchor, DashType, Font, Line, Marker, Mode, TickMode, Title};
use plotly::layout::{
    Annotation, Axis, HoverMode, ItemClick, Legend, Shape, ShapeLine, ShapeType,
};
use plotly::{Layout, Plot, Scatter};
use polars::prelude::DataType;
use std::collections::BTreeMap;
use std::path::Path;

pub const NATIONAL_AVERAGE: &str = "National Average";
const DEFAULT_TITLE: &str = "Irish Climate App";

const TITLE_FONT_PX: usize = 22;
// 11pt
const TICK_FONT_PX: usize = 15;
const TICK_ANGLE: f64 = -45.0;
const YEAR_MONTH_LABEL_STEP: usize = 3;

const LINE_WIDTH: f64 = 2.0;
const MARKER_SIZE: usize = 8;
const AVERAGE_COLOR: &str = "red";
const AVERAGE_WIDTH: f64 = 3.0;
const AVERAGE_OPACITY: f64 = 0.3;

/// One row of [`LineData`] as the chart sees it.
struct Point<'a> {
    county: &'a str,
    index: u32,
    label: &'a str,
    value: Option<f64>,
}

/// Builds the line chart of `column` for the counties in `selection`.
///
/// Lines follow the county order of `county_line_colors.json` and take their colour
/// from it; selected counties without a colour are not drawn. The dashed "National
/// Average" line sits at the mean of `column` over every county in `data`, ignoring
/// missing values. At `year-month` only every third tick keeps its label.
///
/// # Errors
///
/// * [`PlotError::UnknownColumn`] if `column` has no unit or is absent from `data`.
/// * [`PlotError::Polars`] if `data` lacks its index, county or label columns.
pub fn line_plot(
    data: &LineData,
    column: &str,
    statistic: Statistic,
    agg_level: &str,
    selection: &[String],
    config: &ReferenceConfig,
) -> Result<Plot, PlotError> {
    let unit = config
        .unit(column)
        .map_err(|_| PlotError::UnknownColumn(column.to_string()))?;
    let frame = &data.frame;
    let values = frame
        .column(column)
        .map_err(|_| PlotError::UnknownColumn(column.to_string()))?
        .cast(&DataType::Float64)?;
    let values = values.f64()?;
    let counties = frame.column(COUNTY_COL)?.str()?;
    let indices = frame.column(INDEX_COL)?.u32()?;
    let labels = frame.column(DATE_STR_COL)?.str()?;

    let points: Vec<Point> = counties
        .into_iter()
        .zip(indices)
        .zip(labels)
        .zip(values)
        .filter_map(|(((county, index), label), value)| {
            Some(Point {
                county: county?,
                index: index?,
                label: label.unwrap_or_default(),
                value: value.filter(|v| !v.is_nan()),
            })
        })
        .collect();

    let mut plot = Plot::new();
    let level_label = title_case(agg_level);
    for (county, color) in &config.county_line_colors {
        if selection.iter().any(|selected| selected == county) {
            plot.add_trace(county_trace(&points, county, color, column, &level_label));
        }
    }

    let mut shapes = Vec::new();
    if let Some(average) = national_average(&points) {
        debug!("National average of {} {}: {}", statistic, column, average);
        shapes.push(average_line(average));
    }

    let (tick_values, tick_text) = ticks(&points, agg_level == YEAR_MONTH_LEVEL);
    let title = config
        .fig_settings
        .title
        .as_deref()
        .unwrap_or(DEFAULT_TITLE);

    let layout = Layout::new()
        .title(
            Title::with_text(format!("<b>{}</b>", title)).font(Font::new().size(TITLE_FONT_PX)),
        )
        .height(config.fig_settings.height as usize)
        .width(config.fig_settings.width as usize)
        .show_legend(true)
        .hover_mode(HoverMode::Closest)
        .x_axis(
            Axis::new()
                .show_grid(false)
                .tick_font(Font::new().size(TICK_FONT_PX))
                .tick_mode(TickMode::Array)
                .tick_values(tick_values)
                .tick_text(tick_text)
                .tick_angle(TICK_ANGLE),
        )
        .y_axis(
            Axis::new()
                .show_grid(false)
                .tick_font(Font::new().size(TICK_FONT_PX))
                .title(Title::with_text(format!("{} {}", statistic, column))),
        )
        .legend(
            Legend::new()
                .x(1.02)
                .y(1.0)
                .x_anchor(Anchor::Left)
                .item_click(ItemClick::Toggle),
        )
        .shapes(shapes)
        .annotations(vec![Annotation::new()
            .text(format!("Units: {}", unit))
            .x_ref("paper")
            .y_ref("paper")
            .x(0.0)
            .y(0.0)
            .x_anchor(Anchor::Left)
            .y_anchor(Anchor::Bottom)
            .show_arrow(false)]);
    plot.set_layout(layout);

    Ok(plot)
}

/// Writes `plot` as a standalone HTML page.
pub fn write_html(plot: &Plot, path: &Path) -> Result<(), PlotError> {
    std::fs::write(path, plot.to_html()).map_err(|e| PlotError::Io(path.to_path_buf(), e))
}

fn national_average(points: &[Point]) -> Option<f64> {
    let (sum, count) = points
        .iter()
        .filter_map(|point| point.value)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn average_line(average: f64) -> Shape {
    Shape::new()
        .shape_type(ShapeType::Line)
        .name(NATIONAL_AVERAGE)
        .x_ref("paper")
        .x0(0.0)
        .x1(1.0)
        .y0(average)
        .y1(average)
        .opacity(AVERAGE_OPACITY)
        .line(
            ShapeLine::new()
                .color(AVERAGE_COLOR)
                .width(AVERAGE_WIDTH)
                .dash(DashType::Dash),
        )
}

/// Every distinct index with its label, blanking all but every third label when
/// `sparse` is set.
fn ticks(points: &[Point], sparse: bool) -> (Vec<f64>, Vec<String>) {
    let labels: BTreeMap<u32, &str> = points
        .iter()
        .map(|point| (point.index, point.label))
        .collect();
    labels
        .into_iter()
        .enumerate()
        .map(|(position, (index, label))| {
            let shown = !sparse || position % YEAR_MONTH_LABEL_STEP == 0;
            let text = if shown { label.to_string() } else { String::new() };
            (f64::from(index), text)
        })
        .unzip()
}

fn county_trace(
    points: &[Point],
    county: &str,
    color: &str,
    column: &str,
    level: &str,
) -> Box<Scatter<u32, Option<f64>>> {
    let mut rows: Vec<&Point> = points.iter().filter(|point| point.county == county).collect();
    rows.sort_by_key(|point| point.index);

    Scatter::new(
        rows.iter().map(|point| point.index).collect(),
        rows.iter().map(|point| point.value).collect(),
    )
    .name(county)
    .mode(Mode::LinesMarkers)
    .line(Line::new().color(color.to_string()).width(LINE_WIDTH))
    .marker(Marker::new().color(color.to_string()).size(MARKER_SIZE))
    .text_array(rows.iter().map(|point| point.label.to_string()).collect())
    .hover_template(&format!(
        "County: {}<br>{}: %{{text}}<br>Value: %{{y}} ({})<extra></extra>",
        county, level, column
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::line_data::tests::{line_config, preaggregate};
    use serde_json::Value;

    fn selection(counties: &[&str]) -> Vec<String> {
        counties.iter().map(|county| county.to_string()).collect()
    }

    fn plot_json(plot: &Plot) -> Value {
        serde_json::from_str(&plot.to_json()).unwrap()
    }

    fn year_month_plot(counties: &[&str]) -> Value {
        let config = line_config();
        let data =
            LineData::from_preaggregate(&preaggregate(), Statistic::Mean, "year-month", &config)
                .unwrap();
        let plot = line_plot(
            &data,
            "maxtp",
            Statistic::Mean,
            "year-month",
            &selection(counties),
            &config,
        )
        .unwrap();
        plot_json(&plot)
    }

    #[test]
    fn test_one_trace_per_selected_county_in_colour_order() {
        let config = line_config();
        let plot = year_month_plot(&["Dublin", "Cork"]);
        let traces = plot["data"].as_array().unwrap();

        let names: Vec<&str> = traces.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Cork", "Dublin"]);

        let cork = &traces[0];
        assert_eq!(cork["x"], serde_json::json!([0, 1, 2, 3]));
        assert_eq!(cork["y"], serde_json::json!([5.0, 7.0, 9.0, 11.0]));
        assert_eq!(cork["mode"], "lines+markers");
        assert_eq!(cork["line"]["color"], config.county_line_colors["Cork"].as_str());
        assert_eq!(cork["marker"]["size"], MARKER_SIZE);

        let dublin = &traces[1];
        assert_eq!(dublin["y"], serde_json::json!([4.0, null]));
        assert_eq!(dublin["text"], serde_json::json!(["2019-01", "2019-02"]));
        assert!(dublin["hovertemplate"]
            .as_str()
            .is_some_and(|hover| hover.contains("County: Dublin<br>Year-Month:")));
    }

    #[test]
    fn test_average_ignores_missing_values() {
        let plot = year_month_plot(&["Cork"]);

        let average = &plot["layout"]["shapes"][0];
        assert_eq!(average["name"], NATIONAL_AVERAGE);
        // Cork 5, 7, 9, 11 and Dublin 4, the missing Dublin month is skipped.
        let y0 = average["y0"].as_f64().unwrap();
        assert!((y0 - 7.2).abs() < 1e-12);
        assert_eq!(average["y0"], average["y1"]);
        assert_eq!(average["line"]["dash"], "dash");
        assert_eq!(average["line"]["color"], AVERAGE_COLOR);
        assert_eq!(average["opacity"], AVERAGE_OPACITY);
    }

    #[test]
    fn test_year_month_shows_every_third_label() {
        let plot = year_month_plot(&["Cork"]);
        let x_axis = &plot["layout"]["xaxis"];

        assert_eq!(x_axis["tickvals"], serde_json::json!([0.0, 1.0, 2.0, 3.0]));
        assert_eq!(x_axis["ticktext"], serde_json::json!(["2019-01", "", "", "2020-02"]));
        assert_eq!(x_axis["tickangle"], TICK_ANGLE);
        assert_eq!(x_axis["showgrid"], false);
        assert_eq!(plot["layout"]["yaxis"]["showgrid"], false);
    }

    #[test]
    fn test_other_levels_label_every_tick() -> Result<(), PlotError> {
        let config = line_config();
        let data = LineData::from_preaggregate(&preaggregate(), Statistic::Mean, "year", &config)?;
        let plot = line_plot(
            &data,
            "maxtp",
            Statistic::Mean,
            "year",
            &selection(&["Cork"]),
            &config,
        )?;
        let plot = plot_json(&plot);

        assert_eq!(plot["layout"]["xaxis"]["ticktext"], serde_json::json!(["2019", "2020"]));
        assert_eq!(plot["data"][0]["y"], serde_json::json!([6.0, 10.0]));
        Ok(())
    }

    #[test]
    fn test_layout_from_settings() {
        let config = line_config();
        let plot = year_month_plot(&[]);
        let layout = &plot["layout"];

        assert!(plot["data"].as_array().map_or(true, Vec::is_empty));
        assert_eq!(layout["height"], config.fig_settings.height);
        assert_eq!(layout["width"], config.fig_settings.width);
        assert_eq!(layout["title"]["font"]["size"], TITLE_FONT_PX);
        assert!(layout["title"]["text"].as_str().is_some_and(|t| t.starts_with("<b>")));
        assert_eq!(layout["annotations"][0]["text"], "Units: °C");
        assert_eq!(layout["legend"]["itemclick"], "toggle");
    }

    #[test]
    fn test_write_html() -> Result<(), Box<dyn std::error::Error>> {
        let config = line_config();
        let data =
            LineData::from_preaggregate(&preaggregate(), Statistic::Mean, "year-month", &config)?;
        let plot = line_plot(
            &data,
            "maxtp",
            Statistic::Mean,
            "year-month",
            &selection(&["Cork"]),
            &config,
        )?;

        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("plot.html");
        write_html(&plot, &path)?;
        let html = std::fs::read_to_string(&path)?;
        assert!(html.contains("Cork"));
        assert!(html.contains(NATIONAL_AVERAGE));

        let missing = dir.path().join("nested").join("plot.html");
        assert!(matches!(write_html(&plot, &missing), Err(PlotError::Io(..))));
        Ok(())
    }

    #[test]
    fn test_unknown_column() {
        let config = line_config();
        let data =
            LineData::from_preaggregate(&preaggregate(), Statistic::Mean, "year-month", &config)
                .unwrap();

        let result = line_plot(&data, "humidity", Statistic::Mean, "year-month", &[], &config);
        assert!(matches!(result, Err(PlotError::UnknownColumn(column)) if column == "humidity"));

        // Configured, but not part of this data.
        let result = line_plot(&data, "rain", Statistic::Mean, "year-month", &[], &config);
        assert!(matches!(result, Err(PlotError::UnknownColumn(column)) if column == "rain"));
    }
}
