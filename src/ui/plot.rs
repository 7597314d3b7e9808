use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::chart::{BoxStats, Chart};
use crate::color::ColorMap;

const CHART_HEIGHT: f32 = 320.0;
const MARGINAL_HEIGHT: f32 = 70.0;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Draw one rendered chart. `id` must be unique within the frame.
pub fn chart(ui: &mut Ui, id: &str, chart: &Chart) {
    match chart {
        Chart::Line { column, points } => {
            let series: PlotPoints = points.iter().copied().collect();
            base_plot(id)
                .x_axis_label("index")
                .y_axis_label(column.as_str())
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(series)
                            .name(column)
                            .color(Color32::LIGHT_BLUE)
                            .width(1.5),
                    );
                });
        }

        Chart::Bar { column, counts } => {
            let labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();
            let colors = ColorMap::new(labels.iter().map(String::as_str));
            let bars = counts
                .iter()
                .enumerate()
                .map(|(i, (label, n))| {
                    Bar::new(i as f64, *n as f64)
                        .name(label)
                        .fill(colors.color_for(label))
                        .width(0.8)
                })
                .collect();

            base_plot(id)
                .x_axis_label(column.as_str())
                .y_axis_label("Count")
                .x_axis_formatter(category_formatter(labels))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).name("Count"));
                });
        }

        Chart::Box {
            column,
            stats,
            values,
        } => {
            // Every point is drawn to the left of the box with a small
            // deterministic jitter.
            let points: PlotPoints = values
                .iter()
                .enumerate()
                .map(|(i, &v)| [-0.6 + ((i % 7) as f64 - 3.0) * 0.03, v])
                .collect();

            base_plot(id)
                .y_axis_label(column.as_str())
                .show_x(false)
                .show(ui, |plot_ui| {
                    if let Some(stats) = stats {
                        plot_ui.box_plot(
                            BoxPlot::new(vec![box_elem(0.0, stats).name(column)])
                                .color(Color32::LIGHT_BLUE),
                        );
                    }
                    plot_ui.points(
                        Points::new(points)
                            .name("points")
                            .radius(2.5)
                            .color(Color32::LIGHT_BLUE),
                    );
                });
        }

        Chart::Scatter {
            x_column,
            y_column,
            points,
            y_categories,
        } => {
            let series: PlotPoints = points.iter().copied().collect();
            let mut plot = base_plot(id)
                .x_axis_label(x_column.as_str())
                .y_axis_label(y_column.as_str());
            if let Some(labels) = y_categories {
                plot = plot.y_axis_formatter(category_formatter(labels.clone()));
            }
            plot.show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(series)
                        .name(format!("{y_column} vs {x_column}"))
                        .radius(3.0)
                        .color(Color32::LIGHT_BLUE),
                );
            });
        }

        Chart::Histogram {
            column,
            title,
            bins,
            marginal,
        } => {
            ui.strong(title);
            let color = ColorMap::new([column.as_str()]).color_for(column);

            if let Some(stats) = marginal {
                Plot::new(format!("{id}_marginal"))
                    .height(MARGINAL_HEIGHT)
                    .show_y(false)
                    .show_axes([false, false])
                    .allow_scroll(false)
                    .show(ui, |plot_ui| {
                        plot_ui.box_plot(
                            BoxPlot::new(vec![box_elem(0.0, stats).name(column)])
                                .horizontal()
                                .color(color),
                        );
                    });
            }

            let bars = bins
                .iter()
                .map(|b| {
                    Bar::new((b.start + b.end) / 2.0, b.count as f64)
                        .width(b.end - b.start)
                        .fill(color)
                })
                .collect();
            base_plot(id)
                .x_axis_label(column.as_str())
                .y_axis_label("count")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).name(column).color(color));
                });
        }
    }
}

fn base_plot(id: &str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

fn box_elem(position: f64, stats: &BoxStats) -> BoxElem {
    BoxElem::new(
        position,
        BoxSpread::new(
            stats.lower_whisker,
            stats.q1,
            stats.median,
            stats.q3,
            stats.upper_whisker,
        ),
    )
}

/// Axis labels for category codes `0, 1, 2, …`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}
