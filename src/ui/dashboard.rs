use eframe::egui::{self, RichText, ScrollArea, Ui};

use super::{panels, plot, table};
use crate::chart::ChartKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – dashboard sections, top to bottom
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.view.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Please upload your CSV file  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new("Interactive Data Dashboard").size(28.0));
            });
            ui.add_space(8.0);

            overview_sections(ui, state);
            selection_section(ui, state);
            visualization_section(ui, state);
            histogram_section(ui, state);
            filtered_section(ui, state);
        });
}

fn overview_sections(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };

    ui.heading("Dataset Overview");
    egui::CollapsingHeader::new("Preview Dataset")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            table::data_table(ui, "preview_table", &view.preview);
        });
    ui.add_space(8.0);

    ui.heading("Summary Statistics");
    egui::CollapsingHeader::new("View Summary")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            table::summary_table(ui, "summary_table", &view.summary);
            if ui.small_button("Copy as JSON").clicked() {
                match view.summary.to_json() {
                    Ok(json) => ui.ctx().copy_text(json),
                    Err(e) => log::warn!("Could not serialize summary: {e}"),
                }
            }
        });
    ui.add_space(8.0);
}

fn selection_section(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns: Vec<(String, &'static str)> = dataset
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.kind.dtype_label()))
        .collect();

    ui.heading("Select Columns of Your Choice for Visualization");

    ui.label("Select a column for visualization");
    let current = state.selected_column.clone();
    let mut picked = current.clone();
    egui::ComboBox::from_id_salt("single_column")
        .selected_text(current.as_deref().unwrap_or("—"))
        .show_ui(ui, |ui: &mut Ui| {
            for (name, dtype) in &columns {
                ui.selectable_value(&mut picked, Some(name.clone()), name)
                    .on_hover_text(*dtype);
            }
        });
    if picked != current {
        state.set_selected_column(picked);
    }

    ui.add_space(4.0);
    ui.label("Select multiple columns for analysis");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (name, _) in &columns {
            let mut checked = state.histogram_columns.contains(name);
            if ui.checkbox(&mut checked, name).changed() {
                state.toggle_histogram_column(name);
            }
        }
    });
    ui.add_space(8.0);
}

fn visualization_section(ui: &mut Ui, state: &mut AppState) {
    if state.selected_column.is_none() {
        return;
    }

    ui.heading("Visualizations");
    let mut kind = state.chart_kind;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Choose plot type");
        for k in ChartKind::SINGLE_COLUMN {
            let response = ui.radio_value(&mut kind, k, k.label());
            if k == ChartKind::Scatter {
                response.on_hover_text("Plots the column against the table's first column");
            }
        }
    });
    state.set_chart_kind(kind);

    if let Some(chart) = state.view.as_ref().and_then(|v| v.chart.as_ref()) {
        plot::chart(ui, "single_chart", chart);
    }
    ui.add_space(8.0);
}

fn histogram_section(ui: &mut Ui, state: &AppState) {
    if state.histogram_columns.is_empty() {
        return;
    }
    let Some(view) = &state.view else {
        return;
    };

    ui.heading("Histogram for Selected Columns");
    for (i, chart) in view.histograms.iter().enumerate() {
        plot::chart(ui, &format!("histogram_{i}"), chart);
        ui.add_space(6.0);
    }
    ui.add_space(8.0);
}

fn filtered_section(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = &state.view else {
        return;
    };

    ui.heading("Filtered Dataset");
    table::data_table(ui, "filtered_table", &view.filtered);
    ui.add_space(8.0);

    ui.heading("Download Processed Dataset");
    if ui.button("Download CSV").clicked() {
        panels::save_export_dialog(state);
    }
}
