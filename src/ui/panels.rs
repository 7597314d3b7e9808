use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::state::{AppState, StatusMessage};

// ---------------------------------------------------------------------------
// Left side panel – range filters
// ---------------------------------------------------------------------------

/// Render the left filter panel: one low/high slider pair per numeric column.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Numeric columns in table order; the filter map itself is sorted by name.
    let columns: Vec<String> = dataset
        .numeric_columns()
        .map(|c| c.name.clone())
        .filter(|name| state.filters.contains_key(name))
        .collect();

    if columns.is_empty() {
        ui.label("No numeric columns to filter.");
        return;
    }

    ui.strong("Filter by Numeric Column");
    if ui
        .add_enabled(
            crate::data::filter::is_narrowed(&state.filters),
            egui::Button::new("Reset all"),
        )
        .clicked()
    {
        state.reset_filters();
    }
    ui.add_space(4.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let Some(range) = state.filters.get(col).copied() else {
                    continue;
                };

                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("Range for {col}")).strong());
                    if range.is_narrowed() && ui.small_button("↺").on_hover_text("Reset").clicked() {
                        state.reset_filter(col);
                    }
                });

                let mut low = range.low;
                let mut high = range.high;
                let domain = range.min..=range.max;
                let low_changed = ui
                    .add(Slider::new(&mut low, domain.clone()).text("min"))
                    .changed();
                let high_changed = ui
                    .add(Slider::new(&mut high, domain).text("max"))
                    .changed();

                if low_changed || high_changed {
                    // Dragging one handle past the other drags the other along.
                    if low_changed && low > high {
                        high = low;
                    }
                    if high_changed && high < low {
                        low = high;
                    }
                    state.set_filter_range(col, low, high);
                }
                ui.add_space(6.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.view.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download CSV…"))
                .clicked()
            {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} rows loaded, {} after filters",
                ds.row_count(),
                view.filtered.row_count()
            ));
            ui.separator();
        }

        match &state.status_message {
            Some(StatusMessage::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::from_rgb(76, 175, 80)));
            }
            Some(StatusMessage::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Please upload your CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        // Failures are already reported in the status line.
        let _ = state.load_path(&path);
    }
}

/// Ask where to save the filtered dataset and write it there.
pub fn save_export_dialog(state: &mut AppState) {
    if state.view.is_none() {
        return;
    }

    let Some(path) = rfd::FileDialog::new()
        .set_title("Download processed dataset")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    // Failures are already reported in the status line.
    let _ = state.save_export(&path);
}
