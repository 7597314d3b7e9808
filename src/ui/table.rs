use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;
use crate::data::summary::{NumericSummary, Summary};

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Data grid
// ---------------------------------------------------------------------------

/// Render a table with its row index as the first column.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table) {
    let columns = table.columns();

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .column(TableColumn::auto())
            .columns(TableColumn::auto().at_least(60.0), columns.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.label("");
                });
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&col.name)
                            .on_hover_text(col.kind.dtype_label());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.row_count(), |mut row| {
                    let r = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(table.index()[r].to_string()).weak());
                    });
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(col.values[r].to_string());
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// describe() grid
// ---------------------------------------------------------------------------

/// Render summary statistics with one row per statistic and one column per
/// described column, like `DataFrame.describe()`.
pub fn summary_table(ui: &mut Ui, id: &str, summary: &Summary) {
    let (names, rows): (Vec<String>, Vec<(&str, Vec<String>)>) = match summary {
        Summary::Numeric(cols) => {
            let stat = |label: &'static str, f: fn(&NumericSummary) -> Option<f64>| {
                (label, cols.iter().map(|c| fmt_stat(f(c))).collect::<Vec<_>>())
            };
            (
                cols.iter().map(|c| c.column.clone()).collect(),
                vec![
                    ("count", cols.iter().map(|c| c.count.to_string()).collect()),
                    stat("mean", |c| c.mean),
                    stat("std", |c| c.std),
                    stat("min", |c| c.min),
                    stat("25%", |c| c.q25),
                    stat("50%", |c| c.q50),
                    stat("75%", |c| c.q75),
                    stat("max", |c| c.max),
                ],
            )
        }
        Summary::Categorical(cols) => (
            cols.iter().map(|c| c.column.clone()).collect(),
            vec![
                ("count", cols.iter().map(|c| c.count.to_string()).collect()),
                ("unique", cols.iter().map(|c| c.unique.to_string()).collect()),
                (
                    "top",
                    cols.iter()
                        .map(|c| c.top.clone().unwrap_or_else(|| "NaN".into()))
                        .collect(),
                ),
                ("freq", cols.iter().map(|c| c.freq.to_string()).collect()),
            ],
        ),
        Summary::Empty => {
            ui.label("The dataset has no columns to describe.");
            return;
        }
    };

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(TableColumn::auto())
            .columns(TableColumn::auto().at_least(70.0), names.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.label("");
                });
                for name in &names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for (label, values) in &rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(RichText::new(*label).strong());
                        });
                        for v in values {
                            row.col(|ui: &mut Ui| {
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui: &mut Ui| ui.monospace(v),
                                );
                            });
                        }
                    });
                }
            });
    });
}

fn fmt_stat(v: Option<f64>) -> String {
    v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.6}"))
}
