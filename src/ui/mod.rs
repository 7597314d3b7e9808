//! egui rendering: every function takes the session state and draws one area
//! of the window.

pub mod dashboard;
pub mod panels;
pub mod plot;
pub mod table;
