pub mod csv;
pub mod pdf;

// Public API exports
pub use csv::{history_to_csv, write_csv};
pub use pdf::{render_pdf, write_pdf};
