use crate::models::HistoryEntry;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str = "Question,Your Answer,Correct Answer,Result,Feedback";

/// Render the answered-question log as CSV, one row per history entry.
pub fn history_to_csv(history: &[HistoryEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for entry in history {
        let result = if entry.chosen == entry.correct {
            "Correct"
        } else {
            "Incorrect"
        };
        let fields = [
            entry.question.as_str(),
            entry.chosen.as_str(),
            entry.correct.as_str(),
            result,
            entry.feedback.as_str(),
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write the CSV next to other exports, named by local timestamp.
pub fn write_csv(dir: &Path, history: &[HistoryEntry]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let filename = format!("quiz_results_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    fs::write(&path, history_to_csv(history))?;
    Ok(path)
}
