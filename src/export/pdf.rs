use crate::models::{HistoryEntry, Letter};
use chrono::Local;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::fs;
use std::path::{Path, PathBuf};

const WRAP_COLUMNS: usize = 90;

/// A4 report writer with a vertical cursor; starts a fresh page whenever
/// the cursor falls below the bottom margin.
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: Mm,
}

impl ReportWriter {
    fn new() -> Result<Self, String> {
        let (doc, page, layer) = PdfDocument::new("Quiz Results", Mm(210.0), Mm(297.0), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| format!("Failed to load report font: {}", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| format!("Failed to load report font: {}", e))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: Mm(280.0),
        })
    }

    fn advance(&mut self) {
        self.y = Mm(self.y.0 - 6.0);
        if self.y.0 < 20.0 {
            let (page, layer) = self.doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(280.0);
        }
    }

    fn heading(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_COLUMNS) {
            self.layer.use_text(line, 12.0, Mm(15.0), self.y, &self.bold);
            self.advance();
        }
    }

    fn line(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_COLUMNS) {
            self.layer.use_text(line, 10.0, Mm(15.0), self.y, &self.font);
            self.advance();
        }
    }

    fn gap(&mut self) {
        self.advance();
    }

    fn finish(self) -> Result<Vec<u8>, String> {
        self.doc
            .save_to_bytes()
            .map_err(|e| format!("Failed to render PDF: {}", e))
    }
}

/// Greedy word wrap; a single overlong word gets a line of its own.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn option_marker(letter: Letter, entry: &HistoryEntry) -> &'static str {
    if letter == entry.correct {
        "+"
    } else if letter == entry.chosen {
        "x"
    } else {
        "-"
    }
}

/// Render the quiz results as a paginated PDF report: title, score line,
/// then each question with its options (correct answer marked `+`, a wrong
/// pick marked `x`) and the recorded feedback.
pub fn render_pdf(history: &[HistoryEntry], score: usize) -> Result<Vec<u8>, String> {
    let mut writer = ReportWriter::new()?;

    writer.heading("Quiz Results");
    let percent = if history.is_empty() {
        0.0
    } else {
        (score * 100) as f64 / history.len() as f64
    };
    writer.line(&format!(
        "Score: {} out of {} ({:.2}%)",
        score,
        history.len(),
        percent
    ));
    writer.gap();

    for (i, entry) in history.iter().enumerate() {
        writer.heading(&format!("Q{}: {}", i + 1, entry.question));
        for letter in Letter::ALL {
            writer.line(&format!(
                "  {} {}) {}",
                option_marker(letter, entry),
                letter,
                entry.options[letter.index()]
            ));
        }
        writer.line(&format!("  Feedback: {}", entry.feedback));
        writer.gap();
    }

    writer.finish()
}

/// Write the PDF report next to other exports, named by local timestamp.
pub fn write_pdf(dir: &Path, history: &[HistoryEntry], score: usize) -> Result<PathBuf, String> {
    let bytes = render_pdf(history, score)?;
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create export dir: {}", e))?;
    let filename = format!("quiz_results_{}.pdf", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    fs::write(&path, bytes).map_err(|e| format!("Failed to write PDF: {}", e))?;
    Ok(path)
}
