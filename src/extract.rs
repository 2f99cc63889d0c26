use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Directory scanned for quizzable documents.
pub const DOCUMENTS_DIR: &str = "documents";

/// Extract the text of an uploaded document.
///
/// Only `.pdf` and `.docx` are understood; any other extension yields an
/// empty string, which the menu reports as "no document" rather than an
/// error. Extraction quality is delegated entirely to the backing crates.
pub fn extract_text(path: &Path) -> Result<String, String> {
    let data = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf(&data),
        "docx" => extract_docx(&data),
        _ => Ok(String::new()),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(data)
        .map_err(|e| format!("Failed to extract PDF text: {}", e))
}

/// A DOCX file is a ZIP archive whose body lives in `word/document.xml`.
/// Text runs (`w:t`) are concatenated, with a newline per paragraph (`w:p`),
/// matching how word processors join runs for display.
fn extract_docx(data: &[u8]) -> Result<String, String> {
    let cursor = std::io::Cursor::new(data);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| format!("Failed to open DOCX archive: {}", e))?;

    let mut xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("DOCX has no document body: {}", e))?
        .read_to_end(&mut xml)
        .map_err(|e| format!("Failed to read DOCX body: {}", e))?;

    let mut reader = Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let run = t
                    .unescape()
                    .map_err(|e| format!("Failed to decode DOCX text: {}", e))?;
                text.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("Failed to parse DOCX body: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// List the quizzable documents, sorted by name.
pub fn find_documents() -> Vec<PathBuf> {
    documents_in(Path::new(DOCUMENTS_DIR))
}

fn documents_in(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.exists()
        && dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                if ext == "pdf" || ext == "docx" {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_unknown_extension_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "plain text body").unwrap();

        let text = extract_text(&path).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = extract_text(Path::new("does-not-exist.pdf"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pdf_bytes_fail() {
        assert!(extract_pdf(b"not a pdf at all").is_err());
    }

    #[test]
    fn test_docx_paragraphs_joined_with_newlines() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = extract_docx(&docx_bytes(xml)).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.\n");
    }

    #[test]
    fn test_docx_unescapes_entities() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>A &amp; B</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract_docx(&docx_bytes(xml)).unwrap();
        assert_eq!(text, "A & B\n");
    }

    #[test]
    fn test_docx_without_body_fails() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("unrelated.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        assert!(extract_docx(&data).is_err());
    }

    #[test]
    fn test_docx_extraction_via_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.docx");
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body></w:document>"#;
        fs::write(&path, docx_bytes(xml)).unwrap();

        let text = extract_text(&path).unwrap();
        assert_eq!(text, "Hello\n");
    }

    #[test]
    fn test_find_documents_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a.docx"), b"x").unwrap();
        fs::write(dir.path().join("skip.txt"), b"x").unwrap();

        let files = documents_in(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.docx", "b.pdf"]);
    }

    #[test]
    fn test_find_documents_missing_dir() {
        assert!(documents_in(Path::new("no-such-dir")).is_empty());
    }
}
