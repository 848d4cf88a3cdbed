use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

/// Main body part of a WordprocessingML package.
const DOCX_BODY: &str = "word/document.xml";
/// Decompressed size cap for the body part.
const DOCX_BODY_LIMIT: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Unsupported resume format '{0}'; upload a PDF, DOCX or TXT file")]
    UnsupportedFormat(String),

    #[error("Resume could not be read: {0}")]
    Unreadable(String),

    #[error("Resume contains no extractable text")]
    Empty,
}

/// Formats accepted for CV upload, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Text,
}

impl ResumeFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ResumeError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(ResumeFormat::Pdf),
            "docx" => Ok(ResumeFormat::Docx),
            "txt" => Ok(ResumeFormat::Text),
            "" => Err(ResumeError::UnsupportedFormat(file_name.to_string())),
            other => Err(ResumeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Extracts plain text from an uploaded resume.
pub fn extract_resume_text(file_name: &str, bytes: &[u8]) -> Result<String, ResumeError> {
    let format = ResumeFormat::from_file_name(file_name)?;
    let text = match format {
        ResumeFormat::Text => String::from_utf8_lossy(bytes).into_owned(),
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(unreadable)?,
        ResumeFormat::Docx => docx_text(bytes)?,
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ResumeError::Empty);
    }
    debug!(file_name, chars = text.len(), "Extracted resume text");
    Ok(text.to_string())
}

fn unreadable(err: impl std::fmt::Display) -> ResumeError {
    ResumeError::Unreadable(err.to_string())
}

fn docx_text(bytes: &[u8]) -> Result<String, ResumeError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(unreadable)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(unreadable)?
        .take(DOCX_BODY_LIMIT)
        .read_to_string(&mut xml)
        .map_err(unreadable)?;
    paragraph_text(&xml)
}

/// Text of every `w:p` paragraph, one per line. Tabs and breaks count only
/// inside runs, so tab-stop definitions in paragraph properties are skipped.
fn paragraph_text(xml: &str) -> Result<String, ResumeError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(unreadable)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = in_run,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape().map_err(unreadable)?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(ResumeFormat::from_file_name("cv.PDF").unwrap(), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_file_name("cv.txt").unwrap(), ResumeFormat::Text);
    }

    fn docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t>Budi</w:t></w:r><w:r><w:t xml:space="preserve"> Santoso</w:t></w:r>
    </w:p>
    <w:p/>
    <w:p>
      <w:r><w:t>SQL</w:t><w:tab/><w:t>Python &amp; R</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_other_office_formats_are_unsupported() {
        let err = ResumeFormat::from_file_name("cv.doc").unwrap_err();
        assert!(matches!(err, ResumeError::UnsupportedFormat(ref ext) if ext == "doc"));
        assert_eq!(ResumeFormat::from_file_name("CV.DOCX").unwrap(), ResumeFormat::Docx);
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let bytes = docx(&[("word/document.xml", DOCUMENT)]);
        let text = extract_resume_text("cv.docx", &bytes).unwrap();
        assert_eq!(text, "Budi Santoso\n\nSQL\tPython & R");
    }

    #[test]
    fn test_docx_without_body_is_unreadable() {
        let bytes = docx(&[("word/styles.xml", "<w:styles/>")]);
        assert!(matches!(
            extract_resume_text("cv.docx", &bytes),
            Err(ResumeError::Unreadable(_))
        ));
    }

    #[test]
    fn test_broken_docx_archive_is_unreadable() {
        assert!(matches!(
            extract_resume_text("cv.docx", b"PK\x03\x04 truncated"),
            Err(ResumeError::Unreadable(_))
        ));
    }

    #[test]
    fn test_docx_without_text_is_empty() {
        let body = r#"<w:document xmlns:w="w"><w:body><w:p/></w:body></w:document>"#;
        let bytes = docx(&[("word/document.xml", body)]);
        assert!(matches!(
            extract_resume_text("cv.docx", &bytes),
            Err(ResumeError::Empty)
        ));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        assert!(matches!(
            ResumeFormat::from_file_name("resume"),
            Err(ResumeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_text_resume_is_trimmed() {
        let text = extract_resume_text("cv.txt", b"\n  Budi Santoso\nSQL, Python  \n").unwrap();
        assert_eq!(text, "Budi Santoso\nSQL, Python");
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_rejected() {
        let text = extract_resume_text("cv.txt", b"Excel \xff Tableau").unwrap();
        assert!(text.starts_with("Excel"));
        assert!(text.ends_with("Tableau"));
    }

    #[test]
    fn test_blank_resume_is_empty() {
        assert!(matches!(
            extract_resume_text("cv.txt", b"   \n\t"),
            Err(ResumeError::Empty)
        ));
    }

    #[test]
    fn test_garbage_pdf_is_unreadable() {
        assert!(matches!(
            extract_resume_text("cv.pdf", b"not a pdf"),
            Err(ResumeError::Unreadable(_))
        ));
    }
}
