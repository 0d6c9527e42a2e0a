//! End-to-end conversion tests over synthetic DOCX packages.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use docmd::convert_docx;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
</Relationships>"#;

fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

/// Write a minimal DOCX package: a document body, a relationship manifest,
/// and zero or more media entries.
fn write_docx(path: &Path, document_xml: &str, rels_xml: &str, media: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("create docx");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("word/document.xml", options)
        .expect("start document entry");
    zip.write_all(document_xml.as_bytes())
        .expect("write document entry");

    zip.start_file("word/_rels/document.xml.rels", options)
        .expect("start rels entry");
    zip.write_all(rels_xml.as_bytes()).expect("write rels entry");

    for (name, data) in media {
        zip.start_file(format!("word/media/{name}"), options)
            .expect("start media entry");
        zip.write_all(data).expect("write media entry");
    }

    zip.finish().expect("finish docx");
}

#[test]
fn test_heading_paragraph() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("doc.docx");
    let body = r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#;
    write_docx(&input, &document(body), RELS, &[]);

    let output = convert_docx(&input).expect("convert");
    assert_eq!(output, dir.path().join("doc.md"));
    assert_eq!(fs::read_to_string(output).expect("read md"), "# Title\n\n");
}

#[test]
fn test_paragraphs_and_table() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("report.docx");
    let body = concat!(
        r#"<w:p><w:r><w:t>Intro.</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tblGrid><w:gridCol w:w="1"/><w:gridCol w:w="1"/></w:tblGrid>"#,
        r#"<w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:tr>"#,
        r#"<w:tr><w:tc><w:p><w:r><w:t>C</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>D</w:t></w:r></w:p></w:tc></w:tr>"#,
        r#"</w:tbl>"#,
    );
    write_docx(&input, &document(body), RELS, &[]);

    let output = convert_docx(&input).expect("convert");
    let markdown = fs::read_to_string(output).expect("read md");
    assert!(markdown.starts_with("Intro.\n"));
    assert!(markdown.contains("|A|B|\n|----|----|\n|C|D|"));
}

#[test]
fn test_media_extraction_and_image_link() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("illustrated.docx");
    let body = r#"<w:p><w:r><w:drawing><a:blip r:embed="rId4"/></w:drawing></w:r></w:p>"#;
    let png = [0x89u8, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
    write_docx(&input, &document(body), RELS, &[("image1.png", &png)]);

    let output = convert_docx(&input).expect("convert");
    let markdown = fs::read_to_string(output).expect("read md");
    assert!(markdown.contains("![rId4](media/image1.png)"));

    let copied = fs::read(dir.path().join("media/image1.png")).expect("read copied media");
    assert_eq!(copied, png);
}

#[test]
fn test_suppressed_block_text_absent() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("toc.docx");
    let body = concat!(
        r#"<w:sdt><w:sdtContent><w:p><w:r><w:t>hidden</w:t></w:r></w:p></w:sdtContent></w:sdt>"#,
        r#"<w:p><w:r><w:t>visible</w:t></w:r></w:p>"#,
    );
    write_docx(&input, &document(body), RELS, &[]);

    let output = convert_docx(&input).expect("convert");
    let markdown = fs::read_to_string(output).expect("read md");
    assert!(!markdown.contains("hidden"));
    assert!(markdown.contains("visible"));
}

#[test]
fn test_missing_document_entry_is_error() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("empty.docx");

    let file = fs::File::create(&input).expect("create docx");
    let mut zip = ZipWriter::new(file);
    zip.start_file("word/_rels/document.xml.rels", SimpleFileOptions::default())
        .expect("start rels entry");
    zip.write_all(RELS.as_bytes()).expect("write rels entry");
    zip.finish().expect("finish docx");

    assert!(convert_docx(&input).is_err());
    assert!(!dir.path().join("empty.md").exists());
}

#[test]
fn test_malformed_manifest_is_error() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("broken.docx");
    write_docx(
        &input,
        &document(r#"<w:p><w:r><w:t>text</w:t></w:r></w:p>"#),
        "<Relationships><Relationship",
        &[],
    );

    assert!(convert_docx(&input).is_err());
    assert!(!dir.path().join("broken.md").exists());
}

#[test]
fn test_malformed_document_is_error() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("truncated.docx");
    write_docx(&input, "<w:document><w:body></w:wrong>", RELS, &[]);

    assert!(convert_docx(&input).is_err());
    assert!(!dir.path().join("truncated.md").exists());
}

#[test]
fn test_nonexistent_input_is_error() {
    let dir = TempDir::new().expect("temp dir");
    assert!(convert_docx(dir.path().join("missing.docx")).is_err());
}
