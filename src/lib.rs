//! # docmd
//!
//! A fast, lightweight DOCX to Markdown converter.
//!
//! Reads a `.docx` package, copies its embedded images next to the input
//! file, and writes a Markdown rendition of the document body in a single
//! forward pass over the markup:
//!
//! - ATX headings recovered from the document's outline numbering
//! - Pipe tables with a synthesized header separator row
//! - Inline images linked through the package's relationship manifest
//! - Plain paragraphs separated by newlines
//!
//! ## Quick Start
//!
//! ```no_run
//! let output = docmd::convert_docx("report.docx").unwrap();
//! println!("wrote {}", output.display());
//! ```
//!
//! The pieces compose individually for callers that already hold the package
//! parts in memory:
//!
//! ```
//! use docmd::docx::parse_relationships;
//! use docmd::markdown::transcribe;
//!
//! let rels = parse_relationships(
//!     r#"<Relationships>
//!          <Relationship Id="rId1" Type="image" Target="media/logo.png"/>
//!        </Relationships>"#,
//! ).unwrap();
//! let markdown = transcribe("<w:document><w:body/></w:document>", &rels).unwrap();
//! assert!(markdown.is_empty());
//! ```

pub mod docx;
pub mod error;
pub mod markdown;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use docx::{Package, RelationshipMap, parse_relationships};
pub use error::{Error, Result};
pub use markdown::transcribe;

/// Convert a `.docx` file to Markdown.
///
/// Writes `<stem>.md` next to the input, copies embedded media into a
/// sibling `media/` directory, and returns the path of the written file.
///
/// No cleanup is attempted on failure; a partially written output file is
/// left for the caller to discard.
pub fn convert_docx<P: AsRef<Path>>(input: P) -> Result<PathBuf> {
    let input = input.as_ref();

    let package = Package::read(input)?;
    let rels = docx::parse_relationships(&package.relationships)?;
    let markdown = markdown::transcribe(&package.document, &rels)?;

    let output_path = input.with_extension("md");
    let mut file = File::create(&output_path)?;
    writeln!(file, "{markdown}")?;

    Ok(output_path)
}
