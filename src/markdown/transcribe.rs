//! Streaming `document.xml` → Markdown transcription.
//!
//! The transducer is a state machine over quick-xml events, keyed by the
//! most recently opened element plus a handful of flags and counters. It
//! recognizes a pragmatic subset of WordprocessingML:
//!
//! - Headings piggyback on paragraph numbering: two known (`numId`, `ilvl`)
//!   pairs mark the document's outline levels. The mapping is a fixed
//!   table, not a numbering-scheme interpreter.
//! - Tables render as pipe rows; the first row is always treated as the
//!   header and followed by a separator row sized from the grid's column
//!   definitions.
//! - `sdt` blocks (generated/placeholder content) have their visible text
//!   dropped.
//! - `blip` image references resolve through the relationship map and emit
//!   inline image links wherever they occur.

use std::borrow::Cow;

use memchr::memchr2;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::docx::RelationshipMap;
use crate::error::Result;

const UNSET: i32 = -1;

/// Transcribe a `word/document.xml` body to Markdown.
///
/// The document is scanned once up front so a malformed body fails the
/// whole conversion before any output exists. The streaming pass that
/// follows treats a read error as end-of-input: a truncated tail yields
/// whatever Markdown had been accumulated by then.
pub fn transcribe(document: &str, rels: &RelationshipMap) -> Result<String> {
    check_well_formed(document)?;
    Ok(Transcriber::new(rels).run(document))
}

fn check_well_formed(document: &str) -> Result<()> {
    let mut reader = Reader::from_str(document);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return Ok(()),
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }
    }
}

/// Streaming transducer state. One instance per conversion, owned
/// exclusively for the duration of the pass.
pub struct Transcriber<'a> {
    rels: &'a RelationshipMap,
    /// Accumulated Markdown.
    output: String,
    /// Outline level from the current paragraph's `ilvl` marker.
    list_level: i32,
    /// Numbering id from the current paragraph's `numId` marker.
    list_id: i32,
    /// Parsed `bookmarkStart` name. Carried for parity with the classifier
    /// fields; never read back.
    bookmark_marker: i32,
    /// Inside an `sdt` block whose visible text is dropped.
    suppress_text: bool,
    in_table: bool,
    /// Column definitions seen for the current table's grid.
    table_column_count: usize,
    /// 1-based row counter; -1 outside tables.
    table_row_index: i32,
    /// Local name of the most recently opened element.
    current_element: Option<String>,
}

impl<'a> Transcriber<'a> {
    pub fn new(rels: &'a RelationshipMap) -> Self {
        Self {
            rels,
            output: String::new(),
            list_level: UNSET,
            list_id: UNSET,
            bookmark_marker: UNSET,
            suppress_text: false,
            in_table: false,
            table_column_count: 0,
            table_row_index: UNSET,
            current_element: None,
        }
    }

    /// Consume the event stream and return the accumulated Markdown.
    ///
    /// A read error ends the stream where it stands; the partial output is
    /// still returned.
    pub fn run(mut self, document: &str) -> String {
        let mut reader = Reader::from_str(document);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => self.open_element(&e),
                Ok(Event::Empty(e)) => {
                    // Self-closing markers dispatch as open-then-close.
                    self.open_element(&e);
                    let name = e.name();
                    self.close_element(local_name(name.as_ref()));
                }
                Ok(Event::Text(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref());
                    self.text(&text);
                }
                Ok(Event::GeneralRef(e)) => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        self.text(&resolved);
                    }
                }
                Ok(Event::End(e)) => {
                    let name = e.name();
                    self.close_element(local_name(name.as_ref()));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(_) => break,
            }
        }

        self.output
    }

    fn open_element(&mut self, e: &BytesStart) {
        let name = e.name();
        let local = local_name(name.as_ref());

        match local {
            b"sdt" => self.suppress_text = true,
            b"ilvl" => {
                if let Some(val) = int_attr(e, b"val") {
                    self.list_level = val;
                }
            }
            b"numId" => {
                if let Some(val) = int_attr(e, b"val") {
                    self.list_id = val;
                }
            }
            b"bookmarkStart" => {
                // Bookmark names are rarely numeric; a failed parse leaves
                // the sentinel in place.
                if let Some(val) = int_attr(e, b"name") {
                    self.bookmark_marker = val;
                }
            }
            b"blip" => {
                if let Some(id) = str_attr(e, b"embed") {
                    let target = self.rels.get(&id).map(String::as_str).unwrap_or("");
                    self.output.push_str(&format!("\n![{id}]({target})\n"));
                }
            }
            b"tbl" => {
                self.in_table = true;
                self.table_row_index = 0;
            }
            b"gridCol" => self.table_column_count += 1,
            b"tr" => {
                self.output.push_str("\n|");
                self.table_row_index += 1;
            }
            _ => {}
        }

        self.current_element = Some(String::from_utf8_lossy(local).into_owned());
    }

    fn text(&mut self, raw: &str) {
        // Only character data directly under a text run is content;
        // everything else is whitespace between structural tags.
        if self.current_element.as_deref() != Some("t") {
            return;
        }
        if self.suppress_text {
            return;
        }

        let cleaned = clean_text(raw);
        match heading_prefix(self.list_id, self.list_level) {
            Some(prefix) => {
                self.output.push_str(prefix);
                self.output.push_str(&cleaned);
                self.list_level = UNSET;
                self.list_id = UNSET;
                self.bookmark_marker = UNSET;
            }
            None => self.output.push_str(&cleaned),
        }
    }

    fn close_element(&mut self, local: &[u8]) {
        match local {
            b"p" => {
                // Inside a table the row structure supplies the breaks.
                if !self.in_table {
                    self.output.push('\n');
                }
            }
            b"t" => self.current_element = None,
            b"sdt" => self.suppress_text = false,
            b"tbl" => {
                self.in_table = false;
                self.table_row_index = UNSET;
            }
            b"tc" => self.output.push('|'),
            b"tr" => {
                if self.table_row_index == 1 {
                    self.output.push_str("\n|");
                    for _ in 0..self.table_column_count {
                        self.output.push_str("----|");
                    }
                    self.table_column_count = 0;
                }
            }
            _ => {}
        }
    }
}

/// The two numbering ids the converter understands, mapped to ATX depth.
fn heading_prefix(list_id: i32, list_level: i32) -> Option<&'static str> {
    match (list_id, list_level) {
        (1, 0) => Some("# "),
        (1, 1) => Some("## "),
        (2, 0) => Some("### "),
        _ => None,
    }
}

/// Strip tabs and newlines from a text run. They are serialization
/// artifacts, not intended line breaks.
fn clean_text(text: &str) -> Cow<'_, str> {
    if memchr2(b'\t', b'\n', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|&c| c != '\t' && c != '\n').collect())
}

/// Look up an attribute by local name and parse it as an integer.
fn int_attr(e: &BytesStart, key: &[u8]) -> Option<i32> {
    str_attr(e, key)?.parse().ok()
}

/// Look up an attribute by local name.
fn str_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| local_name(attr.key.as_ref()) == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Extract local name from a namespaced XML name (e.g., "w:ilvl" -> "ilvl").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
