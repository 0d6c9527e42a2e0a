//! Relationship manifest parsing.
//!
//! The manifest (`word/_rels/document.xml.rels`) maps relationship ids to
//! their stored target paths. Image references in the document body carry
//! only an id; the map resolves them to the extracted file.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::Result;

/// Maps a relationship id (`rId4`) to its target path (`media/image1.png`).
pub type RelationshipMap = HashMap<String, String>;

/// Parse the relationship manifest into a [`RelationshipMap`].
///
/// Only the `Id` and `Target` attributes of each `Relationship` record are
/// read; unknown attributes and elements are ignored. A malformed manifest
/// is an error: proceeding without it would silently emit broken image
/// links.
pub fn parse_relationships(xml: &str) -> Result<RelationshipMap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut map = RelationshipMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;

                for attr in e.attributes().flatten() {
                    match local_name(attr.key.as_ref()) {
                        b"Id" => id = Some(String::from_utf8_lossy(&attr.value).into_owned()),
                        b"Target" => {
                            target = Some(String::from_utf8_lossy(&attr.value).into_owned())
                        }
                        _ => {}
                    }
                }

                if let (Some(id), Some(target)) = (id, target) {
                    map.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(map)
}

/// Extract local name from a namespaced XML name (e.g., "w:val" -> "val").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
