//! DOCX package reading.
//!
//! A `.docx` file is a ZIP container. One pass over the archive pulls out the
//! two entries the converter parses and copies everything stored under the
//! media prefix into a `media/` directory next to the input, so no second
//! pass is needed.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

const DOCUMENT_ENTRY: &str = "word/document.xml";
const RELS_ENTRY: &str = "word/_rels/document.xml.rels";
const MEDIA_PREFIX: &str = "word/media/";

/// The parts of a DOCX package the converter consumes.
pub struct Package {
    /// Contents of `word/document.xml`.
    pub document: String,
    /// Contents of `word/_rels/document.xml.rels`.
    pub relationships: String,
}

impl Package {
    /// Read a package from disk.
    ///
    /// Media entries are copied next to the input file (`word/media/x.png`
    /// becomes `<dir>/media/x.png`) as a side effect of the single pass over
    /// the archive.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Package> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut document = None;
        let mut relationships = None;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();

            if let Some(media_path) = name.strip_prefix(MEDIA_PREFIX) {
                if !media_path.is_empty() && !entry.is_dir() {
                    copy_media(&mut entry, dir, media_path)?;
                }
            } else if name == DOCUMENT_ENTRY {
                document = Some(read_entry(&mut entry)?);
            } else if name == RELS_ENTRY {
                relationships = Some(read_entry(&mut entry)?);
            }
        }

        let document =
            document.ok_or_else(|| Error::InvalidDocx(format!("missing {DOCUMENT_ENTRY}")))?;
        let relationships =
            relationships.ok_or_else(|| Error::InvalidDocx(format!("missing {RELS_ENTRY}")))?;

        Ok(Package {
            document,
            relationships,
        })
    }
}

/// Copy one media entry to `<dir>/media/<media_path>`.
fn copy_media<R: Read>(entry: &mut R, dir: &Path, media_path: &str) -> Result<()> {
    let target = dir.join("media").join(media_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = File::create(&target)?;
    io::copy(entry, &mut writer)?;
    Ok(())
}

/// Read an entry's full decompressed bytes as UTF-8 text.
fn read_entry<R: Read>(entry: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    // Strip UTF-8 BOM if present
    let bytes = strip_bom(&bytes);
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}
