//! Markdown generation from the document token stream.
//!
//! [`transcribe`] walks `word/document.xml` in a single forward pass and
//! accumulates Markdown as it goes. No element tree is ever built: every
//! decision is resolvable from the current token plus state carried from
//! strictly earlier tokens, held in a [`Transcriber`] owned for the duration
//! of one conversion.

mod transcribe;

pub use transcribe::{Transcriber, transcribe};
