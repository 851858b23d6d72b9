//! Source file registry
//!
//! Every token and diagnostic carries a [`FileId`] instead of a file name, so
//! several compilation units can be lexed and parsed in one process without
//! any shared "current file" state. The [`SourceMap`] resolves ids back to
//! names and text when a diagnostic is rendered.

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::warn;

/// Opaque handle to a file registered in a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(u32);

impl FileId {
    /// The id used by sources that were never registered (unit tests, REPL-style input).
    pub const ANONYMOUS: FileId = FileId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id for the `index`-th registered file, if it fits and is not
    /// the anonymous id.
    fn from_index(index: usize) -> Option<FileId> {
        u32::try_from(index)
            .ok()
            .filter(|&raw| raw != u32::MAX)
            .map(FileId)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == FileId::ANONYMOUS {
            write!(f, "<anonymous>")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// A source buffer and the name it was loaded under.
///
/// The text is kept as raw bytes; a file is never rejected for its encoding.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub text: Vec<u8>,
}

/// Owns every source buffer of a compilation session.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    by_name: FxHashMap<String, FileId>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buffer and return its id.
    ///
    /// Registering the same name twice replaces the text but keeps the id,
    /// so a re-read file keeps producing comparable locations.
    ///
    /// Ids are dense `u32` indices and [`FileId::ANONYMOUS`] is reserved, so
    /// a map holds at most `u32::MAX` files. Past that, new names come back
    /// as [`FileId::ANONYMOUS`] and are not stored.
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<Vec<u8>>) -> FileId {
        let name = name.into();
        let text = text.into();

        if let Some(&id) = self.by_name.get(&name) {
            self.files[id.index()].text = text;
            return id;
        }

        let Some(id) = FileId::from_index(self.files.len()) else {
            warn!(%name, "source map is full, file left unregistered");
            return FileId::ANONYMOUS;
        };
        self.by_name.insert(name.clone(), id);
        self.files.push(SourceFile { name, text });
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// Name of a registered file, or `<anonymous>` for unknown ids.
    pub fn name(&self, id: FileId) -> &str {
        self.get(id).map(|f| f.name.as_str()).unwrap_or("<anonymous>")
    }

    pub fn text(&self, id: FileId) -> Option<&[u8]> {
        self.get(id).map(|f| f.text.as_slice())
    }

    pub fn lookup(&self, name: &str) -> Option<FileId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
