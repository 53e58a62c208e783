/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source documents.

use std::borrow::Cow;
use std::path::Path;

use webscript_template::{TranspileError, transpile};

/// How a document's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// The text is Lua code run directly.
    RawScript,
    /// The text is markup with embedded code blocks.
    Template,
}

impl DocumentKind {
    /// Map a file extension (`wscript`, `wsweb`) to a document kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "wscript" => Some(DocumentKind::RawScript),
            "wsweb" => Some(DocumentKind::Template),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A document to execute: its display name, full text and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    name: String,
    text: String,
    kind: DocumentKind,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            kind,
        }
    }

    /// Read a document from disk. Its name is the file name.
    pub fn load(path: &Path, kind: DocumentKind) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        Ok(Self::new(name, text, kind))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The raw-script form of this document. Raw scripts are returned as is;
    /// templates are transpiled into a new document with the same name.
    pub fn to_raw_script(&self) -> Result<Cow<'_, SourceDocument>, TranspileError> {
        match self.kind {
            DocumentKind::RawScript => Ok(Cow::Borrowed(self)),
            DocumentKind::Template => Ok(Cow::Owned(SourceDocument::new(
                self.name.clone(),
                transpile(&self.text)?,
                DocumentKind::RawScript,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("pages/index.wsweb")),
            Some(DocumentKind::Template)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("jobs/report.wscript")),
            Some(DocumentKind::RawScript)
        );
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_raw_script_is_borrowed() {
        let doc = SourceDocument::new("a.wscript", "wout.Write(1)", DocumentKind::RawScript);
        assert!(matches!(doc.to_raw_script().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_template_is_transpiled() {
        let doc = SourceDocument::new("a.wsweb", "Hi @{name}", DocumentKind::Template);
        let raw = doc.to_raw_script().unwrap();
        assert_eq!(raw.name(), "a.wsweb");
        assert_eq!(raw.kind(), DocumentKind::RawScript);
        assert_eq!(raw.text(), "wout.Write(\"Hi \");wout.Write(name);");
    }

    #[test]
    fn test_malformed_template() {
        let doc = SourceDocument::new("a.wsweb", "Hi {oops", DocumentKind::Template);
        let err = doc.to_raw_script().unwrap_err();
        assert_eq!(err.to_string(), "unterminated code block at offset 3");
    }

    #[test]
    fn test_load_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.wsweb");
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let doc = SourceDocument::load(&path, DocumentKind::Template).unwrap();
        assert_eq!(doc.name(), "page.wsweb");
        assert_eq!(doc.text(), "<p>hi</p>");
    }
}
