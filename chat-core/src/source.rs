//! Page-text source boundary.
//!
//! PDF (or any other) extraction happens outside this crate; whatever does
//! it hands page text over through [`PageSource`].

/// A loaded document the orchestrator can pull page text from.
pub trait PageSource {
    /// Display name (typically the file name).
    fn name(&self) -> &str;
    /// Source size in bytes.
    fn byte_size(&self) -> u64;
    /// Number of pages.
    fn page_count(&self) -> usize;
    /// Raw extracted text of the page at `index` (0-based).
    fn page_text(&self, index: usize) -> &str;
}

/// Simple in-memory source: one string per page.
pub struct InMemoryPages {
    name: String,
    byte_size: u64,
    pages: Vec<String>,
}

impl InMemoryPages {
    /// Builds a source from pre-extracted page texts. `byte_size` is derived
    /// from the text lengths; use [`InMemoryPages::with_byte_size`] when the
    /// original file size is known.
    pub fn new(name: impl Into<String>, pages: Vec<String>) -> Self {
        let byte_size = pages.iter().map(|p| p.len() as u64).sum();
        Self {
            name: name.into(),
            byte_size,
            pages,
        }
    }

    /// Same, with an explicit source size in bytes.
    pub fn with_byte_size(name: impl Into<String>, pages: Vec<String>, byte_size: u64) -> Self {
        Self {
            name: name.into(),
            byte_size,
            pages,
        }
    }
}

impl PageSource for InMemoryPages {
    fn name(&self) -> &str {
        &self.name
    }

    fn byte_size(&self) -> u64 {
        self.byte_size
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> &str {
        self.pages.get(index).map(String::as_str).unwrap_or("")
    }
}
