use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub page: u32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageTable {
    pub page: u32,
    pub index: usize,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageImage {
    pub page: u32,
    pub index: usize,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub byte_size: usize,
    pub saved_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUrl {
    pub page: u32,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Real(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageNumbers {
    pub page: u32,
    pub values: Vec<Numeric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub pages_text: Vec<PageText>,
    pub tables: Vec<PageTable>,
    pub images: Vec<PageImage>,
    pub urls: Vec<PageUrl>,
    pub numbers: Vec<PageNumbers>,
}

impl ExtractionResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages_text.is_empty()
            && self.tables.is_empty()
            && self.images.is_empty()
            && self.urls.is_empty()
            && self.numbers.is_empty()
    }
}
