use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Read embedded image objects through the cross-reference table and
    /// keep their raw stored bytes.
    FullFidelity,
    /// Record image metadata only; no stream bytes are fetched and no files
    /// are written.
    Lightweight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn parse_page_number(token: &str) -> Result<u32, String> {
    let page: u32 = token
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{token}'"))?;
    if page == 0 {
        return Err("pages are 1-based".to_string());
    }
    Ok(page)
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if end < start {
                    return Err(format!(
                        "invalid range '{token}': end is smaller than start"
                    ));
                }
                pages.extend(start..=end);
            } else {
                pages.insert(parse_page_number(token)?);
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub pages: Option<PageSelection>,
    pub image_mode: ImageMode,
    pub save_images: bool,
    pub image_dir: PathBuf,
    pub min_cols: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            image_mode: ImageMode::FullFidelity,
            save_images: true,
            image_dir: PathBuf::from("extracted_images"),
            min_cols: 2,
        }
    }
}
