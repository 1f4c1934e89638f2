//! URL lists and document naming.

use std::fs;
use std::path::Path;

use url::Url;

use crate::manager::BrowserError;

/// Width of the zero-padded document index used as a file stem.
const NAME_WIDTH: usize = 7;

/// File stem for the document at absolute `index` of the URL list.
pub fn document_name(index: usize) -> String {
    format!("{:0width$}", index, width = NAME_WIDTH)
}

/// Non-blank lines of a newline-delimited URL list, trimmed.
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn read_url_list(path: &Path) -> Result<Vec<String>, BrowserError> {
    Ok(parse_url_list(&fs::read_to_string(path)?))
}

/// `file://` URLs of the `*.html` files in `dir`, sorted by path.
pub fn urls_from_dir(dir: &Path) -> Result<Vec<String>, BrowserError> {
    let dir = dir.canonicalize()?;
    let mut files: Vec<_> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    files.sort();

    files
        .into_iter()
        .map(|path| {
            Url::from_file_path(&path)
                .map(String::from)
                .map_err(|_| BrowserError::ActionFailed(format!("Not a file URL: {}", path.display())))
        })
        .collect()
}

/// The `(absolute index, url)` pairs a batch covers. `total < 0` means every
/// URL from `start` on.
pub fn select_window(urls: &[String], start: usize, total: i64) -> Vec<(usize, String)> {
    let end = match usize::try_from(total) {
        Ok(count) => start.saturating_add(count).min(urls.len()),
        Err(_) => urls.len(),
    };
    if start >= end {
        return Vec::new();
    }
    urls[start..end]
        .iter()
        .enumerate()
        .map(|(offset, url)| (start + offset, url.clone()))
        .collect()
}
