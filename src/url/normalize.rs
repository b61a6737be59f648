use crate::url::PagePath;
use crate::{UrlError, UrlResult};

/// Turns a page path into the flat file name it is cached under
///
/// Every `/` becomes `_` and one leading `_` is dropped, so
/// `/til/vtp/2023/vtp_2023_tie_001_fi.html` is stored as
/// `til_vtp_2023_vtp_2023_tie_001_fi.html`. The mapping only depends on the
/// path, so the same directory can be reused across runs.
///
/// # Errors
///
/// Returns [`UrlError::UnsafeCacheKey`] when the result would not name a
/// regular file inside the output directory (empty, `.`, `..`, or containing
/// a NUL byte).
///
/// # Examples
///
/// ```
/// use statfi_crawler::url::{normalize_cache_key, PagePath};
///
/// let key = normalize_cache_key(&PagePath::from("/til/aiheet.html")).unwrap();
/// assert_eq!(key, "til_aiheet.html");
/// ```
pub fn normalize_cache_key(path: &PagePath) -> UrlResult<String> {
    let flattened = path.as_str().replace('/', "_");
    let key = flattened
        .strip_prefix('_')
        .map(str::to_string)
        .unwrap_or(flattened);

    if key.is_empty() || key == "." || key == ".." || key.contains('\0') {
        return Err(UrlError::UnsafeCacheKey(path.to_string()));
    }

    Ok(key)
}
