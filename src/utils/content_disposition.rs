use once_cell::sync::Lazy;
use regex::Regex;

/// `filename=` parameter of a `Content-Disposition` header, quoted or bare.
static FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename[^;=\n]*=(?:"([^"]*)"|'([^']*)'|([^;\n]*))"#)
        .expect("filename pattern is valid")
});

/// Extracts the download filename from a `Content-Disposition` value.
///
/// Quote characters are stripped from the result. Returns `None` when the
/// header has no filename or the filename is empty.
pub fn filename_from_header(header: &str) -> Option<String> {
    let caps = FILENAME.captures(header)?;
    let raw = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str();

    let name: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
