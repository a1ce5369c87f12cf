/// Turns escaped line breaks (`\r\n`, `\n`, `\r` as literal backslash sequences)
/// into real newlines.
///
/// Backend answers are sometimes double-escaped JSON strings; this is applied
/// only when rendering a snippet, never when storing it.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\\r", "\n")
}
