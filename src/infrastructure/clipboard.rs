use arboard::Clipboard;

pub struct SystemClipboard;

impl SystemClipboard {
    pub fn copy(text: &str) -> Result<(), String> {
        let mut clipboard = Clipboard::new().map_err(|e| e.to_string())?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| e.to_string())
    }

    /// Reads clipboard text, cleaned for row input: spreadsheet apps append
    /// a trailing newline to copied cells, which would otherwise end up in
    /// the row text.
    pub fn paste() -> Result<String, String> {
        let mut clipboard = Clipboard::new().map_err(|e| e.to_string())?;
        let text = clipboard.get_text().map_err(|e| e.to_string())?;
        Ok(clean_paste(&text))
    }
}

/// Strips the trailing CR/LF and surrounding whitespace from pasted text.
pub fn clean_paste(text: &str) -> String {
    text.trim_end_matches(['\r', '\n']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_paste_strips_excel_newline() {
        assert_eq!(clean_paste("42\r\n"), "42");
        assert_eq!(clean_paste("x = 2 + 3\n"), "x = 2 + 3");
        assert_eq!(clean_paste("  padded  "), "padded");
        assert_eq!(clean_paste("plain"), "plain");
    }
}
