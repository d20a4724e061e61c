/// Shared strings table for XLSX workbooks.
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use super::escape_xml;

/// Shared strings table
///
/// Excel stores frequently used strings in a shared table to reduce file
/// size. This structure manages the collection of unique strings and
/// their indices.
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
    string_to_index: HashMap<String, usize>,
}

impl SharedStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string and return its index; duplicates return the existing
    /// index.
    pub fn add_string(&mut self, s: &str) -> usize {
        if let Some(&index) = self.string_to_index.get(s) {
            index
        } else {
            let index = self.strings.len();
            self.strings.push(s.to_string());
            self.string_to_index.insert(s.to_string(), index);
            index
        }
    }

    /// Number of unique strings
    pub fn count(&self) -> usize {
        self.strings.len()
    }

    /// Serialize the shared strings table to XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(
            xml,
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.strings.len(),
            self.strings.len()
        );

        for s in &self.strings {
            let _ = write!(
                xml,
                r#"<si><t xml:space="preserve">{}</t></si>"#,
                escape_xml(s)
            );
        }

        xml.push_str("</sst>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_strings_dedup() {
        let mut ss = SharedStrings::new();
        let idx1 = ss.add_string("Palette A");
        let idx2 = ss.add_string("Markt M1");
        let idx3 = ss.add_string("Palette A");

        assert_eq!(idx1, 0);
        assert_eq!(idx2, 1);
        assert_eq!(idx3, 0);
        assert_eq!(ss.count(), 2);
    }

    #[test]
    fn test_to_xml_escapes_and_preserves_space() {
        let mut ss = SharedStrings::new();
        ss.add_string("A & B <C>");
        let xml = ss.to_xml();
        assert!(xml.contains("A &amp; B &lt;C&gt;"));
        // Multi-line compact labels depend on whitespace preservation
        assert!(xml.contains(r#"xml:space="preserve""#));
    }
}
