//! Minimal pretty-printing XML writer.
//!
//! Attributes are written in the order given, so identical calls always
//! produce identical bytes. Only what draw.io documents need is supported:
//! elements, attributes and self-closing elements.

const INDENT: &str = "  ";

/// Streaming writer that indents nested elements by two spaces.
#[derive(Debug, Default)]
pub(super) struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    /// Starts a document with the XML declaration.
    pub(super) fn new() -> Self {
        let mut writer = Self::default();
        writer
            .out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        writer
    }

    /// Opens an element that will contain children.
    pub(super) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.start_tag(name, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    /// Writes a self-closing element.
    pub(super) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.start_tag(name, attrs);
        self.out.push_str("/>\n");
    }

    /// Closes the innermost open element.
    pub(super) fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    /// Returns the written document.
    pub(super) fn finish(self) -> String {
        self.out
    }

    fn start_tag(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            escape_attribute_into(&mut self.out, value);
            self.out.push('"');
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }
}

/// Appends `value` escaped for use inside a double-quoted attribute.
///
/// Line breaks and tabs become character references so they survive
/// attribute value normalization.
fn escape_attribute_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#xa;"),
            '\r' => out.push_str("&#xd;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(c),
        }
    }
}

/// Escapes `text` for a cell whose style sets `html=1`.
///
/// draw.io interprets such values as markup, so the result still needs
/// attribute escaping when written.
pub(super) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_elements_are_indented() {
        let mut writer = XmlWriter::new();
        writer.open("a", &[("k", "v")]);
        writer.empty("b", &[]);
        writer.close("a");

        assert_eq!(
            writer.finish(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a k=\"v\">\n  <b/>\n</a>\n"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let mut out = String::new();
        escape_attribute_into(&mut out, "a & <b> \"c\" 'd'\nx");

        assert_eq!(out, "a &amp; &lt;b&gt; &quot;c&quot; &apos;d&apos;&#xa;x");
    }

    #[test]
    fn test_html_escaping() {
        assert_eq!(escape_html("x < y & <b>"), "x &lt; y &amp; &lt;b&gt;");
        assert_eq!(escape_html("plain \"text\""), "plain \"text\"");
    }

    #[test]
    fn test_unicode_passes_through() {
        let mut out = String::new();
        escape_attribute_into(&mut out, "Überprüfung ✓");

        assert_eq!(out, "Überprüfung ✓");
    }
}
