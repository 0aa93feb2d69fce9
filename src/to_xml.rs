//! XML formatting module
//!
//! Use [`Document::to_xml`] unless you need to write the XML to a file or other writer.
use crate::{
    Declaration, Document,
    error::XmlResult,
    visitor::{EntityRef, Visitor},
};

const TAB: &str = "\t";

/// Flatten a document as a formatted XML string using the given writer.
///
/// The text is produced in full before anything is written.
///
/// # Errors
/// This function will return an error if the writer fails to write the XML string.
pub fn write_xml(
    writer: &mut dyn std::io::Write,
    document: &Document,
    tab_char: Option<&str>,
) -> XmlResult<()> {
    let text = render_xml(document, tab_char);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn render_xml(document: &Document, tab_char: Option<&str>) -> String {
    let mut collector = XmlTextCollector::new(document.declaration(), tab_char);
    document.tree().accept(&mut collector);
    collector.finish()
}

/// Visitor that renders the declaration and the tree as XML text.
///
/// Each entity starts on a new line, indented by its depth, with its text right after the open tag.
/// The close tag follows the text on the same line when there is text, and gets its own indented line otherwise.
/// Self-closing entities have no close tag:
///
/// ```text
/// <?xml version="1.0" encoding="UTF-8"?>
/// <root>
///     <child>hello</child>
///     <empty/>
/// </root>
/// ```
pub struct XmlTextCollector<'a> {
    output: String,
    tab: &'a str,
    depth: usize,
}
impl<'a> XmlTextCollector<'a> {
    /// Start a new document, writing the `<?xml` declaration.
    ///
    /// `tab_char` is used to indent the XML. If `None`, a tab is used.
    #[must_use]
    pub fn new(declaration: &Declaration, tab_char: Option<&'a str>) -> Self {
        let output = format!(
            r#"<?xml version="{version}" encoding="{encoding}"?>"#,
            version = declaration.version(),
            encoding = declaration.encoding(),
        );

        Self {
            output,
            tab: tab_char.unwrap_or(TAB),
            depth: 0,
        }
    }

    /// Returns the text rendered so far.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}
impl Visitor for XmlTextCollector<'_> {
    fn enter(&mut self, entity: EntityRef<'_>) {
        self.output.push('\n');
        self.output.push_str(&self.tab.repeat(self.depth));
        self.depth += 1;

        self.output.push_str(&entity.open_tag());
        if let Some(text) = entity.text() {
            self.output.push_str(text);
        }
    }

    fn leave(&mut self, entity: EntityRef<'_>) {
        self.depth = self.depth.saturating_sub(1);
        if entity.is_self_closing() {
            return;
        }

        if entity.text().is_none() {
            self.output.push('\n');
            self.output.push_str(&self.tab.repeat(self.depth));
        }
        self.output.push_str(&entity.close_tag());
    }
}
