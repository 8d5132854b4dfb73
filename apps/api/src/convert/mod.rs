// Document conversion: .docx upload → HTML string.
// Pipeline: read package (docx) → map styles (style_map) → write HTML (html) → post_process.
// CPU-bound conversion must run inside tokio::task::spawn_blocking.

pub mod docx;
pub mod handlers;
pub mod html;
pub mod style_map;

use thiserror::Error;

use self::style_map::StyleMap;

const LIST_ITEM_SPACING_STYLE: &str = r#"<li style="margin-bottom: 4px;">"#;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Not a valid .docx package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("Document is missing required part {0}")]
    MissingPart(String),

    #[error("Malformed document XML: {0}")]
    Xml(String),

    #[error("I/O error while reading document: {0}")]
    Io(#[from] std::io::Error),
}

/// Converter output. `messages` are non-fatal findings worth logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub html: String,
    pub messages: Vec<String>,
}

/// Converts Word documents with a fixed style-mapping ruleset.
#[derive(Debug, Clone)]
pub struct DocumentConverter {
    style_map: StyleMap,
    list_item_spacing: bool,
}

impl DocumentConverter {
    pub fn new(style_map: StyleMap, list_item_spacing: bool) -> Self {
        Self {
            style_map,
            list_item_spacing,
        }
    }

    pub fn convert(&self, bytes: &[u8]) -> Result<Conversion, ConvertError> {
        let document = docx::read_docx(bytes)?;
        let html = html::render_blocks(&document.blocks, &self.style_map);
        Ok(Conversion {
            html: post_process(html, self.list_item_spacing),
            messages: document.messages,
        })
    }
}

/// Identity unless list-item spacing is on, in which case every plain `<li>`
/// gets a bottom margin.
pub fn post_process(html: String, list_item_spacing: bool) -> String {
    if list_item_spacing {
        html.replace("<li>", LIST_ITEM_SPACING_STYLE)
    } else {
        html
    }
}

#[cfg(test)]
mod tests {
    use super::docx::fixtures::docx;
    use super::*;

    const RESUME_BODY: &str = r#"
        <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Jane Doe</w:t></w:r></w:p>
        <w:p><w:pPr><w:pBdr><w:bottom w:val="single"/></w:pBdr></w:pPr><w:r><w:t>EXPERIENCE</w:t></w:r></w:p>
        <w:p/>
        <w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr>
             <w:r><w:t xml:space="preserve">Cut latency </w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>40%</w:t></w:r></w:p>
        <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:rPr><w:strike/></w:rPr><w:t>Old</w:t></w:r></w:p>
    "#;

    #[test]
    fn test_converts_resume_document() {
        let conversion = DocumentConverter::new(StyleMap::resume_default(), false)
            .convert(&docx(RESUME_BODY))
            .unwrap();
        assert_eq!(
            conversion.html,
            concat!(
                r#"<p class="center-align"><strong>Jane Doe</strong></p>"#,
                r#"<p class="has-border-bottom">EXPERIENCE</p>"#,
                "<ul><li>Cut latency <em>40%</em></li><li><del>Old</del></li></ul>"
            )
        );
        assert!(conversion.messages.is_empty());
    }

    #[test]
    fn test_list_item_spacing_rewrites_items() {
        let conversion = DocumentConverter::new(StyleMap::resume_default(), true)
            .convert(&docx(RESUME_BODY))
            .unwrap();
        assert!(conversion
            .html
            .contains(r#"<li style="margin-bottom: 4px;">Cut latency"#));
        assert!(!conversion.html.contains("<li>"));
    }

    #[test]
    fn test_post_process_is_identity_when_disabled() {
        let html = "<ul><li>a</li></ul>".to_string();
        assert_eq!(post_process(html.clone(), false), html);
    }

    #[test]
    fn test_custom_ruleset_changes_output() {
        let map = StyleMap::parse("b => b\nli => li.bullet").unwrap();
        let html = DocumentConverter::new(map, false)
            .convert(&docx(RESUME_BODY))
            .unwrap()
            .html;
        assert!(html.starts_with("<p><b>Jane Doe</b></p>"));
        assert!(html.contains(r#"<li class="bullet">Cut latency 40%</li>"#));
        assert!(html.contains("<li class=\"bullet\">Old</li>"));
    }

    #[test]
    fn test_huge_list_level_stays_small() {
        let body = r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="18446744073709551615"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>x</w:t></w:r></w:p>
                      <w:p><w:pPr><w:numPr><w:ilvl w:val="200000"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>y</w:t></w:r></w:p>"#;
        let html = DocumentConverter::new(StyleMap::resume_default(), false)
            .convert(&docx(body))
            .unwrap()
            .html;
        assert!(html.len() < 512, "{} bytes", html.len());
        assert!(html.contains("<li>x</li><li>y</li>"));
    }

    #[test]
    fn test_tracked_alignment_change_keeps_current_alignment() {
        let body = r#"<w:p><w:pPr><w:jc w:val="center"/><w:pPrChange w:id="1" w:author="A"><w:pPr><w:jc w:val="left"/></w:pPr></w:pPrChange></w:pPr><w:r><w:t>Jane</w:t></w:r></w:p>"#;
        let html = DocumentConverter::new(StyleMap::resume_default(), false)
            .convert(&docx(body))
            .unwrap()
            .html;
        assert_eq!(html, r#"<p class="center-align">Jane</p>"#);
    }

    #[test]
    fn test_text_box_header_is_not_duplicated() {
        let body = r#"<w:p><w:r><mc:AlternateContent>
              <mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent>
                <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
              </w:txbxContent></wps:txbx></w:drawing></mc:Choice>
              <mc:Fallback><w:pict><w:txbxContent>
                <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
              </w:txbxContent></w:pict></mc:Fallback>
            </mc:AlternateContent></w:r></w:p>"#;
        let html = DocumentConverter::new(StyleMap::resume_default(), false)
            .convert(&docx(body))
            .unwrap()
            .html;
        assert_eq!(html, "<p>Jane Doe<br />jane@example.com</p>");
    }

    #[test]
    fn test_garbage_input_is_an_error() {
        let err = DocumentConverter::new(StyleMap::resume_default(), false)
            .convert(b"%PDF-1.7")
            .unwrap_err();
        assert!(err.to_string().starts_with("Not a valid .docx package"));
    }
}
