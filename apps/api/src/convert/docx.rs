//! DOCX reader: turns the OOXML package into a small block model.
//!
//! Only what the HTML writer needs is kept: paragraphs with their style,
//! alignment, bottom border and list membership; runs with inline formatting,
//! hyperlink target, text and line breaks; tables of cells holding blocks.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::ConvertError;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Deepest list level Word can express (`w:ilvl` 0 to 8).
pub const MAX_LIST_LEVEL: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub style_id: Option<String>,
    /// Display name from styles.xml, e.g. "heading 1".
    pub style_name: Option<String>,
    /// left, center, right or justify.
    pub alignment: Option<String>,
    pub border_bottom: bool,
    pub list: Option<ListRef>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.content.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRef {
    pub level: usize,
    pub ordered: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub highlight: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub format: RunFormat,
    pub link: Option<String>,
    pub content: Vec<RunContent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    Break,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub blocks: Vec<Block>,
}

/// Parsed document body plus anything worth reporting about it.
#[derive(Debug, Default)]
pub struct DocxDocument {
    pub blocks: Vec<Block>,
    pub messages: Vec<String>,
}

/// Reads a `.docx` package. Only `word/document.xml` is mandatory.
pub fn read_docx(bytes: &[u8]) -> Result<DocxDocument, ConvertError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let document = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| ConvertError::MissingPart(DOCUMENT_PART.to_string()))?;

    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => parse_style_names(&xml)?,
        None => HashMap::new(),
    };
    let numbering = match read_part(&mut archive, NUMBERING_PART)? {
        Some(xml) => Numbering::parse(&xml)?,
        None => Numbering::default(),
    };
    let links = match read_part(&mut archive, DOCUMENT_RELS_PART)? {
        Some(xml) => parse_relationship_targets(&xml)?,
        None => HashMap::new(),
    };

    BodyReader::new(&styles, &numbering, &links).read(&document)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ConvertError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(decode_xml_bytes(bytes)))
}

/// UTF-8 with or without BOM; anything else is decoded lossily.
fn decode_xml_bytes(bytes: Vec<u8>) -> String {
    let bytes = match bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        Some(rest) => rest.to_vec(),
        None => bytes,
    };
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| {
            let raw = String::from_utf8_lossy(&a.value).into_owned();
            quick_xml::escape::unescape(&raw)
                .map(|v| v.into_owned())
                .unwrap_or(raw)
        })
}

/// OOXML on/off property: present means on unless `val` says otherwise.
fn toggle_on(e: &BytesStart<'_>) -> bool {
    !matches!(
        attr(e, b"val").as_deref(),
        Some("0" | "false" | "off" | "none")
    )
}

fn xml_error(e: quick_xml::Error, reader: &Reader<&[u8]>) -> ConvertError {
    ConvertError::Xml(format!("{e} at byte {}", reader.buffer_position()))
}

/// styleId → display name, from styles.xml.
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut names = HashMap::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                current = attr(e, b"styleId");
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"name" =>
            {
                if let (Some(id), Some(name)) = (&current, attr(e, b"val")) {
                    names.insert(id.clone(), name);
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => current = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e, &reader)),
            _ => {}
        }
        buf.clear();
    }

    Ok(names)
}

/// Relationship id → target, from document.xml.rels.
fn parse_relationship_targets(xml: &str) -> Result<HashMap<String, String>, ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e, &reader)),
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// List definitions from numbering.xml.
#[derive(Debug, Default)]
struct Numbering {
    /// numId → abstractNumId
    instances: HashMap<String, String>,
    /// (abstractNumId, level) → numFmt
    formats: HashMap<(String, usize), String>,
}

impl Numbering {
    fn parse(xml: &str) -> Result<Self, ConvertError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut numbering = Numbering::default();
        let mut abstract_id: Option<String> = None;
        let mut level: Option<usize> = None;
        let mut num_id: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"abstractNum" => abstract_id = attr(e, b"abstractNumId"),
                        b"lvl" if abstract_id.is_some() => {
                            level = attr(e, b"ilvl").and_then(|v| v.parse().ok())
                        }
                        b"numFmt" => {
                            if let (Some(id), Some(lvl), Some(fmt)) =
                                (&abstract_id, level, attr(e, b"val"))
                            {
                                numbering.formats.insert((id.clone(), lvl), fmt);
                            }
                        }
                        b"num" => num_id = attr(e, b"numId"),
                        b"abstractNumId" => {
                            if let (Some(num), Some(target)) = (&num_id, attr(e, b"val")) {
                                numbering.instances.insert(num.clone(), target);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"abstractNum" => abstract_id = None,
                    b"lvl" => level = None,
                    b"num" => num_id = None,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(e, &reader)),
                _ => {}
            }
            buf.clear();
        }

        Ok(numbering)
    }

    /// Unknown definitions and `bullet` formats are unordered.
    fn is_ordered(&self, num_id: &str, level: usize) -> bool {
        self.instances
            .get(num_id)
            .and_then(|abstract_id| self.formats.get(&(abstract_id.clone(), level)))
            .is_some_and(|fmt| fmt != "bullet" && fmt != "none")
    }
}

enum Frame {
    Table(Table),
    Row(Vec<Cell>),
    Cell(Vec<Block>),
}

/// Streaming state machine over document.xml.
struct BodyReader<'a> {
    styles: &'a HashMap<String, String>,
    numbering: &'a Numbering,
    links: &'a HashMap<String, String>,
    body: Vec<Block>,
    frames: Vec<Frame>,
    paragraph: Option<Paragraph>,
    /// Paragraphs nested inside the current one (text boxes) are flattened
    /// into it, separated by line breaks.
    nested_paragraphs: usize,
    run: Option<Run>,
    /// Runs interrupted by a text box, resumed when the inner run ends.
    outer_runs: Vec<Run>,
    /// Depth inside a subtree being ignored (`mc:Fallback`, tracked changes).
    skip_depth: usize,
    has_text: bool,
    pending_break: bool,
    link: Option<String>,
    num_id: Option<String>,
    num_level: usize,
    in_paragraph_props: bool,
    in_run_props: bool,
    in_borders: bool,
    in_text: bool,
    messages: Vec<String>,
}

impl<'a> BodyReader<'a> {
    fn new(
        styles: &'a HashMap<String, String>,
        numbering: &'a Numbering,
        links: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            styles,
            numbering,
            links,
            body: Vec::new(),
            frames: Vec::new(),
            paragraph: None,
            nested_paragraphs: 0,
            run: None,
            outer_runs: Vec::new(),
            skip_depth: 0,
            has_text: false,
            pending_break: false,
            link: None,
            num_id: None,
            num_level: 0,
            in_paragraph_props: false,
            in_run_props: false,
            in_borders: false,
            in_text: false,
            messages: Vec::new(),
        }
    }

    fn read(mut self, xml: &str) -> Result<DocxDocument, ConvertError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(_)) if self.skip_depth > 0 => self.skip_depth += 1,
                Ok(Event::End(_)) if self.skip_depth > 0 => self.skip_depth -= 1,
                Ok(Event::Empty(_)) | Ok(Event::Text(_)) if self.skip_depth > 0 => {}
                Ok(Event::Start(ref e)) => self.start(e, false),
                Ok(Event::Empty(ref e)) => self.start(e, true),
                Ok(Event::End(ref e)) => self.end(e.local_name().as_ref()),
                Ok(Event::Text(ref e)) if self.in_text => match e.unescape() {
                    Ok(text) => self.push_content(RunContent::Text(text.into_owned())),
                    Err(err) => self.messages.push(format!("Skipped undecodable text: {err}")),
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(e, &reader)),
                _ => {}
            }
            buf.clear();
        }

        Ok(DocxDocument {
            blocks: self.body,
            messages: self.messages,
        })
    }

    fn start(&mut self, e: &BytesStart<'_>, empty: bool) {
        match e.local_name().as_ref() {
            // Word writes text boxes twice; the mc:Choice copy is kept.
            b"Fallback" | b"pPrChange" | b"rPrChange" if !empty => self.skip_depth = 1,
            b"p" if !empty => {
                if self.paragraph.is_some() {
                    self.nested_paragraphs += 1;
                    self.pending_break = true;
                } else {
                    self.paragraph = Some(Paragraph::default());
                    self.has_text = false;
                    self.pending_break = false;
                }
            }
            // Properties of flattened paragraphs are dropped with them.
            b"pPr" if !empty && self.nested_paragraphs > 0 => self.skip_depth = 1,
            b"pPr" if !empty && self.run.is_none() => self.in_paragraph_props = true,
            b"rPr" if !empty && self.run.is_some() => self.in_run_props = true,
            b"r" if !empty && self.paragraph.is_some() => self.start_run(),
            b"t" if !empty => self.in_text = self.run.is_some(),
            b"tab" if self.run.is_some() && !self.in_run_props => {
                self.push_content(RunContent::Text("\t".to_string()))
            }
            b"br" | b"cr" if self.run.is_some() => self.push_content(RunContent::Break),
            b"hyperlink" if !empty => self.link = self.hyperlink_target(e),
            b"tbl" if !empty => self.frames.push(Frame::Table(Table::default())),
            b"tr" if !empty => self.frames.push(Frame::Row(Vec::new())),
            b"tc" if !empty => self.frames.push(Frame::Cell(Vec::new())),
            name if self.in_paragraph_props => self.paragraph_property(name, e, empty),
            name if self.in_run_props => self.run_property(name, e),
            _ => {}
        }
    }

    fn paragraph_property(&mut self, name: &[u8], e: &BytesStart<'_>, empty: bool) {
        let Some(paragraph) = self.paragraph.as_mut() else {
            return;
        };
        match name {
            b"pStyle" => paragraph.style_id = attr(e, b"val"),
            b"jc" => paragraph.alignment = attr(e, b"val").map(|v| normalize_alignment(&v)),
            b"pBdr" if !empty => self.in_borders = true,
            b"bottom" if self.in_borders => {
                paragraph.border_bottom = !matches!(attr(e, b"val").as_deref(), Some("nil" | "none"))
            }
            b"numId" => self.num_id = attr(e, b"val"),
            b"ilvl" => {
                self.num_level = attr(e, b"val")
                    .and_then(|v| v.parse::<usize>().ok())
                    .map_or(0, |level| level.min(MAX_LIST_LEVEL))
            }
            _ => {}
        }
    }

    fn run_property(&mut self, name: &[u8], e: &BytesStart<'_>) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let format = &mut run.format;
        match name {
            b"b" => format.bold = toggle_on(e),
            b"i" => format.italic = toggle_on(e),
            b"u" => format.underline = toggle_on(e),
            b"strike" | b"dstrike" => format.strikethrough = toggle_on(e),
            b"highlight" => format.highlight = toggle_on(e),
            _ => {}
        }
    }

    fn hyperlink_target(&mut self, e: &BytesStart<'_>) -> Option<String> {
        if let Some(id) = attr(e, b"id") {
            match self.links.get(&id) {
                Some(target) => return Some(target.clone()),
                None => self
                    .messages
                    .push(format!("Hyperlink relationship {id} not found")),
            }
        }
        attr(e, b"anchor").map(|anchor| format!("#{anchor}"))
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"p" => {
                if self.nested_paragraphs > 0 {
                    self.nested_paragraphs -= 1;
                    self.pending_break = true;
                } else if let Some(paragraph) = self.paragraph.take() {
                    self.sink().push(Block::Paragraph(paragraph));
                }
            }
            b"pPr" if self.in_paragraph_props => {
                self.in_paragraph_props = false;
                self.finish_paragraph_props();
            }
            b"pBdr" => self.in_borders = false,
            b"rPr" => self.in_run_props = false,
            b"r" => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
                self.run = self.outer_runs.pop();
            }
            b"t" => self.in_text = false,
            b"hyperlink" => self.link = None,
            b"tc" => {
                if let Some(Frame::Cell(blocks)) = self.frames.pop() {
                    if let Some(Frame::Row(cells)) = self.frames.last_mut() {
                        cells.push(Cell { blocks });
                    }
                }
            }
            b"tr" => {
                if let Some(Frame::Row(cells)) = self.frames.pop() {
                    if let Some(Frame::Table(table)) = self.frames.last_mut() {
                        table.rows.push(cells);
                    }
                }
            }
            b"tbl" => {
                if let Some(Frame::Table(table)) = self.frames.pop() {
                    self.sink().push(Block::Table(table));
                }
            }
            _ => {}
        }
    }

    /// Resolves style name and list membership once `w:pPr` is complete.
    fn finish_paragraph_props(&mut self) {
        let num_id = self.num_id.take();
        let level = std::mem::take(&mut self.num_level);
        let Some(paragraph) = self.paragraph.as_mut() else {
            return;
        };

        if let Some(style_id) = &paragraph.style_id {
            paragraph.style_name = self.styles.get(style_id).cloned();
            if paragraph.style_name.is_none() {
                self.messages
                    .push(format!("Paragraph style {style_id} is not defined in styles.xml"));
            }
        }

        // numId 0 removes numbering inherited from the style
        if let Some(num_id) = num_id.filter(|id| id != "0") {
            paragraph.list = Some(ListRef {
                level,
                ordered: self.numbering.is_ordered(&num_id, level),
            });
        }
    }

    /// A run opened inside another (text box content) splits the outer run;
    /// its remainder resumes once the inner run closes.
    fn start_run(&mut self) {
        if let Some(outer) = self.run.take() {
            self.outer_runs.push(Run {
                format: outer.format,
                link: outer.link.clone(),
                content: Vec::new(),
            });
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.runs.push(outer);
            }
        }
        self.run = Some(Run {
            link: self.link.clone(),
            ..Run::default()
        });
    }

    fn push_content(&mut self, content: RunContent) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if matches!(content, RunContent::Text(_)) {
            if std::mem::take(&mut self.pending_break) && self.has_text {
                run.content.push(RunContent::Break);
            }
            self.has_text = true;
        }
        run.content.push(content);
    }

    fn sink(&mut self) -> &mut Vec<Block> {
        match self.frames.last_mut() {
            Some(Frame::Cell(blocks)) => blocks,
            _ => &mut self.body,
        }
    }
}

fn normalize_alignment(value: &str) -> String {
    match value {
        "start" => "left",
        "end" => "right",
        "both" | "distribute" => "justify",
        other => other,
    }
    .to_string()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn paragraphs(body: &str) -> Vec<Paragraph> {
        read_docx(&docx(body))
            .unwrap()
            .blocks
            .into_iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p),
                Block::Table(_) => None,
            })
            .collect()
    }

    fn text_of(run: &Run) -> String {
        run.content
            .iter()
            .map(|c| match c {
                RunContent::Text(t) => t.as_str(),
                RunContent::Break => "\n",
            })
            .collect()
    }

    #[test]
    fn test_reads_run_formatting() {
        let paras = paragraphs(
            r#"<w:p><w:r><w:rPr><w:b/><w:i w:val="0"/><w:u w:val="single"/></w:rPr><w:t>Bold</w:t></w:r><w:r><w:rPr><w:strike/><w:highlight w:val="yellow"/></w:rPr><w:t xml:space="preserve"> mixed </w:t></w:r></w:p>"#,
        );
        assert_eq!(paras.len(), 1);
        let runs = &paras[0].runs;
        assert_eq!(
            runs[0].format,
            RunFormat {
                bold: true,
                underline: true,
                ..Default::default()
            }
        );
        assert!(runs[1].format.strikethrough && runs[1].format.highlight);
        assert_eq!(text_of(&runs[1]), " mixed ");
    }

    #[test]
    fn test_underline_none_is_off() {
        let paras = paragraphs(r#"<w:p><w:r><w:rPr><w:u w:val="none"/></w:rPr><w:t>x</w:t></w:r></w:p>"#);
        assert!(!paras[0].runs[0].format.underline);
    }

    #[test]
    fn test_paragraph_mark_properties_do_not_leak_into_runs() {
        let paras = paragraphs(
            r#"<w:p><w:pPr><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>plain</w:t></w:r></w:p>"#,
        );
        assert_eq!(paras[0].runs[0].format, RunFormat::default());
    }

    #[test]
    fn test_reads_paragraph_properties() {
        let paras = paragraphs(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="end"/><w:pBdr><w:bottom w:val="single" w:sz="6"/></w:pBdr></w:pPr><w:r><w:t>Experience</w:t></w:r></w:p>"#,
        );
        let p = &paras[0];
        assert_eq!(p.style_id.as_deref(), Some("Heading1"));
        assert_eq!(p.style_name.as_deref(), Some("heading 1"));
        assert_eq!(p.alignment.as_deref(), Some("right"));
        assert!(p.border_bottom);
        assert!(p.list.is_none());
    }

    #[test]
    fn test_resolves_list_kind_from_numbering() {
        let paras = paragraphs(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>bullet</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="2"/></w:numPr></w:pPr><w:r><w:t>number</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:numId w:val="0"/></w:numPr></w:pPr><w:r><w:t>none</w:t></w:r></w:p>"#,
        );
        assert_eq!(paras[0].list, Some(ListRef { level: 1, ordered: false }));
        assert_eq!(paras[1].list, Some(ListRef { level: 0, ordered: true }));
        assert_eq!(paras[2].list, None);
    }

    #[test]
    fn test_list_level_is_capped_and_defaults_to_zero() {
        let paras = paragraphs(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="200000"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>a</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:ilvl w:val="18446744073709551615"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>b</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:ilvl w:val="deep"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>c</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:ilvl w:val="-1"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>d</w:t></w:r></w:p>"#,
        );
        let levels: Vec<usize> = paras.iter().filter_map(|p| p.list).map(|l| l.level).collect();
        assert_eq!(levels, vec![MAX_LIST_LEVEL, MAX_LIST_LEVEL, 0, 0]);
    }

    #[test]
    fn test_text_box_choice_is_read_once() {
        let paras = paragraphs(
            r#"<w:p><w:r><w:t>Header</w:t></w:r><w:r><mc:AlternateContent>
                 <mc:Choice Requires="wps"><w:drawing><wp:anchor><a:graphic><a:graphicData><wps:wsp><wps:txbx><w:txbxContent>
                   <w:p><w:pPr><w:jc w:val="left"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>
                   <w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
                 </w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:anchor></w:drawing></mc:Choice>
                 <mc:Fallback><w:pict><v:shape><v:textbox><w:txbxContent>
                   <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
                   <w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
                 </w:txbxContent></v:textbox></v:shape></w:pict></mc:Fallback>
               </mc:AlternateContent></w:r></w:p>"#,
        );
        assert_eq!(paras.len(), 1);
        let text: String = paras[0].runs.iter().map(text_of).collect();
        assert_eq!(text, "Header\nJane Doe\njane@example.com");
        assert!(paras[0].runs.iter().all(|r| r.format == RunFormat::default()));
        assert_eq!(paras[0].alignment, None);
    }

    #[test]
    fn test_text_box_inside_run_keeps_surrounding_text() {
        let paras = paragraphs(
            r#"<w:p><w:r><w:rPr><w:i/></w:rPr><w:t>Before</w:t><w:pict><v:shape><v:textbox><w:txbxContent>
                 <w:p><w:r><w:t>Inner</w:t></w:r></w:p>
               </w:txbxContent></v:textbox></v:shape></w:pict><w:t>After</w:t></w:r></w:p>"#,
        );
        let runs = &paras[0].runs;
        let text: String = runs.iter().map(text_of).collect();
        assert_eq!(text, "Before\nInner\nAfter");
        assert!(runs[0].format.italic);
        assert!(!runs[1].format.italic);
        assert!(runs.last().unwrap().format.italic);
    }

    #[test]
    fn test_tracked_property_changes_are_ignored() {
        let paras = paragraphs(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/>
                 <w:pPrChange w:id="1" w:author="A"><w:pPr><w:pStyle w:val="Title"/><w:jc w:val="left"/></w:pPr></w:pPrChange>
               </w:pPr>
               <w:r><w:rPr><w:b/><w:rPrChange w:id="2" w:author="A"><w:rPr><w:i/></w:rPr></w:rPrChange><w:u w:val="single"/></w:rPr><w:t>Jane</w:t></w:r></w:p>"#,
        );
        let p = &paras[0];
        assert_eq!(p.alignment.as_deref(), Some("center"));
        assert_eq!(p.style_name.as_deref(), Some("heading 1"));
        assert_eq!(
            p.runs[0].format,
            RunFormat {
                bold: true,
                underline: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_reads_tabs_breaks_and_hyperlinks() {
        let paras = paragraphs(
            r#"<w:p><w:hyperlink r:id="rId9"><w:r><w:t>site</w:t></w:r></w:hyperlink><w:r><w:tab/><w:t>a</w:t><w:br/><w:t>b</w:t></w:r><w:hyperlink w:anchor="top"><w:r><w:t>up</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let runs = &paras[0].runs;
        assert_eq!(runs[0].link.as_deref(), Some("https://example.com/?a=1&b=2"));
        assert_eq!(runs[1].link, None);
        assert_eq!(text_of(&runs[1]), "\ta\nb");
        assert_eq!(runs[2].link.as_deref(), Some("#top"));
    }

    #[test]
    fn test_reads_nested_tables() {
        let doc = read_docx(&docx(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Outer</w:t></w:r></w:p>
                 <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               </w:tc><w:tc><w:p><w:r><w:t>2021</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        ))
        .unwrap();
        assert_eq!(doc.blocks.len(), 2);
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), 2);
        assert!(matches!(table.rows[0][0].blocks[1], Block::Table(_)));
    }

    #[test]
    fn test_unknown_style_is_reported() {
        let doc = read_docx(&docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Fancy"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        ))
        .unwrap();
        assert_eq!(doc.messages.len(), 1);
        assert!(doc.messages[0].contains("Fancy"));
    }

    #[test]
    fn test_only_document_part_is_required() {
        let bytes = package(&[(
            "word/document.xml",
            &document_xml(r#"<w:p><w:r><w:t>alone</w:t></w:r></w:p>"#),
        )]);
        let doc = read_docx(&bytes).unwrap();
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_missing_document_part_is_an_error() {
        let bytes = package(&[("word/styles.xml", STYLES_XML)]);
        assert!(matches!(
            read_docx(&bytes),
            Err(ConvertError::MissingPart(part)) if part == "word/document.xml"
        ));
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        assert!(matches!(
            read_docx(b"plain text, not a package"),
            Err(ConvertError::Package(_))
        ));
    }
}
