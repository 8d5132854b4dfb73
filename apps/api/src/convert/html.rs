//! HTML writer for the block model, driven by a `StyleMap`.

use super::docx::{Block, ListRef, MAX_LIST_LEVEL, Paragraph, Run, RunContent, RunFormat, Table};
use super::style_map::{HtmlTarget, ParagraphFacts, RunMarker, StyleMap};

pub fn render_blocks(blocks: &[Block], style_map: &StyleMap) -> String {
    let mut out = String::new();
    HtmlWriter::new(style_map).write_blocks(blocks, &mut out);
    out
}

struct HtmlWriter<'a> {
    style_map: &'a StyleMap,
    list_item: HtmlTarget,
}

/// One open `<ul>`/`<ol>`; its last `<li>` is always still open.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OpenList {
    Unordered,
    Ordered,
}

impl OpenList {
    fn of(list: ListRef) -> Self {
        if list.ordered {
            OpenList::Ordered
        } else {
            OpenList::Unordered
        }
    }

    fn tag(self) -> &'static str {
        match self {
            OpenList::Unordered => "ul",
            OpenList::Ordered => "ol",
        }
    }
}

impl<'a> HtmlWriter<'a> {
    fn new(style_map: &'a StyleMap) -> Self {
        Self {
            style_map,
            list_item: style_map
                .list_item_target()
                .cloned()
                .unwrap_or_else(|| HtmlTarget::new("li")),
        }
    }

    fn write_blocks(&self, blocks: &[Block], out: &mut String) {
        let mut lists: Vec<OpenList> = Vec::new();

        for block in blocks {
            match block {
                Block::Paragraph(p) if p.is_empty() => {}
                Block::Paragraph(p) => match p.list {
                    Some(list) => self.write_list_item(p, list, &mut lists, out),
                    None => {
                        self.close_lists(&mut lists, 0, out);
                        self.write_paragraph(p, out);
                    }
                },
                Block::Table(table) => {
                    self.close_lists(&mut lists, 0, out);
                    self.write_table(table, out);
                }
            }
        }

        self.close_lists(&mut lists, 0, out);
    }

    fn write_list_item(
        &self,
        paragraph: &Paragraph,
        list: ListRef,
        lists: &mut Vec<OpenList>,
        out: &mut String,
    ) {
        let depth = list.level.min(MAX_LIST_LEVEL) + 1;
        let kind = OpenList::of(list);

        self.close_lists(lists, depth, out);
        if lists.len() == depth && lists[depth - 1] != kind {
            self.close_lists(lists, depth - 1, out);
        }

        if lists.len() == depth {
            out.push_str(&self.list_item.close_tag());
        }
        while lists.len() < depth {
            let opening = if lists.len() + 1 == depth {
                kind
            } else {
                OpenList::Unordered
            };
            out.push('<');
            out.push_str(opening.tag());
            out.push('>');
            lists.push(opening);
            // Skipped levels still need an item to hang the deeper list on.
            if lists.len() < depth {
                out.push_str(&self.list_item.open_tag());
            }
        }

        out.push_str(&self.list_item.open_tag());
        self.write_runs(&paragraph.runs, out);
    }

    /// Closes open lists until at most `keep` remain.
    fn close_lists(&self, lists: &mut Vec<OpenList>, keep: usize, out: &mut String) {
        while lists.len() > keep {
            if let Some(list) = lists.pop() {
                out.push_str(&self.list_item.close_tag());
                out.push_str("</");
                out.push_str(list.tag());
                out.push('>');
            }
        }
    }

    fn write_paragraph(&self, paragraph: &Paragraph, out: &mut String) {
        let facts = ParagraphFacts {
            style_name: paragraph.style_name.as_deref(),
            alignment: paragraph.alignment.as_deref(),
            border_bottom: paragraph.border_bottom,
        };
        let target = self
            .style_map
            .paragraph_target(facts)
            .cloned()
            .unwrap_or_else(|| default_paragraph_target(paragraph.style_name.as_deref()));

        out.push_str(&target.open_tag());
        self.write_runs(&paragraph.runs, out);
        out.push_str(&target.close_tag());
    }

    fn write_table(&self, table: &Table, out: &mut String) {
        out.push_str("<table>");
        for row in &table.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str("<td>");
                self.write_blocks(&cell.blocks, out);
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
    }

    fn write_runs(&self, runs: &[Run], out: &mut String) {
        for run in merge_runs(runs) {
            if let Some(href) = &run.link {
                out.push_str("<a href=\"");
                out.push_str(&escape_html(href));
                out.push_str("\">");
            }

            let wrappers: Vec<&HtmlTarget> = RunMarker::NESTING
                .iter()
                .filter(|m| has_marker(run.format, **m))
                .filter_map(|m| self.style_map.run_target(*m))
                .collect();

            for target in &wrappers {
                out.push_str(&target.open_tag());
            }
            for content in &run.content {
                match content {
                    RunContent::Text(text) => out.push_str(&escape_html(text)),
                    RunContent::Break => out.push_str("<br />"),
                }
            }
            for target in wrappers.iter().rev() {
                out.push_str(&target.close_tag());
            }

            if run.link.is_some() {
                out.push_str("</a>");
            }
        }
    }
}

fn default_paragraph_target(style_name: Option<&str>) -> HtmlTarget {
    let Some(name) = style_name.map(str::to_ascii_lowercase) else {
        return HtmlTarget::new("p");
    };
    if name == "title" {
        return HtmlTarget::new("h1");
    }
    match name.strip_prefix("heading ").and_then(|n| n.trim().parse::<u8>().ok()) {
        Some(level @ 1..=6) => HtmlTarget::new(&format!("h{level}")),
        _ => HtmlTarget::new("p"),
    }
}

fn has_marker(format: RunFormat, marker: RunMarker) -> bool {
    match marker {
        RunMarker::Bold => format.bold,
        RunMarker::Italic => format.italic,
        RunMarker::Underline => format.underline,
        RunMarker::Strikethrough => format.strikethrough,
        RunMarker::Highlight => format.highlight,
    }
}

/// Joins adjacent runs that share formatting and link target.
fn merge_runs(runs: &[Run]) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs.iter().filter(|r| !r.content.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.format == run.format && last.link == run.link => {
                last.content.extend(run.content.iter().cloned());
            }
            _ => merged.push(run.clone()),
        }
    }
    merged
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
