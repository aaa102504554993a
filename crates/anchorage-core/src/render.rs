//! Painting a [`VirtualDocument`] into a ratatui [`Buffer`].
//!
//! Every node with a non-empty layout box is drawn as a cleared, bordered
//! block; the text of its box-less descendants is laid out inside it, one
//! line per text node. Nodes whose inline `opacity` is `0` are skipped with
//! their whole subtree, so overlays in their enter or exit phase do not show.
//! Later roots paint over earlier ones.

use crate::document::VirtualDocument;
use crate::geometry::Rect;
use crate::host::{Host, NodeId};
use crate::text::truncate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

/// Paint every root node of `doc` into `buf`.
pub fn paint_document(doc: &VirtualDocument, buf: &mut Buffer) {
    for root in doc.root_nodes() {
        paint_node(doc, *root, buf);
    }
}

fn paint_node(doc: &VirtualDocument, node: NodeId, buf: &mut Buffer) {
    if is_transparent(doc, node) {
        return;
    }
    let rect = doc.measure(node);
    if let Some(area) = to_cells(rect, buf.area) {
        Clear.render(area, buf);
        let block = Block::bordered();
        let inner = block.inner(area);
        block.render(area, buf);

        let width = usize::from(inner.width);
        let mut lines = Vec::new();
        collect_lines(doc, node, &mut lines);
        let lines: Vec<Line> = lines
            .into_iter()
            .map(|(text, style)| Line::styled(truncate(text, width, "…"), style))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
    // box-less children paint nothing themselves but may hold boxed descendants
    for child in doc.children(node) {
        paint_node(doc, *child, buf);
    }
}

fn is_transparent(doc: &VirtualDocument, node: NodeId) -> bool {
    doc.style(node, "opacity").is_some_and(|o| o.trim() == "0")
}

/// Text of `node` and its box-less descendants, depth first.
fn collect_lines<'a>(doc: &'a VirtualDocument, node: NodeId, out: &mut Vec<(&'a str, Style)>) {
    if let Some(text) = doc.text(node) {
        out.push((text, line_style(doc, node)));
    }
    for child in doc.children(node) {
        if doc.measure(*child).is_empty() && !is_transparent(doc, *child) {
            collect_lines(doc, *child, out);
        }
    }
}

fn line_style(doc: &VirtualDocument, node: NodeId) -> Style {
    let mut style = Style::default();
    if doc.attribute(node, "aria-selected") == Some("true") {
        style = style.add_modifier(Modifier::BOLD);
    }
    if doc.attribute(node, "data-highlighted") == Some("true") {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if doc.attribute(node, "aria-disabled") == Some("true") {
        style = style.add_modifier(Modifier::DIM);
    }
    style
}

/// Round a layout box to terminal cells, clipped to `bounds`.
fn to_cells(rect: Rect, bounds: CellRect) -> Option<CellRect> {
    if rect.is_empty() {
        return None;
    }
    let cell = |v: f64| v.round().clamp(0.0, f64::from(u16::MAX)) as u16;
    let area = CellRect::new(cell(rect.left), cell(rect.top), cell(rect.width), cell(rect.height));
    let clipped = area.intersection(bounds);
    (clipped.width >= 2 && clipped.height >= 2).then_some(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    fn boxed(doc: &mut VirtualDocument, rect: Rect, lines: &[&str]) -> NodeId {
        let node = doc.create_element("div");
        doc.place(node, rect).unwrap();
        for line in lines {
            let child = doc.create_element("div");
            doc.set_text(child, line).unwrap();
            doc.append_child(node, child).unwrap();
        }
        node
    }

    #[test]
    fn paints_box_with_text_lines() {
        let mut doc = VirtualDocument::new(Size::new(20.0, 6.0));
        let node = boxed(&mut doc, Rect::new(1.0, 2.0, 10.0, 4.0), &["Hello", "World"]);
        doc.append_to_root(node).unwrap();

        let mut buf = Buffer::empty(CellRect::new(0, 0, 20, 6));
        paint_document(&doc, &mut buf);

        assert_eq!(row(&buf, 1), "  ┌────────┐        ");
        assert_eq!(row(&buf, 2), "  │Hello   │        ");
        assert_eq!(row(&buf, 3), "  │World   │        ");
        assert_eq!(row(&buf, 4), "  └────────┘        ");
    }

    #[test]
    fn transparent_subtrees_are_skipped() {
        let mut doc = VirtualDocument::new(Size::new(20.0, 6.0));
        let node = boxed(&mut doc, Rect::new(0.0, 0.0, 10.0, 3.0), &["hidden"]);
        doc.set_style(node, "opacity", Some("0")).unwrap();
        doc.append_to_root(node).unwrap();

        let mut buf = Buffer::empty(CellRect::new(0, 0, 20, 6));
        paint_document(&doc, &mut buf);
        assert_eq!(row(&buf, 0).trim(), "");
    }

    #[test]
    fn portal_root_without_box_paints_its_panel() {
        let mut doc = VirtualDocument::new(Size::new(20.0, 6.0));
        let root = doc.create_element("div");
        let panel = boxed(&mut doc, Rect::new(0.0, 0.0, 12.0, 3.0), &["a long line of text"]);
        doc.append_child(root, panel).unwrap();
        doc.append_to_root(root).unwrap();

        let mut buf = Buffer::empty(CellRect::new(0, 0, 20, 6));
        paint_document(&doc, &mut buf);
        assert_eq!(row(&buf, 1), "│a long li…│        ");
    }

    #[test]
    fn boxes_are_clipped_to_the_buffer() {
        assert_eq!(
            to_cells(Rect::new(4.0, 15.0, 10.0, 4.0), CellRect::new(0, 0, 20, 6)),
            Some(CellRect::new(15, 4, 5, 2))
        );
        assert_eq!(to_cells(Rect::new(0.0, 0.0, 0.0, 4.0), CellRect::new(0, 0, 20, 6)), None);
    }
}
