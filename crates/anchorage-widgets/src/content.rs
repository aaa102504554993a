//! Declarative panel content.
//!
//! Overlays never clone live nodes into their portal. A component describes
//! what the panel shows as a [`PanelContent`] and the portal renders it into
//! fresh nodes: an optional header, the body lines, an optional footer and an
//! optional arrow, each with its own classes.

use anchorage_core::text::max_width;
use anchorage_core::{ClassList, Host, HostError, NodeId, Placement, Size};

/// One line of text in a panel section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelLine {
    pub text: String,
    pub class: ClassList,
    /// Extra attributes, such as `aria-selected` for option rows.
    pub attributes: Vec<(String, String)>,
}

impl PanelLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, classes: &str) -> Self {
        self.class.push_str(classes);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// A header, body or footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub lines: Vec<PanelLine>,
    pub class: ClassList,
}

impl Section {
    /// A section holding `text`, one line per `\n`-separated piece.
    pub fn text(text: &str) -> Self {
        Self {
            lines: text.lines().map(PanelLine::new).collect(),
            class: ClassList::new(),
        }
    }
}

/// Arrow classes: a base set plus one set per resolved side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrow {
    pub base: ClassList,
    pub top: ClassList,
    pub bottom: ClassList,
    pub left: ClassList,
    pub right: ClassList,
}

impl Arrow {
    /// Merged classes for a panel sitting on `placement` of its anchor.
    pub fn class_for(&self, placement: Placement) -> ClassList {
        let side = match placement {
            Placement::Top => &self.top,
            Placement::Bottom => &self.bottom,
            Placement::Left => &self.left,
            Placement::Right => &self.right,
        };
        let mut class = self.base.clone();
        class.extend_from(side);
        class
    }
}

/// What a portal panel shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelContent {
    pub header: Option<Section>,
    pub body: Section,
    pub footer: Option<Section>,
    pub arrow: Option<Arrow>,
    /// Fixed panel size; the natural text size when unset.
    pub size: Option<Size>,
    /// ARIA role of the panel.
    pub role: Option<String>,
}

/// The nodes created by [`PanelContent::render_into`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContent {
    /// One node per body line, in order.
    pub lines: Vec<NodeId>,
    pub arrow: Option<NodeId>,
}

impl PanelContent {
    /// Content with a plain text body.
    pub fn text(body: &str) -> Self {
        Self {
            body: Section::text(body),
            ..Self::default()
        }
    }

    /// Content whose body is the given lines.
    pub fn lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = PanelLine>,
    {
        Self {
            body: Section {
                lines: lines.into_iter().collect(),
                class: ClassList::new(),
            },
            ..Self::default()
        }
    }

    pub fn with_header(mut self, text: &str) -> Self {
        self.header = Some(Section::text(text));
        self
    }

    pub fn with_footer(mut self, text: &str) -> Self {
        self.footer = Some(Section::text(text));
        self
    }

    pub fn with_arrow(mut self, arrow: Arrow) -> Self {
        self.arrow = Some(arrow);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Number of text rows, all sections included.
    pub fn rows(&self) -> usize {
        self.sections().map(|s| s.lines.len()).sum()
    }

    /// Rows above the first body line.
    pub fn header_rows(&self) -> usize {
        self.header.as_ref().map_or(0, |h| h.lines.len())
    }

    /// Size that fits every line inside a one-cell border with one cell of
    /// horizontal padding on each side.
    pub fn natural_size(&self) -> Size {
        let widest = max_width(self.sections().flat_map(|s| s.lines.iter().map(|l| l.text.as_str())));
        Size::new((widest + 4) as f64, (self.rows() + 2) as f64)
    }

    /// The size the panel gets.
    pub fn panel_size(&self) -> Size {
        self.size.unwrap_or_else(|| self.natural_size())
    }

    /// Create the content nodes under `panel`. The arrow starts with the
    /// classes for `placement`.
    pub fn render_into(
        &self,
        host: &mut dyn Host,
        panel: NodeId,
        placement: Placement,
    ) -> Result<RenderedContent, HostError> {
        if let Some(role) = &self.role {
            host.set_attribute(panel, "role", role)?;
        }
        if let Some(header) = &self.header {
            render_section(host, panel, header)?;
        }
        let lines = render_section(host, panel, &self.body)?;
        if let Some(footer) = &self.footer {
            render_section(host, panel, footer)?;
        }
        let arrow = match &self.arrow {
            Some(arrow) => {
                let node = host.create_element("div");
                host.set_class(node, &arrow.class_for(placement).to_string())?;
                host.set_attribute(node, "aria-hidden", "true")?;
                host.append_child(panel, node)?;
                Some(node)
            }
            None => None,
        };
        Ok(RenderedContent { lines, arrow })
    }

    fn sections(&self) -> impl Iterator<Item = &Section> {
        self.header
            .iter()
            .chain(std::iter::once(&self.body))
            .chain(self.footer.iter())
    }
}

fn render_section(host: &mut dyn Host, panel: NodeId, section: &Section) -> Result<Vec<NodeId>, HostError> {
    let container = host.create_element("div");
    if !section.class.is_empty() {
        host.set_class(container, &section.class.to_string())?;
    }
    let mut nodes = Vec::with_capacity(section.lines.len());
    for line in &section.lines {
        let node = host.create_element("div");
        host.set_text(node, &line.text)?;
        if !line.class.is_empty() {
            host.set_class(node, &line.class.to_string())?;
        }
        for (name, value) in &line.attributes {
            host.set_attribute(node, name, value)?;
        }
        host.append_child(container, node)?;
        nodes.push(node);
    }
    host.append_child(panel, container)?;
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorage_core::VirtualDocument;

    #[test]
    fn natural_size_covers_all_sections() {
        let content = PanelContent::text("body\nsecond line").with_header("Title").with_footer("f");
        assert_eq!(content.rows(), 4);
        assert_eq!(content.header_rows(), 1);
        assert_eq!(content.natural_size(), Size::new(15.0, 6.0));
        assert_eq!(content.with_size(Size::new(3.0, 3.0)).panel_size(), Size::new(3.0, 3.0));
    }

    #[test]
    fn sized_content_compares_by_value() {
        let sized = PanelContent::text("a").with_size(Size::new(10.0, 2.0));
        assert_eq!(sized, PanelContent::text("a").with_size(Size::new(10.0, 2.0)));
        assert_ne!(sized, PanelContent::text("a"));
    }

    #[test]
    fn renders_sections_in_order() {
        let mut doc = VirtualDocument::new(Size::new(80.0, 24.0));
        let panel = doc.create_element("div");
        let mut content = PanelContent::lines([
            PanelLine::new("one").with_attribute("aria-selected", "true"),
            PanelLine::new("two").with_class("opacity-50"),
        ])
        .with_header("Head")
        .with_role("listbox");
        content.body.class.push_str("px-4 py-3");

        let rendered = content.render_into(&mut doc, panel, Placement::Bottom).unwrap();
        assert_eq!(doc.texts(panel), vec!["Head", "one", "two"]);
        assert_eq!(doc.attribute(panel, "role"), Some("listbox"));
        assert_eq!(rendered.lines.len(), 2);
        assert_eq!(doc.attribute(rendered.lines[0], "aria-selected"), Some("true"));
        assert_eq!(doc.class(rendered.lines[1]), Some("opacity-50"));
        assert_eq!(rendered.arrow, None);
    }

    #[test]
    fn arrow_classes_follow_the_side() {
        let arrow = Arrow {
            base: ClassList::parse("absolute top-0"),
            top: ClassList::parse("bottom-0"),
            bottom: ClassList::parse("top-0 -translate-y-1/2"),
            ..Arrow::default()
        };
        assert_eq!(arrow.class_for(Placement::Top).to_string(), "absolute top-0 bottom-0");
        assert_eq!(arrow.class_for(Placement::Bottom).to_string(), "absolute top-0 -translate-y-1/2");
        assert_eq!(arrow.class_for(Placement::Left).to_string(), "absolute top-0");

        let mut doc = VirtualDocument::new(Size::new(80.0, 24.0));
        let panel = doc.create_element("div");
        let rendered = PanelContent::text("x")
            .with_arrow(arrow)
            .render_into(&mut doc, panel, Placement::Top)
            .unwrap();
        let node = rendered.arrow.unwrap();
        assert_eq!(doc.class(node), Some("absolute top-0 bottom-0"));
        assert_eq!(doc.attribute(node, "aria-hidden"), Some("true"));
    }
}
