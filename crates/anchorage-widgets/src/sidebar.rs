//! Sidebar drawer docked to a viewport edge.
//!
//! The panel slides in from its edge over a dimmed [`Scrim`]. Pressing the
//! scrim or Escape closes it; a modal sidebar holds the document scroll lock
//! while open.

use crate::backdrop::Scrim;
use crate::content::{PanelContent, Section};
use crate::dismiss::Trigger;
use crate::overlay::{Overlay, OverlayEvent, OverlayOptions};
use crate::portal::PanelAnchor;
use anchorage_core::{merge, ClassList, Command, Component, Host, HostEvent, ListenerId, NodeId, Placement, Size, Wakeup};
use std::time::Duration;

const PANEL: &str = "fixed z-50 bg-white shadow-xl flex flex-col transition-transform duration-300 ease-out";
const HEADER: &str = "flex items-center justify-between px-6 py-4 border-b border-slate-200";
const CONTENT: &str = "flex-1 overflow-auto p-6";
const FOOTER: &str = "px-6 py-4 border-t border-slate-200";
const BACKDROP: &str = "fixed inset-0 bg-black/50 z-40 transition-opacity duration-300";
const BACKDROP_OPEN: &str = "opacity-100";
const BACKDROP_CLOSED: &str = "opacity-0 pointer-events-none";
const SLIDE: Duration = Duration::from_millis(300);

/// Drawer extent across its edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SidebarSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
    Full,
}

impl SidebarSize {
    /// Utility class for a drawer on `edge`.
    pub fn class(self, edge: Placement) -> &'static str {
        let horizontal = matches!(edge, Placement::Left | Placement::Right);
        match (self, horizontal) {
            (SidebarSize::Sm, true) => "w-64",
            (SidebarSize::Md, true) => "w-80",
            (SidebarSize::Lg, true) => "w-96",
            (SidebarSize::Xl, true) => "w-[480px]",
            (SidebarSize::Full, true) => "w-full",
            (SidebarSize::Sm, false) => "h-48",
            (SidebarSize::Md, false) => "h-64",
            (SidebarSize::Lg, false) => "h-80",
            (SidebarSize::Xl, false) => "h-96",
            (SidebarSize::Full, false) => "h-full",
        }
    }

    /// Extent in cells: columns for side drawers, rows for top and bottom.
    pub fn extent(self, edge: Placement, viewport: Size) -> f64 {
        let horizontal = matches!(edge, Placement::Left | Placement::Right);
        let (cells, full) = match (self, horizontal) {
            (SidebarSize::Sm, true) => (24.0, viewport.width),
            (SidebarSize::Md, true) => (32.0, viewport.width),
            (SidebarSize::Lg, true) => (40.0, viewport.width),
            (SidebarSize::Xl, true) => (48.0, viewport.width),
            (SidebarSize::Sm, false) => (6.0, viewport.height),
            (SidebarSize::Md, false) => (8.0, viewport.height),
            (SidebarSize::Lg, false) => (10.0, viewport.height),
            (SidebarSize::Xl, false) => (12.0, viewport.height),
            (SidebarSize::Full, true) => (viewport.width, viewport.width),
            (SidebarSize::Full, false) => (viewport.height, viewport.height),
        };
        cells.min(full)
    }
}

fn position_class(edge: Placement) -> &'static str {
    match edge {
        Placement::Left => "top-0 left-0 h-full",
        Placement::Right => "top-0 right-0 h-full",
        Placement::Top => "top-0 left-0 w-full",
        Placement::Bottom => "bottom-0 left-0 w-full",
    }
}

fn transform_class(edge: Placement, visible: bool) -> &'static str {
    match (visible, edge) {
        (true, _) => "translate-x-0 translate-y-0",
        (false, Placement::Left) => "-translate-x-full",
        (false, Placement::Right) => "translate-x-full",
        (false, Placement::Top) => "-translate-y-full",
        (false, Placement::Bottom) => "translate-y-full",
    }
}

/// Sidebar configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarOptions {
    pub position: Placement,
    pub size: SidebarSize,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub show_backdrop: bool,
    /// Close when the backdrop is pressed.
    pub dismissible: bool,
    pub close_on_escape: bool,
    /// Hold the scroll lock while open.
    pub modal: bool,
    /// Extra panel classes.
    pub class: String,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self {
            position: Placement::Left,
            size: SidebarSize::Md,
            header: None,
            footer: None,
            show_backdrop: true,
            dismissible: true,
            close_on_escape: true,
            modal: true,
            class: String::new(),
        }
    }
}

impl SidebarOptions {
    /// Panel classes for the open or closed drawer.
    pub fn panel_class(&self, visible: bool) -> String {
        merge([
            PANEL,
            self.size.class(self.position),
            position_class(self.position),
            transform_class(self.position, visible),
            self.class.as_str(),
        ])
    }

    pub fn backdrop_class(&self, visible: bool) -> String {
        merge([BACKDROP, if visible { BACKDROP_OPEN } else { BACKDROP_CLOSED }])
    }
}

/// Sidebar messages. `Show`, `Hide` and `Toggle` are requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Show,
    Hide,
    Toggle,
    Shown,
    Hidden,
}

/// A drawer sliding in from one edge of the viewport.
#[derive(Debug)]
pub struct Sidebar {
    options: SidebarOptions,
    overlay: Overlay,
    scrim: Scrim,
    body: String,
}

impl Sidebar {
    pub fn new(options: SidebarOptions) -> Self {
        let overlay = Overlay::new(OverlayOptions {
            placement: options.position,
            trigger: Trigger::Manual,
            // without a backdrop there is nothing to press
            dismissible: options.dismissible && options.show_backdrop,
            close_on_escape: options.close_on_escape,
            lock_scroll: options.modal,
            animation_duration: SLIDE,
            class: options.panel_class(true),
            ..OverlayOptions::default()
        });
        Self {
            options,
            overlay,
            scrim: Scrim::new(),
            body: String::new(),
        }
    }

    pub fn options(&self) -> &SidebarOptions {
        &self.options
    }

    /// Replace the body text; an open drawer updates in place.
    pub fn set_body(&mut self, host: &mut dyn Host, body: &str) {
        self.body = body.to_string();
        if self.overlay.is_open() {
            let content = self.content(host.viewport());
            if let Err(err) = self.overlay.set_content(host, content) {
                tracing::warn!(error = %err, "failed to update sidebar body");
            }
        }
    }

    pub fn show(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.overlay.is_open() {
            return Command::none();
        }
        if self.options.show_backdrop {
            if let Err(err) = self.scrim.show(host, &self.options.backdrop_class(true)) {
                tracing::warn!(error = %err, "failed to show sidebar backdrop");
            }
        }
        let content = self.content(host.viewport());
        if let Err(err) = self.overlay.open(host, PanelAnchor::Docked(self.options.position), content) {
            tracing::warn!(error = %err, "sidebar failed to open");
            self.scrim.remove(host);
        }
        let events = self.overlay.events();
        self.absorb(host, events)
    }

    pub fn hide(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.overlay.is_open() {
            drop(self.overlay.close(host));
            self.slide_out(host);
        }
        let events = self.overlay.events();
        self.absorb(host, events)
    }

    pub fn toggle(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.overlay.is_open() {
            self.hide(host)
        } else {
            self.show(host)
        }
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The backdrop node while shown.
    pub fn backdrop(&self) -> Option<NodeId> {
        self.scrim.node()
    }

    fn content(&self, viewport: Size) -> PanelContent {
        let extent = self.options.size.extent(self.options.position, viewport);
        let size = match self.options.position {
            Placement::Left | Placement::Right => Size::new(extent, viewport.height),
            Placement::Top | Placement::Bottom => Size::new(viewport.width, extent),
        };
        let section = |text: &str, class: &str| Section {
            class: ClassList::verbatim(class),
            ..Section::text(text)
        };
        let mut content = PanelContent::text(&self.body)
            .with_size(size)
            .with_role("dialog");
        content.body.class = ClassList::verbatim(CONTENT);
        content.header = self.options.header.as_deref().map(|text| section(text, HEADER));
        content.footer = self.options.footer.as_deref().map(|text| section(text, FOOTER));
        content
    }

    /// Closed classes on the panel and the backdrop while the exit runs.
    fn slide_out(&mut self, host: &mut dyn Host) {
        if let Some(panel) = self.overlay.portal().map(|p| p.panel()) {
            if let Err(err) = host.set_class(panel, &self.options.panel_class(false)) {
                tracing::warn!(error = %err, "failed to slide sidebar out");
            }
        }
        self.scrim.fade(host, &self.options.backdrop_class(false));
    }

    fn absorb(&mut self, host: &mut dyn Host, events: Command<OverlayEvent>) -> Command<Message> {
        let mut out = Vec::new();
        for event in events.into_messages() {
            match event {
                OverlayEvent::Shown(_) => out.push(Message::Shown),
                OverlayEvent::Hidden(_) => {
                    self.scrim.remove(host);
                    out.push(Message::Hidden);
                }
            }
        }
        Command::messages(out)
    }
}

impl Component for Sidebar {
    type Message = Message;

    fn update(&mut self, host: &mut dyn Host, msg: Message) -> Command<Message> {
        match msg {
            Message::Show => self.show(host),
            Message::Hide => self.hide(host),
            Message::Toggle => self.toggle(host),
            Message::Shown | Message::Hidden => Command::none(),
        }
    }

    fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<Message> {
        let was_open = self.overlay.is_open();
        let events = self.overlay.handle_event(host, id, event);
        if was_open && !self.overlay.is_open() {
            self.slide_out(host);
        }
        self.absorb(host, events)
    }

    fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<Message> {
        let events = self.overlay.wake(host, wakeup);
        self.absorb(host, events)
    }

    fn destroy(&mut self, host: &mut dyn Host) {
        self.overlay.destroy(host);
        self.scrim.remove(host);
    }
}
