//! Full-viewport backdrop with a centered panel.
//!
//! A [`Scrim`] is a node covering the whole viewport behind a portal panel.
//! Presses on it land outside the panel, so a dismissible overlay closes on
//! them. [`Backdrop`] pairs a scrim with a centered overlay for modal-style
//! content; the sidebar reuses the scrim for its dimmed page.

use crate::content::PanelContent;
use crate::dismiss::Trigger;
use crate::overlay::{Overlay, OverlayError, OverlayEvent, OverlayOptions};
use crate::portal::PanelAnchor;
use anchorage_core::{
    merge, Command, Component, Host, HostError, HostEvent, ListenerId, NodeId, Rect, Wakeup,
};

/// Backdrop blur strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Blur {
    #[default]
    None,
    Sm,
    Md,
    Lg,
}

impl Blur {
    pub fn class(self) -> &'static str {
        match self {
            Blur::None => "",
            Blur::Sm => "backdrop-blur-sm",
            Blur::Md => "backdrop-blur-md",
            Blur::Lg => "backdrop-blur-lg",
        }
    }
}

/// How dark the backdrop is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Opacity {
    Light,
    #[default]
    Medium,
    Dark,
    Solid,
}

impl Opacity {
    pub fn class(self) -> &'static str {
        match self {
            Opacity::Light => "bg-black/25",
            Opacity::Medium => "bg-black/50",
            Opacity::Dark => "bg-black/75",
            Opacity::Solid => "bg-black",
        }
    }
}

/// A viewport-sized node placed behind an overlay.
#[derive(Debug, Default)]
pub struct Scrim {
    node: Option<NodeId>,
}

impl Scrim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Create the node with `class` and cover the viewport. Replaces an
    /// existing scrim.
    pub fn show(&mut self, host: &mut dyn Host, class: &str) -> Result<NodeId, HostError> {
        self.remove(host);
        let node = host.create_element("div");
        host.set_class(node, class)?;
        host.set_attribute(node, "aria-hidden", "true")?;
        let viewport = host.viewport();
        host.place(node, Rect::new(0.0, 0.0, viewport.width, viewport.height))?;
        host.append_to_root(node)?;
        self.node = Some(node);
        Ok(node)
    }

    /// Switch to the fading-out classes; the node stays until [`remove`](Self::remove).
    pub fn fade(&mut self, host: &mut dyn Host, class: &str) {
        let Some(node) = self.node else {
            return;
        };
        let faded = host
            .set_class(node, class)
            .and_then(|()| host.set_style(node, "opacity", Some("0")));
        if let Err(err) = faded {
            tracing::warn!(scrim = %node, error = %err, "failed to fade scrim");
        }
    }

    pub fn remove(&mut self, host: &mut dyn Host) {
        if let Some(node) = self.node.take() {
            if let Err(err) = host.remove(node) {
                tracing::warn!(scrim = %node, error = %err, "failed to remove scrim");
            }
        }
    }
}

/// Backdrop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropOptions {
    pub blur: Blur,
    pub opacity: Opacity,
    pub centered: bool,
    pub close_on_click: bool,
    pub close_on_escape: bool,
    pub lock_scroll: bool,
    pub animate: bool,
    pub z_index: u32,
    /// Extra backdrop classes.
    pub class: String,
}

impl Default for BackdropOptions {
    fn default() -> Self {
        Self {
            blur: Blur::None,
            opacity: Opacity::Medium,
            centered: true,
            close_on_click: true,
            close_on_escape: true,
            lock_scroll: true,
            animate: true,
            z_index: 50,
            class: String::new(),
        }
    }
}

impl BackdropOptions {
    /// Classes for the scrim node.
    pub fn classes(&self) -> String {
        merge([
            "fixed inset-0",
            self.blur.class(),
            self.opacity.class(),
            if self.centered { "flex items-center justify-center" } else { "" },
            if self.animate { "transition-opacity duration-200" } else { "" },
            format!("z-[{}]", self.z_index).as_str(),
            self.class.as_str(),
        ])
    }
}

/// Backdrop messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Request: close.
    Close,
    Shown,
    Hidden,
}

/// A dimmed, optionally blurred backdrop holding a centered panel.
#[derive(Debug)]
pub struct Backdrop {
    options: BackdropOptions,
    overlay: Overlay,
    scrim: Scrim,
}

impl Backdrop {
    pub fn new(options: BackdropOptions) -> Self {
        let overlay = Overlay::new(OverlayOptions {
            trigger: Trigger::Manual,
            dismissible: options.close_on_click,
            close_on_escape: options.close_on_escape,
            lock_scroll: options.lock_scroll,
            animation_duration: if options.animate {
                OverlayOptions::default().animation_duration
            } else {
                std::time::Duration::ZERO
            },
            class: "relative z-10".to_string(),
            ..OverlayOptions::default()
        });
        Self {
            options,
            overlay,
            scrim: Scrim::new(),
        }
    }

    /// Cover the viewport and show `content` in the middle.
    pub fn open(&mut self, host: &mut dyn Host, content: PanelContent) -> Result<Command<Message>, OverlayError> {
        let class = self.options.classes();
        self.scrim.show(host, &class)?;
        if let Err(err) = self.overlay.open(host, PanelAnchor::Centered, content) {
            self.scrim.remove(host);
            return Err(err);
        }
        let events = self.overlay.events();
        Ok(self.absorb(host, events))
    }

    pub fn close(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.overlay.is_open() {
            drop(self.overlay.close(host));
            self.scrim.fade(host, &self.options.classes());
        }
        let events = self.overlay.events();
        self.absorb(host, events)
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The scrim node while shown.
    pub fn scrim(&self) -> Option<NodeId> {
        self.scrim.node()
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

impl Component for Backdrop {
    type Message = Message;

    fn update(&mut self, host: &mut dyn Host, msg: Message) -> Command<Message> {
        match msg {
            Message::Close => self.close(host),
            Message::Shown | Message::Hidden => Command::none(),
        }
    }

    fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<Message> {
        let was_open = self.overlay.is_open();
        let events = self.overlay.handle_event(host, id, event);
        if was_open && !self.overlay.is_open() {
            self.scrim.fade(host, &self.options.classes());
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
