//! Scroll-to-top button.
//!
//! The button sits in a bottom corner of the viewport and shows once the
//! document has scrolled past a threshold. Pressing it scrolls back to the
//! top.

use anchorage_core::{
    merge, Command, Component, EventKind, Host, HostError, HostEvent, ListenerId, ListenerTarget, NodeId, Rect,
    Wakeup,
};

const BUTTON: &str = "fixed z-50 p-3 rounded-full transition-all duration-300 focus:outline-none focus-visible:ring-2 focus-visible:ring-offset-2 focus-visible:ring-blue-500 animate-in fade-in-0 zoom-in-95";
/// Button box in cells.
const WIDTH: f64 = 5.0;
const HEIGHT: f64 = 3.0;
/// Distance from the viewport edges.
const INSET: f64 = 1.0;

/// Corner the button sits in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollTopPosition {
    #[default]
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl ScrollTopPosition {
    pub fn class(self) -> &'static str {
        match self {
            ScrollTopPosition::BottomRight => "right-6 bottom-6",
            ScrollTopPosition::BottomLeft => "left-6 bottom-6",
            ScrollTopPosition::BottomCenter => "left-1/2 -translate-x-1/2 bottom-6",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollTopVariant {
    #[default]
    Primary,
    Secondary,
    Dark,
}

impl ScrollTopVariant {
    pub fn class(self) -> &'static str {
        match self {
            ScrollTopVariant::Primary => "bg-blue-600 hover:bg-blue-700 text-white shadow-lg hover:shadow-xl",
            ScrollTopVariant::Secondary => {
                "bg-white hover:bg-slate-50 text-slate-700 border border-slate-200 shadow-lg hover:shadow-xl"
            }
            ScrollTopVariant::Dark => "bg-slate-800 hover:bg-slate-900 text-white shadow-lg hover:shadow-xl",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTopOptions {
    /// Scroll offset past which the button shows.
    pub threshold: f64,
    pub position: ScrollTopPosition,
    pub variant: ScrollTopVariant,
    pub class: String,
}

impl Default for ScrollTopOptions {
    fn default() -> Self {
        Self {
            threshold: 400.0,
            position: ScrollTopPosition::BottomRight,
            variant: ScrollTopVariant::Primary,
            class: String::new(),
        }
    }
}

impl ScrollTopOptions {
    pub fn classes(&self) -> String {
        merge([BUTTON, self.position.class(), self.variant.class(), self.class.as_str()])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Request: scroll the document to the top.
    ScrollToTop,
    /// The button appeared or disappeared.
    VisibilityChanged(bool),
}

/// A floating button that returns the document to the top.
#[derive(Debug)]
pub struct ScrollTop {
    options: ScrollTopOptions,
    button: Option<NodeId>,
    scroll: Option<ListenerId>,
    resize: Option<ListenerId>,
    press: Option<ListenerId>,
    visible: bool,
}

impl ScrollTop {
    pub fn new(options: ScrollTopOptions) -> Self {
        Self {
            options,
            button: None,
            scroll: None,
            resize: None,
            press: None,
            visible: false,
        }
    }

    /// Create the button and start watching the scroll offset.
    pub fn mount(&mut self, host: &mut dyn Host) -> Result<Command<Message>, HostError> {
        self.unmount(host);
        let button = host.create_element("button");
        host.set_class(button, &self.options.classes())?;
        host.set_attribute(button, "aria-label", "Scroll to top")?;
        host.set_text(button, "↑")?;
        host.set_style(button, "opacity", Some("0"))?;
        let rect = self.rect(host);
        host.place(button, rect)?;
        host.append_to_root(button)?;
        self.button = Some(button);
        self.scroll = Some(host.add_listener(ListenerTarget::Window, EventKind::Scroll));
        self.resize = Some(host.add_listener(ListenerTarget::Window, EventKind::Resize));
        self.press = Some(host.add_listener(ListenerTarget::Node(button), EventKind::PointerDown));
        self.visible = false;
        Ok(self.sync(host))
    }

    /// Remove the button and its listeners.
    pub fn unmount(&mut self, host: &mut dyn Host) {
        for id in [self.scroll.take(), self.resize.take(), self.press.take()].into_iter().flatten() {
            host.remove_listener(id);
        }
        if let Some(button) = self.button.take() {
            if let Err(err) = host.remove(button) {
                tracing::warn!(button = %button, error = %err, "failed to remove scroll-top button");
            }
        }
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn button(&self) -> Option<NodeId> {
        self.button
    }

    pub fn scroll_to_top(&mut self, host: &mut dyn Host) -> Command<Message> {
        host.scroll_to(0.0);
        tracing::debug!("scrolled to top");
        self.sync(host)
    }

    fn rect(&self, host: &dyn Host) -> Rect {
        let viewport = host.viewport();
        let top = (viewport.height - HEIGHT - INSET).max(0.0);
        let left = match self.options.position {
            ScrollTopPosition::BottomRight => viewport.width - WIDTH - INSET,
            ScrollTopPosition::BottomLeft => INSET,
            ScrollTopPosition::BottomCenter => (viewport.width - WIDTH) / 2.0,
        };
        Rect::new(top, left.max(0.0), WIDTH, HEIGHT)
    }

    /// Match visibility to the scroll offset.
    fn sync(&mut self, host: &mut dyn Host) -> Command<Message> {
        let Some(button) = self.button else {
            return Command::none();
        };
        let visible = host.scroll_offset() > self.options.threshold;
        if visible == self.visible {
            return Command::none();
        }
        self.visible = visible;
        let opacity = if visible { None } else { Some("0") };
        if let Err(err) = host.set_style(button, "opacity", opacity) {
            tracing::warn!(button = %button, error = %err, "failed to toggle scroll-top button");
        }
        Command::message(Message::VisibilityChanged(visible))
    }
}

impl Component for ScrollTop {
    type Message = Message;

    fn update(&mut self, host: &mut dyn Host, msg: Message) -> Command<Message> {
        match msg {
            Message::ScrollToTop => self.scroll_to_top(host),
            Message::VisibilityChanged(_) => Command::none(),
        }
    }

    fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, _event: &HostEvent) -> Command<Message> {
        if Some(id) == self.scroll {
            self.sync(host)
        } else if Some(id) == self.resize {
            if let Some(button) = self.button {
                let rect = self.rect(host);
                if let Err(err) = host.place(button, rect) {
                    tracing::warn!(button = %button, error = %err, "failed to move scroll-top button");
                }
            }
            Command::none()
        } else if Some(id) == self.press && self.visible {
            self.scroll_to_top(host)
        } else {
            Command::none()
        }
    }

    fn wake(&mut self, _host: &mut dyn Host, _wakeup: Wakeup) -> Command<Message> {
        Command::none()
    }

    fn destroy(&mut self, host: &mut dyn Host) {
        self.unmount(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorage_core::testing::Stage;
    use anchorage_core::Size;

    fn mounted(options: ScrollTopOptions) -> Stage<ScrollTop> {
        let mut stage = Stage::with_viewport(ScrollTop::new(options), Size::new(80.0, 24.0));
        let cmd = stage.with(|scroll_top, host| scroll_top.mount(host)).unwrap();
        stage.absorb(cmd);
        stage
    }

    fn scroll(stage: &mut Stage<ScrollTop>, top: f64) {
        let event = stage.doc_mut().scroll(top);
        stage.fire(event);
    }

    #[test]
    fn classes_merge_position_and_variant() {
        let options = ScrollTopOptions {
            position: ScrollTopPosition::BottomCenter,
            variant: ScrollTopVariant::Dark,
            class: "bg-red-600".into(),
            ..ScrollTopOptions::default()
        };
        let class = options.classes();
        assert!(class.starts_with("fixed z-50 p-3 rounded-full"));
        assert!(class.contains("left-1/2 -translate-x-1/2 bottom-6"));
        assert!(class.contains("bg-red-600 hover:bg-slate-900 text-white"));
        assert!(!class.contains("bg-slate-800"));
    }

    #[test]
    fn shows_past_the_threshold() {
        let mut stage = mounted(ScrollTopOptions::default());
        let button = stage.component().button().unwrap();
        assert!(!stage.component().is_visible());
        assert_eq!(stage.doc().style(button, "opacity"), Some("0"));

        scroll(&mut stage, 400.0);
        assert!(!stage.component().is_visible());
        scroll(&mut stage, 401.0);
        assert!(stage.component().is_visible());
        assert_eq!(stage.doc().style(button, "opacity"), None);
        scroll(&mut stage, 900.0);
        assert_eq!(stage.take_messages(), vec![Message::VisibilityChanged(true)]);
    }

    #[test]
    fn initial_offset_is_checked_on_mount() {
        let mut stage = Stage::new(ScrollTop::new(ScrollTopOptions::default()));
        let _ = stage.doc_mut().scroll(1000.0);
        let cmd = stage.with(|scroll_top, host| scroll_top.mount(host)).unwrap();
        stage.absorb(cmd);
        assert!(stage.component().is_visible());
    }

    #[test]
    fn press_scrolls_to_top_and_hides() {
        let mut stage = mounted(ScrollTopOptions::default());
        scroll(&mut stage, 800.0);
        let button = stage.component().button().unwrap();
        stage.click(button);
        assert_eq!(stage.doc().scroll_offset(), 0.0);
        assert!(!stage.component().is_visible());
        assert_eq!(
            stage.take_messages(),
            vec![Message::VisibilityChanged(true), Message::VisibilityChanged(false)]
        );
    }

    #[test]
    fn hidden_button_ignores_presses() {
        let mut stage = mounted(ScrollTopOptions {
            threshold: 1000.0,
            ..ScrollTopOptions::default()
        });
        scroll(&mut stage, 500.0);
        let button = stage.component().button().unwrap();
        stage.click(button);
        assert_eq!(stage.doc().scroll_offset(), 500.0);
    }

    #[test]
    fn placed_in_its_corner() {
        let stage = mounted(ScrollTopOptions::default());
        let button = stage.component().button().unwrap();
        assert_eq!(stage.doc().measure(button), Rect::new(20.0, 74.0, 5.0, 3.0));

        let stage = mounted(ScrollTopOptions {
            position: ScrollTopPosition::BottomCenter,
            ..ScrollTopOptions::default()
        });
        let button = stage.component().button().unwrap();
        assert_eq!(stage.doc().measure(button).left, 37.5);
    }

    #[test]
    fn message_request_and_unmount() {
        let mut stage = mounted(ScrollTopOptions::default());
        scroll(&mut stage, 600.0);
        stage.send(Message::ScrollToTop);
        assert_eq!(stage.doc().scroll_offset(), 0.0);
        stage.destroy();
        assert!(stage.doc().root_nodes().is_empty());
        assert_eq!(stage.doc().listener_count(), 0);
    }
}
