//! Popover: a rich floating panel attached to a trigger.
//!
//! The panel can carry a header, a footer and an arrow pointing at the
//! trigger. Hover-triggered popovers stay open while the pointer moves from
//! the trigger onto the panel.

use crate::content::{Arrow, PanelContent, Section};
use crate::dismiss::Trigger;
use crate::overlay::{Overlay, OverlayError, OverlayEvent, OverlayOptions};
use anchorage_core::{merge, ClassList, Command, Component, Host, HostEvent, ListenerId, NodeId, Placement, Wakeup};
use std::time::Duration;

const PANEL: &str =
    "min-w-48 bg-white dark:bg-slate-800 rounded-lg shadow-lg border border-slate-200 dark:border-slate-700";
const HEADER: &str = "px-4 py-2 border-b border-slate-200 dark:border-slate-700 font-semibold text-slate-900 dark:text-slate-100";
const BODY: &str = "px-4 py-3";
const FOOTER: &str =
    "px-4 py-2 border-t border-slate-200 dark:border-slate-700 bg-slate-50 dark:bg-slate-900";
const ARROW: &str = "absolute w-2.5 h-2.5 bg-white dark:bg-slate-800 rotate-45 shadow-sm";
const ARROW_TOP: &str =
    "bottom-0 left-1/2 -translate-x-1/2 translate-y-1/2 border-b border-r border-slate-200 dark:border-slate-700";
const ARROW_BOTTOM: &str =
    "top-0 left-1/2 -translate-x-1/2 -translate-y-1/2 border-t border-l border-slate-200 dark:border-slate-700";
const ARROW_LEFT: &str =
    "right-0 top-1/2 -translate-y-1/2 translate-x-1/2 border-t border-r border-slate-200 dark:border-slate-700";
const ARROW_RIGHT: &str =
    "left-0 top-1/2 -translate-y-1/2 -translate-x-1/2 border-b border-l border-slate-200 dark:border-slate-700";

/// Popover configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PopoverOptions {
    pub placement: Placement,
    pub trigger: Trigger,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub show_arrow: bool,
    /// Close on a press outside. Only click-triggered popovers listen for it.
    pub dismissible: bool,
    pub close_on_escape: bool,
    pub hover_delay: Duration,
    /// Extra panel classes, merged over the defaults.
    pub class: String,
}

impl Default for PopoverOptions {
    fn default() -> Self {
        Self {
            placement: Placement::Bottom,
            trigger: Trigger::Click,
            header: None,
            footer: None,
            show_arrow: true,
            dismissible: true,
            close_on_escape: true,
            hover_delay: Duration::from_millis(200),
            class: String::new(),
        }
    }
}

/// Popover messages. `Show`, `Hide` and `Toggle` are requests; `Shown` and
/// `Hidden` report the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Show,
    Hide,
    Toggle,
    Shown,
    Hidden,
}

impl From<OverlayEvent> for Message {
    fn from(event: OverlayEvent) -> Self {
        match event {
            OverlayEvent::Shown(_) => Message::Shown,
            OverlayEvent::Hidden(_) => Message::Hidden,
        }
    }
}

/// A popover bound to one trigger node.
#[derive(Debug)]
pub struct Popover {
    options: PopoverOptions,
    overlay: Overlay,
    body: String,
}

impl Popover {
    pub fn new(options: PopoverOptions) -> Self {
        let overlay = Overlay::new(OverlayOptions {
            placement: options.placement,
            trigger: options.trigger,
            hover_delay: options.hover_delay,
            dismissible: options.dismissible && options.trigger == Trigger::Click,
            close_on_escape: options.close_on_escape,
            class: merge([PANEL, options.class.as_str()]),
            ..OverlayOptions::default()
        });
        Self {
            options,
            overlay,
            body: String::new(),
        }
    }

    /// Attach to the trigger node.
    pub fn bind(&mut self, host: &mut dyn Host, trigger: NodeId) -> Result<(), OverlayError> {
        self.overlay.bind(host, trigger);
        self.overlay.set_content(host, self.content())
    }

    /// Replace the body text; an open panel updates in place.
    pub fn set_body(&mut self, host: &mut dyn Host, body: &str) -> Result<(), OverlayError> {
        self.body = body.to_string();
        self.overlay.set_content(host, self.content())
    }

    pub fn show(&mut self, host: &mut dyn Host) -> Command<Message> {
        if let Err(err) = self.overlay.show(host) {
            tracing::warn!(error = %err, "popover failed to open");
        }
        self.overlay.events().map(Message::from)
    }

    pub fn hide(&mut self, host: &mut dyn Host) -> Command<Message> {
        drop(self.overlay.close(host));
        self.overlay.events().map(Message::from)
    }

    pub fn toggle(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.is_open() {
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

    fn content(&self) -> PanelContent {
        let mut content = PanelContent::text(&self.body).with_role("tooltip");
        content.body.class = ClassList::verbatim(BODY);
        content.header = self.options.header.as_deref().map(|text| Section {
            class: ClassList::verbatim(HEADER),
            ..Section::text(text)
        });
        content.footer = self.options.footer.as_deref().map(|text| Section {
            class: ClassList::verbatim(FOOTER),
            ..Section::text(text)
        });
        if self.options.show_arrow {
            content.arrow = Some(arrow());
        }
        content
    }
}

fn arrow() -> Arrow {
    Arrow {
        base: ClassList::parse(ARROW),
        top: ClassList::parse(ARROW_TOP),
        bottom: ClassList::parse(ARROW_BOTTOM),
        left: ClassList::parse(ARROW_LEFT),
        right: ClassList::parse(ARROW_RIGHT),
    }
}

impl Component for Popover {
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
        self.overlay.handle_event(host, id, event).map(Message::from)
    }

    fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<Message> {
        self.overlay.wake(host, wakeup).map(Message::from)
    }

    fn destroy(&mut self, host: &mut dyn Host) {
        self.overlay.destroy(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorage_core::testing::Stage;
    use anchorage_core::{Key, Rect};

    fn staged(options: PopoverOptions) -> (Stage<Popover>, NodeId) {
        let mut stage = Stage::new(Popover::new(options));
        let trigger = stage.anchor(Rect::new(100.0, 300.0, 80.0, 24.0));
        stage.with(|popover, host| {
            popover.bind(host, trigger).unwrap();
            popover.set_body(host, "Popover body").unwrap();
        });
        (stage, trigger)
    }

    #[test]
    fn click_shows_header_body_footer_and_arrow() {
        let (mut stage, trigger) = staged(PopoverOptions {
            header: Some("Title".into()),
            footer: Some("Footer".into()),
            ..PopoverOptions::default()
        });
        stage.click(trigger);
        assert_eq!(stage.take_messages(), vec![Message::Shown]);

        let panel = stage.component().overlay().panel().unwrap();
        let doc = stage.doc();
        assert_eq!(doc.texts(panel), vec!["Title", "Popover body", "Footer"]);
        assert_eq!(doc.attribute(panel, "role"), Some("tooltip"));
        assert!(doc.class(panel).unwrap().starts_with("min-w-48 bg-white"));

        let children = doc.children(panel);
        assert_eq!(children.len(), 4);
        assert_eq!(doc.class(children[0]), Some(HEADER));
        assert_eq!(doc.class(children[1]), Some(BODY));
        let arrow = doc.class(children[3]).unwrap();
        // side borders and the border color share a group, so the color wins
        assert!(arrow.contains("top-0 left-1/2 -translate-x-1/2 -translate-y-1/2 border-slate-200"));
        assert!(!arrow.contains("border-t"));
    }

    #[test]
    fn class_override_merges_over_defaults() {
        let (mut stage, trigger) = staged(PopoverOptions {
            class: "bg-slate-900 rounded-none".into(),
            ..PopoverOptions::default()
        });
        stage.click(trigger);
        let panel = stage.component().overlay().panel().unwrap();
        let class = stage.doc().class(panel).unwrap();
        assert!(class.contains("bg-slate-900"));
        assert!(!class.contains("bg-white "));
        assert!(class.contains("rounded-none") && !class.contains("rounded-lg"));
    }

    #[test]
    fn arrow_can_be_hidden() {
        let (mut stage, trigger) = staged(PopoverOptions {
            show_arrow: false,
            ..PopoverOptions::default()
        });
        stage.click(trigger);
        let panel = stage.component().overlay().panel().unwrap();
        assert_eq!(stage.doc().children(panel).len(), 1);
    }

    #[test]
    fn top_placement_points_the_arrow_down() {
        let (mut stage, trigger) = staged(PopoverOptions {
            placement: Placement::Top,
            ..PopoverOptions::default()
        });
        stage.click(trigger);
        let panel = stage.component().overlay().panel().unwrap();
        let arrow = *stage.doc().children(panel).last().unwrap();
        assert!(stage.doc().class(arrow).unwrap().contains("bottom-0"));
    }

    #[test]
    fn messages_drive_show_and_hide() {
        let (mut stage, _) = staged(PopoverOptions {
            trigger: Trigger::Manual,
            ..PopoverOptions::default()
        });
        stage.send(Message::Show);
        assert!(stage.component().is_open());
        stage.send(Message::Toggle);
        assert!(!stage.component().is_open());
        stage.advance_ms(200);
        assert_eq!(stage.take_messages(), vec![Message::Shown, Message::Hidden]);
    }

    #[test]
    fn hover_popover_survives_moving_onto_the_panel() {
        let (mut stage, trigger) = staged(PopoverOptions {
            trigger: Trigger::Hover,
            ..PopoverOptions::default()
        });
        stage.fire(HostEvent::PointerEnter(trigger));
        stage.advance_ms(200);
        assert!(stage.component().is_open());
        let panel = stage.component().overlay().panel().unwrap();

        stage.fire(HostEvent::PointerLeave(trigger));
        stage.fire(HostEvent::PointerEnter(panel));
        stage.advance_ms(400);
        assert!(stage.component().is_open());

        // hover popovers ignore outside presses
        stage.click_outside();
        assert!(stage.component().is_open());

        stage.fire(HostEvent::PointerLeave(panel));
        stage.advance_ms(200);
        assert!(!stage.component().is_open());
    }

    #[test]
    fn escape_closes() {
        let (mut stage, trigger) = staged(PopoverOptions::default());
        stage.click(trigger);
        stage.press(Key::Escape);
        assert!(!stage.component().is_open());
    }

    #[test]
    fn body_updates_while_open() {
        let (mut stage, trigger) = staged(PopoverOptions::default());
        stage.click(trigger);
        stage.with(|popover, host| popover.set_body(host, "Changed").unwrap());
        let panel = stage.component().overlay().panel().unwrap();
        assert_eq!(stage.doc().texts(panel), vec!["Changed"]);
    }
}
