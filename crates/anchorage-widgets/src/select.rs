//! Select and multi-select dropdowns.
//!
//! The options list is rendered into a portal panel that takes the trigger's
//! width and sits 4px below it. Pressing the trigger toggles the list; a
//! press outside or Escape closes it. While the trigger has focus, Enter,
//! Space and ArrowDown open the list; once open, the arrow keys move the
//! highlight over enabled options and Enter or Space picks the highlighted
//! one. With `filter` on, typed characters narrow the list by label.
//!
//! A single select closes after a pick. A multi-select toggles the picked
//! value and stays open.

use crate::content::{PanelContent, PanelLine, Section};
use crate::dismiss::Trigger;
use crate::overlay::{Overlay, OverlayEvent, OverlayOptions};
use anchorage_core::{
    merge, ClassList, Command, Component, EventKind, Host, HostEvent, Key, ListenerId, ListenerTarget,
    NodeId, Placement, Wakeup,
};

const TRIGGER: &str = "w-full flex items-center justify-between rounded-lg border bg-white dark:bg-slate-800 transition-all duration-200 focus:outline-none focus:ring-2 focus:ring-offset-0 px-4 py-2.5 text-base border-slate-300 dark:border-slate-600 focus:ring-blue-500 focus:border-blue-500 hover:border-slate-400 dark:hover:border-slate-500";
const TRIGGER_ENABLED: &str = "cursor-pointer";
const TRIGGER_DISABLED: &str = "opacity-50 cursor-not-allowed bg-slate-50 dark:bg-slate-900";
const TRIGGER_OPEN: &str = "ring-2 ring-blue-500 border-blue-500";
const DROPDOWN: &str = "bg-white dark:bg-slate-800 border border-slate-200 dark:border-slate-700 rounded-lg shadow-lg animate-in fade-in-0 zoom-in-95 duration-100 fixed z-[9999]";
const OPTION: &str = "w-full flex items-center px-4 py-2.5 text-left text-sm transition-colors";
const OPTION_SELECTED: &str = "bg-blue-50 dark:bg-blue-900/30 text-blue-700 dark:text-blue-300";
const OPTION_IDLE: &str = "text-slate-700 dark:text-slate-300 hover:bg-slate-50 dark:hover:bg-slate-700";
const OPTION_HIGHLIGHTED: &str = "bg-slate-100 dark:bg-slate-700";
const OPTION_DISABLED: &str = "opacity-50 cursor-not-allowed";
const FILTER: &str = "px-3 py-2 border-b border-slate-200 dark:border-slate-700 text-sm";
const EMPTY: &str = "px-4 py-2.5 text-sm text-slate-500";

/// Gap between the trigger and the list.
const DROPDOWN_GAP: f64 = 4.0;

/// One choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Select configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOptions {
    pub options: Vec<SelectOption>,
    pub placeholder: String,
    /// Pick any number of values instead of one.
    pub multiple: bool,
    /// Narrow the list by typing.
    pub filter: bool,
    pub filter_placeholder: String,
    /// Shown when the filter matches nothing.
    pub empty_message: String,
    /// Upper bound on picked values in multi mode; 0 means unlimited.
    pub max_selections: usize,
    pub show_checkmark: bool,
    pub disabled: bool,
    /// Extra dropdown classes.
    pub class: String,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            placeholder: "Select an option".to_string(),
            multiple: false,
            filter: false,
            filter_placeholder: "Search...".to_string(),
            empty_message: "No results found".to_string(),
            max_selections: 0,
            show_checkmark: true,
            disabled: false,
            class: String::new(),
        }
    }
}

/// Select messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Request: drop every picked value.
    Clear,
    /// The list opened.
    Opened,
    /// The list closed.
    Closed,
    /// The picked values changed.
    Changed(Vec<String>),
}

#[derive(Debug, Default)]
struct Listeners {
    key_down: Option<ListenerId>,
    pointer_down: Option<ListenerId>,
    focus_in: Option<ListenerId>,
    focus_out: Option<ListenerId>,
}

impl Listeners {
    fn ids(&self) -> impl Iterator<Item = ListenerId> {
        [self.key_down, self.pointer_down, self.focus_in, self.focus_out]
            .into_iter()
            .flatten()
    }
}

/// A dropdown select bound to a trigger node.
#[derive(Debug)]
pub struct Select {
    config: SelectOptions,
    overlay: Overlay,
    trigger: Option<NodeId>,
    listeners: Listeners,
    selected: Vec<String>,
    filter: String,
    /// Index into the visible options.
    highlighted: Option<usize>,
    focused: bool,
}

impl Select {
    pub fn new(config: SelectOptions) -> Self {
        let overlay = Overlay::new(OverlayOptions {
            placement: Placement::Bottom,
            trigger: if config.disabled {
                Trigger::Manual
            } else {
                Trigger::Click
            },
            gap: DROPDOWN_GAP,
            match_anchor_width: true,
            class: merge([DROPDOWN, config.class.as_str()]),
            ..OverlayOptions::default()
        });
        Self {
            config,
            overlay,
            trigger: None,
            listeners: Listeners::default(),
            selected: Vec::new(),
            filter: String::new(),
            highlighted: None,
            focused: false,
        }
    }

    /// Attach to the trigger node and label it.
    pub fn bind(&mut self, host: &mut dyn Host, trigger: NodeId) {
        self.unbind(host);
        self.overlay.bind(host, trigger);
        self.listeners = Listeners {
            key_down: Some(host.add_listener(ListenerTarget::Document, EventKind::KeyDown)),
            pointer_down: Some(host.add_listener(ListenerTarget::Document, EventKind::PointerDown)),
            focus_in: Some(host.add_listener(ListenerTarget::Node(trigger), EventKind::FocusIn)),
            focus_out: Some(host.add_listener(ListenerTarget::Node(trigger), EventKind::FocusOut)),
        };
        self.trigger = Some(trigger);
        self.refresh(host);
    }

    fn unbind(&mut self, host: &mut dyn Host) {
        for id in self.listeners.ids() {
            host.remove_listener(id);
        }
        self.listeners = Listeners::default();
    }

    /// The picked value of a single select.
    pub fn value(&self) -> Option<&str> {
        self.selected.first().map(String::as_str)
    }

    /// Every picked value, in the order picked.
    pub fn values(&self) -> &[String] {
        &self.selected
    }

    /// Replace the picked values without emitting a change.
    pub fn set_values(&mut self, host: &mut dyn Host, values: &[&str]) {
        self.selected = values
            .iter()
            .filter(|v| self.config.options.iter().any(|o| o.value == **v))
            .map(|v| v.to_string())
            .collect();
        if !self.config.multiple {
            self.selected.truncate(1);
        }
        self.refresh(host);
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Current filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    /// The text the trigger shows.
    pub fn label(&self) -> String {
        let picked: Vec<&SelectOption> = self
            .config
            .options
            .iter()
            .filter(|o| self.selected.contains(&o.value))
            .collect();
        match picked.as_slice() {
            [] => self.config.placeholder.clone(),
            [one] => one.label.clone(),
            many => format!("{} selected", many.len()),
        }
    }

    /// Open the list.
    pub fn open(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.config.disabled {
            return Command::none();
        }
        if let Err(err) = self.overlay.show(host) {
            tracing::warn!(error = %err, "select failed to open");
        }
        let events = self.overlay.events();
        Command::messages(self.absorb(host, events))
    }

    /// Close the list.
    pub fn close(&mut self, host: &mut dyn Host) -> Command<Message> {
        drop(self.overlay.close(host));
        self.refresh(host);
        let events = self.overlay.events();
        Command::messages(self.absorb(host, events))
    }

    /// Drop every picked value.
    pub fn clear(&mut self, host: &mut dyn Host) -> Command<Message> {
        if self.selected.is_empty() {
            return Command::none();
        }
        self.selected.clear();
        self.refresh(host);
        Command::message(Message::Changed(Vec::new()))
    }

    /// Pick every enabled option, up to `max_selections`; when everything is
    /// already picked, drop it all. Multi-select only.
    pub fn toggle_all(&mut self, host: &mut dyn Host) -> Command<Message> {
        if !self.config.multiple {
            return Command::none();
        }
        let enabled: Vec<&SelectOption> = self.config.options.iter().filter(|o| !o.disabled).collect();
        if !enabled.is_empty() && self.selected.len() == enabled.len() {
            self.selected.clear();
        } else {
            let limit = match self.config.max_selections {
                0 => enabled.len(),
                max => max,
            };
            self.selected = enabled.iter().take(limit).map(|o| o.value.clone()).collect();
        }
        self.refresh(host);
        Command::message(Message::Changed(self.selected.clone()))
    }

    /// Indices into `config.options` matching the filter.
    fn visible(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        self.config
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| needle.is_empty() || o.label.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    fn pick(&mut self, host: &mut dyn Host, visible_index: usize, out: &mut Vec<Message>) {
        let Some(&index) = self.visible().get(visible_index) else {
            return;
        };
        let option = &self.config.options[index];
        if option.disabled {
            return;
        }
        let value = option.value.clone();
        if self.config.multiple {
            if let Some(pos) = self.selected.iter().position(|v| *v == value) {
                self.selected.remove(pos);
            } else if self.config.max_selections == 0 || self.selected.len() < self.config.max_selections {
                self.selected.push(value);
            } else {
                tracing::debug!(max = self.config.max_selections, "selection limit reached");
                return;
            }
            self.highlighted = Some(visible_index);
            self.refresh(host);
        } else {
            self.selected = vec![value];
            drop(self.overlay.close(host));
            self.refresh(host);
        }
        out.push(Message::Changed(self.selected.clone()));
    }

    fn move_highlight(&mut self, host: &mut dyn Host, forward: bool) {
        let visible = self.visible();
        let enabled: Vec<usize> = (0..visible.len())
            .filter(|&i| !self.config.options[visible[i]].disabled)
            .collect();
        let Some(&first) = enabled.first() else {
            return;
        };
        let next = match self.highlighted.and_then(|h| enabled.iter().position(|&i| i == h)) {
            None => first,
            Some(pos) if forward => enabled[(pos + 1).min(enabled.len() - 1)],
            Some(pos) => enabled[pos.saturating_sub(1)],
        };
        self.highlighted = Some(next);
        self.refresh(host);
    }

    fn on_key(&mut self, host: &mut dyn Host, key: Key, out: &mut Vec<Message>) {
        if self.config.disabled || !(self.focused || self.is_open()) {
            return;
        }
        if !self.is_open() {
            if matches!(key, Key::Enter | Key::Space | Key::ArrowDown) {
                out.extend(self.open(host).into_messages());
            }
            return;
        }
        match key {
            Key::ArrowDown => self.move_highlight(host, true),
            Key::ArrowUp => self.move_highlight(host, false),
            Key::Enter | Key::Space => match self.highlighted {
                Some(index) => self.pick(host, index, out),
                None => {
                    drop(self.overlay.close(host));
                    self.refresh(host);
                }
            },
            Key::Char(c) if self.config.filter => {
                self.filter.push(c);
                self.highlighted = None;
                self.refresh(host);
            }
            Key::Backspace if self.config.filter => {
                self.filter.pop();
                self.refresh(host);
            }
            _ => {}
        }
    }

    fn on_press(&mut self, host: &mut dyn Host, target: Option<NodeId>, y: f64, out: &mut Vec<Message>) {
        let on_trigger = target.zip(self.trigger).is_some_and(|(t, trigger)| host.contains(trigger, t));
        let panel = self.overlay.panel();
        let in_panel = target.zip(panel).is_some_and(|(t, p)| host.contains(p, t));
        self.focused = on_trigger || in_panel;
        if !in_panel || !self.is_open() {
            return;
        }
        let Some(target) = target else {
            return;
        };
        let lines = self.overlay.portal().map(|p| p.lines().to_vec()).unwrap_or_default();
        let row = match lines.iter().position(|line| host.contains(*line, target)) {
            Some(row) => Some(row),
            None => panel.and_then(|p| {
                let top = host.measure(p).top + 1.0 + self.filter_rows() as f64;
                (y >= top).then(|| (y - top).floor() as usize)
            }),
        };
        if let Some(row) = row {
            self.pick(host, row, out);
        }
    }

    fn filter_rows(&self) -> usize {
        usize::from(self.config.filter)
    }

    /// Handle lifecycle events coming out of the overlay.
    fn absorb(&mut self, host: &mut dyn Host, events: Command<OverlayEvent>) -> Vec<Message> {
        let mut out = Vec::new();
        for event in events.into_messages() {
            match event {
                OverlayEvent::Shown(_) => {
                    self.highlighted = self.selected_row();
                    self.refresh(host);
                    out.push(Message::Opened);
                }
                OverlayEvent::Hidden(_) => {
                    self.filter.clear();
                    self.highlighted = None;
                    self.refresh(host);
                    out.push(Message::Closed);
                }
            }
        }
        out
    }

    fn selected_row(&self) -> Option<usize> {
        let first = self.selected.first()?;
        self.visible()
            .iter()
            .position(|&i| self.config.options[i].value == *first)
    }

    /// Push the current state to the trigger and the panel.
    fn refresh(&mut self, host: &mut dyn Host) {
        if let Some(trigger) = self.trigger {
            let state = if self.config.disabled {
                TRIGGER_DISABLED
            } else {
                TRIGGER_ENABLED
            };
            let open = if self.is_open() { TRIGGER_OPEN } else { "" };
            let class = merge([TRIGGER, state, open]);
            let applied = host
                .set_text(trigger, &self.label())
                .and_then(|()| host.set_class(trigger, &class));
            if let Err(err) = applied {
                tracing::warn!(error = %err, "failed to update select trigger");
            }
        }
        if let Err(err) = self.overlay.set_content(host, self.panel_content()) {
            tracing::warn!(error = %err, "failed to render select options");
        }
    }

    fn panel_content(&self) -> PanelContent {
        let visible = self.visible();
        let lines: Vec<PanelLine> = if visible.is_empty() {
            vec![PanelLine::new(self.config.empty_message.as_str()).with_class(EMPTY)]
        } else {
            visible
                .iter()
                .enumerate()
                .map(|(row, &index)| self.option_line(&self.config.options[index], Some(row) == self.highlighted))
                .collect()
        };
        let mut content = PanelContent::lines(lines).with_role("listbox");
        if self.config.filter {
            let text = if self.filter.is_empty() {
                self.config.filter_placeholder.clone()
            } else {
                self.filter.clone()
            };
            content.header = Some(Section {
                class: ClassList::verbatim(FILTER),
                ..Section::text(&text)
            });
        }
        content
    }

    fn option_line(&self, option: &SelectOption, highlighted: bool) -> PanelLine {
        let selected = self.selected.contains(&option.value);
        let mark = match (self.config.multiple, self.config.show_checkmark, selected) {
            (true, _, true) => "[x] ",
            (true, _, false) => "[ ] ",
            (false, true, true) => "✓ ",
            (false, true, false) => "  ",
            (false, false, _) => "",
        };
        let class = merge([
            OPTION,
            if selected { OPTION_SELECTED } else { OPTION_IDLE },
            if option.disabled { OPTION_DISABLED } else { "cursor-pointer" },
            if highlighted { OPTION_HIGHLIGHTED } else { "" },
        ]);
        let mut line = PanelLine::new(format!("{mark}{}", option.label))
            .with_class(&class)
            .with_attribute("role", "option")
            .with_attribute("aria-selected", selected.to_string());
        if option.disabled {
            line = line.with_attribute("aria-disabled", "true");
        }
        if highlighted {
            line = line.with_attribute("data-highlighted", "true");
        }
        line
    }
}

impl Component for Select {
    type Message = Message;

    fn update(&mut self, host: &mut dyn Host, msg: Message) -> Command<Message> {
        match msg {
            Message::Clear => self.clear(host),
            Message::Opened | Message::Closed | Message::Changed(_) => Command::none(),
        }
    }

    fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<Message> {
        let mut out = Vec::new();
        if Some(id) == self.listeners.key_down {
            if let HostEvent::Key(key) = event {
                self.on_key(host, *key, &mut out);
            }
        } else if Some(id) == self.listeners.pointer_down {
            if let HostEvent::PointerDown { target, y, .. } = event {
                self.on_press(host, *target, *y, &mut out);
            }
        } else if Some(id) == self.listeners.focus_in {
            self.focused = true;
        } else if Some(id) == self.listeners.focus_out {
            self.focused = false;
        } else {
            let was_open = self.is_open();
            let events = self.overlay.handle_event(host, id, event);
            if was_open && !self.is_open() {
                self.refresh(host);
            }
            out.extend(self.absorb(host, events));
        }
        out.extend(self.absorb_pending(host));
        Command::messages(out)
    }

    fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<Message> {
        let events = self.overlay.wake(host, wakeup);
        let mut out = self.absorb(host, events);
        out.extend(self.absorb_pending(host));
        Command::messages(out)
    }

    fn destroy(&mut self, host: &mut dyn Host) {
        self.unbind(host);
        self.overlay.destroy(host);
    }
}

impl Select {
    /// Events left in the overlay by direct calls made while handling input.
    fn absorb_pending(&mut self, host: &mut dyn Host) -> Vec<Message> {
        let events = self.overlay.events();
        self.absorb(host, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorage_core::testing::Stage;
    use anchorage_core::Rect;

    fn fruits() -> Vec<SelectOption> {
        vec![
            SelectOption::new("apple", "Apple"),
            SelectOption::new("banana", "Banana").disabled(),
            SelectOption::new("cherry", "Cherry"),
            SelectOption::new("date", "Date"),
        ]
    }

    fn staged(config: SelectOptions) -> (Stage<Select>, NodeId) {
        let mut stage = Stage::new(Select::new(SelectOptions {
            options: fruits(),
            ..config
        }));
        let trigger = stage.anchor(Rect::new(100.0, 100.0, 200.0, 30.0));
        stage.with(|select, host| select.bind(host, trigger));
        (stage, trigger)
    }

    fn line(stage: &Stage<Select>, row: usize) -> NodeId {
        stage.component().overlay().portal().unwrap().lines()[row]
    }

    #[test]
    fn trigger_shows_placeholder_then_label() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        assert_eq!(stage.doc().text(trigger), Some("Select an option"));
        assert!(stage.doc().class(trigger).unwrap().contains("cursor-pointer"));
        stage.with(|select, host| select.set_values(host, &["cherry", "apple"]));
        assert_eq!(stage.component().value(), Some("cherry"));
        assert_eq!(stage.doc().text(trigger), Some("Cherry"));
    }

    #[test]
    fn dropdown_matches_trigger_width_four_px_below() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        stage.click(trigger);
        assert_eq!(stage.take_messages(), vec![Message::Opened]);
        let panel = stage.component().overlay().panel().unwrap();
        let rect = stage.doc().measure(panel);
        assert_eq!((rect.top, rect.left, rect.width), (134.0, 100.0, 200.0));
        assert_eq!(stage.doc().attribute(panel, "role"), Some("listbox"));
        assert!(stage.doc().class(trigger).unwrap().contains("ring-blue-500"));
    }

    #[test]
    fn clicking_an_option_picks_it_and_closes() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        stage.click(trigger);
        stage.take_messages();
        let cherry = line(&stage, 2);
        stage.click(cherry);

        assert_eq!(stage.take_messages(), vec![Message::Changed(vec!["cherry".into()])]);
        assert!(!stage.component().is_open());
        assert_eq!(stage.doc().text(trigger), Some("Cherry"));
        stage.advance_ms(200);
        assert_eq!(stage.take_messages(), vec![Message::Closed]);
    }

    #[test]
    fn disabled_options_cannot_be_picked() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        stage.click(trigger);
        let banana = line(&stage, 1);
        assert_eq!(stage.doc().attribute(banana, "aria-disabled"), Some("true"));
        stage.take_messages();
        stage.click(banana);
        assert!(stage.take_messages().is_empty());
        assert!(stage.component().is_open());
    }

    #[test]
    fn press_on_the_panel_maps_the_row_from_y() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        stage.click(trigger);
        stage.take_messages();
        let panel = stage.component().overlay().panel().unwrap();
        // border row at 134, options from 135
        stage.fire(HostEvent::PointerDown {
            target: Some(panel),
            x: 110.0,
            y: 138.0,
        });
        assert_eq!(stage.component().value(), Some("date"));
    }

    #[test]
    fn keyboard_opens_highlights_and_picks() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        stage.press(Key::ArrowDown);
        assert!(!stage.component().is_open());

        stage.fire(HostEvent::FocusIn(trigger));
        stage.press(Key::ArrowDown);
        assert!(stage.component().is_open());

        stage.press(Key::ArrowDown);
        stage.press(Key::ArrowDown);
        let highlighted = line(&stage, 2);
        assert_eq!(stage.doc().attribute(highlighted, "data-highlighted"), Some("true"));

        stage.press(Key::ArrowUp);
        stage.press(Key::Enter);
        assert_eq!(stage.component().value(), Some("apple"));
        assert!(!stage.component().is_open());
    }

    #[test]
    fn escape_closes_and_resets_the_filter() {
        let (mut stage, trigger) = staged(SelectOptions {
            filter: true,
            ..SelectOptions::default()
        });
        stage.click(trigger);
        stage.press(Key::Char('e'));
        stage.press(Key::Char('r'));
        assert_eq!(stage.component().filter_text(), "er");
        let panel = stage.component().overlay().panel().unwrap();
        assert_eq!(stage.doc().texts(panel), vec!["er", "  Cherry"]);

        stage.press(Key::Char('x'));
        assert_eq!(stage.doc().texts(panel), vec!["erx", "No results found"]);
        stage.press(Key::Backspace);
        assert_eq!(stage.doc().texts(panel), vec!["er", "  Cherry"]);

        stage.press(Key::Escape);
        stage.advance_ms(200);
        assert_eq!(stage.component().filter_text(), "");
    }

    #[test]
    fn filtered_rows_map_to_the_right_option() {
        let (mut stage, trigger) = staged(SelectOptions {
            filter: true,
            ..SelectOptions::default()
        });
        stage.click(trigger);
        stage.press(Key::Char('d'));
        let panel = stage.component().overlay().panel().unwrap();
        // border at 134, filter row at 135, first option at 136
        stage.fire(HostEvent::PointerDown {
            target: Some(panel),
            x: 110.0,
            y: 136.0,
        });
        assert_eq!(stage.component().value(), Some("date"));
    }

    #[test]
    fn multi_select_toggles_and_stays_open() {
        let (mut stage, trigger) = staged(SelectOptions {
            multiple: true,
            max_selections: 2,
            ..SelectOptions::default()
        });
        stage.click(trigger);
        stage.take_messages();

        stage.click(line(&stage, 0));
        stage.click(line(&stage, 2));
        assert!(stage.component().is_open());
        assert_eq!(stage.component().values(), &["apple", "cherry"]);
        assert_eq!(stage.doc().text(trigger), Some("2 selected"));
        assert_eq!(stage.doc().text(line(&stage, 0)), Some("[x] Apple"));

        // limit reached
        stage.click(line(&stage, 3));
        assert_eq!(stage.component().values(), &["apple", "cherry"]);

        stage.click(line(&stage, 0));
        assert_eq!(stage.component().values(), &["cherry"]);
        assert_eq!(
            stage.take_messages(),
            vec![
                Message::Changed(vec!["apple".into()]),
                Message::Changed(vec!["apple".into(), "cherry".into()]),
                Message::Changed(vec!["cherry".into()]),
            ]
        );
    }

    #[test]
    fn toggle_all_and_clear() {
        let (mut stage, _) = staged(SelectOptions {
            multiple: true,
            ..SelectOptions::default()
        });
        let cmd = stage.with(|select, host| select.toggle_all(host));
        stage.absorb(cmd);
        assert_eq!(stage.component().values(), &["apple", "cherry", "date"]);

        stage.send(Message::Clear);
        assert!(stage.component().values().is_empty());
        let messages = stage.take_messages();
        assert_eq!(messages.last(), Some(&Message::Changed(Vec::new())));
    }

    #[test]
    fn disabled_select_never_opens() {
        let (mut stage, trigger) = staged(SelectOptions {
            disabled: true,
            ..SelectOptions::default()
        });
        stage.click(trigger);
        stage.press(Key::Enter);
        assert!(!stage.component().is_open());
        assert!(stage.doc().class(trigger).unwrap().contains("cursor-not-allowed"));
    }

    #[test]
    fn destroy_removes_every_listener() {
        let (mut stage, trigger) = staged(SelectOptions::default());
        stage.click(trigger);
        stage.destroy();
        assert_eq!(stage.doc().listener_count(), 0);
        assert_eq!(stage.doc().root_nodes(), &[trigger]);
    }
}
