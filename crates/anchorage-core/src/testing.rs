use crate::command::{Action, Command, CommandInner};
use crate::component::Component;
use crate::document::VirtualDocument;
use crate::event::{HostEvent, Key};
use crate::geometry::{Rect, Size};
use crate::host::{Host, NodeId};
use std::time::Duration;

/// A headless harness that drives a [`Component`] inside a [`VirtualDocument`].
///
/// `Stage` plays the part of the runtime in a plain `#[test]`: it dispatches
/// events to the document and hands every hearing listener id to the
/// component, advances the document clock and delivers due timers and frames,
/// and collects the immediate messages the component emits. Async commands
/// are ignored.
///
/// # Example
///
/// ```rust,ignore
/// use anchorage_core::testing::Stage;
///
/// let mut stage = Stage::new(Popover::new(options));
/// let trigger = stage.anchor(Rect::new(100.0, 100.0, 80.0, 24.0));
/// stage.with(|popover, host| popover.bind(host, trigger));
/// stage.click(trigger);
/// stage.next_frame();
/// assert!(stage.component().is_open());
/// ```
pub struct Stage<C: Component> {
    doc: VirtualDocument,
    component: C,
    pending_messages: Vec<C::Message>,
}

impl<C: Component> Stage<C> {
    /// Stage `component` in an 800x600 document.
    pub fn new(component: C) -> Self {
        Self::with_viewport(component, Size::new(800.0, 600.0))
    }

    pub fn with_viewport(component: C, viewport: Size) -> Self {
        Self {
            doc: VirtualDocument::new(viewport),
            component,
            pending_messages: Vec::new(),
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    pub fn doc(&self) -> &VirtualDocument {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut VirtualDocument {
        &mut self.doc
    }

    /// Run `f` with the component and the document.
    pub fn with<R>(&mut self, f: impl FnOnce(&mut C, &mut dyn Host) -> R) -> R {
        f(&mut self.component, &mut self.doc)
    }

    /// Attach a placed element to the document root, for use as an anchor.
    pub fn anchor(&mut self, rect: Rect) -> NodeId {
        let node = self.doc.create_element("button");
        self.doc.place(node, rect).ok();
        self.doc.append_to_root(node).ok();
        node
    }

    /// Send a message, triggering a single update.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(&mut self.doc, msg);
        self.collect_sync_messages(cmd);
    }

    /// Collect the immediate messages of a command produced outside the stage.
    pub fn absorb(&mut self, cmd: Command<C::Message>) {
        self.collect_sync_messages(cmd);
    }

    /// Dispatch an event and deliver it to every listener that hears it.
    pub fn fire(&mut self, event: HostEvent) {
        for listener in self.doc.dispatch(&event) {
            let cmd = self.component.handle_event(&mut self.doc, listener, &event);
            self.collect_sync_messages(cmd);
        }
    }

    /// Press the pointer on `node`, at its top-left corner.
    pub fn click(&mut self, node: NodeId) {
        let rect = self.doc.measure(node);
        self.fire(HostEvent::PointerDown {
            target: Some(node),
            x: rect.left,
            y: rect.top,
        });
    }

    /// Press the pointer on empty space.
    pub fn click_outside(&mut self) {
        self.fire(HostEvent::PointerDown {
            target: None,
            x: -1.0,
            y: -1.0,
        });
    }

    pub fn press(&mut self, key: Key) {
        self.fire(HostEvent::Key(key));
    }

    /// Move the clock and deliver what came due, frames first.
    pub fn advance(&mut self, elapsed: Duration) {
        for wakeup in self.doc.advance(elapsed) {
            let cmd = self.component.wake(&mut self.doc, wakeup);
            self.collect_sync_messages(cmd);
        }
    }

    pub fn advance_ms(&mut self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Run pending animation frames without moving the clock.
    pub fn next_frame(&mut self) {
        self.advance(Duration::ZERO);
    }

    /// Tear the component down.
    pub fn destroy(&mut self) {
        self.component.destroy(&mut self.doc);
    }

    /// Take the messages emitted so far without processing them.
    pub fn take_messages(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.pending_messages)
    }

    /// Feed every pending message back into [`Component::update`] until none remain.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.component.update(&mut self.doc, msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    fn collect_sync_messages(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Action(Action::Quit) => {}
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
        }
    }
}
