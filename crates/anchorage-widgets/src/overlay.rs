//! The composed overlay lifecycle.
//!
//! [`Overlay`] ties a [`PortalManager`], a [`DismissController`] and the
//! shared [`ScrollLock`] together behind one open/close API. It is a
//! [`Component`]: the owner forwards every event and wakeup to it, and the
//! overlay answers with [`OverlayEvent`]s.
//!
//! ```rust,ignore
//! let mut overlay = Overlay::new(OverlayOptions {
//!     placement: Placement::Top,
//!     ..OverlayOptions::default()
//! });
//! overlay.open(host, anchor, PanelContent::text("Saved"))?;
//! // ... later
//! overlay.close(host).await;
//! ```

use crate::content::PanelContent;
use crate::dismiss::{DismissConfig, DismissController, DismissRequest, Trigger};
use crate::portal::{MountRequest, PanelAnchor, PortalHandle, PortalId, PortalManager, PortalState};
use crate::scroll_lock::{ScrollLock, ScrollLockToken};
use anchorage_core::{
    ClassList, Command, Component, FrameId, Host, HostError, HostEvent, ListenerId, NodeId, Placement,
    PositionOptions, StyleConfig, Wakeup,
};
use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// Overlay failures.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// `open` was called while a panel is still mounted.
    #[error("overlay is already open")]
    AlreadyOpen,
    /// The host rejected a mutation while mounting.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// A panel was mounted.
    Shown(PortalId),
    /// A panel was removed from the document.
    Hidden(PortalId),
}

/// Overlay behavior and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    pub placement: Placement,
    pub trigger: Trigger,
    pub hover_delay: Duration,
    pub dismissible: bool,
    pub close_on_escape: bool,
    /// Distance from the anchor and from the viewport edges.
    pub gap: f64,
    pub match_anchor_width: bool,
    pub flip: bool,
    pub animation_duration: Duration,
    /// Hold the document scroll lock while open.
    pub lock_scroll: bool,
    /// Panel classes, merged in order.
    pub class: String,
    /// Nodes that never count as an outside press.
    pub exclude: Vec<NodeId>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            placement: Placement::Bottom,
            trigger: Trigger::Click,
            hover_delay: Duration::from_millis(200),
            dismissible: true,
            close_on_escape: true,
            gap: anchorage_core::geometry::DEFAULT_GAP,
            match_anchor_width: false,
            flip: false,
            animation_duration: Duration::from_millis(200),
            lock_scroll: false,
            class: String::new(),
            exclude: Vec::new(),
        }
    }
}

impl OverlayOptions {
    /// Defaults with the animation length taken from `config`.
    pub fn configured(config: &StyleConfig) -> Self {
        Self {
            animation_duration: config.animation_duration(),
            ..Self::default()
        }
    }

    fn position(&self) -> PositionOptions {
        PositionOptions {
            gap: self.gap,
            match_anchor_width: self.match_anchor_width,
            flip: self.flip,
        }
    }

    fn dismiss(&self) -> DismissConfig {
        DismissConfig {
            trigger: self.trigger,
            hover_delay: self.hover_delay,
            dismissible: self.dismissible,
            close_on_escape: self.close_on_escape,
            exclude: self.exclude.clone(),
        }
    }
}

/// Resolves once the overlay's panel has been removed from the document.
///
/// Also resolves if the overlay is dropped first.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Closed {
    rx: Option<oneshot::Receiver<()>>,
}

impl Closed {
    fn ready() -> Self {
        Self { rx: None }
    }
}

impl Future for Closed {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.rx.as_mut() {
            None => Poll::Ready(()),
            Some(rx) => Pin::new(rx).poll(cx).map(|_| ()),
        }
    }
}

/// A floating panel with its full open/close lifecycle.
#[derive(Debug)]
pub struct Overlay {
    options: OverlayOptions,
    class: ClassList,
    portal: PortalManager,
    dismiss: DismissController,
    content: PanelContent,
    anchor: Option<NodeId>,
    lock: ScrollLock,
    lock_token: Option<ScrollLockToken>,
    waiters: Vec<oneshot::Sender<()>>,
    outbox: Vec<OverlayEvent>,
    reposition_frame: Option<FrameId>,
}

impl Overlay {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            class: ClassList::parse(&options.class),
            portal: PortalManager::new(options.animation_duration),
            dismiss: DismissController::new(options.dismiss()),
            content: PanelContent::default(),
            anchor: None,
            lock: ScrollLock::shared(),
            lock_token: None,
            waiters: Vec::new(),
            outbox: Vec::new(),
            reposition_frame: None,
            options,
        }
    }

    /// Use `lock` instead of the thread's shared scroll lock.
    pub fn with_scroll_lock(mut self, lock: ScrollLock) -> Self {
        self.lock = lock;
        self
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// Attach the trigger listeners to `anchor`.
    pub fn bind(&mut self, host: &mut dyn Host, anchor: NodeId) {
        self.dismiss.bind(host, anchor);
        self.anchor = Some(anchor);
    }

    /// Content shown when the trigger opens the overlay. An open panel is
    /// re-rendered in place.
    pub fn set_content(&mut self, host: &mut dyn Host, content: PanelContent) -> Result<(), OverlayError> {
        self.portal.replace_content(host, &content)?;
        self.content = content;
        Ok(())
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    /// Mount a panel showing `content` next to `anchor`.
    ///
    /// A panel still running its exit transition is removed first.
    pub fn open(
        &mut self,
        host: &mut dyn Host,
        anchor: impl Into<PanelAnchor>,
        content: PanelContent,
    ) -> Result<PortalId, OverlayError> {
        if self.portal.state() == PortalState::Unmounting {
            if let Some(id) = self.portal.force_dispose(host) {
                self.finish(host, id);
            }
        }
        let anchor = anchor.into();
        let request = MountRequest {
            anchor,
            content: &content,
            class: &self.class,
            placement: self.options.placement,
            position: self.options.position(),
        };
        let id = self.portal.mount(host, request)?;
        self.content = content;
        if let Some(panel) = self.portal.live().map(PortalHandle::panel) {
            let anchor = match anchor {
                PanelAnchor::Node(node) => Some(node),
                PanelAnchor::Centered | PanelAnchor::Docked(_) => None,
            };
            self.dismiss.attach(host, panel, anchor);
        }
        if self.options.lock_scroll {
            self.lock_token = Some(self.lock.acquire(host));
        }
        self.outbox.push(OverlayEvent::Shown(id));
        Ok(id)
    }

    /// Open at the bound anchor with the current content. A no-op while open.
    pub fn show(&mut self, host: &mut dyn Host) -> Result<Option<PortalId>, OverlayError> {
        if self.is_open() {
            return Ok(None);
        }
        let content = self.content.clone();
        self.open(host, self.anchor, content).map(Some)
    }

    /// Start closing. The returned future resolves when the panel is gone.
    ///
    /// Closing an overlay that is not open resolves immediately.
    pub fn close(&mut self, host: &mut dyn Host) -> Closed {
        match self.portal.state() {
            PortalState::Unmounting => self.waiter(),
            state if state.is_open() => {
                self.dismiss.detach(host);
                self.dismiss.cancel_hover(host);
                self.cancel_reposition(host);
                self.portal.begin_close(host);
                self.waiter()
            }
            _ => Closed::ready(),
        }
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self, host: &mut dyn Host) -> Result<(), OverlayError> {
        if self.is_open() {
            drop(self.close(host));
        } else {
            self.show(host)?;
        }
        Ok(())
    }

    /// Re-measure the anchor and move the panel.
    pub fn reposition(&mut self, host: &mut dyn Host) {
        self.portal.reposition(host);
    }

    /// Take the lifecycle events produced by direct calls.
    pub fn events(&mut self) -> Command<OverlayEvent> {
        Command::messages(self.outbox.drain(..))
    }

    pub fn state(&self) -> PortalState {
        self.portal.state()
    }

    /// Mounted and not closing.
    pub fn is_open(&self) -> bool {
        self.portal.state().is_open()
    }

    /// The panel node while mounted.
    pub fn panel(&self) -> Option<NodeId> {
        self.portal.live().map(PortalHandle::panel)
    }

    /// The mounted portal.
    pub fn portal(&self) -> Option<&PortalHandle> {
        self.portal.live()
    }

    pub fn portal_id(&self) -> Option<PortalId> {
        self.portal.live().map(PortalHandle::id)
    }

    fn waiter(&mut self) -> Closed {
        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        Closed { rx: Some(rx) }
    }

    fn apply(&mut self, host: &mut dyn Host, request: DismissRequest) {
        let result = match request {
            DismissRequest::Show => self.show(host).map(drop),
            DismissRequest::Close => {
                drop(self.close(host));
                Ok(())
            }
            DismissRequest::Toggle => self.toggle(host),
            DismissRequest::Reposition => {
                if self.reposition_frame.is_none() && self.is_open() {
                    self.reposition_frame = Some(host.request_animation_frame());
                }
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, ?request, "overlay request failed");
        }
    }

    fn cancel_reposition(&mut self, host: &mut dyn Host) {
        if let Some(frame) = self.reposition_frame.take() {
            host.cancel_animation_frame(frame);
        }
    }

    /// Bookkeeping after the portal is gone.
    fn finish(&mut self, host: &mut dyn Host, id: PortalId) {
        self.dismiss.detach(host);
        self.cancel_reposition(host);
        if let Some(token) = self.lock_token.take() {
            self.lock.release(host, token);
        }
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(());
        }
        self.outbox.push(OverlayEvent::Hidden(id));
    }
}

impl Component for Overlay {
    type Message = OverlayEvent;

    fn update(&mut self, _host: &mut dyn Host, _msg: OverlayEvent) -> Command<OverlayEvent> {
        Command::none()
    }

    fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<OverlayEvent> {
        if self.portal.owns(id) {
            if let Some(portal) = self.portal.on_event(host, id, event) {
                self.finish(host, portal);
            }
        } else if self.dismiss.owns(id) {
            let open = self.is_open();
            if let Some(request) = self.dismiss.handle_event(host, id, event, open) {
                self.apply(host, request);
            }
        }
        self.events()
    }

    fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<OverlayEvent> {
        match wakeup {
            Wakeup::Frame(frame) if self.reposition_frame == Some(frame) => {
                self.reposition_frame = None;
                self.portal.reposition(host);
            }
            Wakeup::Frame(frame) => {
                self.portal.on_frame(host, frame);
            }
            Wakeup::Timer(timer) => {
                if let Some(portal) = self.portal.on_timer(host, timer) {
                    self.finish(host, portal);
                } else if let Some(request) = self.dismiss.wake(timer) {
                    self.apply(host, request);
                }
            }
        }
        self.events()
    }

    fn destroy(&mut self, host: &mut dyn Host) {
        if let Some(portal) = self.portal.force_dispose(host) {
            self.finish(host, portal);
        }
        self.dismiss.unbind(host);
        self.outbox.clear();
    }
}
