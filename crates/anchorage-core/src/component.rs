use crate::command::Command;
use crate::event::HostEvent;
use crate::host::{Host, ListenerId, Wakeup};

/// A stateful piece of UI that lives in a [`Host`] document.
///
/// Components own nodes, listeners, timers and animation frames inside the
/// host. The host never calls back into a component: the driver (the
/// [`Program`](crate::runtime::Program) runtime, or a
/// [`Stage`](crate::testing::Stage) in tests) delivers each dispatched event
/// through [`handle_event`](Component::handle_event) and each due callback
/// through [`wake`](Component::wake). A component ignores ids it did not
/// register, so one driver can fan every event out to every component.
///
/// # Composition pattern
///
/// Wrap the child's message type in a variant of the parent message and use
/// [`Command::map`] to lift the child's commands:
///
/// ```rust,ignore
/// use anchorage_core::{Command, Component, Host, HostEvent, ListenerId};
/// use anchorage_widgets::popover::{self, Popover};
///
/// struct Toolbar { help: Popover }
///
/// enum Msg { Help(popover::Message) }
///
/// impl Component for Toolbar {
///     type Message = Msg;
///
///     fn update(&mut self, host: &mut dyn Host, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Help(m) => self.help.update(host, m).map(Msg::Help),
///         }
///     }
///
///     fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<Msg> {
///         self.help.handle_event(host, id, event).map(Msg::Help)
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's message type: requests it accepts and events it
    /// reports to its parent.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, host: &mut dyn Host, msg: Self::Message) -> Command<Self::Message>;

    /// React to a host event heard by one of the component's listeners.
    ///
    /// `listener` is the id returned by [`Host::add_listener`]. The default
    /// implementation ignores every event.
    fn handle_event(
        &mut self,
        host: &mut dyn Host,
        listener: ListenerId,
        event: &HostEvent,
    ) -> Command<Self::Message> {
        let _ = (host, listener, event);
        Command::none()
    }

    /// React to a timer or animation frame coming due.
    fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<Self::Message> {
        let _ = (host, wakeup);
        Command::none()
    }

    /// Synchronously release everything the component holds in the host:
    /// nodes, listeners, pending timers and frames.
    fn destroy(&mut self, host: &mut dyn Host) {
        let _ = host;
    }
}
