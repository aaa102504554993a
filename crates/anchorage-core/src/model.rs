use crate::command::Command;
use crate::component::Component;
use crate::host::Host;
use ratatui::Frame;

/// The top-level application, driven by a [`Program`](crate::runtime::Program).
///
/// A model is a [`Component`] that can build itself and draw the parts of the
/// screen that are not host nodes:
///
/// 1. [`init`](Model::init) creates the initial state inside the document
///    (anchors, listeners) and may return a [`Command`] for early work.
/// 2. The runtime draws [`view`](Model::view) and paints the document's
///    nodes on top of it.
/// 3. Terminal input is translated into host events, dispatched, and
///    delivered through [`Component::handle_event`]; due timers and frames go
///    through [`Component::wake`].
/// 4. Commands returned from any of these are executed, and the cycle repeats
///    until a [`Command::quit`].
///
/// # Example
///
/// ```rust,ignore
/// use anchorage_core::{Command, Component, Host, Model};
/// use ratatui::{widgets::Paragraph, Frame};
///
/// struct Hello;
///
/// impl Component for Hello {
///     type Message = ();
///     fn update(&mut self, _host: &mut dyn Host, _msg: ()) -> Command<()> {
///         Command::none()
///     }
/// }
///
/// impl Model for Hello {
///     type Flags = ();
///     fn init(_flags: (), _host: &mut dyn Host) -> (Self, Command<()>) {
///         (Hello, Command::none())
///     }
///     fn view(&self, frame: &mut Frame) {
///         frame.render_widget(Paragraph::new("hello"), frame.area());
///     }
/// }
/// ```
pub trait Model: Component + Sized {
    /// Initialization data passed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags, host: &mut dyn Host) -> (Self, Command<Self::Message>);

    /// Draw the background UI. Host nodes are painted over it by the runtime.
    ///
    /// The default draws nothing.
    fn view(&self, frame: &mut Frame) {
        let _ = frame;
    }
}
