//! # Popover Demo
//!
//! Two anchored overlays in the terminal:
//! - A click-triggered [`Popover`] with a header, footer and arrow
//! - A [`Select`] whose option list sits under its trigger
//!
//! Click a button to open its panel, click elsewhere or press Esc to close
//! it, and press `q` to quit. Overlay lifecycle events are written to
//! `popover-demo.log`.
//!
//! Run with: `cargo run --example popover`

use anchorage::ratatui::layout::{Constraint, Layout};
use anchorage::ratatui::style::{Color, Style};
use anchorage::ratatui::text::{Line, Span};
use anchorage::ratatui::widgets::{Block, Borders, Paragraph};
use anchorage::ratatui::Frame;
use anchorage::widgets::popover::{self, Popover, PopoverOptions};
use anchorage::widgets::select::{self, Select, SelectOption, SelectOptions};
use anchorage::{
    Command, Component, EventKind, Host, HostEvent, Key, ListenerId, ListenerTarget, Model, Placement, Rect,
    Wakeup,
};

struct Demo {
    help: Popover,
    flavor: Select,
    keys: ListenerId,
    picked: Option<String>,
}

#[derive(Debug)]
enum Msg {
    Help(popover::Message),
    Flavor(select::Message),
    Quit,
}

fn button(host: &mut dyn Host, rect: Rect, label: &str) -> anchorage::NodeId {
    let node = host.create_element("button");
    let placed = host
        .place(node, rect)
        .and_then(|()| host.set_text(node, label))
        .and_then(|()| host.append_to_root(node));
    if let Err(err) = placed {
        tracing::warn!(error = %err, "failed to create button");
    }
    node
}

impl Component for Demo {
    type Message = Msg;

    fn update(&mut self, host: &mut dyn Host, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Help(m) => self.help.update(host, m).map(Msg::Help),
            Msg::Flavor(select::Message::Changed(values)) => {
                self.picked = values.into_iter().next();
                Command::none()
            }
            Msg::Flavor(m) => self.flavor.update(host, m).map(Msg::Flavor),
            Msg::Quit => Command::quit(),
        }
    }

    fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<Msg> {
        if id == self.keys {
            return match event {
                HostEvent::Key(Key::Char('q')) => Command::message(Msg::Quit),
                _ => Command::none(),
            };
        }
        Command::batch([
            self.help.handle_event(host, id, event).map(Msg::Help),
            self.flavor.handle_event(host, id, event).map(Msg::Flavor),
        ])
    }

    fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<Msg> {
        Command::batch([
            self.help.wake(host, wakeup).map(Msg::Help),
            self.flavor.wake(host, wakeup).map(Msg::Flavor),
        ])
    }

    fn destroy(&mut self, host: &mut dyn Host) {
        self.help.destroy(host);
        self.flavor.destroy(host);
        host.remove_listener(self.keys);
    }
}

impl Model for Demo {
    type Flags = ();

    fn init(_: (), host: &mut dyn Host) -> (Self, Command<Msg>) {
        let help_button = button(host, Rect::new(4.0, 2.0, 12.0, 3.0), "Help");
        let flavor_button = button(host, Rect::new(4.0, 20.0, 24.0, 3.0), "");

        let mut help = Popover::new(PopoverOptions {
            placement: Placement::Bottom,
            header: Some("Keyboard".into()),
            footer: Some("Esc closes".into()),
            ..PopoverOptions::default()
        });
        let bound = help
            .bind(host, help_button)
            .and_then(|()| help.set_body(host, "Click a button to open it.\nClick outside to close."));
        if let Err(err) = bound {
            tracing::warn!(error = %err, "failed to bind help popover");
        }

        let mut flavor = Select::new(SelectOptions {
            options: vec![
                SelectOption::new("vanilla", "Vanilla"),
                SelectOption::new("chocolate", "Chocolate"),
                SelectOption::new("pistachio", "Pistachio").disabled(),
                SelectOption::new("mango", "Mango"),
            ],
            placeholder: "Pick a flavor".into(),
            filter: true,
            ..SelectOptions::default()
        });
        flavor.bind(host, flavor_button);

        let keys = host.add_listener(ListenerTarget::Document, EventKind::KeyDown);
        (
            Demo {
                help,
                flavor,
                keys,
                picked: None,
            },
            Command::none(),
        )
    }

    fn view(&self, frame: &mut Frame) {
        let [_, footer] = Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(frame.area());
        let picked = self.picked.as_deref().unwrap_or("nothing yet");
        let status = Line::from(vec![
            Span::styled("picked: ", Style::default().fg(Color::Cyan)),
            Span::raw(picked),
            Span::raw("   "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]);
        let block = Block::default().borders(Borders::ALL).title(" anchorage ");
        frame.render_widget(Paragraph::new(status).block(block), footer);
    }
}

#[tokio::main]
async fn main() -> Result<(), anchorage::ProgramError> {
    anchorage::log_to_file("popover-demo.log")?;
    anchorage::run::<Demo>(()).await?;
    Ok(())
}
