use std::sync::Arc;

use contactx_lib::Repository;
use iced::{
    Color, Element, Event, Length, Subscription, Task, Theme, application, event,
    keyboard::{self, Key, Modifiers},
    widget::{button, center, column, container, mouse_area, opaque, row, rule, space, stack, text},
    window,
};
use parking_lot::RwLock;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::{Level, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        contact_form::{self, ContactForm},
        contact_list::{self, ContactList},
    },
    config::{Cfg, GuiConfig},
};

pub mod components;
pub mod config;
pub mod credits;
pub mod dialog;

fn main() -> iced::Result {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {e}");
    }

    let repo = match Repository::new() {
        Ok(repo) => repo,
        Err(e) => {
            error!("Failed to open the contact database: {e}");
            MessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("ContactX")
                .set_description(format!("Failed to open the contact database: {e}"))
                .set_buttons(MessageButtons::Ok)
                .show();
            std::process::exit(1);
        }
    };
    let cfg = Arc::new(RwLock::new(GuiConfig::load()));

    application(
        move || App::new(repo.clone(), cfg.clone()),
        App::update,
        App::view,
    )
    .theme(App::theme)
    .title(App::title)
    .subscription(App::subscription)
    .window_size((1100.0, 750.0))
    .resizable(false)
    .run()
}

#[derive(Debug, Clone)]
enum Message {
    ContactList(contact_list::Message),
    ContactForm(contact_form::Message),
    NewContact,
    Save,
    ShowAbout,
    CloseAbout,
    Exit,
}

struct App {
    title: String,
    cfg: Cfg,
    show_about: bool,
    // Components
    contact_list: ContactList,
    contact_form: ContactForm,
}

impl App {
    pub fn new(repo: Repository, cfg: Cfg) -> (Self, Task<Message>) {
        (
            Self {
                title: "ContactX".into(),
                cfg,
                show_about: false,
                contact_list: ContactList::new(repo.clone()),
                contact_form: ContactForm::new(repo),
            },
            Task::none(),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Redirect messages to relevant child components
            Message::ContactList(message) => match self.contact_list.update(message) {
                contact_list::Action::None => Task::none(),
                contact_list::Action::NewContact => self.new_contact(),
                contact_list::Action::Load(contact) => {
                    self.contact_form.load(contact);
                    Task::none()
                }
            },
            Message::ContactForm(message) => {
                let action = self.contact_form.update(message);
                self.handle_form_action(action)
            }
            Message::NewContact => self.new_contact(),
            Message::Save => {
                let action = self.contact_form.save();
                self.handle_form_action(action)
            }
            Message::ShowAbout => {
                self.show_about = true;
                Task::none()
            }
            Message::CloseAbout => {
                self.show_about = false;
                Task::none()
            }
            Message::Exit => iced::exit(),
        }
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let content = column![
            // Menu bar
            row![
                button("New contact (Ctrl+N)")
                    .style(button::subtle)
                    .on_press(Message::NewContact),
                button("Save (Ctrl+S)")
                    .style(button::subtle)
                    .on_press(Message::Save),
                space::horizontal(),
                button("About")
                    .style(button::subtle)
                    .on_press(Message::ShowAbout),
                button("Exit").style(button::subtle).on_press(Message::Exit),
            ]
            .spacing(5)
            .padding(5),
            rule::horizontal(1),
            row![
                self.contact_list.view().map(Message::ContactList),
                rule::vertical(1),
                self.contact_form.view().map(Message::ContactForm),
            ]
            .height(Length::Fill),
        ];

        if self.show_about {
            modal(content, about(), Some(Message::CloseAbout))
        } else {
            content.into()
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(shortcut)
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        self.cfg.read().theme()
    }

    fn new_contact(&mut self) -> Task<Message> {
        self.contact_form.clear();
        self.contact_list.clear_selection();
        Task::none()
    }

    fn handle_form_action(&mut self, action: contact_form::Action) -> Task<Message> {
        match action {
            contact_form::Action::None => Task::none(),
            contact_form::Action::Run(task) => task.map(Message::ContactForm),
            contact_form::Action::Saved { id, task } => {
                self.contact_list.refresh();
                self.contact_list.select(id);
                task.map(Message::ContactForm)
            }
            contact_form::Action::Deleted => {
                self.contact_list.refresh();
                self.contact_list.clear_selection();
                Task::none()
            }
        }
    }
}

fn shortcut(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            key_binding(&key, modifiers)
        }
        _ => None,
    }
}

/// Ctrl+S saves and Ctrl+N starts a new contact (Cmd on macOS). Shift and Caps Lock are ignored.
fn key_binding(key: &Key, modifiers: Modifiers) -> Option<Message> {
    if !modifiers.command() {
        return None;
    }

    match key.as_ref() {
        Key::Character(c) if c.eq_ignore_ascii_case("s") => Some(Message::Save),
        Key::Character(c) if c.eq_ignore_ascii_case("n") => Some(Message::NewContact),
        _ => None,
    }
}

fn about<'a>() -> Element<'a, Message> {
    container(
        column![
            text("ContactX").size(24),
            text("A private, offline contact book."),
            text("Contacts are stored locally and never leave this computer."),
            text(format!("Version {}", env!("CARGO_PKG_VERSION"))),
            text(credits::AUTHOR),
            text(env!("CARGO_PKG_HOMEPAGE")),
            row![
                space::horizontal(),
                button("Close").on_press(Message::CloseAbout)
            ],
        ]
        .spacing(10),
    )
    .padding(20)
    .width(400)
    .style(container::rounded_box)
    .into()
}

pub fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_click_outside: Option<Message>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let mouse_area = mouse_area(center(opaque(content)).style(|_theme| {
        container::Style {
            background: Some(
                Color {
                    a: 0.8,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        }
    }));

    stack![
        base.into(),
        opaque(if let Some(msg) = on_click_outside {
            mouse_area.on_press(msg)
        } else {
            mouse_area
        })
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_binding() {
        let command = Modifiers::COMMAND;

        assert!(matches!(
            key_binding(&Key::Character("s".into()), command),
            Some(Message::Save)
        ));
        assert!(matches!(
            key_binding(&Key::Character("n".into()), command),
            Some(Message::NewContact)
        ));
        assert!(key_binding(&Key::Character("x".into()), command).is_none());
    }

    #[test]
    fn test_key_binding_ignores_case() {
        let shifted = Modifiers::COMMAND | Modifiers::SHIFT;

        assert!(matches!(
            key_binding(&Key::Character("S".into()), shifted),
            Some(Message::Save)
        ));
        assert!(matches!(
            key_binding(&Key::Character("N".into()), Modifiers::COMMAND),
            Some(Message::NewContact)
        ));
    }

    #[test]
    fn test_key_binding_requires_command() {
        assert!(key_binding(&Key::Character("s".into()), Modifiers::empty()).is_none());
        assert!(key_binding(&Key::Character("n".into()), Modifiers::SHIFT).is_none());
    }
}
