use std::path::PathBuf;

use contactx_lib::{
    Repository,
    form::{self, DeleteRequest, Saved},
    repository::{Contact, ContactId},
    thumbnail::{THUMBNAIL_SIZE, Thumbnail},
};
use iced::{
    Alignment, Element, Length, Task,
    widget::{
        Column, Row, button, column, container, image, row, rule, space, text, text_editor,
        text_input,
    },
};
use rfd::AsyncFileDialog;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::error;

use crate::{credits, dialog};

#[derive(Debug, Clone)]
pub enum Message {
    NameInput(String),
    PhoneInput(String),
    TelegramInput(String),
    GithubInput(String),
    DiscordInput(String),
    RedditInput(String),
    EmailsEdited(text_editor::Action),
    PgpKeyEdited(text_editor::Action),
    TabSelected(Tab),
    SelectPhotoPressed,
    PhotoPicked(Option<PathBuf>),
    SavePressed,
    DeletePressed,
    DeleteConfirmed(DeleteRequest, bool),
    LinkPressed(&'static str),
    DialogClosed,
}

/// Action used for communicating with the parent component
#[derive(Debug)]
pub enum Action {
    None,
    Run(Task<Message>),
    /// The contact was written to the store
    Saved { id: ContactId, task: Task<Message> },
    /// The selected contact was removed and the form is blank again
    Deleted,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Tab {
    #[default]
    #[strum(to_string = "Contacts & socials")]
    Socials,
    #[strum(to_string = "PGP key")]
    PgpKey,
    Credits,
}

pub struct ContactForm {
    repo: Repository,
    form: form::ContactForm,
    // Multi-line fields keep their own editor state, mirrored into `form` on every edit
    emails: text_editor::Content,
    pgp_key: text_editor::Content,
    photo: image::Handle,
    active_tab: Tab,
}

impl ContactForm {
    pub fn new(repo: Repository) -> Self {
        let form = form::ContactForm::new(repo.image_loader());
        let photo = handle(form.thumbnail());

        Self {
            repo,
            form,
            emails: text_editor::Content::new(),
            pgp_key: text_editor::Content::new(),
            photo,
            active_tab: Tab::default(),
        }
    }

    /// Show `contact` for editing.
    pub fn load(&mut self, contact: Contact) {
        self.form.load(contact);
        self.sync();
    }

    /// Reset to a blank "new contact" form.
    pub fn clear(&mut self) {
        self.form.clear();
        self.sync();
    }

    pub fn save(&mut self) -> Action {
        match self.form.save(&self.repo) {
            Ok(saved) => {
                let (title, verb) = match saved {
                    Saved::Inserted(_) => ("Contact added", "added"),
                    Saved::Updated(_) => ("Contact updated", "updated"),
                };
                let description = format!("Contact '{}' {verb}!", self.form.fields().name);

                Action::Saved {
                    id: saved.id(),
                    task: Task::perform(dialog::info(title.into(), description), |_| {
                        Message::DialogClosed
                    }),
                }
            }
            Err(e) => Action::Run(report(e)),
        }
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::NameInput(content) => {
                self.form.fields_mut().name = content;
                Action::None
            }
            Message::PhoneInput(content) => {
                self.form.fields_mut().phone = content;
                Action::None
            }
            Message::TelegramInput(content) => {
                self.form.fields_mut().telegram = content;
                Action::None
            }
            Message::GithubInput(content) => {
                self.form.fields_mut().github = content;
                Action::None
            }
            Message::DiscordInput(content) => {
                self.form.fields_mut().discord = content;
                Action::None
            }
            Message::RedditInput(content) => {
                self.form.fields_mut().reddit = content;
                Action::None
            }
            Message::EmailsEdited(action) => {
                self.emails.perform(action);
                self.form.fields_mut().emails = editor_text(&self.emails);
                Action::None
            }
            Message::PgpKeyEdited(action) => {
                self.pgp_key.perform(action);
                self.form.fields_mut().pgp_key = editor_text(&self.pgp_key);
                Action::None
            }
            Message::TabSelected(tab) => {
                self.active_tab = tab;
                Action::None
            }
            Message::SelectPhotoPressed => Action::Run(Task::perform(
                async {
                    AsyncFileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png", "gif"])
                        .pick_file()
                        .await
                        .map(|file_handle| file_handle.path().to_path_buf())
                },
                Message::PhotoPicked,
            )),
            Message::PhotoPicked(path) => {
                if let Some(path) = path {
                    self.form.set_photo(path);
                    self.photo = handle(self.form.thumbnail());
                }
                Action::None
            }
            Message::SavePressed => self.save(),
            Message::DeletePressed => match self.form.request_delete() {
                Ok(request) => {
                    let description = format!(
                        "Are you sure you want to permanently delete the contact '{}'?",
                        request.name
                    );

                    Action::Run(Task::perform(
                        dialog::confirm("Confirm deletion".into(), description),
                        move |confirmed| Message::DeleteConfirmed(request, confirmed),
                    ))
                }
                Err(e) => Action::Run(report(e)),
            },
            Message::DeleteConfirmed(request, confirmed) => {
                if !confirmed {
                    return Action::None;
                }

                match self.form.confirm_delete(&self.repo, request) {
                    Ok(()) => {
                        self.sync();
                        Action::Deleted
                    }
                    Err(e) => Action::Run(report(e)),
                }
            }
            Message::LinkPressed(url) => match credits::open_link(url) {
                Ok(()) => Action::None,
                Err(e) => {
                    error!("Failed to open {url}: {e}");
                    Action::Run(Task::perform(
                        dialog::error("Error".into(), format!("Could not open {url}: {e}")),
                        |()| Message::DialogClosed,
                    ))
                }
            },
            Message::DialogClosed => Action::None,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fields = self.form.fields();

        let photo_block = container(
            column![
                image(self.photo.clone())
                    .width(THUMBNAIL_SIZE)
                    .height(THUMBNAIL_SIZE),
                button("Select photo")
                    .style(button::secondary)
                    .on_press(Message::SelectPhotoPressed),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        )
        .padding(10)
        .style(container::bordered_box);

        let identity = column![
            field("Full name*", &fields.name, Message::NameInput),
            field("Main phone", &fields.phone, Message::PhoneInput),
        ]
        .spacing(10)
        .width(Length::Fill);

        let tabs = Row::with_children(Tab::iter().map(|tab| {
            let style = if tab == self.active_tab {
                button::primary
            } else {
                button::subtle
            };

            button(text(tab.to_string()))
                .style(style)
                .on_press(Message::TabSelected(tab))
                .into()
        }))
        .spacing(5);

        let tab_content: Element<'_, Message> = match self.active_tab {
            Tab::Socials => column![
                text("Emails (one per line)"),
                text_editor(&self.emails)
                    .on_action(Message::EmailsEdited)
                    .height(100),
                field("Telegram", &fields.telegram, Message::TelegramInput),
                field("GitHub", &fields.github, Message::GithubInput),
                field("Discord", &fields.discord, Message::DiscordInput),
                field("Reddit", &fields.reddit, Message::RedditInput),
            ]
            .spacing(10)
            .into(),
            Tab::PgpKey => column![
                text("Public PGP key"),
                text_editor(&self.pgp_key)
                    .on_action(Message::PgpKeyEdited)
                    .height(Length::Fill),
            ]
            .spacing(10)
            .into(),
            Tab::Credits => credits_view(),
        };

        column![
            text(self.form.status()).size(22),
            row![photo_block, identity].spacing(20),
            tabs,
            container(tab_content)
                .padding(10)
                .height(Length::Fill)
                .style(container::rounded_box),
            row![
                space::horizontal(),
                button("Delete")
                    .style(button::danger)
                    .on_press(Message::DeletePressed),
                button("Save")
                    .style(button::primary)
                    .on_press(Message::SavePressed),
            ]
            .spacing(10),
        ]
        .spacing(15)
        .padding(20)
        .into()
    }

    /// Rebuild widget state from the form after it was loaded, cleared or deleted.
    fn sync(&mut self) {
        let fields = self.form.fields();
        self.emails = text_editor::Content::with_text(&fields.emails);
        self.pgp_key = text_editor::Content::with_text(&fields.pgp_key);
        self.photo = handle(self.form.thumbnail());
    }
}

fn field<'a>(
    label: &'a str,
    value: &'a str,
    on_input: fn(String) -> Message,
) -> Element<'a, Message> {
    column![text(label), text_input(label, value).on_input(on_input)]
        .spacing(5)
        .into()
}

fn credits_view<'a>() -> Element<'a, Message> {
    let links = Column::with_children(credits::LINKS.iter().map(|link| {
        row![
            text(format!("{}:", link.label)).width(110),
            button(text(link.text))
                .padding(0)
                .style(button::text)
                .on_press(Message::LinkPressed(link.url)),
        ]
        .into()
    }))
    .spacing(8);

    container(
        column![
            text("Developed by:"),
            text(credits::AUTHOR).size(22),
            rule::horizontal(1),
            links,
            rule::horizontal(1),
            text(credits::footer()).size(12),
        ]
        .spacing(15)
        .align_x(Alignment::Center),
    )
    .center_x(Length::Fill)
    .into()
}

fn editor_text(content: &text_editor::Content) -> String {
    content.text().trim().to_string()
}

fn handle(thumbnail: &Thumbnail) -> image::Handle {
    image::Handle::from_rgba(
        thumbnail.width(),
        thumbnail.height(),
        thumbnail.pixels().clone(),
    )
}

/// Tell the user why an action was aborted.
fn report(e: form::Error) -> Task<Message> {
    match e {
        form::Error::NameRequired => Task::perform(
            dialog::error("Error".into(), "The 'Name' field is required.".into()),
            |()| Message::DialogClosed,
        ),
        form::Error::NothingSelected => Task::perform(
            dialog::warning(
                "Warning".into(),
                "Select a contact from the list to delete it.".into(),
            ),
            |()| Message::DialogClosed,
        ),
        form::Error::Repository(e) => {
            error!("Failed to write contact: {e}");
            Task::perform(
                dialog::error("Error".into(), format!("The change could not be saved: {e}")),
                |()| Message::DialogClosed,
            )
        }
    }
}
