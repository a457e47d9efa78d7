use contactx_lib::{
    Repository,
    list,
    repository::{Contact, ContactId, ContactSummary},
};
use derive_more::Deref;
use iced::{
    Element, Length,
    widget::{Column, button, column, row, rule, scrollable, text},
};
use tracing::error;

const ID_COLUMN_WIDTH: u32 = 40;

#[derive(Debug, Clone)]
pub enum Message {
    NewContactPressed,
    RowSelected(ContactId),
}

/// Action used for communicating with the parent component
#[derive(Debug)]
pub enum Action {
    None,
    NewContact,
    Load(Contact),
}

#[derive(Debug, Clone)]
pub enum State {
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, Deref)]
pub struct ContactList {
    repo: Repository,
    #[deref]
    list: list::ContactList,
    state: State,
}

impl ContactList {
    pub fn new(repo: Repository) -> Self {
        let mut contact_list = Self {
            repo,
            list: list::ContactList::default(),
            state: State::Loaded,
        };

        contact_list.refresh();

        contact_list
    }

    /// Re-query the store and redraw the rows.
    pub fn refresh(&mut self) {
        self.state = match self.list.refresh(&self.repo) {
            Ok(()) => State::Loaded,
            Err(e) => {
                error!("Failed to list contacts: {e}");
                State::Error(format!("Failed to load contacts: {e}"))
            }
        };
    }

    pub fn select(&mut self, id: ContactId) {
        self.list.select(id);
    }

    pub fn clear_selection(&mut self) {
        self.list.clear_selection();
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::NewContactPressed => Action::NewContact,
            Message::RowSelected(id) => match self.list.on_selection(&self.repo, id) {
                Ok(Some(contact)) => Action::Load(contact),
                Ok(None) => {
                    // Gone since the last refresh, so whatever the form shows is stale too
                    self.refresh();
                    Action::NewContact
                }
                Err(e) => {
                    error!("Failed to load contact {id}: {e}");
                    self.state = State::Error(format!("Failed to load contact: {e}"));
                    Action::None
                }
            },
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let rows: Element<'_, Message> = match &self.state {
            State::Error(e) => text(e.as_str()).into(),
            State::Loaded if self.summaries().is_empty() => text("No contacts yet").into(),
            State::Loaded => scrollable(Column::with_children(
                self.summaries()
                    .iter()
                    .map(|summary| contact_row(summary, self.selected())),
            ))
            .height(Length::Fill)
            .into(),
        };

        column![
            button("New contact (+)")
                .width(Length::Fill)
                .style(button::primary)
                .on_press(Message::NewContactPressed),
            row![text("ID").width(ID_COLUMN_WIDTH), text("Name")],
            rule::horizontal(1),
            rows,
        ]
        .spacing(10)
        .padding(20)
        .width(320)
        .into()
    }
}

// Generate a row that represents a contact
fn contact_row(summary: &ContactSummary, selected: Option<ContactId>) -> Element<'_, Message> {
    let style = if Some(summary.id) == selected {
        button::primary
    } else {
        button::subtle
    };

    button(row![
        text(summary.id.to_string()).width(ID_COLUMN_WIDTH),
        text(summary.name.as_str()),
    ])
    .width(Length::Fill)
    .style(style)
    .on_press(Message::RowSelected(summary.id))
    .into()
}
