//! Native message boxes. Each future resolves once the user closes the dialog.

use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

pub async fn info(title: String, description: String) {
    show(MessageLevel::Info, title, description).await;
}

pub async fn warning(title: String, description: String) {
    show(MessageLevel::Warning, title, description).await;
}

pub async fn error(title: String, description: String) {
    show(MessageLevel::Error, title, description).await;
}

/// Ask a yes/no question. Anything but an explicit "yes" counts as "no".
pub async fn confirm(title: String, description: String) -> bool {
    let result = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;

    matches!(result, MessageDialogResult::Yes)
}

async fn show(level: MessageLevel, title: String, description: String) {
    AsyncMessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}
