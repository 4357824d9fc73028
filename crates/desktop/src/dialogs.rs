use iced::Task;
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

use facecam_core::shared::notice::{Notice, NoticeLevel};

use crate::app::Message;

// Boxes are not parented to the main window. `App` ignores snapshot input
// until a pending confirmation is answered.

/// Shows a notice as a native message box and reports when it is dismissed.
pub fn show(notice: Notice) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(message_level(notice.level))
                .set_title(notice.title)
                .set_description(notice.message)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await;
        },
        |()| Message::NoticeClosed,
    )
}

/// Asks a yes/no question. Closing the box counts as "no".
pub fn confirm(title: &str, question: String) -> Task<Message> {
    let title = title.to_string();
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Info)
                .set_title(title)
                .set_description(question)
                .set_buttons(MessageButtons::YesNo)
                .show()
                .await
                == MessageDialogResult::Yes
        },
        Message::SnapshotConfirmed,
    )
}

fn message_level(level: NoticeLevel) -> MessageLevel {
    match level {
        NoticeLevel::Info => MessageLevel::Info,
        NoticeLevel::Warning => MessageLevel::Warning,
        NoticeLevel::Error => MessageLevel::Error,
    }
}
