use crate::session::{Direction, FolderRole, Session, StatusMessage, View};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// A user request coming from a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectFolder(FolderRole, PathBuf),
    Navigate(Direction),
    Promote,
    EditText,
    ReplaceText(String),
    SaveText,
    Quit,
}

/// Anything that can show a review session and collect user actions:
/// a terminal prompt, a desktop window, or a scripted test double.
pub trait Frontend {
    fn render(&mut self, view: &View, message: Option<&StatusMessage>);
    /// `None` means the input is exhausted.
    fn next_action(&mut self, view: &View) -> Option<Action>;
}

/// Applies one action to the session. Failures are left as the session's
/// status message rather than returned.
pub fn dispatch(session: &mut Session, action: Action) {
    let result = match action {
        Action::SelectFolder(role, path) => session.select_folder(role, path),
        Action::Navigate(direction) => {
            session.navigate(direction);
            Ok(())
        }
        Action::Promote => session.promote(),
        Action::EditText => session.edit_text(),
        Action::ReplaceText(text) => session.replace_text(text),
        Action::SaveText => session.save_text(),
        Action::Quit => Ok(()),
    };
    if let Err(err) = result {
        warn!(%err, "review action failed");
    }
}

/// Drives `session` until the front end quits or runs out of input.
pub fn run<F: Frontend + ?Sized>(session: &mut Session, frontend: &mut F) {
    loop {
        let view = session.view();
        frontend.render(&view, session.message_at(Instant::now()));

        match frontend.next_action(&view) {
            None | Some(Action::Quit) => break,
            Some(action) => dispatch(session, action),
        }
    }
}
