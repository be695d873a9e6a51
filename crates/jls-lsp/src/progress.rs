//! `$/progress` reporting for the recompile phases named in spec.md §4.6:
//! "Configure javac", "Finding source roots", "Inferring class path",
//! "Inferring doc path", "Using cached classpath". Best-effort — a client
//! that never asked for work-done progress just doesn't see it, so every
//! method here swallows send errors rather than propagating them.

use lsp_server::{Connection, Message, Notification};
use lsp_types::{
    notification::Notification as _, notification::Progress as ProgressNotification, NumberOrString, ProgressParams, ProgressParamsValue,
    WorkDoneProgress, WorkDoneProgressBegin, WorkDoneProgressEnd, WorkDoneProgressReport,
};

pub struct ProgressReporter<'a> {
    connection: &'a Connection,
    token: NumberOrString,
    started: bool,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(connection: &'a Connection, token: impl Into<String>) -> Self {
        Self { connection, token: NumberOrString::String(token.into()), started: false }
    }

    /// Reports a named phase, starting the progress session on first call
    /// and otherwise sending a `report` for the same token.
    pub fn phase(&mut self, title: &str) {
        if !self.started {
            self.started = true;
            self.send(WorkDoneProgress::Begin(WorkDoneProgressBegin { title: "Recompiling".to_string(), cancellable: Some(false), message: Some(title.to_string()), percentage: None }));
        } else {
            self.send(WorkDoneProgress::Report(WorkDoneProgressReport { cancellable: Some(false), message: Some(title.to_string()), percentage: None }));
        }
    }

    fn send(&self, value: WorkDoneProgress) {
        let params = ProgressParams { token: self.token.clone(), value: ProgressParamsValue::WorkDone(value) };
        let notification = Notification::new(ProgressNotification::METHOD.to_string(), params);
        let _ = self.connection.sender.send(Message::Notification(notification));
    }
}

impl Drop for ProgressReporter<'_> {
    fn drop(&mut self) {
        if self.started {
            self.send(WorkDoneProgress::End(WorkDoneProgressEnd { message: None }));
        }
    }
}
