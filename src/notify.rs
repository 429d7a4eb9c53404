// src/notify.rs

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Info,
    Error,
}

/// User-facing notification surface (toast, status line, stderr). The
/// session fires this exactly once per failed completion attempt; title
/// generation failures never reach it.
pub trait Notifier {
    fn notify(&mut self, kind: NotifyKind, title: &str, message: &str);
}

/// Swallows everything. Useful for headless embedders and tests that do
/// not assert on notifications.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _kind: NotifyKind, _title: &str, _message: &str) {}
}
