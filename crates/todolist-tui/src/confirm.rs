use std::cell::Cell;
use std::rc::Rc;

/// Yes/no prompt consulted before destructive actions.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Answer collected by a modal dialog before the action runs.
///
/// The dialog records the user's choice with [`ModalAnswer::answer`]; the
/// next `confirm` call consumes it. Without a recorded answer the prompt is
/// declined.
#[derive(Debug, Clone, Default)]
pub struct ModalAnswer(Rc<Cell<Option<bool>>>);

impl ModalAnswer {
    pub fn answer(&self, accepted: bool) {
        self.0.set(Some(accepted));
    }
}

impl Confirm for ModalAnswer {
    fn confirm(&self, message: &str) -> bool {
        let accepted = self.0.take().unwrap_or(false);
        tracing::debug!("confirm {message:?}: {accepted}");
        accepted
    }
}
