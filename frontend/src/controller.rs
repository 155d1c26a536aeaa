//! Drives the expense board: session check, network calls, confirmation and
//! notice expiry.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use yew::Callback;

use crate::api::{ApiError, ExpenseApi};
use crate::board::{EditRejected, ExpenseBoard, SubmitRejected};
use crate::expense::ExpenseId;
use crate::form::{ExpenseDraft, FormMode};
use crate::guard::Busy;
use crate::notice::{NoticeTicket, NoticeTimer, NOTICE_TTL};
use crate::session::Session;

pub const DELETE_PROMPT: &str = "Tem certeza que deseja excluir esta despesa?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The request was sent; the board holds the result.
    Dispatched,
    /// The user declined the confirmation prompt.
    Declined,
}

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct ExpenseController {
    board: Rc<RefCell<ExpenseBoard>>,
    api: Rc<dyn ExpenseApi>,
    session: Rc<dyn Session>,
    timer: Rc<dyn NoticeTimer>,
    confirm: Rc<dyn Confirm>,
    redraw: Callback<()>,
}

impl ExpenseController {
    pub fn new(
        board: ExpenseBoard,
        api: Rc<dyn ExpenseApi>,
        session: Rc<dyn Session>,
        timer: Rc<dyn NoticeTimer>,
        confirm: Rc<dyn Confirm>,
        redraw: Callback<()>,
    ) -> Self {
        Self {
            board: Rc::new(RefCell::new(board)),
            api,
            session,
            timer,
            confirm,
            redraw,
        }
    }

    /// Borrow the board for rendering. Do not hold across an `.await`.
    pub fn board(&self) -> Ref<'_, ExpenseBoard> {
        self.board.borrow()
    }

    pub fn access(&self) -> Access {
        match self.session.token() {
            Some(_) => Access::Granted,
            None => Access::Denied,
        }
    }

    /// Checks the session and, if signed in, fetches the expense list.
    pub async fn mount(&self) -> Access {
        let access = self.access();
        match access {
            Access::Granted => {
                if self.load().await.is_err() {
                    tracing::warn!("initial load skipped: a request is already in flight");
                }
            }
            Access::Denied => tracing::warn!("no session token, expenses not loaded"),
        }
        access
    }

    pub async fn load(&self) -> Result<(), Busy> {
        let ticket = self.board.borrow_mut().begin_load()?;
        self.redraw.emit(());

        tracing::debug!("fetching expenses");
        let result = match self.session.token() {
            Some(token) => self.api.list(&token).await,
            None => Err(ApiError::MissingToken),
        };

        let notice = self.board.borrow_mut().finish_load(ticket, result);
        self.settle(notice);
        Ok(())
    }

    /// Creates or updates, depending on the draft's mode.
    pub async fn submit(&self) -> Result<(), SubmitRejected> {
        let begun = self.board.borrow_mut().begin_submit();
        let submission = match begun {
            Ok(submission) => submission,
            Err(rejected) => {
                if let SubmitRejected::Invalid { notice, .. } = &rejected {
                    self.settle(Some(*notice));
                }
                return Err(rejected);
            }
        };
        self.redraw.emit(());

        tracing::debug!(mode = ?submission.mode, "saving expense");
        let result = match self.session.token() {
            Some(token) => match &submission.mode {
                FormMode::Create => {
                    self.api.create(&token, &submission.payload).await
                }
                FormMode::Edit(id) => {
                    self.api.update(&token, id, &submission.payload).await
                }
            },
            None => Err(ApiError::MissingToken),
        };

        let notice =
            self.board
                .borrow_mut()
                .finish_submit(submission.ticket, submission.mode, result);
        self.settle(notice);
        Ok(())
    }

    pub async fn delete(&self, id: ExpenseId) -> Result<DeleteOutcome, Busy> {
        if self.board.borrow().is_loading() {
            return Err(Busy);
        }
        if !self.confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let deletion = self.board.borrow_mut().begin_delete(id)?;
        self.redraw.emit(());

        tracing::debug!(id = %deletion.id, "deleting expense");
        let result = match self.session.token() {
            Some(token) => self.api.delete(&token, &deletion.id).await,
            None => Err(ApiError::MissingToken),
        };

        let notice = self
            .board
            .borrow_mut()
            .finish_delete(deletion.ticket, deletion.id, result);
        self.settle(notice);
        Ok(DeleteOutcome::Dispatched)
    }

    pub fn start_edit(&self, id: ExpenseId) -> Result<(), EditRejected> {
        let started = self.board.borrow_mut().start_edit(id);
        self.redraw.emit(());
        started
    }

    pub fn cancel_edit(&self) {
        if self.board.borrow_mut().cancel_edit() {
            self.redraw.emit(());
        }
    }

    pub fn update_draft(&self, change: impl FnOnce(&mut ExpenseDraft)) {
        change(self.board.borrow_mut().draft_mut());
        self.redraw.emit(());
    }

    pub fn sign_out(&self) {
        tracing::info!("signing out");
        self.session.clear_token();
        self.redraw.emit(());
    }

    /// Called when the view goes away; answers still in flight are dropped.
    pub fn detach(&self) {
        self.board.borrow_mut().detach();
    }

    fn settle(&self, notice: Option<NoticeTicket>) {
        if let Some(ticket) = notice {
            let board = Rc::clone(&self.board);
            let redraw = self.redraw.clone();
            self.timer.arm(
                NOTICE_TTL,
                Box::new(move || {
                    if board.borrow_mut().expire_notices(ticket) {
                        redraw.emit(());
                    }
                }),
            );
        }
        self.redraw.emit(());
    }
}
