//! State of the expense management view.
//!
//! Every network operation is split into a `begin_*` step, which claims the
//! request guard and hands back what the request needs, and a `finish_*` step,
//! which applies the server's answer. The async driving lives in
//! [`crate::controller`]; nothing here awaits.

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::api::ApiError;
use crate::expense::{Expense, ExpenseId, ExpensePayload};
use crate::form::{ExpenseDraft, FormMode, ValidationError};
use crate::guard::{Busy, BusyTicket, RequestGuard};
use crate::notice::{NoticeTicket, Notices};
use crate::store::ExpenseStore;

pub const LOAD_FAILED: &str = "Erro ao carregar despesas. Verifique sua conexão.";
pub const INVALID_FORM: &str = "Preencha todos os campos corretamente";
pub const CREATED: &str = "Despesa cadastrada com sucesso!";
pub const CREATE_FAILED: &str = "Erro ao cadastrar despesa.";
pub const UPDATED: &str = "Despesa atualizada com sucesso!";
pub const UPDATE_FAILED: &str = "Erro ao atualizar despesa.";
pub const DELETED: &str = "Despesa excluída com sucesso!";
pub const DELETE_FAILED: &str = "Erro ao excluir despesa.";

#[derive(Debug, thiserror::Error)]
pub enum SubmitRejected {
    #[error(transparent)]
    Busy(#[from] Busy),
    #[error("invalid expense: {error}")]
    Invalid {
        error: ValidationError,
        notice: NoticeTicket,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditRejected {
    #[error(transparent)]
    Busy(#[from] Busy),
    #[error("no expense with id {0}")]
    NotFound(ExpenseId),
}

/// A validated create or update, holding the request slot.
#[derive(Debug)]
pub struct Submission {
    pub ticket: BusyTicket,
    pub mode: FormMode,
    pub payload: ExpensePayload,
}

#[derive(Debug)]
pub struct Deletion {
    pub ticket: BusyTicket,
    pub id: ExpenseId,
}

pub struct ExpenseBoard {
    store: ExpenseStore,
    draft: ExpenseDraft,
    notices: Notices,
    guard: RequestGuard,
    today: Rc<dyn Fn() -> NaiveDate>,
}

impl fmt::Debug for ExpenseBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpenseBoard")
            .field("store", &self.store)
            .field("draft", &self.draft)
            .field("notices", &self.notices)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Default for ExpenseBoard {
    fn default() -> Self {
        Self::new(Rc::new(local_today))
    }
}

impl ExpenseBoard {
    /// `today` supplies the date a fresh draft starts with.
    pub fn new(today: Rc<dyn Fn() -> NaiveDate>) -> Self {
        Self {
            store: ExpenseStore::default(),
            draft: ExpenseDraft::empty(today()),
            notices: Notices::default(),
            guard: RequestGuard::default(),
            today,
        }
    }

    pub fn expenses(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    /// Field edits go straight to the draft; the mode cannot be changed this way.
    pub fn draft_mut(&mut self) -> &mut ExpenseDraft {
        &mut self.draft
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn begin_load(&mut self) -> Result<BusyTicket, Busy> {
        let ticket = self.guard.try_acquire()?;
        self.notices.dismiss();
        Ok(ticket)
    }

    /// Returns the ticket of a freshly posted notice, or `None` when nothing
    /// was posted or the ticket was stale and the result was dropped.
    pub fn finish_load(
        &mut self,
        ticket: BusyTicket,
        result: Result<Vec<Expense>, ApiError>,
    ) -> Option<NoticeTicket> {
        if !self.guard.release(ticket) {
            tracing::debug!("dropping stale expense list response");
            return None;
        }

        match result {
            Ok(expenses) => {
                tracing::info!(count = expenses.len(), "loaded expenses");
                self.store.replace_all(expenses);
                None
            }
            Err(error) => {
                tracing::warn!(%error, "could not load expenses");
                Some(self.notices.post_error(LOAD_FAILED))
            }
        }
    }

    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.guard.is_busy() {
            return Err(SubmitRejected::Busy(Busy));
        }

        let payload = match self.draft.validate() {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%error, "expense form is invalid");
                self.notices.dismiss();
                let notice = self.notices.post_error(INVALID_FORM);
                return Err(SubmitRejected::Invalid { error, notice });
            }
        };

        let ticket = self.guard.try_acquire()?;
        self.notices.dismiss();

        Ok(Submission {
            ticket,
            mode: self.draft.mode(),
            payload,
        })
    }

    pub fn finish_submit(
        &mut self,
        ticket: BusyTicket,
        mode: FormMode,
        result: Result<Expense, ApiError>,
    ) -> Option<NoticeTicket> {
        if !self.guard.release(ticket) {
            tracing::debug!("dropping stale save response");
            return None;
        }

        let notice = match (mode, result) {
            (FormMode::Create, Ok(expense)) => {
                tracing::info!(id = %expense.id, "created expense");
                self.store.append(expense);
                self.notices.post_success(CREATED)
            }
            (FormMode::Edit(id), Ok(expense)) => {
                if !self.store.replace(&id, expense) {
                    tracing::warn!(%id, "updated expense is no longer listed");
                }
                tracing::info!(%id, "updated expense");
                self.notices.post_success(UPDATED)
            }
            (FormMode::Create, Err(error)) => {
                tracing::warn!(%error, "could not create expense");
                return Some(self.notices.post_error(CREATE_FAILED));
            }
            (FormMode::Edit(id), Err(error)) => {
                tracing::warn!(%id, %error, "could not update expense");
                return Some(self.notices.post_error(UPDATE_FAILED));
            }
        };

        self.reset_draft();
        Some(notice)
    }

    pub fn begin_delete(&mut self, id: ExpenseId) -> Result<Deletion, Busy> {
        let ticket = self.guard.try_acquire()?;
        self.notices.dismiss();
        Ok(Deletion { ticket, id })
    }

    pub fn finish_delete(
        &mut self,
        ticket: BusyTicket,
        id: ExpenseId,
        result: Result<(), ApiError>,
    ) -> Option<NoticeTicket> {
        if !self.guard.release(ticket) {
            tracing::debug!("dropping stale delete response");
            return None;
        }

        match result {
            Ok(()) => {
                self.store.remove(&id);
                tracing::info!(%id, "deleted expense");
                Some(self.notices.post_success(DELETED))
            }
            Err(error) => {
                tracing::warn!(%id, %error, "could not delete expense");
                Some(self.notices.post_error(DELETE_FAILED))
            }
        }
    }

    /// Loads the record with `id` into the form and switches to edit mode.
    pub fn start_edit(&mut self, id: ExpenseId) -> Result<(), EditRejected> {
        if self.guard.is_busy() {
            return Err(EditRejected::Busy(Busy));
        }

        let Some(expense) = self.store.get(&id) else {
            return Err(EditRejected::NotFound(id));
        };
        self.draft = ExpenseDraft::from_expense(expense);
        self.notices.dismiss();
        Ok(())
    }

    /// Leaves edit mode without saving. Returns false if not editing.
    pub fn cancel_edit(&mut self) -> bool {
        if !self.draft.is_editing() {
            return false;
        }

        self.reset_draft();
        true
    }

    pub fn expire_notices(&mut self, ticket: NoticeTicket) -> bool {
        self.notices.expire(ticket)
    }

    /// Invalidates the outstanding request so its late answer is dropped.
    pub fn detach(&mut self) {
        self.guard.reset();
    }

    fn reset_draft(&mut self) {
        self.draft = ExpenseDraft::empty((self.today)());
    }
}
