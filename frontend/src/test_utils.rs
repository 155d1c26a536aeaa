//! Fakes shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::channel::oneshot;

use crate::api::{ApiError, ExpenseApi};
use crate::board::ExpenseBoard;
use crate::controller::Confirm;
use crate::expense::{Expense, ExpenseId, ExpensePayload, PaymentMethod};
use crate::notice::NoticeTimer;
use crate::session::Session;

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An expense dated 2024-01-15, paid with PIX.
pub fn expense(id: i64, description: &str, amount: f64) -> Expense {
    Expense {
        id: ExpenseId::from(id),
        description: description.to_string(),
        payment_method: PaymentMethod::Pix,
        amount,
        date: day(2024, 1, 15),
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status(500)
}

/// A board whose "today" is fixed at 2024-01-20.
pub fn board() -> ExpenseBoard {
    ExpenseBoard::new(Rc::new(|| day(2024, 1, 20)))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List(String),
    Create(String, ExpensePayload),
    Update(String, ExpenseId, ExpensePayload),
    Delete(String, ExpenseId),
}

/// An in-memory stand-in for the expense API.
///
/// Keeps its own record list so a create followed by a list behaves like the
/// real server. Responses can be scripted, failed, or held until released.
pub struct FakeApi {
    records: RefCell<Vec<Expense>>,
    next_id: Cell<i64>,
    calls: RefCell<Vec<ApiCall>>,
    scripted_saves: RefCell<VecDeque<Result<Expense, ApiError>>>,
    fail_next: Cell<bool>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            records: RefCell::default(),
            next_id: Cell::new(100),
            calls: RefCell::default(),
            scripted_saves: RefCell::default(),
            fail_next: Cell::new(false),
            gate: RefCell::default(),
        }
    }
}

impl FakeApi {
    pub fn seed(&self, records: Vec<Expense>) {
        self.records.replace(records);
    }

    pub fn respond_to_save(&self, response: Result<Expense, ApiError>) {
        self.scripted_saves.borrow_mut().push_back(response);
    }

    /// The next call of any kind fails with a 500.
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }

    /// The next call waits until the returned sender fires.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.gate.replace(Some(receiver));
        sender
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    async fn enter(&self, call: ApiCall) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);

        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail_next.replace(false) {
            return Err(server_error());
        }
        Ok(())
    }

    fn stored(&self, id: ExpenseId, payload: &ExpensePayload) -> Expense {
        Expense {
            id,
            description: payload.description.clone(),
            payment_method: payload.payment_method,
            amount: payload.amount,
            date: payload.date,
        }
    }
}

#[async_trait(?Send)]
impl ExpenseApi for FakeApi {
    async fn list(&self, token: &str) -> Result<Vec<Expense>, ApiError> {
        self.enter(ApiCall::List(token.to_string())).await?;
        Ok(self.records.borrow().clone())
    }

    async fn create(&self, token: &str, payload: &ExpensePayload) -> Result<Expense, ApiError> {
        self.enter(ApiCall::Create(token.to_string(), payload.clone()))
            .await?;
        if let Some(scripted) = self.scripted_saves.borrow_mut().pop_front() {
            return scripted;
        }

        let id = ExpenseId::from(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        let created = self.stored(id, payload);
        self.records.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        token: &str,
        id: &ExpenseId,
        payload: &ExpensePayload,
    ) -> Result<Expense, ApiError> {
        self.enter(ApiCall::Update(token.to_string(), id.clone(), payload.clone()))
            .await?;
        if let Some(scripted) = self.scripted_saves.borrow_mut().pop_front() {
            return scripted;
        }

        let updated = self.stored(id.clone(), payload);
        for record in self.records.borrow_mut().iter_mut() {
            if record.id == *id {
                *record = updated.clone();
            }
        }
        Ok(updated)
    }

    async fn delete(&self, token: &str, id: &ExpenseId) -> Result<(), ApiError> {
        self.enter(ApiCall::Delete(token.to_string(), id.clone())).await?;
        self.records.borrow_mut().retain(|record| record.id != *id);
        Ok(())
    }
}

/// A timer driven by hand through virtual time.
#[derive(Default)]
pub struct ManualTimer {
    now: Cell<Duration>,
    pending: RefCell<Option<(Duration, Box<dyn FnOnce()>)>>,
    armed: Cell<usize>,
}

impl ManualTimer {
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.borrow().as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.get()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);

        let due = matches!(self.deadline(), Some(deadline) if deadline <= self.now.get());
        if due {
            let fire = self.pending.borrow_mut().take().map(|(_, fire)| fire);
            if let Some(fire) = fire {
                fire();
            }
        }
    }
}

impl NoticeTimer for ManualTimer {
    fn arm(&self, after: Duration, fire: Box<dyn FnOnce()>) {
        self.armed.set(self.armed.get() + 1);
        self.pending
            .replace(Some((self.now.get() + after, fire)));
    }
}

pub struct FixedConfirm {
    answer: Cell<bool>,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: Cell::new(answer),
        }
    }

    pub fn set(&self, answer: bool) {
        self.answer.set(answer);
    }
}

impl Confirm for FixedConfirm {
    fn confirm(&self, _message: &str) -> bool {
        self.answer.get()
    }
}

/// A session kept in memory instead of localStorage.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RefCell<Option<String>>,
}

impl MemorySession {
    pub fn signed_in(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl Session for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone().filter(|token| !token.is_empty())
    }

    fn clear_token(&self) {
        self.token.borrow_mut().take();
    }
}

mod tests {
    use super::*;

    #[test]
    fn memory_session_clears_token() {
        let session = MemorySession::signed_in("abc");
        assert_eq!(session.token().as_deref(), Some("abc"));

        session.clear_token();

        assert_eq!(session.token(), None);
    }

    #[test]
    fn empty_token_counts_as_signed_out() {
        let session = MemorySession::signed_in("");

        assert_eq!(session.token(), None);
    }
}
