use chrono::NaiveDate;

use crate::expense::{Expense, ExpenseId, ExpensePayload, PaymentMethod};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ExpenseId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description is empty")]
    EmptyDescription,
    #[error("amount `{0}` is not a positive number")]
    InvalidAmount(String),
    #[error("date `{0}` is not a calendar date")]
    InvalidDate(String),
}

/// What the user has typed into the expense form.
///
/// Amount and date stay as raw text until [`ExpenseDraft::validate`] coerces them.
/// The mode is private so only [`ExpenseDraft::empty`] and
/// [`ExpenseDraft::from_expense`] can decide which record is being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    mode: FormMode,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub amount: String,
    pub date: String,
}

impl ExpenseDraft {
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            description: String::new(),
            payment_method: PaymentMethod::default(),
            amount: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            mode: FormMode::Edit(expense.id.clone()),
            description: expense.description.clone(),
            payment_method: expense.payment_method,
            amount: expense.amount.to_string(),
            date: expense.date.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode.clone()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn validate(&self) -> Result<ExpensePayload, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or_else(|| ValidationError::InvalidAmount(self.amount.clone()))?;

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(self.date.clone()))?;

        Ok(ExpensePayload {
            description: description.to_string(),
            payment_method: self.payment_method,
            amount,
            date,
        })
    }
}
