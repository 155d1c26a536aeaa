use crate::expense::{Expense, ExpenseId};

/// The client-side copy of the user's expenses, in server order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseStore {
    items: Vec<Expense>,
}

impl ExpenseStore {
    pub fn replace_all(&mut self, items: Vec<Expense>) {
        self.items = items;
    }

    pub fn append(&mut self, expense: Expense) {
        self.items.push(expense);
    }

    /// Swaps the record with `id` for `expense`, keeping its position.
    /// Returns false if no such record is held.
    pub fn replace(&mut self, id: &ExpenseId, expense: Expense) -> bool {
        match self.items.iter_mut().find(|item| item.id == *id) {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ExpenseId) -> Option<Expense> {
        let index = self.items.iter().position(|item| item.id == *id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.items.iter().find(|item| item.id == *id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Expense] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}
