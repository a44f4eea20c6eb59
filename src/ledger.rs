use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::schemas::{Expense, Person, PersonId};

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("expense must be split among at least one person")]
    EmptySplit,
    #[error("unknown person: {0}")]
    UnknownPerson(String),
    #[error("unknown expense: {0}")]
    UnknownExpense(String),
}

/// The group's people and expenses. Balances and settlements are never
/// stored here; they are recomputed from this state on every request.
#[derive(Debug, Default)]
pub struct Ledger {
    people: Vec<Person>,
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn add_person(&mut self, name: &str) -> Result<Person, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let person = Person {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.people.push(person.clone());
        Ok(person)
    }

    /// Removes a person and everything their absence invalidates: the
    /// expenses they paid, their slot in every split set, and any
    /// expense whose split set is left empty.
    pub fn remove_person(&mut self, id: &str) -> Result<(), LedgerError> {
        if !self.people.iter().any(|p| p.id == id) {
            return Err(LedgerError::UnknownPerson(id.to_string()));
        }
        self.people.retain(|p| p.id != id);
        for expense in &mut self.expenses {
            expense.split_among.retain(|pid| pid != id);
        }
        self.expenses
            .retain(|e| e.paid_by != id && !e.split_among.is_empty());
        Ok(())
    }

    pub fn add_expense(
        &mut self,
        description: &str,
        amount: f64,
        paid_by: &str,
        split_among: &[PersonId],
    ) -> Result<Expense, LedgerError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount);
        }
        if !self.people.iter().any(|p| p.id == paid_by) {
            return Err(LedgerError::UnknownPerson(paid_by.to_string()));
        }
        let mut split = Vec::new();
        for pid in split_among {
            if !self.people.iter().any(|p| &p.id == pid) {
                return Err(LedgerError::UnknownPerson(pid.clone()));
            }
            if !split.contains(pid) {
                split.push(pid.clone());
            }
        }
        if split.is_empty() {
            return Err(LedgerError::EmptySplit);
        }
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            amount,
            paid_by: paid_by.to_string(),
            split_among: split,
            created_at: Utc::now(),
        };
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    pub fn remove_expense(&mut self, id: &str) -> Result<(), LedgerError> {
        if !self.expenses.iter().any(|e| e.id == id) {
            return Err(LedgerError::UnknownExpense(id.to_string()));
        }
        self.expenses.retain(|e| e.id != id);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.people.clear();
        self.expenses.clear();
    }
}
