use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PersonId = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: PersonId,
    pub split_among: Vec<PersonId>,
    pub created_at: DateTime<Utc>,
}

/// Net position of one person, derived from the expense list.
/// Positive means the person is owed money, negative means they owe.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Balance {
    pub name: String,
    pub balance: f64,
}

/// A suggested transfer that moves the group's balances toward zero.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}
