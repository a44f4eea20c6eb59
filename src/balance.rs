use std::collections::BTreeMap;

use crate::schemas::{Balance, Expense, Person, PersonId};

/// Reduces the expense list into a net balance per person.
///
/// Every person starts at zero. Each expense credits its full amount to
/// the payer and debits an equal share from every member of the split
/// set. References to ids missing from `people` are skipped rather than
/// treated as errors, so a stale expense can never make this fail.
///
/// The result is keyed by person id in a `BTreeMap` so iteration order,
/// and therefore the settlement output downstream, is deterministic.
pub fn compute_balances(people: &[Person], expenses: &[Expense]) -> BTreeMap<PersonId, Balance> {
    let mut balances: BTreeMap<PersonId, Balance> = people
        .iter()
        .map(|person| {
            (
                person.id.clone(),
                Balance {
                    name: person.name.clone(),
                    balance: 0.0,
                },
            )
        })
        .collect();

    for expense in expenses {
        // The ledger rejects empty split sets, but this function has to
        // stay total over whatever the caller hands it.
        if expense.split_among.is_empty() {
            continue;
        }
        let share = expense.amount / expense.split_among.len() as f64;

        if let Some(payer) = balances.get_mut(&expense.paid_by) {
            payer.balance += expense.amount;
        }
        for member in &expense.split_among {
            if let Some(entry) = balances.get_mut(member) {
                entry.balance -= share;
            }
        }
    }

    balances
}
