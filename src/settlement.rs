use std::collections::BTreeMap;

use crate::schemas::{Balance, PersonId, Settlement};

/// Amounts within a cent of zero count as settled. This also absorbs the
/// floating-point noise left over from dividing expenses into shares.
const EPSILON: f64 = 0.01;

#[derive(Clone, Debug)]
struct OpenAmount {
    name: String,
    amount: f64,
}

/// Produces transfer instructions that clear all balances, pairing the
/// largest debtor with the largest creditor first.
///
/// Greedy, not proven transaction-minimal; it emits at most
/// `debtors + creditors - 1` transfers, which is good enough for a
/// settle-up suggestion. Relies on the balances summing to zero, which
/// `compute_balances` guarantees. If a caller hands in balances that
/// don't, the walk simply stops once one side runs out and returns the
/// transfers produced so far.
pub fn compute_settlements(balances: &BTreeMap<PersonId, Balance>) -> Vec<Settlement> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for entry in balances.values() {
        let open = OpenAmount {
            name: entry.name.clone(),
            amount: entry.balance.abs(),
        };
        if entry.balance < -EPSILON {
            debtors.push(open);
        } else if entry.balance > EPSILON {
            creditors.push(open);
        }
    }

    // Stable sort keeps id order on ties, so the output is reproducible.
    debtors.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    creditors.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let mut settlements = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let transfer = debtors[i].amount.min(creditors[j].amount);

        settlements.push(Settlement {
            from: debtors[i].name.clone(),
            to: creditors[j].name.clone(),
            amount: transfer,
        });

        debtors[i].amount -= transfer;
        creditors[j].amount -= transfer;

        if debtors[i].amount < EPSILON {
            i += 1;
        }
        if creditors[j].amount < EPSILON {
            j += 1;
        }
    }

    settlements
}
