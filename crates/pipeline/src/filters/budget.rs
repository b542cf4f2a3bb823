//! Budget range filters.
//!
//! Budgets are compared as floats. A record whose budget is missing or not a
//! number is `NaN`, and every comparison with `NaN` is false, so such records
//! never survive an active bound. A non-numeric bound behaves the same way
//! and removes every record.

use crate::traits::Filter;
use anyhow::Result;
use records::ListRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetBound {
    /// Keep records with budget >= the value.
    Min(f64),
    /// Keep records with budget <= the value.
    Max(f64),
}

pub struct BudgetFilter {
    bound: BudgetBound,
}

impl BudgetFilter {
    pub fn new(bound: BudgetBound) -> Self {
        Self { bound }
    }

    fn keeps(&self, budget: f64) -> bool {
        match self.bound {
            BudgetBound::Min(min) => budget >= min,
            BudgetBound::Max(max) => budget <= max,
        }
    }
}

impl Filter for BudgetFilter {
    fn name(&self) -> &str {
        match self.bound {
            BudgetBound::Min(_) => "BudgetMinFilter",
            BudgetBound::Max(_) => "BudgetMaxFilter",
        }
    }

    fn apply(&self, records: Vec<ListRecord>) -> Result<Vec<ListRecord>> {
        let filtered: Vec<ListRecord> = records
            .into_iter()
            .filter(|record| self.keeps(record.budget_value()))
            .collect();

        Ok(filtered)
    }
}
