//! Figures for the quick stats strip

use crate::budget::BudgetOverview;
use crate::shopping::ShoppingSummary;
use crate::tasks::Task;

/// Headline numbers shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct QuickStats {
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub items_to_buy: i64,
    pub remaining_budget: f64,
}

impl QuickStats {
    pub fn from_parts(tasks: &[Task], shopping: &ShoppingSummary, budget: &BudgetOverview) -> Self {
        Self {
            tasks_completed: tasks.iter().filter(|task| task.completed).count(),
            tasks_total: tasks.len(),
            items_to_buy: shopping.pending_items,
            remaining_budget: budget.remaining_budget,
        }
    }

    /// Share of tasks done, 0 to 100
    pub fn completion_rate(&self) -> f64 {
        if self.tasks_total == 0 {
            0.0
        } else {
            self.tasks_completed as f64 * 100.0 / self.tasks_total as f64
        }
    }
}
