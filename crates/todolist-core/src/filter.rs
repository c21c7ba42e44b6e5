//! Derivation of the visible task list and the category picker.
//!
//! Everything here is pure: callers re-run it whenever the task cache or the
//! filter selection changes.

use std::fmt;

use crate::task::Task;

/// Category filter value that matches every task.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub const ALL: &[StatusFilter] = &[
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::Pending => "Pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            "completed" => Some(StatusFilter::Completed),
            "pending" => Some(StatusFilter::Pending),
            _ => None,
        }
    }

    /// Next entry in picker order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a picker value; `"all"` selects every category.
    pub fn from_str(s: &str) -> Self {
        if s == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Named(name) => name,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => task.category == *name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"all"` followed by each distinct category in first-occurrence order.
pub fn derive_categories(tasks: &[Task]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for task in tasks {
        if !categories.iter().any(|c| *c == task.category) {
            categories.push(task.category.clone());
        }
    }
    categories
}

/// Tasks matching both filters, in cache order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    category: &CategoryFilter,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| status.matches(task) && category.matches(task))
        .collect()
}
