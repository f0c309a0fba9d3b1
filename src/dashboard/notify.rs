//! User-facing notifications

use log::{info, warn};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A message for the user, shown as a toast by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: &str) -> Self {
        Self {
            level: Level::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: Level::Error,
            message: message.to_string(),
        }
    }
}

/// Receives the outcome of every write
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => info!("{}", notification.message),
            Level::Error => warn!("{}", notification.message),
        }
    }
}

/// Messages shown after one kind of write
#[derive(Debug, Clone, Copy)]
pub(crate) struct Outcome {
    pub success: Option<&'static str>,
    pub failure: &'static str,
}

pub(crate) const CREATE_TASK: Outcome = Outcome {
    success: Some("Task created"),
    failure: "Could not create the task",
};
pub(crate) const UPDATE_TASK: Outcome = Outcome {
    success: Some("Task updated"),
    failure: "Could not update the task",
};
pub(crate) const TOGGLE_TASK: Outcome = Outcome {
    success: None,
    failure: "Could not change the task",
};
pub(crate) const DELETE_TASK: Outcome = Outcome {
    success: Some("Task deleted"),
    failure: "Could not delete the task",
};

pub(crate) const CREATE_ITEM: Outcome = Outcome {
    success: Some("Item added to the list"),
    failure: "Could not add the item",
};
pub(crate) const UPDATE_ITEM: Outcome = Outcome {
    success: Some("Item updated"),
    failure: "Could not update the item",
};
pub(crate) const TOGGLE_ITEM: Outcome = Outcome {
    success: None,
    failure: "Could not change the item",
};
pub(crate) const DELETE_ITEM: Outcome = Outcome {
    success: Some("Item removed"),
    failure: "Could not remove the item",
};

pub(crate) const CREATE_CATEGORY: Outcome = Outcome {
    success: Some("Category created"),
    failure: "Could not create the category",
};
pub(crate) const UPDATE_CATEGORY: Outcome = Outcome {
    success: Some("Category updated"),
    failure: "Could not update the category",
};
pub(crate) const DELETE_CATEGORY: Outcome = Outcome {
    success: Some("Category deleted"),
    failure: "Could not delete the category",
};
pub(crate) const CREATE_TRANSACTION: Outcome = Outcome {
    success: Some("Transaction added"),
    failure: "Could not add the transaction",
};
pub(crate) const UPDATE_TRANSACTION: Outcome = Outcome {
    success: Some("Transaction updated"),
    failure: "Could not update the transaction",
};
pub(crate) const DELETE_TRANSACTION: Outcome = Outcome {
    success: Some("Transaction deleted"),
    failure: "Could not delete the transaction",
};

pub(crate) const UPDATE_PROFILE: Outcome = Outcome {
    success: Some("Profile updated"),
    failure: "Could not update the profile",
};
