//! Printable report action
//!
//! No report renderer is wired in; printing answers with a user-facing
//! notice instead of failing.

use serde::{Deserialize, Serialize};

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Sticky notices stay until dismissed
    pub sticky: bool,
}

impl Notification {
    /// Notice returned by the print action
    pub fn print_not_implemented(reference: &str) -> Self {
        Self {
            title: format!("Print provision {}", reference),
            message: "Printing is not implemented in this package.".to_string(),
            sticky: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_notice_is_not_sticky() {
        let notice = Notification::print_not_implemented("CC/00003");
        assert!(!notice.sticky);
        assert!(notice.title.contains("CC/00003"));

        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["sticky"], false);
    }
}
