//! Navigation requests handed to the page host.

use crate::activation::Destination;
use crate::error::Result;
use serde::Serialize;

/// A single navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    pub destination: Destination,
    /// Every page except the main page offers a way home.
    pub show_home_button: bool,
    /// Clear the back stack before navigating.
    pub replace_stack: bool,
}

impl NavigationRequest {
    pub fn new(destination: Destination, replace_stack: bool) -> Self {
        Self {
            destination,
            show_home_button: destination != Destination::Main,
            replace_stack,
        }
    }

    /// Force the home button on, e.g. for links opened from outside the app.
    pub fn with_home_button(mut self) -> Self {
        self.show_home_button = true;
        self
    }
}

/// Page host that performs navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, request: &NavigationRequest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_button_off_on_main() {
        assert!(!NavigationRequest::new(Destination::Main, true).show_home_button);
        assert!(NavigationRequest::new(Destination::Search, false).show_home_button);
    }

    #[test]
    fn test_forced_home_button_on_main() {
        let request = NavigationRequest::new(Destination::Main, true).with_home_button();
        assert!(request.show_home_button);
        assert_eq!(request.destination, Destination::Main);
    }
}
