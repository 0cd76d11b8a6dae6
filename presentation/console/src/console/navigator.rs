use std::sync::atomic::{AtomicBool, Ordering};

use business::domain::product::services::Navigator;

/// Records a request to go back to the list; the session consumes it after
/// each command.
#[derive(Default)]
pub struct ConsoleNavigator {
    requested: AtomicBool,
}

impl ConsoleNavigator {
    pub fn take_request(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

impl Navigator for ConsoleNavigator {
    fn to_list(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_consume_navigation_request_once() {
        let navigator = ConsoleNavigator::default();

        navigator.to_list();

        assert!(navigator.take_request());
        assert!(!navigator.take_request());
    }
}
