use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::logger::Logger;
use crate::domain::product::services::IdVerificationService;
use crate::domain::product::validation::FieldError;
use crate::domain::shared::value_objects::ProductId;

pub const DEFAULT_ID_CHECK_DELAY: Duration = Duration::from_millis(300);

/// Outcome of one availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdCheck {
    Valid,
    Taken,
    /// A newer check was issued before this one finished; drop the result.
    Superseded,
}

impl IdCheck {
    pub fn error(self) -> Option<FieldError> {
        match self {
            IdCheck::Taken => Some(FieldError::IdExists),
            IdCheck::Valid | IdCheck::Superseded => None,
        }
    }
}

/// Debounced uniqueness check for product ids.
///
/// Every check takes a ticket from a shared generation counter. A check whose
/// ticket is no longer the latest, either after the debounce window or after
/// the service answers, reports [`IdCheck::Superseded`].
/// Service failures count as available.
#[derive(Clone)]
pub struct IdAvailabilityValidator {
    service: Arc<dyn IdVerificationService>,
    logger: Arc<dyn Logger>,
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl IdAvailabilityValidator {
    pub fn new(
        service: Arc<dyn IdVerificationService>,
        logger: Arc<dyn Logger>,
        delay: Duration,
    ) -> Self {
        Self {
            service,
            logger,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidates every outstanding check and returns the new ticket.
    pub fn issue(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn cancel(&self) {
        self.issue();
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    pub async fn validate(&self, value: &str) -> IdCheck {
        let ticket = self.issue();
        self.check(ticket, value).await
    }

    /// Runs the check for a ticket obtained from [`Self::issue`].
    pub async fn check(&self, ticket: u64, value: &str) -> IdCheck {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return IdCheck::Valid;
        }

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            self.logger
                .debug(&format!("Id check for '{}' superseded before dispatch", trimmed));
            return IdCheck::Superseded;
        }

        let outcome = match self.service.exists(&ProductId::new(trimmed)).await {
            Ok(true) => IdCheck::Taken,
            Ok(false) => IdCheck::Valid,
            Err(e) => {
                self.logger.warn(&format!(
                    "Id verification failed for '{}', treating as available: {}",
                    trimmed, e
                ));
                IdCheck::Valid
            }
        };

        if !self.is_current(ticket) {
            self.logger
                .debug(&format!("Id check for '{}' superseded after response", trimmed));
            return IdCheck::Superseded;
        }
        outcome
    }
}
