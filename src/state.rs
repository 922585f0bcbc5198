use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::messaging::MessagingProvider;
use crate::services::salon::Salon;

pub struct AppState {
    pub salon: Mutex<Salon>,
    pub config: AppConfig,
    pub messaging: Box<dyn MessagingProvider>,
}

impl AppState {
    pub fn salon(&self) -> Result<MutexGuard<'_, Salon>, AppError> {
        self.salon
            .lock()
            .map_err(|_| AppError::Internal("salon state lock poisoned".to_string()))
    }
}
