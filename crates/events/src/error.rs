use core_types::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Notification {0} was not found")]
    NotificationNotFound(RecordId),

    #[error("Notification ids are exhausted")]
    IdsExhausted,
}
