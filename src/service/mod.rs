//! Record service: the layer between the HTTP handlers and the store.

mod record_service;

pub use record_service::RecordService;
