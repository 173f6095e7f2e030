pub mod attachments;
pub mod compose;
pub mod mime;
pub mod mime_types;
pub mod request;
pub mod sources;
pub mod thread;
