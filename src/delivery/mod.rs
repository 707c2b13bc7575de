//! Raw and attachment delivery of file bytes.
//!
//! - **Raw** hands the file to `tower_http`'s static file service, which takes
//!   care of content type guessing, conditional requests and byte ranges.
//!   Embedded viewers (PDF, media) use this mode.
//! - **Attachment** streams the file with an explicit `Content-Type` and a
//!   `Content-Disposition: attachment` header so browsers save it.

mod service;

pub use service::{
    attachment_content_type, content_disposition, DeliveryMode, DeliveryService,
    DEFAULT_CONTENT_TYPE,
};
