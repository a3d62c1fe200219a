// stepform/src/persistence/mod.rs

//! The persistence boundary: request payloads, the visit store and file uploads.

pub mod payload;
pub mod store;
pub mod upload;

pub use payload::{build_request, prune_form_values, ExistingVisit, VisitContext, VisitData, VisitRequest};
pub use store::{HttpVisitStore, VisitRecord, VisitStore, GENERIC_SAVE_ERROR};
pub use upload::{FileDescriptor, FileUploader, HttpFileUploader, PendingFile};
