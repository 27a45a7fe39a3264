//! Request handler module
//!
//! Responsible for request routing dispatch: the front-end page on GET and
//! image classification on POST.

pub mod classify;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
