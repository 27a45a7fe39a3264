//! HTTP protocol layer module
//!
//! Body parsing and response building, decoupled from routing decisions.

pub mod multipart;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_error_response, build_file_response, build_options_response, build_scores_response,
};
