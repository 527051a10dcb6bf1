//! Output formatting
//!
//! - **trace**: the simulator flow file
//! - **text**: console configuration and summary
//! - **json**: machine-readable run summary

pub mod json;
pub mod text;
pub mod trace;
