//! Utility modules.

pub mod form_lock;
