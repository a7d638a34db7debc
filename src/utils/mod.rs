//! Request extraction helpers shared by the handlers.

pub mod nullable;
pub mod validate;
