//! Core library components.
//!
//! Everything needed to insert and read secrets without a terminal: the secret
//! format, the insert engine and the collaborators it talks to.

pub mod audit;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod editor;
pub mod input;
pub mod insert;
pub mod keys;
pub mod mutate;
pub mod options;
pub mod prompt;
pub mod recipient;
pub mod store;
pub mod template;
