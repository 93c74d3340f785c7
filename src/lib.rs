//! Session-backed language selection for server-rendered apps.
//!
//! A visitor picks a language (`POST /language`), the choice is kept in their
//! session, and every later request resolves an effective locale from it and
//! ships the matching translation table to the client.

pub mod config;
pub mod handlers;
pub mod i18n;
pub mod locale;
pub mod preference;
pub mod server;
pub mod session;
pub mod view;
