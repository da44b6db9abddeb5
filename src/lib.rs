//! LangLeo backend: multilingual chat with AI replies and a translation
//! fallback chain.
//!
//! The pipeline lives in [`chat`]: a turn prefers a direct same-language
//! reply from the provider ([`mistral`]); when that fails, the failure is
//! classified and a canonical English apology is translated best-effort
//! ([`translation`]) into the requested language. Turns are persisted as
//! ordered pairs in the conversation log ([`db`]) and exposed over a small
//! REST surface ([`server`]).

pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod languages;
pub mod mistral;
pub mod retry;
pub mod security;
pub mod server;
pub mod translation;
