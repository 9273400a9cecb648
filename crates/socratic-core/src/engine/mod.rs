// ── Socratic Engine ────────────────────────────────────────────────────────
// The engine organism: subject catalog, auth gate, hosted-service clients,
// session provisioning, reply providers, and the chat session that ties them
// together. The CLI is a thin layer over these modules.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod invites;
pub mod providers;
pub mod sensay;
pub mod session;
