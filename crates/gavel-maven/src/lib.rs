//! Maven repository protocol: POM parsing, repository layout, transport,
//! authentication, and the descriptor fetcher the resolver drives.

pub mod auth;
pub mod download;
pub mod fetch;
pub mod pom;
pub mod repository;
