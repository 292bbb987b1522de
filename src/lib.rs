#![doc = "The `taskmate` library crate."]
#![doc = ""]
#![doc = "This crate contains the authentication core (password hashing, token issuance"]
#![doc = "and verification, revocation, identity resolution), the account directory,"]
#![doc = "domain models, routing configuration, and error handling for the Taskmate"]
#![doc = "application. It is used by the main binary (`main.rs`) to construct and run"]
#![doc = "the server."]

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod routes;
