//! Clients for the third-party HTTP APIs the domain talks to.

pub mod youtube;
