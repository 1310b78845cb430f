//! GitHub API integration module.
//!
//! Implements the review thread operations against GitHub's REST and
//! GraphQL APIs, authenticated by a token or as a GitHub App installation.

mod auth;
mod client;

pub use client::GitHubClient;
