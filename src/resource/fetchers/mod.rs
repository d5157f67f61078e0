//! Resource fetcher implementations

pub mod github;

pub use github::GitHubResourceFetcher;
