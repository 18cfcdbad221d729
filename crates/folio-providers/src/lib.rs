pub mod github;
pub mod github_models;
pub mod http;
pub mod spec;

pub use github::GitHubListing;
