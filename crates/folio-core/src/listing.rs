use crate::feed::FeedError;
use crate::model::RepositorySummary;
use std::future::Future;
use std::pin::Pin;

pub type ListingFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FeedError>> + Send + 'a>>;

/// Source of repository summaries for one account.
///
/// Implementations issue exactly one request per call and never retry. A
/// success body that is not a list resolves to an empty vector.
pub trait RepoListing: Send + Sync {
    fn name(&self) -> &'static str;
    fn list_repositories<'a>(&'a self, identity: &'a str)
    -> ListingFuture<'a, Vec<RepositorySummary>>;
}
