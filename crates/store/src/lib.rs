use anyhow::Result;
use async_trait::async_trait;

use gh_graphql::types::{
    Issue, IssueComment, Organization, PullRequest, PullRequestReview, PullRequestReviewComment,
    RepositoryFields, UserExtended,
};

pub mod errors;
pub mod stdout;
pub mod versioned;

pub use errors::StoreError;
pub use stdout::StdoutStore;
pub use versioned::{run_migrations, VersionedStore};

/// Persistence contract for one ingestion run. A transaction brackets each
/// top-level entity; `set_version` tags every row written afterwards.
#[async_trait]
pub trait Storer: Send + Sync {
    async fn begin(&self) -> Result<()>;
    async fn commit(&self) -> Result<()>;
    async fn rollback(&self) -> Result<()>;

    fn set_version(&self, version: i32);

    async fn save_organization(&self, organization: &Organization) -> Result<()>;

    async fn save_user(&self, org_id: i64, org_login: &str, user: &UserExtended) -> Result<()>;

    async fn save_repository(&self, repository: &RepositoryFields, topics: &[String])
        -> Result<()>;

    async fn save_issue(
        &self,
        owner: &str,
        name: &str,
        issue: &Issue,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()>;

    async fn save_issue_comment(
        &self,
        owner: &str,
        name: &str,
        issue_number: i64,
        comment: &IssueComment,
    ) -> Result<()>;

    async fn save_pull_request(
        &self,
        owner: &str,
        name: &str,
        pr: &PullRequest,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()>;

    async fn save_pull_request_comment(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        comment: &IssueComment,
    ) -> Result<()>;

    async fn save_pull_request_review(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        review: &PullRequestReview,
    ) -> Result<()>;

    async fn save_pull_request_review_comment(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        review_id: i64,
        comment: &PullRequestReviewComment,
    ) -> Result<()>;

    async fn set_active_version(&self, version: i32) -> Result<()>;

    async fn cleanup(&self, current_version: i32) -> Result<()>;
}
