use anyhow::Result;
use async_trait::async_trait;

use gh_graphql::types::{
    Issue, IssueComment, Organization, PullRequest, PullRequestReview, PullRequestReviewComment,
    RepositoryFields, UserExtended,
};

use crate::Storer;

/// Printing store for runs without a database: every save writes one
/// human-readable line, the lifecycle calls are no-ops.
#[derive(Debug, Default)]
pub struct StdoutStore;

impl StdoutStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storer for StdoutStore {
    async fn begin(&self) -> Result<()> {
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        Ok(())
    }

    fn set_version(&self, _version: i32) {}

    async fn save_organization(&self, organization: &Organization) -> Result<()> {
        println!("organization data fetched for {}", organization.fields.login);
        Ok(())
    }

    async fn save_user(&self, _org_id: i64, _org_login: &str, user: &UserExtended) -> Result<()> {
        println!("user data fetched for {}", user.login);
        Ok(())
    }

    async fn save_repository(
        &self,
        repository: &RepositoryFields,
        _topics: &[String],
    ) -> Result<()> {
        println!(
            "repository data fetched for {}/{}",
            repository.owner.login, repository.name
        );
        Ok(())
    }

    async fn save_issue(
        &self,
        _owner: &str,
        _name: &str,
        issue: &Issue,
        _assignees: &[String],
        _labels: &[String],
    ) -> Result<()> {
        println!(
            "issue data fetched for #{} {}",
            issue.fields.number, issue.fields.title
        );
        Ok(())
    }

    async fn save_issue_comment(
        &self,
        _owner: &str,
        _name: &str,
        _issue_number: i64,
        comment: &IssueComment,
    ) -> Result<()> {
        println!(
            "  issue comment data fetched by {} at {}: {:?}",
            author(&comment.author),
            comment.created_at,
            trim(&comment.body)
        );
        Ok(())
    }

    async fn save_pull_request(
        &self,
        _owner: &str,
        _name: &str,
        pr: &PullRequest,
        _assignees: &[String],
        _labels: &[String],
    ) -> Result<()> {
        println!("PR data fetched for #{} {}", pr.fields.number, pr.fields.title);
        Ok(())
    }

    async fn save_pull_request_comment(
        &self,
        _owner: &str,
        _name: &str,
        _pr_number: i64,
        comment: &IssueComment,
    ) -> Result<()> {
        println!(
            "  pr comment data fetched by {} at {}: {:?}",
            author(&comment.author),
            comment.created_at,
            trim(&comment.body)
        );
        Ok(())
    }

    async fn save_pull_request_review(
        &self,
        _owner: &str,
        _name: &str,
        _pr_number: i64,
        review: &PullRequestReview,
    ) -> Result<()> {
        println!(
            "  PR review data fetched by {}: {:?}",
            author(&review.fields.author),
            trim(&review.fields.body)
        );
        Ok(())
    }

    async fn save_pull_request_review_comment(
        &self,
        _owner: &str,
        _name: &str,
        _pr_number: i64,
        _review_id: i64,
        comment: &PullRequestReviewComment,
    ) -> Result<()> {
        println!(
            "    PR review comment data fetched by {} at {}: {:?}",
            author(&comment.author),
            comment.created_at,
            trim(&comment.body)
        );
        Ok(())
    }

    async fn set_active_version(&self, _version: i32) -> Result<()> {
        Ok(())
    }

    async fn cleanup(&self, _current_version: i32) -> Result<()> {
        Ok(())
    }
}

fn author(actor: &Option<gh_graphql::types::Actor>) -> &str {
    actor.as_ref().map(|a| a.login.as_str()).unwrap_or("ghost")
}

fn trim(body: &str) -> String {
    if body.chars().count() > 40 {
        let head: String = body.chars().take(39).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::trim;

    #[test]
    fn long_bodies_are_trimmed() {
        let body = "x".repeat(80);
        let trimmed = trim(&body);
        assert_eq!(trimmed.chars().count(), 42);
        assert!(trimmed.ends_with("..."));
    }

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(trim("hello"), "hello");
    }
}
