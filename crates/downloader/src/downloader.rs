use std::sync::Arc;

use anyhow::{Context, Result};
use futures::FutureExt;
use serde_json::json;
use tracing::{info, warn};

use gh_graphql::types::{
    Issue, Label, Organization, PullRequest, PullRequestReview, Repository, TopicNode, UserRef,
};
use gh_graphql::{collect_nodes, desc, paginate, queries, GraphqlClient};
use store::Storer;

use crate::api;

/// Fetches GitHub metadata through the v4 API and hands every record to the
/// storer inside one transaction per top-level entity.
pub struct Downloader {
    client: GraphqlClient,
    storer: Arc<dyn Storer>,
}

impl Downloader {
    pub fn new(client: GraphqlClient, storer: Arc<dyn Storer>) -> Self {
        Self { client, storer }
    }

    /// Downloads the metadata for the given repository and all its resources
    /// (topics, issues, PRs, comments, reviews).
    pub async fn download_repository(&self, owner: &str, name: &str, version: i32) -> Result<()> {
        info!(owner, repo = name, "start downloading repository");

        self.storer.set_version(version);
        self.storer
            .begin()
            .await
            .context("could not begin transaction")?;

        match self.download_repository_tx(owner, name).await {
            Ok(()) => self
                .storer
                .commit()
                .await
                .context("could not commit transaction"),
            Err(err) => {
                if let Err(rollback_err) = self.storer.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn download_repository_tx(&self, owner: &str, name: &str) -> Result<()> {
        // Page and cursor variables are shared between issues and pull
        // requests; that is fine here because every cursor starts out null
        // and later pages re-request only one connection at a time.
        let variables = json!({
            "owner": owner,
            "name": name,

            "repositoryTopicsPage": desc::REPOSITORY_TOPICS.first,
            "issuesPage": desc::ISSUES.first,
            "pullRequestsPage": desc::PULL_REQUESTS.first,
            "assigneesPage": desc::ISSUE_ASSIGNEES.first,
            "labelsPage": desc::ISSUE_LABELS.first,
            "issueCommentsPage": desc::ISSUE_COMMENTS.first,
            "pullRequestReviewsPage": desc::PULL_REQUEST_REVIEWS.first,
            "pullRequestReviewCommentsPage": desc::PULL_REQUEST_REVIEW_COMMENTS.first,

            "repositoryTopicsCursor": null,
            "issuesCursor": null,
            "pullRequestsCursor": null,
            "assigneesCursor": null,
            "labelsCursor": null,
            "issueCommentsCursor": null,
            "pullRequestReviewsCursor": null,
            "pullRequestReviewCommentsCursor": null,
        });

        let repository: Repository = self
            .client
            .query(queries::REPOSITORY.as_str(), variables, &["repository"])
            .await
            .context("first query failed")?;

        let topics = self.download_topics(&repository).await?;
        self.storer
            .save_repository(&repository.fields, &topics)
            .await
            .with_context(|| {
                format!(
                    "failed to save repository {}",
                    repository.fields.name_with_owner
                )
            })?;

        self.download_issues(owner, name, &repository).await?;
        self.download_pull_requests(owner, name, &repository).await?;

        Ok(())
    }

    async fn download_topics(&self, repository: &Repository) -> Result<Vec<String>> {
        info!("start downloading topics");
        let names = collect_nodes(
            &self.client,
            &desc::REPOSITORY_TOPICS,
            repository.repository_topics.clone(),
            json!({ "id": repository.fields.id }),
            |node: &TopicNode| node.topic.name.clone(),
        )
        .await?;
        info!("finished downloading topics");
        Ok(names)
    }

    async fn download_issues(&self, owner: &str, name: &str, repository: &Repository) -> Result<()> {
        let vars = json!({
            "id": repository.fields.id,

            "assigneesPage": desc::ISSUE_ASSIGNEES.first,
            "labelsPage": desc::ISSUE_LABELS.first,
            "issueCommentsPage": desc::ISSUE_COMMENTS.first,

            "assigneesCursor": null,
            "labelsCursor": null,
            "issueCommentsCursor": null,
        });

        paginate(
            &self.client,
            &desc::ISSUES,
            repository.issues.clone(),
            vars,
            move |page| {
                async move {
                    for issue in &page.nodes {
                        self.process_issue(owner, name, issue).await.with_context(|| {
                            format!(
                                "failed to process issue {}/{} #{}",
                                owner, name, issue.fields.number
                            )
                        })?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| format!("failed to query issues for repository {owner}/{name}"))
    }

    async fn process_issue(&self, owner: &str, name: &str, issue: &Issue) -> Result<()> {
        let assignees = collect_nodes(
            &self.client,
            &desc::ISSUE_ASSIGNEES,
            issue.assignees.clone(),
            json!({ "id": issue.fields.id }),
            |node: &UserRef| node.login.clone(),
        )
        .await
        .with_context(|| {
            format!(
                "failed to query issue assignees for issue #{}",
                issue.fields.number
            )
        })?;

        let labels = collect_nodes(
            &self.client,
            &desc::ISSUE_LABELS,
            issue.labels.clone(),
            json!({ "id": issue.fields.id }),
            |node: &Label| node.name.clone(),
        )
        .await
        .with_context(|| {
            format!(
                "failed to query issue labels for issue #{}",
                issue.fields.number
            )
        })?;

        self.storer
            .save_issue(owner, name, issue, &assignees, &labels)
            .await?;

        self.download_issue_comments(owner, name, issue).await
    }

    async fn download_issue_comments(&self, owner: &str, name: &str, issue: &Issue) -> Result<()> {
        paginate(
            &self.client,
            &desc::ISSUE_COMMENTS,
            issue.comments.clone(),
            json!({ "id": issue.fields.id }),
            move |page| {
                async move {
                    for comment in &page.nodes {
                        self.storer
                            .save_issue_comment(owner, name, issue.fields.number, comment)
                            .await
                            .with_context(|| {
                                format!(
                                    "failed to save issue comment for issue #{}",
                                    issue.fields.number
                                )
                            })?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| {
            format!(
                "failed to query issue comments for issue #{}",
                issue.fields.number
            )
        })
    }

    async fn download_pull_requests(
        &self,
        owner: &str,
        name: &str,
        repository: &Repository,
    ) -> Result<()> {
        let vars = json!({
            "id": repository.fields.id,

            "assigneesPage": desc::PULL_REQUEST_ASSIGNEES.first,
            "labelsPage": desc::PULL_REQUEST_LABELS.first,
            "issueCommentsPage": desc::PULL_REQUEST_COMMENTS.first,
            "pullRequestReviewsPage": desc::PULL_REQUEST_REVIEWS.first,
            "pullRequestReviewCommentsPage": desc::PULL_REQUEST_REVIEW_COMMENTS.first,

            "assigneesCursor": null,
            "labelsCursor": null,
            "issueCommentsCursor": null,
            "pullRequestReviewsCursor": null,
            "pullRequestReviewCommentsCursor": null,
        });

        paginate(
            &self.client,
            &desc::PULL_REQUESTS,
            repository.pull_requests.clone(),
            vars,
            move |page| {
                async move {
                    for pr in &page.nodes {
                        self.process_pull_request(owner, name, pr).await.with_context(
                            || {
                                format!(
                                    "failed to process PR {}/{} #{}",
                                    owner, name, pr.fields.number
                                )
                            },
                        )?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| format!("failed to query PRs for repository {owner}/{name}"))
    }

    async fn process_pull_request(&self, owner: &str, name: &str, pr: &PullRequest) -> Result<()> {
        let assignees = collect_nodes(
            &self.client,
            &desc::PULL_REQUEST_ASSIGNEES,
            pr.assignees.clone(),
            json!({ "id": pr.fields.id }),
            |node: &UserRef| node.login.clone(),
        )
        .await
        .with_context(|| format!("failed to query PR assignees for PR #{}", pr.fields.number))?;

        let labels = collect_nodes(
            &self.client,
            &desc::PULL_REQUEST_LABELS,
            pr.labels.clone(),
            json!({ "id": pr.fields.id }),
            |node: &Label| node.name.clone(),
        )
        .await
        .with_context(|| format!("failed to query PR labels for PR #{}", pr.fields.number))?;

        self.storer
            .save_pull_request(owner, name, pr, &assignees, &labels)
            .await?;

        self.download_pull_request_comments(owner, name, pr).await?;
        self.download_pull_request_reviews(owner, name, pr).await?;

        Ok(())
    }

    async fn download_pull_request_comments(
        &self,
        owner: &str,
        name: &str,
        pr: &PullRequest,
    ) -> Result<()> {
        paginate(
            &self.client,
            &desc::PULL_REQUEST_COMMENTS,
            pr.comments.clone(),
            json!({ "id": pr.fields.id }),
            move |page| {
                async move {
                    for comment in &page.nodes {
                        self.storer
                            .save_pull_request_comment(owner, name, pr.fields.number, comment)
                            .await
                            .with_context(|| {
                                format!(
                                    "failed to save PR comment for PR #{}",
                                    pr.fields.number
                                )
                            })?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| format!("failed to query PR comments for PR #{}", pr.fields.number))
    }

    async fn download_pull_request_reviews(
        &self,
        owner: &str,
        name: &str,
        pr: &PullRequest,
    ) -> Result<()> {
        let vars = json!({
            "id": pr.fields.id,

            "pullRequestReviewCommentsPage": desc::PULL_REQUEST_REVIEW_COMMENTS.first,
            "pullRequestReviewCommentsCursor": null,
        });

        paginate(
            &self.client,
            &desc::PULL_REQUEST_REVIEWS,
            pr.reviews.clone(),
            vars,
            move |page| {
                async move {
                    for review in &page.nodes {
                        self.storer
                            .save_pull_request_review(owner, name, pr.fields.number, review)
                            .await
                            .with_context(|| {
                                format!(
                                    "failed to save PR review for PR #{}",
                                    pr.fields.number
                                )
                            })?;
                        self.download_review_comments(owner, name, pr.fields.number, review)
                            .await?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| format!("failed to query PR reviews for PR #{}", pr.fields.number))
    }

    async fn download_review_comments(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        review: &PullRequestReview,
    ) -> Result<()> {
        let review_id = review.fields.database_id.unwrap_or_default();

        paginate(
            &self.client,
            &desc::PULL_REQUEST_REVIEW_COMMENTS,
            review.comments.clone(),
            json!({ "id": review.fields.id }),
            move |page| {
                async move {
                    for comment in &page.nodes {
                        self.storer
                            .save_pull_request_review_comment(
                                owner, name, pr_number, review_id, comment,
                            )
                            .await
                            .with_context(|| {
                                format!(
                                    "failed to save PR review comment for PR #{pr_number}, review {review_id}"
                                )
                            })?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| {
            format!("failed to query PR review comments for PR #{pr_number}, review {review_id}")
        })
    }

    /// Downloads the metadata for the given organization and its members.
    pub async fn download_organization(&self, name: &str, version: i32) -> Result<()> {
        info!(org = name, "start downloading organization");

        self.storer.set_version(version);
        self.storer
            .begin()
            .await
            .context("could not begin transaction")?;

        match self.download_organization_tx(name).await {
            Ok(()) => self
                .storer
                .commit()
                .await
                .context("could not commit transaction"),
            Err(err) => {
                if let Err(rollback_err) = self.storer.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn download_organization_tx(&self, name: &str) -> Result<()> {
        let variables = json!({
            "organizationLogin": name,
            "membersWithRolePage": desc::ORGANIZATION_MEMBERS.first,
            "membersWithRoleCursor": null,
        });

        let organization: Organization = self
            .client
            .query(queries::ORGANIZATION.as_str(), variables, &["organization"])
            .await
            .context("organization query failed")?;

        self.storer
            .save_organization(&organization)
            .await
            .with_context(|| format!("failed to save organization {name}"))?;

        self.download_users(name, &organization).await
    }

    async fn download_users(&self, name: &str, organization: &Organization) -> Result<()> {
        let org_id = organization.fields.database_id.unwrap_or_default();
        let org_login = organization.fields.login.as_str();

        paginate(
            &self.client,
            &desc::ORGANIZATION_MEMBERS,
            organization.members_with_role.clone(),
            json!({ "organizationLogin": name }),
            move |page| {
                async move {
                    for user in &page.nodes {
                        self.storer
                            .save_user(org_id, org_login, user)
                            .await
                            .with_context(|| format!("failed to process user {}", user.login))?;
                    }
                    Ok(())
                }
                .boxed()
            },
        )
        .await
        .with_context(|| format!("failed to query organization members for {name}"))
    }

    /// Names of the organization's repositories, optionally skipping forks.
    pub async fn list_repositories(&self, login: &str, no_forks: bool) -> Result<Vec<String>> {
        api::list_repositories(&self.client, login, no_forks).await
    }

    /// Remaining rate limit for the v4 API.
    pub async fn rate_remaining(&self) -> Result<i64> {
        self.client
            .rate_remaining()
            .await
            .context("failed to query remaining rate limit")
    }

    /// Exposes the given version as the current one through the canonical
    /// views.
    pub async fn set_current(&self, version: i32) -> Result<()> {
        self.storer
            .set_active_version(version)
            .await
            .with_context(|| format!("failed to set current DB version to {version}"))
    }

    /// Deletes every record that does not belong to the current version.
    pub async fn cleanup(&self, current_version: i32) -> Result<()> {
        self.storer
            .cleanup(current_version)
            .await
            .with_context(|| format!("failed to do cleanup for DB version {current_version}"))
    }
}
