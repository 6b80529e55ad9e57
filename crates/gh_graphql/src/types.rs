//! Typed receivers for the GraphQL responses. Nullability mirrors the API
//! schema; the store maps missing values onto the relational defaults.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::connection::Connection;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Oid {
    #[serde(default)]
    pub oid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Issue/PR author, merged-by and closed-by actor. The `User` inline
/// fragment contributes the numeric id; other actor kinds leave it unset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(default)]
    pub login: String,
    #[serde(default, rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub database_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(flatten)]
    pub fields: OrganizationFields,
    pub members_with_role: Connection<UserExtended>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFields {
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub url: String,
    pub database_id: Option<i64>,
    pub login: String,
    pub name: Option<String>,
    pub id: String,
    pub owned_private_repos: TotalCount,
    pub public_repos: TotalCount,
    pub total_private_repos: TotalCount,
    pub updated_at: DateTime<Utc>,
}

/// Organization member with the extended field set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExtended {
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: TotalCount,
    pub following: TotalCount,
    pub is_hireable: bool,
    pub url: String,
    pub database_id: Option<i64>,
    pub location: Option<String>,
    pub login: String,
    pub name: Option<String>,
    pub id: String,
    pub owned_private_repos: TotalCount,
    pub public_repos: TotalCount,
    pub total_private_repos: TotalCount,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(flatten)]
    pub fields: RepositoryFields,
    pub repository_topics: Connection<TopicNode>,
    pub issues: Connection<Issue>,
    pub pull_requests: Connection<PullRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryFields {
    pub merge_commit_allowed: bool,
    pub rebase_merge_allowed: bool,
    pub squash_merge_allowed: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub default_branch_ref: Option<Named>,
    pub description: Option<String>,
    pub is_disabled: bool,
    pub is_fork: bool,
    pub fork_count: i64,
    pub name_with_owner: String,
    pub has_issues_enabled: bool,
    pub has_wiki_enabled: bool,
    pub homepage_url: Option<String>,
    pub url: String,
    pub database_id: Option<i64>,
    pub primary_language: Option<Named>,
    pub name: String,
    pub id: String,
    pub open_issues: TotalCount,
    pub owner: RepositoryOwner,
    pub is_private: bool,
    pub pushed_at: Option<DateTime<Utc>>,
    pub ssh_url: String,
    pub stargazers: TotalCount,
    pub updated_at: DateTime<Utc>,
    pub watchers: TotalCount,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOwner {
    pub login: String,
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub database_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicNode {
    pub topic: Named,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(flatten)]
    pub fields: IssueFields,
    pub assignees: Connection<UserRef>,
    pub labels: Connection<Label>,
    pub comments: Connection<IssueComment>,
    #[serde(default)]
    pub closed_by: ClosedByConnection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    pub body: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub database_id: Option<i64>,
    pub locked: bool,
    pub milestone: Option<Milestone>,
    pub id: String,
    pub number: i64,
    pub state: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<Actor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClosedByConnection {
    #[serde(default)]
    pub nodes: Vec<ClosedEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClosedEvent {
    #[serde(default)]
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueComment {
    #[serde(default)]
    pub author_association: String,
    #[serde(default)]
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub database_id: Option<i64>,
    pub id: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<Actor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    #[serde(flatten)]
    pub fields: PullRequestFields,
    pub assignees: Connection<UserRef>,
    pub labels: Connection<Label>,
    pub comments: Connection<IssueComment>,
    pub reviews: Connection<PullRequestReview>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestFields {
    pub additions: i64,
    #[serde(default)]
    pub author_association: String,
    #[serde(default)]
    pub base_ref: Option<GitRef>,
    pub body: Option<String>,
    pub changed_files: i64,
    pub closed_at: Option<DateTime<Utc>>,
    pub commits: TotalCount,
    pub created_at: DateTime<Utc>,
    pub deletions: i64,
    #[serde(default)]
    pub head_ref: Option<GitRef>,
    pub url: String,
    pub database_id: Option<i64>,
    pub maintainer_can_modify: bool,
    #[serde(default)]
    pub merge_commit: Option<Oid>,
    #[serde(default)]
    pub mergeable: String,
    pub merged: bool,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_by: Option<Actor>,
    pub milestone: Option<Milestone>,
    pub id: String,
    pub number: i64,
    pub review_threads: TotalCount,
    pub state: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<Actor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repository: Option<RefRepository>,
    #[serde(default)]
    pub target: Option<RefTarget>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefRepository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: UserRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefTarget {
    #[serde(default)]
    pub oid: String,
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestReview {
    #[serde(flatten)]
    pub fields: PullRequestReviewFields,
    pub comments: Connection<PullRequestReviewComment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestReviewFields {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub commit: Option<Oid>,
    pub url: String,
    pub database_id: Option<i64>,
    pub id: String,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<Actor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestReviewComment {
    #[serde(default)]
    pub author_association: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub commit: Option<Oid>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub diff_hunk: String,
    pub url: String,
    pub database_id: Option<i64>,
    pub id: String,
    #[serde(default)]
    pub original_commit: Option<Oid>,
    #[serde(default)]
    pub original_position: Option<i64>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub position: Option<i64>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<Actor>,
}
