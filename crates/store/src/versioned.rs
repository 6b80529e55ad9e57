use std::sync::atomic::{AtomicI32, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use gh_graphql::types::{
    Actor, GitRef, Issue, IssueComment, Milestone, Organization, PullRequest, PullRequestReview,
    PullRequestReviewComment, RepositoryFields, RepositoryOwner, UserExtended,
};

use crate::errors::StoreError;
use crate::Storer;

const ORGANIZATIONS_COLS: &str = "avatar_url, collaborators, created_at, description, email, htmlurl, id, login, name, node_id, owned_private_repos, public_repos, total_private_repos, updated_at";
const USERS_COLS: &str = "avatar_url, bio, company, created_at, email, followers, following, hireable, htmlurl, id, location, login, name, node_id, organization_id, organization_login, owned_private_repos, public_repos, total_private_repos, updated_at";
const REPOSITORIES_COLS: &str = "allow_merge_commit, allow_rebase_merge, allow_squash_merge, archived, created_at, default_branch, description, disabled, fork, forks_count, full_name, has_issues, has_wiki, homepage, htmlurl, id, language, name, node_id, open_issues_count, owner_id, owner_login, owner_type, private, pushed_at, sshurl, stargazers_count, topics, updated_at, watchers_count";
const ISSUES_COLS: &str = "assignees, body, closed_at, closed_by_id, closed_by_login, comments, created_at, htmlurl, id, labels, locked, milestone_id, milestone_title, node_id, number, repository_name, repository_owner, state, title, updated_at, user_id, user_login";
const ISSUE_COMMENTS_COLS: &str = "author_association, body, created_at, htmlurl, id, issue_number, node_id, repository_name, repository_owner, updated_at, user_id, user_login";
const PULL_REQUESTS_COLS: &str = "additions, assignees, author_association, base_ref, base_repository_name, base_repository_owner, base_sha, base_user, body, changed_files, closed_at, comments, commits, created_at, deletions, head_ref, head_repository_name, head_repository_owner, head_sha, head_user, htmlurl, id, labels, maintainer_can_modify, merge_commit_sha, mergeable, merged, merged_at, merged_by_id, merged_by_login, milestone_id, milestone_title, node_id, number, repository_name, repository_owner, review_comments, state, title, updated_at, user_id, user_login";
const PULL_REQUEST_REVIEWS_COLS: &str = "body, commit_id, htmlurl, id, node_id, pull_request_number, repository_name, repository_owner, state, submitted_at, user_id, user_login";
const PULL_REQUEST_COMMENTS_COLS: &str = "author_association, body, commit_id, created_at, diff_hunk, htmlurl, id, in_reply_to, node_id, original_commit_id, original_position, path, position, pull_request_number, pull_request_review_id, repository_name, repository_owner, updated_at, user_id, user_login";

const TABLES: [&str; 8] = [
    "organizations_versioned",
    "users_versioned",
    "repositories_versioned",
    "issues_versioned",
    "issue_comments_versioned",
    "pull_requests_versioned",
    "pull_request_reviews_versioned",
    "pull_request_comments_versioned",
];

const VIEWS: [(&str, &str); 8] = [
    ("organizations", ORGANIZATIONS_COLS),
    ("users", USERS_COLS),
    ("repositories", REPOSITORIES_COLS),
    ("issues", ISSUES_COLS),
    ("issue_comments", ISSUE_COMMENTS_COLS),
    ("pull_requests", PULL_REQUESTS_COLS),
    ("pull_request_reviews", PULL_REQUEST_REVIEWS_COLS),
    ("pull_request_comments", PULL_REQUEST_COMMENTS_COLS),
];

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(StoreError::Migration)?;
    Ok(())
}

/// Content-addressed versioned store. Every row is keyed by a SHA-256 over a
/// stable serialization of the record; re-saving an unchanged record extends
/// the existing row's `versions` set instead of writing a new row.
pub struct VersionedStore {
    pool: PgPool,
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
    version: AtomicI32,
}

impl VersionedStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::query("connect", e))?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
            version: AtomicI32::new(0),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn version(&self) -> i32 {
        self.version.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storer for VersionedStore {
    async fn begin(&self) -> Result<()> {
        let mut guard = self.tx.lock().await;
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::query("begin", e))?;
        *guard = Some(tx);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or(StoreError::NoTransaction)?;
        tx.commit()
            .await
            .map_err(|e| StoreError::query("commit", e))?;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or(StoreError::NoTransaction)?;
        tx.rollback()
            .await
            .map_err(|e| StoreError::query("rollback", e))?;
        Ok(())
    }

    fn set_version(&self, version: i32) {
        self.version.store(version, Ordering::SeqCst);
    }

    async fn save_organization(&self, organization: &Organization) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO organizations_versioned (sum256, versions, {ORGANIZATIONS_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(organizations_versioned.versions, $17) \
             WHERE NOT organizations_versioned.versions @> ARRAY[$17]"
        );

        let sum = sum256(&format!("{organization:?}"));
        let fields = &organization.fields;

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(fields.avatar_url.clone())
            .bind(organization.members_with_role.total_count)
            .bind(fields.created_at)
            .bind(fields.description.clone())
            .bind(fields.email.clone())
            .bind(fields.url.clone())
            .bind(fields.database_id.unwrap_or_default())
            .bind(fields.login.clone())
            .bind(fields.name.clone())
            .bind(fields.id.clone())
            .bind(fields.owned_private_repos.total_count)
            .bind(fields.public_repos.total_count)
            .bind(fields.total_private_repos.total_count)
            .bind(fields.updated_at)
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_organization", e))?;
        Ok(())
    }

    async fn save_user(&self, org_id: i64, org_login: &str, user: &UserExtended) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO users_versioned (sum256, versions, {USERS_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(users_versioned.versions, $23) \
             WHERE NOT users_versioned.versions @> ARRAY[$23]"
        );

        let sum = sum256(&format!("{org_id} {org_login} {user:?}"));

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(user.avatar_url.clone())
            .bind(user.bio.clone())
            .bind(user.company.clone())
            .bind(user.created_at)
            // Reading the member email needs the user:email scope, which the
            // ingestion tokens do not carry.
            .bind(Option::<String>::None)
            .bind(user.followers.total_count)
            .bind(user.following.total_count)
            .bind(user.is_hireable)
            .bind(user.url.clone())
            .bind(user.database_id.unwrap_or_default())
            .bind(user.location.clone())
            .bind(user.login.clone())
            .bind(user.name.clone())
            .bind(user.id.clone())
            .bind(org_id)
            .bind(org_login)
            .bind(user.owned_private_repos.total_count)
            .bind(user.public_repos.total_count)
            .bind(user.total_private_repos.total_count)
            .bind(user.updated_at)
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_user", e))?;
        Ok(())
    }

    async fn save_repository(
        &self,
        repository: &RepositoryFields,
        topics: &[String],
    ) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO repositories_versioned (sum256, versions, {REPOSITORIES_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(repositories_versioned.versions, $33) \
             WHERE NOT repositories_versioned.versions @> ARRAY[$33]"
        );

        let sum = sum256(&format!("{repository:?} {topics:?}"));

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(repository.merge_commit_allowed)
            .bind(repository.rebase_merge_allowed)
            .bind(repository.squash_merge_allowed)
            .bind(repository.is_archived)
            .bind(repository.created_at)
            .bind(
                repository
                    .default_branch_ref
                    .as_ref()
                    .map(|b| b.name.clone()),
            )
            .bind(repository.description.clone())
            .bind(repository.is_disabled)
            .bind(repository.is_fork)
            .bind(repository.fork_count)
            .bind(repository.name_with_owner.clone())
            .bind(repository.has_issues_enabled)
            .bind(repository.has_wiki_enabled)
            .bind(repository.homepage_url.clone())
            .bind(repository.url.clone())
            .bind(repository.database_id.unwrap_or_default())
            .bind(repository.primary_language.as_ref().map(|l| l.name.clone()))
            .bind(repository.name.clone())
            .bind(repository.id.clone())
            .bind(repository.open_issues.total_count)
            .bind(repo_owner_id(&repository.owner))
            .bind(repository.owner.login.clone())
            .bind(repository.owner.typename.clone())
            .bind(repository.is_private)
            .bind(repository.pushed_at)
            .bind(repository.ssh_url.clone())
            .bind(repository.stargazers.total_count)
            .bind(topics.to_vec())
            .bind(repository.updated_at)
            .bind(repository.watchers.total_count)
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_repository", e))?;
        Ok(())
    }

    async fn save_issue(
        &self,
        owner: &str,
        name: &str,
        issue: &Issue,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO issues_versioned (sum256, versions, {ISSUES_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(issues_versioned.versions, $25) \
             WHERE NOT issues_versioned.versions @> ARRAY[$25]"
        );

        let sum = sum256(&format!("{owner} {name} {issue:?} {assignees:?} {labels:?}"));

        let closed_by = issue
            .closed_by
            .nodes
            .first()
            .and_then(|event| event.actor.as_ref());
        let fields = &issue.fields;
        let (milestone_id, milestone_title) = milestone_parts(fields.milestone.as_ref());

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(assignees.to_vec())
            .bind(fields.body.clone())
            .bind(fields.closed_at)
            .bind(actor_id(closed_by))
            .bind(actor_login(closed_by))
            .bind(issue.comments.total_count)
            .bind(fields.created_at)
            .bind(fields.url.clone())
            .bind(fields.database_id.unwrap_or_default())
            .bind(labels.to_vec())
            .bind(fields.locked)
            .bind(milestone_id)
            .bind(milestone_title)
            .bind(fields.id.clone())
            .bind(fields.number)
            .bind(name)
            .bind(owner)
            .bind(fields.state.clone())
            .bind(fields.title.clone())
            .bind(fields.updated_at)
            .bind(actor_id(fields.author.as_ref()))
            .bind(actor_login(fields.author.as_ref()))
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_issue", e))?;
        Ok(())
    }

    async fn save_issue_comment(
        &self,
        owner: &str,
        name: &str,
        issue_number: i64,
        comment: &IssueComment,
    ) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO issue_comments_versioned (sum256, versions, {ISSUE_COMMENTS_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(issue_comments_versioned.versions, $15) \
             WHERE NOT issue_comments_versioned.versions @> ARRAY[$15]"
        );

        let sum = sum256(&format!("{owner} {name} {issue_number} {comment:?}"));

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(comment.author_association.clone())
            .bind(comment.body.clone())
            .bind(comment.created_at)
            .bind(comment.url.clone())
            .bind(comment.database_id.unwrap_or_default())
            .bind(issue_number)
            .bind(comment.id.clone())
            .bind(name)
            .bind(owner)
            .bind(comment.updated_at)
            .bind(actor_id(comment.author.as_ref()))
            .bind(actor_login(comment.author.as_ref()))
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_issue_comment", e))?;
        Ok(())
    }

    async fn save_pull_request(
        &self,
        owner: &str,
        name: &str,
        pr: &PullRequest,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO pull_requests_versioned (sum256, versions, {PULL_REQUESTS_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, \
             $33, $34, $35, $36, $37, $38, $39, $40, $41, $42, $43, $44) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(pull_requests_versioned.versions, $45) \
             WHERE NOT pull_requests_versioned.versions @> ARRAY[$45]"
        );

        let sum = sum256(&format!("{owner} {name} {pr:?} {assignees:?} {labels:?}"));

        let fields = &pr.fields;
        let base = ref_parts(fields.base_ref.as_ref());
        let head = ref_parts(fields.head_ref.as_ref());
        let (milestone_id, milestone_title) = milestone_parts(fields.milestone.as_ref());

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(fields.additions)
            .bind(assignees.to_vec())
            .bind(fields.author_association.clone())
            .bind(base.name)
            .bind(base.repository_name)
            .bind(base.repository_owner)
            .bind(base.sha)
            .bind(base.user)
            .bind(fields.body.clone())
            .bind(fields.changed_files)
            .bind(fields.closed_at)
            .bind(pr.comments.total_count)
            .bind(fields.commits.total_count)
            .bind(fields.created_at)
            .bind(fields.deletions)
            .bind(head.name)
            .bind(head.repository_name)
            .bind(head.repository_owner)
            .bind(head.sha)
            .bind(head.user)
            .bind(fields.url.clone())
            .bind(fields.database_id.unwrap_or_default())
            .bind(labels.to_vec())
            .bind(fields.maintainer_can_modify)
            .bind(fields.merge_commit.as_ref().map(|c| c.oid.clone()))
            .bind(fields.mergeable == "MERGEABLE")
            .bind(fields.merged)
            .bind(fields.merged_at)
            .bind(actor_id(fields.merged_by.as_ref()))
            .bind(actor_login(fields.merged_by.as_ref()))
            .bind(milestone_id)
            .bind(milestone_title)
            .bind(fields.id.clone())
            .bind(fields.number)
            .bind(name)
            .bind(owner)
            .bind(fields.review_threads.total_count)
            .bind(fields.state.clone())
            .bind(fields.title.clone())
            .bind(fields.updated_at)
            .bind(actor_id(fields.author.as_ref()))
            .bind(actor_login(fields.author.as_ref()))
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_pull_request", e))?;
        Ok(())
    }

    async fn save_pull_request_comment(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        comment: &IssueComment,
    ) -> Result<()> {
        // Conversation comments of issues and PRs share the issue_comments
        // table; review comments have their own.
        self.save_issue_comment(owner, name, pr_number, comment)
            .await
    }

    async fn save_pull_request_review(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        review: &PullRequestReview,
    ) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO pull_request_reviews_versioned (sum256, versions, {PULL_REQUEST_REVIEWS_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(pull_request_reviews_versioned.versions, $15) \
             WHERE NOT pull_request_reviews_versioned.versions @> ARRAY[$15]"
        );

        let sum = sum256(&format!("{owner} {name} {pr_number} {review:?}"));
        let fields = &review.fields;

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(fields.body.clone())
            .bind(fields.commit.as_ref().map(|c| c.oid.clone()))
            .bind(fields.url.clone())
            .bind(fields.database_id.unwrap_or_default())
            .bind(fields.id.clone())
            .bind(pr_number)
            .bind(name)
            .bind(owner)
            .bind(fields.state.clone())
            .bind(fields.submitted_at)
            .bind(actor_id(fields.author.as_ref()))
            .bind(actor_login(fields.author.as_ref()))
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_pull_request_review", e))?;
        Ok(())
    }

    async fn save_pull_request_review_comment(
        &self,
        owner: &str,
        name: &str,
        pr_number: i64,
        review_id: i64,
        comment: &PullRequestReviewComment,
    ) -> Result<()> {
        let v = self.version();
        let statement = format!(
            "INSERT INTO pull_request_comments_versioned (sum256, versions, {PULL_REQUEST_COMMENTS_COLS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22) \
             ON CONFLICT (sum256) DO UPDATE \
             SET versions = array_append(pull_request_comments_versioned.versions, $23) \
             WHERE NOT pull_request_comments_versioned.versions @> ARRAY[$23]"
        );

        let sum = sum256(&format!(
            "{owner} {name} {pr_number} {review_id} {comment:?}"
        ));

        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or(StoreError::NoTransaction)?;
        sqlx::query(&statement)
            .bind(sum)
            .bind(vec![v])
            .bind(comment.author_association.clone())
            .bind(comment.body.clone())
            .bind(comment.commit.as_ref().map(|c| c.oid.clone()))
            .bind(comment.created_at)
            .bind(comment.diff_hunk.clone())
            .bind(comment.url.clone())
            .bind(comment.database_id.unwrap_or_default())
            // in_reply_to is not exposed by the v4 schema.
            .bind(0_i64)
            .bind(comment.id.clone())
            .bind(comment.original_commit.as_ref().map(|c| c.oid.clone()))
            .bind(comment.original_position.unwrap_or_default())
            .bind(comment.path.clone())
            .bind(comment.position.unwrap_or_default())
            .bind(pr_number)
            .bind(review_id)
            .bind(name)
            .bind(owner)
            .bind(comment.updated_at)
            .bind(actor_id(comment.author.as_ref()))
            .bind(actor_login(comment.author.as_ref()))
            .bind(v)
            .execute(&mut **tx)
            .await
            .map_err(|e| StoreError::query("save_pull_request_review_comment", e))?;
        Ok(())
    }

    async fn set_active_version(&self, version: i32) -> Result<()> {
        // DDL does not accept bind parameters, so the version is interpolated
        // the same way the column lists are.
        for (view, cols) in VIEWS {
            let statement = format!(
                "CREATE OR REPLACE VIEW {view} AS SELECT {cols} FROM {view}_versioned \
                 WHERE {version} = ANY(versions)"
            );
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::query(format!("create view {view}"), e))?;
        }
        Ok(())
    }

    async fn cleanup(&self, current_version: i32) -> Result<()> {
        for table in TABLES {
            sqlx::query(&format!("DELETE FROM {table} WHERE $1 <> ALL(versions)"))
                .bind(current_version)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::query(format!("cleanup delete {table}"), e))?;

            // Every remaining row belongs to the current version; collapse the
            // version sets to a single entry.
            sqlx::query(&format!("UPDATE {table} SET versions = ARRAY[$1]"))
                .bind(current_version)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::query(format!("cleanup update {table}"), e))?;
        }
        Ok(())
    }
}

fn sum256(serialized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn repo_owner_id(owner: &RepositoryOwner) -> i64 {
    match owner.typename.as_str() {
        "Organization" | "User" => owner.database_id.unwrap_or_default(),
        _ => 0,
    }
}

fn actor_id(actor: Option<&Actor>) -> i64 {
    actor.and_then(|a| a.database_id).unwrap_or_default()
}

fn actor_login(actor: Option<&Actor>) -> &str {
    actor.map(|a| a.login.as_str()).unwrap_or_default()
}

fn milestone_parts(milestone: Option<&Milestone>) -> (&str, &str) {
    milestone
        .map(|m| (m.id.as_str(), m.title.as_str()))
        .unwrap_or(("", ""))
}

struct RefParts<'a> {
    name: &'a str,
    repository_name: &'a str,
    repository_owner: &'a str,
    sha: &'a str,
    user: &'a str,
}

fn ref_parts(git_ref: Option<&GitRef>) -> RefParts<'_> {
    RefParts {
        name: git_ref.map(|r| r.name.as_str()).unwrap_or_default(),
        repository_name: git_ref
            .and_then(|r| r.repository.as_ref())
            .map(|r| r.name.as_str())
            .unwrap_or_default(),
        repository_owner: git_ref
            .and_then(|r| r.repository.as_ref())
            .map(|r| r.owner.login.as_str())
            .unwrap_or_default(),
        sha: git_ref
            .and_then(|r| r.target.as_ref())
            .map(|t| t.oid.as_str())
            .unwrap_or_default(),
        user: git_ref
            .and_then(|r| r.target.as_ref())
            .and_then(|t| t.author.as_ref())
            .and_then(|a| a.user.as_ref())
            .map(|u| u.login.as_str())
            .unwrap_or_default(),
    }
}
