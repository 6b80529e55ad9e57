#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use http::{Request, Response};
use serde_json::{json, Value};

use gh_graphql::types::{
    Issue, IssueComment, Organization, PullRequest, PullRequestReview, PullRequestReviewComment,
    RepositoryFields, UserExtended,
};
use gh_graphql::GraphqlClient;
use gh_transport::HttpExec;
use store::Storer;

pub const TS: &str = "2019-05-10T12:00:00Z";

pub enum Step {
    Data(Value),
    Status(u16, &'static str),
}

impl Step {
    fn into_response(self) -> Result<Response<Vec<u8>>> {
        match self {
            Step::Data(data) => Ok(Response::builder()
                .status(200)
                .body(serde_json::to_vec(&json!({ "data": data }))?)?),
            Step::Status(code, body) => Ok(Response::builder()
                .status(code)
                .body(body.as_bytes().to_vec())?),
        }
    }
}

/// Serves canned responses in request order.
pub struct ScriptedExec {
    steps: Mutex<VecDeque<Step>>,
}

impl ScriptedExec {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
        })
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpExec for ScriptedExec {
    async fn execute(&self, _req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected extra request");
        step.into_response()
    }
}

/// Routes responses by repository name (the `name` variable); rate limit
/// queries are answered from a fixed budget.
pub struct RoutedExec {
    routes: Mutex<HashMap<String, VecDeque<Step>>>,
}

impl RoutedExec {
    pub fn new(routes: Vec<(&str, Vec<Step>)>) -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(
                routes
                    .into_iter()
                    .map(|(name, steps)| (name.to_string(), steps.into()))
                    .collect(),
            ),
        })
    }
}

#[async_trait]
impl HttpExec for RoutedExec {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let payload: Value = serde_json::from_slice(req.body())?;
        let query = payload.get("query").and_then(Value::as_str).unwrap_or("");
        if query.contains("rateLimit") {
            return Step::Data(json!({"rateLimit": {"remaining": 5000}})).into_response();
        }

        let name = payload
            .pointer("/variables/name")
            .and_then(Value::as_str)
            .expect("repository query without a name variable")
            .to_string();
        let step = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&name)
            .and_then(|steps| steps.pop_front())
            .unwrap_or_else(|| panic!("unexpected request for repository {name}"));
        step.into_response()
    }
}

pub fn client(exec: Arc<dyn HttpExec>) -> GraphqlClient {
    GraphqlClient::new(exec, "https://api.github.com/graphql", "t0ken", "downloader-tests")
}

/// Records every storer call for assertions on order and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    SetVersion(i32),
    Begin,
    Commit,
    Rollback,
    Organization(String),
    User(String),
    Repository { full_name: String, topics: Vec<String> },
    Issue { number: i64, assignees: Vec<String>, labels: Vec<String> },
    IssueComment { issue_number: i64, body: String },
    PullRequest { number: i64 },
    PullRequestComment { pr_number: i64, body: String },
    Review { pr_number: i64, id: i64 },
    ReviewComment { pr_number: i64, review_id: i64, body: String },
    SetActiveVersion(i32),
    Cleanup(i32),
}

#[derive(Default)]
pub struct MemoryStore {
    ops: Mutex<Vec<Op>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Op) -> bool) -> usize {
        self.ops().iter().filter(|op| matches(op)).count()
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl Storer for MemoryStore {
    async fn begin(&self) -> Result<()> {
        self.record(Op::Begin);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.record(Op::Commit);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.record(Op::Rollback);
        Ok(())
    }

    fn set_version(&self, version: i32) {
        self.record(Op::SetVersion(version));
    }

    async fn save_organization(&self, organization: &Organization) -> Result<()> {
        self.record(Op::Organization(organization.fields.login.clone()));
        Ok(())
    }

    async fn save_user(&self, _org_id: i64, _org_login: &str, user: &UserExtended) -> Result<()> {
        self.record(Op::User(user.login.clone()));
        Ok(())
    }

    async fn save_repository(
        &self,
        repository: &RepositoryFields,
        topics: &[String],
    ) -> Result<()> {
        self.record(Op::Repository {
            full_name: repository.name_with_owner.clone(),
            topics: topics.to_vec(),
        });
        Ok(())
    }

    async fn save_issue(
        &self,
        _owner: &str,
        _name: &str,
        issue: &Issue,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()> {
        self.record(Op::Issue {
            number: issue.fields.number,
            assignees: assignees.to_vec(),
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn save_issue_comment(
        &self,
        _owner: &str,
        _name: &str,
        issue_number: i64,
        comment: &IssueComment,
    ) -> Result<()> {
        self.record(Op::IssueComment {
            issue_number,
            body: comment.body.clone(),
        });
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
        self.record(Op::PullRequest {
            number: pr.fields.number,
        });
        Ok(())
    }

    async fn save_pull_request_comment(
        &self,
        _owner: &str,
        _name: &str,
        pr_number: i64,
        comment: &IssueComment,
    ) -> Result<()> {
        self.record(Op::PullRequestComment {
            pr_number,
            body: comment.body.clone(),
        });
        Ok(())
    }

    async fn save_pull_request_review(
        &self,
        _owner: &str,
        _name: &str,
        pr_number: i64,
        review: &PullRequestReview,
    ) -> Result<()> {
        self.record(Op::Review {
            pr_number,
            id: review.fields.database_id.unwrap_or_default(),
        });
        Ok(())
    }

    async fn save_pull_request_review_comment(
        &self,
        _owner: &str,
        _name: &str,
        pr_number: i64,
        review_id: i64,
        comment: &PullRequestReviewComment,
    ) -> Result<()> {
        self.record(Op::ReviewComment {
            pr_number,
            review_id,
            body: comment.body.clone(),
        });
        Ok(())
    }

    async fn set_active_version(&self, version: i32) -> Result<()> {
        self.record(Op::SetActiveVersion(version));
        Ok(())
    }

    async fn cleanup(&self, current_version: i32) -> Result<()> {
        self.record(Op::Cleanup(current_version));
        Ok(())
    }
}

pub fn connection(nodes: Vec<Value>, total: i64, end_cursor: Option<&str>) -> Value {
    json!({
        "totalCount": total,
        "pageInfo": {
            "hasNextPage": end_cursor.is_some(),
            "endCursor": end_cursor,
        },
        "nodes": nodes,
    })
}

pub fn actor(login: &str, id: i64) -> Value {
    json!({"login": login, "__typename": "User", "databaseId": id})
}

pub fn issue_comment(id: i64, body: &str) -> Value {
    json!({
        "authorAssociation": "CONTRIBUTOR",
        "body": body,
        "createdAt": TS,
        "url": format!("https://github.com/src-d/gitbase/issues/1#issuecomment-{id}"),
        "databaseId": id,
        "id": format!("COMMENT_{id}"),
        "updatedAt": TS,
        "author": actor("alice", 7),
    })
}

pub fn issue(number: i64, title: &str, comments: Value) -> Value {
    json!({
        "body": "issue body",
        "closedAt": null,
        "createdAt": TS,
        "url": format!("https://github.com/src-d/gitbase/issues/{number}"),
        "databaseId": 400 + number,
        "locked": false,
        "milestone": null,
        "id": format!("ISSUE_{number}"),
        "number": number,
        "state": "OPEN",
        "title": title,
        "updatedAt": TS,
        "author": actor("alice", 7),
        "assignees": connection(vec![json!({"login": "bob"})], 1, None),
        "labels": connection(vec![json!({"name": "bug"})], 1, None),
        "comments": comments,
        "closedBy": {"nodes": []},
    })
}

pub fn review_comment(id: i64, body: &str) -> Value {
    json!({
        "authorAssociation": "MEMBER",
        "body": body,
        "commit": {"oid": "abc123"},
        "createdAt": TS,
        "diffHunk": "@@ -1,3 +1,3 @@",
        "url": format!("https://github.com/src-d/gitbase/pull/3#discussion_r{id}"),
        "databaseId": id,
        "id": format!("REVIEW_COMMENT_{id}"),
        "originalCommit": {"oid": "abc122"},
        "originalPosition": 3,
        "path": "cmd/server/main.go",
        "position": 3,
        "updatedAt": TS,
        "author": actor("carol", 9),
    })
}

pub fn review(id: i64, comments: Value) -> Value {
    json!({
        "body": "looks good",
        "commit": {"oid": "abc123"},
        "url": format!("https://github.com/src-d/gitbase/pull/3#pullrequestreview-{id}"),
        "databaseId": id,
        "id": format!("REVIEW_{id}"),
        "state": "APPROVED",
        "submittedAt": TS,
        "author": actor("carol", 9),
        "comments": comments,
    })
}

pub fn pull_request(number: i64, title: &str, comments: Value, reviews: Value) -> Value {
    let git_ref = json!({
        "name": "master",
        "repository": {"name": "gitbase", "owner": {"login": "src-d"}},
        "target": {"oid": "abc123", "author": {"user": {"login": "alice"}}},
    });
    json!({
        "additions": 10,
        "authorAssociation": "MEMBER",
        "baseRef": git_ref,
        "body": "pr body",
        "changedFiles": 2,
        "closedAt": null,
        "commits": {"totalCount": 1},
        "createdAt": TS,
        "deletions": 1,
        "headRef": git_ref,
        "url": format!("https://github.com/src-d/gitbase/pull/{number}"),
        "databaseId": 500 + number,
        "maintainerCanModify": false,
        "mergeCommit": null,
        "mergeable": "MERGEABLE",
        "merged": false,
        "mergedAt": null,
        "mergedBy": null,
        "milestone": null,
        "id": format!("PR_{number}"),
        "number": number,
        "reviewThreads": {"totalCount": 1},
        "state": "OPEN",
        "title": title,
        "updatedAt": TS,
        "author": actor("alice", 7),
        "assignees": connection(vec![json!({"login": "bob"})], 1, None),
        "labels": connection(vec![json!({"name": "enhancement"})], 1, None),
        "comments": comments,
        "reviews": reviews,
    })
}

pub fn repository(topics: Value, issues: Value, pull_requests: Value) -> Value {
    json!({
        "repository": {
            "mergeCommitAllowed": true,
            "rebaseMergeAllowed": true,
            "squashMergeAllowed": false,
            "isArchived": false,
            "createdAt": "2017-01-10T10:00:00Z",
            "defaultBranchRef": {"name": "master"},
            "description": "SQL interface to git repositories",
            "isDisabled": false,
            "isFork": false,
            "forkCount": 3,
            "nameWithOwner": "src-d/gitbase",
            "hasIssuesEnabled": true,
            "hasWikiEnabled": true,
            "homepageUrl": null,
            "url": "https://github.com/src-d/gitbase",
            "databaseId": 97000001,
            "primaryLanguage": {"name": "Go"},
            "name": "gitbase",
            "id": "REPO_1",
            "openIssues": {"totalCount": 2},
            "owner": {"login": "src-d", "__typename": "Organization", "databaseId": 12345},
            "isPrivate": false,
            "pushedAt": "2019-05-01T08:00:00Z",
            "sshUrl": "git@github.com:src-d/gitbase.git",
            "stargazers": {"totalCount": 10},
            "updatedAt": "2019-05-01T08:00:00Z",
            "watchers": {"totalCount": 4},
            "repositoryTopics": topics,
            "issues": issues,
            "pullRequests": pull_requests,
        }
    })
}

pub fn user(login: &str, id: i64) -> Value {
    json!({
        "avatarUrl": format!("https://avatars.githubusercontent.com/u/{id}"),
        "bio": null,
        "company": "source{d}",
        "createdAt": TS,
        "followers": {"totalCount": 5},
        "following": {"totalCount": 3},
        "isHireable": false,
        "url": format!("https://github.com/{login}"),
        "databaseId": id,
        "location": "Madrid",
        "login": login,
        "name": null,
        "id": format!("USER_{login}"),
        "ownedPrivateRepos": {"totalCount": 0},
        "publicRepos": {"totalCount": 10},
        "totalPrivateRepos": {"totalCount": 0},
        "updatedAt": TS,
    })
}

pub fn organization(login: &str, members: Value) -> Value {
    json!({
        "organization": {
            "avatarUrl": "https://avatars.githubusercontent.com/u/12345",
            "createdAt": "2015-01-01T00:00:00Z",
            "description": "code as data",
            "email": null,
            "url": format!("https://github.com/{login}"),
            "databaseId": 12345,
            "login": login,
            "name": "source{d}",
            "id": "ORG_1",
            "ownedPrivateRepos": {"totalCount": 1},
            "publicRepos": {"totalCount": 20},
            "totalPrivateRepos": {"totalCount": 2},
            "updatedAt": "2019-05-01T08:00:00Z",
            "membersWithRole": members,
        }
    })
}
