//! GraphQL documents for the traversal. Shared node shapes are assembled
//! once into the initial per-entity documents and into the per-connection
//! re-query documents driven by the descriptor table.

use once_cell::sync::Lazy;

const ORGANIZATION_FIELDS: &str = r#"avatarUrl
createdAt
description
email
url
databaseId
login
name
id
ownedPrivateRepos: repositories(privacy: PRIVATE, ownerAffiliations: OWNER) { totalCount }
publicRepos: repositories(privacy: PUBLIC) { totalCount }
totalPrivateRepos: repositories(privacy: PRIVATE) { totalCount }
updatedAt"#;

const USER_FIELDS: &str = r#"avatarUrl
bio
company
createdAt
followers { totalCount }
following { totalCount }
isHireable
url
databaseId
location
login
name
id
ownedPrivateRepos: repositories(privacy: PRIVATE, ownerAffiliations: OWNER) { totalCount }
publicRepos: repositories(privacy: PUBLIC) { totalCount }
totalPrivateRepos: repositories(privacy: PRIVATE) { totalCount }
updatedAt"#;

const REPOSITORY_FIELDS: &str = r#"mergeCommitAllowed
rebaseMergeAllowed
squashMergeAllowed
isArchived
createdAt
defaultBranchRef { name }
description
isDisabled
isFork
forkCount
nameWithOwner
hasIssuesEnabled
hasWikiEnabled
homepageUrl
url
databaseId
primaryLanguage { name }
name
id
openIssues: issues(states: [OPEN]) { totalCount }
owner {
  login
  __typename
  ... on Organization { databaseId }
  ... on User { databaseId }
}
isPrivate
pushedAt
sshUrl
stargazers { totalCount }
updatedAt
watchers { totalCount }"#;

const ISSUE_FIELDS: &str = r#"body
closedAt
createdAt
url
databaseId
locked
milestone { id title }
id
number
state
title
updatedAt
author {
  login
  __typename
  ... on User { databaseId }
}"#;

const ISSUE_COMMENT_NODE: &str = r#"authorAssociation
body
createdAt
url
databaseId
id
updatedAt
author {
  login
  __typename
  ... on User { databaseId }
}"#;

const PULL_REQUEST_FIELDS: &str = r#"additions
authorAssociation
baseRef {
  name
  repository { name owner { login } }
  target {
    oid
    ... on Commit { author { user { login } } }
  }
}
body
changedFiles
closedAt
commits { totalCount }
createdAt
deletions
headRef {
  name
  repository { name owner { login } }
  target {
    oid
    ... on Commit { author { user { login } } }
  }
}
url
databaseId
maintainerCanModify
mergeCommit { oid }
mergeable
merged
mergedAt
mergedBy {
  login
  __typename
  ... on User { databaseId }
}
milestone { id title }
id
number
reviewThreads { totalCount }
state
title
updatedAt
author {
  login
  __typename
  ... on User { databaseId }
}"#;

const REVIEW_FIELDS: &str = r#"body
commit { oid }
url
databaseId
id
state
submittedAt
author {
  login
  __typename
  ... on User { databaseId }
}"#;

const REVIEW_COMMENT_NODE: &str = r#"authorAssociation
body
commit { oid }
createdAt
diffHunk
url
databaseId
id
originalCommit { oid }
originalPosition
path
position
updatedAt
author {
  login
  __typename
  ... on User { databaseId }
}"#;

const ASSIGNEES_CONNECTION: &str = r#"assignees(first: $assigneesPage, after: $assigneesCursor) {
  totalCount
  pageInfo { hasNextPage endCursor }
  nodes { login }
}"#;

const LABELS_CONNECTION: &str = r#"labels(first: $labelsPage, after: $labelsCursor) {
  totalCount
  pageInfo { hasNextPage endCursor }
  nodes { name }
}"#;

const TOPICS_CONNECTION: &str = r#"repositoryTopics(first: $repositoryTopicsPage, after: $repositoryTopicsCursor) {
  totalCount
  pageInfo { hasNextPage endCursor }
  nodes { topic { name } }
}"#;

// The last CLOSED event yields the closing actor for issues.
const CLOSED_BY: &str = r#"closedBy: timelineItems(last: 1, itemTypes: CLOSED_EVENT) {
  nodes {
    ... on ClosedEvent {
      actor {
        login
        __typename
        ... on User { databaseId }
      }
    }
  }
}"#;

static COMMENTS_CONNECTION: Lazy<String> = Lazy::new(|| {
    [
        "comments(first: $issueCommentsPage, after: $issueCommentsCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        ISSUE_COMMENT_NODE,
        "}",
        "}",
    ]
    .join("\n")
});

static REVIEW_COMMENTS_CONNECTION: Lazy<String> = Lazy::new(|| {
    [
        "comments(first: $pullRequestReviewCommentsPage, after: $pullRequestReviewCommentsCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        REVIEW_COMMENT_NODE,
        "}",
        "}",
    ]
    .join("\n")
});

static REVIEWS_CONNECTION: Lazy<String> = Lazy::new(|| {
    [
        "reviews(first: $pullRequestReviewsPage, after: $pullRequestReviewsCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        REVIEW_FIELDS,
        REVIEW_COMMENTS_CONNECTION.as_str(),
        "}",
        "}",
    ]
    .join("\n")
});

static ISSUE_NODE: Lazy<String> = Lazy::new(|| {
    [
        ISSUE_FIELDS,
        ASSIGNEES_CONNECTION,
        LABELS_CONNECTION,
        COMMENTS_CONNECTION.as_str(),
        CLOSED_BY,
    ]
    .join("\n")
});

static PULL_REQUEST_NODE: Lazy<String> = Lazy::new(|| {
    [
        PULL_REQUEST_FIELDS,
        ASSIGNEES_CONNECTION,
        LABELS_CONNECTION,
        COMMENTS_CONNECTION.as_str(),
        REVIEWS_CONNECTION.as_str(),
    ]
    .join("\n")
});

static ISSUES_CONNECTION: Lazy<String> = Lazy::new(|| {
    [
        "issues(first: $issuesPage, after: $issuesCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        ISSUE_NODE.as_str(),
        "}",
        "}",
    ]
    .join("\n")
});

static PULL_REQUESTS_CONNECTION: Lazy<String> = Lazy::new(|| {
    [
        "pullRequests(first: $pullRequestsPage, after: $pullRequestsCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        PULL_REQUEST_NODE.as_str(),
        "}",
        "}",
    ]
    .join("\n")
});

/// Initial repository query: root fields plus the first page of every
/// sub-connection, with all cursors null.
pub static REPOSITORY: Lazy<String> = Lazy::new(|| {
    [
        "query Repository(",
        "  $owner: String!, $name: String!,",
        "  $repositoryTopicsPage: Int!, $repositoryTopicsCursor: String,",
        "  $issuesPage: Int!, $issuesCursor: String,",
        "  $pullRequestsPage: Int!, $pullRequestsCursor: String,",
        "  $assigneesPage: Int!, $assigneesCursor: String,",
        "  $labelsPage: Int!, $labelsCursor: String,",
        "  $issueCommentsPage: Int!, $issueCommentsCursor: String,",
        "  $pullRequestReviewsPage: Int!, $pullRequestReviewsCursor: String,",
        "  $pullRequestReviewCommentsPage: Int!, $pullRequestReviewCommentsCursor: String",
        ") {",
        "repository(owner: $owner, name: $name) {",
        REPOSITORY_FIELDS,
        TOPICS_CONNECTION,
        ISSUES_CONNECTION.as_str(),
        PULL_REQUESTS_CONNECTION.as_str(),
        "}",
        "}",
    ]
    .join("\n")
});

pub static REPOSITORY_TOPICS: Lazy<String> = Lazy::new(|| {
    [
        "query RepositoryTopics($id: ID!, $repositoryTopicsPage: Int!, $repositoryTopicsCursor: String) {",
        "node(id: $id) {",
        "... on Repository {",
        TOPICS_CONNECTION,
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static REPOSITORY_ISSUES: Lazy<String> = Lazy::new(|| {
    [
        "query RepositoryIssues(",
        "  $id: ID!,",
        "  $issuesPage: Int!, $issuesCursor: String,",
        "  $assigneesPage: Int!, $assigneesCursor: String,",
        "  $labelsPage: Int!, $labelsCursor: String,",
        "  $issueCommentsPage: Int!, $issueCommentsCursor: String",
        ") {",
        "node(id: $id) {",
        "... on Repository {",
        ISSUES_CONNECTION.as_str(),
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static REPOSITORY_PULL_REQUESTS: Lazy<String> = Lazy::new(|| {
    [
        "query RepositoryPullRequests(",
        "  $id: ID!,",
        "  $pullRequestsPage: Int!, $pullRequestsCursor: String,",
        "  $assigneesPage: Int!, $assigneesCursor: String,",
        "  $labelsPage: Int!, $labelsCursor: String,",
        "  $issueCommentsPage: Int!, $issueCommentsCursor: String,",
        "  $pullRequestReviewsPage: Int!, $pullRequestReviewsCursor: String,",
        "  $pullRequestReviewCommentsPage: Int!, $pullRequestReviewCommentsCursor: String",
        ") {",
        "node(id: $id) {",
        "... on Repository {",
        PULL_REQUESTS_CONNECTION.as_str(),
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static ISSUE_ASSIGNEES: Lazy<String> = Lazy::new(|| {
    [
        "query IssueAssignees($id: ID!, $assigneesPage: Int!, $assigneesCursor: String) {",
        "node(id: $id) {",
        "... on Issue {",
        ASSIGNEES_CONNECTION,
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static PULL_REQUEST_ASSIGNEES: Lazy<String> = Lazy::new(|| {
    [
        "query PullRequestAssignees($id: ID!, $assigneesPage: Int!, $assigneesCursor: String) {",
        "node(id: $id) {",
        "... on PullRequest {",
        ASSIGNEES_CONNECTION,
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static ISSUE_LABELS: Lazy<String> = Lazy::new(|| {
    [
        "query IssueLabels($id: ID!, $labelsPage: Int!, $labelsCursor: String) {",
        "node(id: $id) {",
        "... on Issue {",
        LABELS_CONNECTION,
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static PULL_REQUEST_LABELS: Lazy<String> = Lazy::new(|| {
    [
        "query PullRequestLabels($id: ID!, $labelsPage: Int!, $labelsCursor: String) {",
        "node(id: $id) {",
        "... on PullRequest {",
        LABELS_CONNECTION,
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static ISSUE_COMMENTS: Lazy<String> = Lazy::new(|| {
    [
        "query IssueComments($id: ID!, $issueCommentsPage: Int!, $issueCommentsCursor: String) {",
        "node(id: $id) {",
        "... on Issue {",
        COMMENTS_CONNECTION.as_str(),
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static PULL_REQUEST_COMMENTS: Lazy<String> = Lazy::new(|| {
    [
        "query PullRequestComments($id: ID!, $issueCommentsPage: Int!, $issueCommentsCursor: String) {",
        "node(id: $id) {",
        "... on PullRequest {",
        COMMENTS_CONNECTION.as_str(),
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static PULL_REQUEST_REVIEWS: Lazy<String> = Lazy::new(|| {
    [
        "query PullRequestReviews(",
        "  $id: ID!,",
        "  $pullRequestReviewsPage: Int!, $pullRequestReviewsCursor: String,",
        "  $pullRequestReviewCommentsPage: Int!, $pullRequestReviewCommentsCursor: String",
        ") {",
        "node(id: $id) {",
        "... on PullRequest {",
        REVIEWS_CONNECTION.as_str(),
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static PULL_REQUEST_REVIEW_COMMENTS: Lazy<String> = Lazy::new(|| {
    [
        "query PullRequestReviewComments($id: ID!, $pullRequestReviewCommentsPage: Int!, $pullRequestReviewCommentsCursor: String) {",
        "node(id: $id) {",
        "... on PullRequestReview {",
        REVIEW_COMMENTS_CONNECTION.as_str(),
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

/// Initial organization query: root fields plus the first page of members.
pub static ORGANIZATION: Lazy<String> = Lazy::new(|| {
    [
        "query Organization($organizationLogin: String!, $membersWithRolePage: Int!, $membersWithRoleCursor: String) {",
        "organization(login: $organizationLogin) {",
        ORGANIZATION_FIELDS,
        "membersWithRole(first: $membersWithRolePage, after: $membersWithRoleCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        USER_FIELDS,
        "}",
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static ORGANIZATION_MEMBERS: Lazy<String> = Lazy::new(|| {
    [
        "query OrganizationMembers($organizationLogin: String!, $membersWithRolePage: Int!, $membersWithRoleCursor: String) {",
        "organization(login: $organizationLogin) {",
        "membersWithRole(first: $membersWithRolePage, after: $membersWithRoleCursor) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes {",
        USER_FIELDS,
        "}",
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub static ORGANIZATION_REPOSITORIES: Lazy<String> = Lazy::new(|| {
    [
        "query OrganizationRepositories($organizationLogin: String!, $repositoriesPage: Int!, $repositoriesCursor: String, $isFork: Boolean) {",
        "organization(login: $organizationLogin) {",
        "repositories(first: $repositoriesPage, after: $repositoriesCursor, isFork: $isFork) {",
        "totalCount",
        "pageInfo { hasNextPage endCursor }",
        "nodes { name }",
        "}",
        "}",
        "}",
    ]
    .join("\n")
});

pub const RATE_LIMIT: &str = "query RateLimit { rateLimit { remaining } }";
