use once_cell::sync::Lazy;
use serde::Deserialize;

/// Maximum page size accepted by the API.
pub const MAX_PAGE: i64 = 100;

/// Progress for top-level connections is logged once every N pages to avoid
/// flooding the log.
pub(crate) const LOG_EACH_PAGE_N: i64 = 3;

/// One page of a paginated GraphQL field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            total_count: 0,
            page_info: PageInfo::default(),
            nodes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// Static description of a paginated connection: the GraphQL field name, the
/// variables driving its pagination, the default and maximum page sizes, the
/// document that re-requests only this connection on a parent id, and the
/// path to the connection inside the response data.
pub struct ConnectionDesc {
    pub name: &'static str,
    pub page_var: &'static str,
    pub cursor_var: &'static str,
    pub first: i64,
    pub limit: i64,
    pub log_progress: bool,
    pub query: &'static Lazy<String>,
    pub path: &'static [&'static str],
}

/// How many resources to request for the next page, given the server's total
/// and the number already downloaded. Capped at the connection's limit; falls
/// back to the default page size when entities appeared during the download.
pub fn per_page(desc: &ConnectionDesc, total: i64, count: i64) -> i64 {
    let mut per_page = total - count;
    if per_page > desc.limit {
        per_page = desc.limit;
    }
    if per_page <= 0 {
        per_page = desc.first;
    }
    per_page
}

pub mod desc {
    use super::ConnectionDesc;
    use crate::queries;

    pub static REPOSITORY_TOPICS: ConnectionDesc = ConnectionDesc {
        name: "repositoryTopics",
        page_var: "repositoryTopicsPage",
        cursor_var: "repositoryTopicsCursor",
        first: 10,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::REPOSITORY_TOPICS,
        path: &["node", "repositoryTopics"],
    };

    pub static ISSUES: ConnectionDesc = ConnectionDesc {
        name: "issues",
        page_var: "issuesPage",
        cursor_var: "issuesCursor",
        first: 50,
        limit: super::MAX_PAGE,
        log_progress: true,
        query: &queries::REPOSITORY_ISSUES,
        path: &["node", "issues"],
    };

    // Large pull request pages regularly time out server-side, so the limit
    // stays at the default page size instead of MAX_PAGE.
    pub static PULL_REQUESTS: ConnectionDesc = ConnectionDesc {
        name: "pullRequests",
        page_var: "pullRequestsPage",
        cursor_var: "pullRequestsCursor",
        first: 50,
        limit: 50,
        log_progress: true,
        query: &queries::REPOSITORY_PULL_REQUESTS,
        path: &["node", "pullRequests"],
    };

    pub static ISSUE_ASSIGNEES: ConnectionDesc = ConnectionDesc {
        name: "assignees",
        page_var: "assigneesPage",
        cursor_var: "assigneesCursor",
        first: 2,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::ISSUE_ASSIGNEES,
        path: &["node", "assignees"],
    };

    pub static PULL_REQUEST_ASSIGNEES: ConnectionDesc = ConnectionDesc {
        name: "assignees",
        page_var: "assigneesPage",
        cursor_var: "assigneesCursor",
        first: 2,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::PULL_REQUEST_ASSIGNEES,
        path: &["node", "assignees"],
    };

    pub static ISSUE_LABELS: ConnectionDesc = ConnectionDesc {
        name: "labels",
        page_var: "labelsPage",
        cursor_var: "labelsCursor",
        first: 2,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::ISSUE_LABELS,
        path: &["node", "labels"],
    };

    pub static PULL_REQUEST_LABELS: ConnectionDesc = ConnectionDesc {
        name: "labels",
        page_var: "labelsPage",
        cursor_var: "labelsCursor",
        first: 2,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::PULL_REQUEST_LABELS,
        path: &["node", "labels"],
    };

    pub static ISSUE_COMMENTS: ConnectionDesc = ConnectionDesc {
        name: "issueComments",
        page_var: "issueCommentsPage",
        cursor_var: "issueCommentsCursor",
        first: 10,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::ISSUE_COMMENTS,
        path: &["node", "comments"],
    };

    pub static PULL_REQUEST_COMMENTS: ConnectionDesc = ConnectionDesc {
        name: "issueComments",
        page_var: "issueCommentsPage",
        cursor_var: "issueCommentsCursor",
        first: 10,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::PULL_REQUEST_COMMENTS,
        path: &["node", "comments"],
    };

    pub static PULL_REQUEST_REVIEWS: ConnectionDesc = ConnectionDesc {
        name: "pullRequestReviews",
        page_var: "pullRequestReviewsPage",
        cursor_var: "pullRequestReviewsCursor",
        first: 5,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::PULL_REQUEST_REVIEWS,
        path: &["node", "reviews"],
    };

    pub static PULL_REQUEST_REVIEW_COMMENTS: ConnectionDesc = ConnectionDesc {
        name: "pullRequestReviewComments",
        page_var: "pullRequestReviewCommentsPage",
        cursor_var: "pullRequestReviewCommentsCursor",
        first: 5,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::PULL_REQUEST_REVIEW_COMMENTS,
        path: &["node", "comments"],
    };

    pub static ORGANIZATION_MEMBERS: ConnectionDesc = ConnectionDesc {
        name: "membersWithRole",
        page_var: "membersWithRolePage",
        cursor_var: "membersWithRoleCursor",
        first: 100,
        limit: super::MAX_PAGE,
        log_progress: true,
        query: &queries::ORGANIZATION_MEMBERS,
        path: &["organization", "membersWithRole"],
    };

    pub static ORGANIZATION_REPOSITORIES: ConnectionDesc = ConnectionDesc {
        name: "repositories",
        page_var: "repositoriesPage",
        cursor_var: "repositoriesCursor",
        first: 100,
        limit: super::MAX_PAGE,
        log_progress: false,
        query: &queries::ORGANIZATION_REPOSITORIES,
        path: &["organization", "repositories"],
    };
}
