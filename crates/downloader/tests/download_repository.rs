mod common;

use serde_json::json;

use common::{
    client, connection, issue, issue_comment, pull_request, repository, review, review_comment,
    MemoryStore, Op, ScriptedExec, Step,
};
use downloader::Downloader;

#[tokio::test]
async fn downloads_a_repository_with_issues_and_pull_requests() {
    // Two issues (the second with a comment page left on the server), one PR
    // with a conversation comment and one review carrying a review comment.
    let issues = connection(
        vec![
            issue(1, "gitbase crashes on strange repo", connection(vec![issue_comment(9001, "reproduced")], 1, None)),
            issue(
                2,
                "slow queries on big repos",
                connection(vec![issue_comment(9002, "same here")], 3, Some("cc1")),
            ),
        ],
        2,
        None,
    );
    let prs = connection(
        vec![pull_request(
            3,
            "add bblfsh UAST functions",
            connection(vec![issue_comment(9005, "please rebase")], 1, None),
            connection(
                vec![review(700, connection(vec![review_comment(9100, "rename this")], 1, None))],
                1,
                None,
            ),
        )],
        1,
        None,
    );
    let topics = connection(
        vec![json!({"topic": {"name": "git"}}), json!({"topic": {"name": "sql"}})],
        2,
        None,
    );

    let exec = ScriptedExec::new(vec![
        Step::Data(repository(topics, issues, prs)),
        // Second comment page of issue #2.
        Step::Data(json!({
            "node": {
                "comments": connection(
                    vec![issue_comment(9003, "fixed by #3"), issue_comment(9004, "confirmed")],
                    3,
                    None,
                ),
            }
        })),
    ]);

    let store = MemoryStore::new();
    let downloader = Downloader::new(client(exec.clone()), store.clone());

    downloader
        .download_repository("src-d", "gitbase", 0)
        .await
        .unwrap();

    assert_eq!(exec.remaining(), 0, "every scripted response is consumed");

    let ops = store.ops();
    assert_eq!(ops[0], Op::SetVersion(0));
    assert_eq!(ops[1], Op::Begin);
    assert_eq!(
        ops[2],
        Op::Repository {
            full_name: "src-d/gitbase".into(),
            topics: vec!["git".into(), "sql".into()],
        }
    );
    assert_eq!(*ops.last().unwrap(), Op::Commit);

    // Issues are saved in server order, each before its own comments.
    let issue_positions: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter_map(|(i, op)| matches!(op, Op::Issue { .. }).then_some(i))
        .collect();
    assert_eq!(issue_positions.len(), 2);
    assert_eq!(
        ops[issue_positions[0]],
        Op::Issue {
            number: 1,
            assignees: vec!["bob".into()],
            labels: vec!["bug".into()],
        }
    );

    // Issue #2's comments span two pages: one from the embedded first page,
    // two more from the re-query.
    let issue2_comments = store.count(|op| matches!(op, Op::IssueComment { issue_number: 2, .. }));
    assert_eq!(issue2_comments, 3);

    // Conversation comments of issues and PRs land in the same place.
    let issue_comments = store.count(|op| matches!(op, Op::IssueComment { .. }));
    let pr_comments = store.count(|op| matches!(op, Op::PullRequestComment { .. }));
    assert_eq!(issue_comments + pr_comments, 5);

    assert_eq!(store.count(|op| matches!(op, Op::PullRequest { .. })), 1);
    assert_eq!(
        store.count(|op| matches!(op, Op::Review { pr_number: 3, id: 700 })),
        1
    );
    assert_eq!(
        store.count(
            |op| matches!(op, Op::ReviewComment { pr_number: 3, review_id: 700, .. })
        ),
        1
    );

    // The review is saved before its comments.
    let review_pos = ops.iter().position(|op| matches!(op, Op::Review { .. })).unwrap();
    let review_comment_pos = ops
        .iter()
        .position(|op| matches!(op, Op::ReviewComment { .. }))
        .unwrap();
    assert!(review_pos < review_comment_pos);
}

#[tokio::test]
async fn first_query_failure_rolls_back() {
    let exec = ScriptedExec::new(vec![Step::Status(502, "Bad Gateway")]);
    let store = MemoryStore::new();
    let downloader = Downloader::new(client(exec), store.clone());

    let err = downloader
        .download_repository("src-d", "gitbase", 0)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("first query failed"));

    let ops = store.ops();
    assert_eq!(ops, vec![Op::SetVersion(0), Op::Begin, Op::Rollback]);
}

#[tokio::test]
async fn mid_traversal_failure_rolls_back_the_whole_download() {
    let issues = connection(
        vec![issue(
            1,
            "gitbase crashes on strange repo",
            connection(vec![issue_comment(9001, "reproduced")], 2, Some("cc1")),
        )],
        1,
        None,
    );
    let topics = connection(vec![], 0, None);
    let prs = connection(vec![], 0, None);

    let exec = ScriptedExec::new(vec![
        Step::Data(repository(topics, issues, prs)),
        // The comments re-query for issue #1 blows up.
        Step::Status(500, "Internal Server Error"),
    ]);
    let store = MemoryStore::new();
    let downloader = Downloader::new(client(exec), store.clone());

    let err = downloader
        .download_repository("src-d", "gitbase", 0)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to process issue src-d/gitbase #1"));

    let ops = store.ops();
    assert_eq!(*ops.last().unwrap(), Op::Rollback);
    assert_eq!(store.count(|op| matches!(op, Op::Commit)), 0);
    // Partial saves happened inside the transaction but the rollback ends it.
    assert_eq!(store.count(|op| matches!(op, Op::Issue { .. })), 1);
}
