use anyhow::{Context, Result};
use serde_json::{json, Value};

use gh_graphql::types::Named;
use gh_graphql::{collect_nodes, desc, Connection, GraphqlClient};

/// Lists the repository names of an organization, optionally filtering out
/// forks.
pub async fn list_repositories(
    client: &GraphqlClient,
    login: &str,
    no_forks: bool,
) -> Result<Vec<String>> {
    let variables = json!({
        "organizationLogin": login,
        "isFork": if no_forks { json!(false) } else { Value::Null },
    });

    let first: Connection<Named> = client
        .connection_page(
            &desc::ORGANIZATION_REPOSITORIES,
            &variables,
            desc::ORGANIZATION_REPOSITORIES.first,
            None,
        )
        .await
        .with_context(|| format!("failed to query organization {login} repositories"))?;

    collect_nodes(
        client,
        &desc::ORGANIZATION_REPOSITORIES,
        first,
        variables,
        |node: &Named| node.name.clone(),
    )
    .await
    .with_context(|| format!("failed to query organization {login} repositories"))
}
