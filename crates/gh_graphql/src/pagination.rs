use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::client::GraphqlClient;
use crate::connection::{per_page, Connection, ConnectionDesc, LOG_EACH_PAGE_N};

/// Walks every page of a connection, starting from the first page already
/// embedded in a parent response. The processor handles all nodes of a page
/// (including the first one) before the next page is requested, which keeps
/// the traversal depth-first and the peak memory bounded to one page chain.
pub async fn paginate<'a, T, P>(
    client: &'a GraphqlClient,
    desc: &'static ConnectionDesc,
    first: Connection<T>,
    vars: Value,
    mut process: P,
) -> Result<()>
where
    T: DeserializeOwned + Default + Send + 'a,
    P: FnMut(Connection<T>) -> BoxFuture<'a, Result<()>> + Send,
{
    if desc.log_progress {
        info!(connection = desc.name, "start downloading");
    }

    let mut page = first;
    let mut count: i64 = 0;

    loop {
        let total = page.total_count;
        let nodes = page.nodes.len() as i64;
        let has_next = page.page_info.has_next_page;
        let cursor = page.page_info.end_cursor.clone();

        process(page).await?;

        count += nodes;
        if desc.log_progress && count > 0 && count % (desc.first * LOG_EACH_PAGE_N) == 0 {
            info!(connection = desc.name, count, total, "download progress");
        }

        if !has_next {
            break;
        }

        page = client
            .connection_page(desc, &vars, per_page(desc, total, count), cursor.as_deref())
            .await
            .with_context(|| format!("{} query failed", desc.name))?;
    }

    if desc.log_progress {
        info!(connection = desc.name, "finished downloading");
    }

    Ok(())
}

/// Drains a connection into a vector by mapping every node. Used for the
/// name-only connections (topics, assignees, labels) whose nodes need no
/// nested traversal.
pub async fn collect_nodes<T, U, F>(
    client: &GraphqlClient,
    desc: &'static ConnectionDesc,
    first: Connection<T>,
    vars: Value,
    mut map: F,
) -> Result<Vec<U>>
where
    T: DeserializeOwned + Default,
    F: FnMut(&T) -> U,
{
    let mut out = Vec::with_capacity(first.nodes.len());
    let mut page = first;
    let mut count: i64 = 0;

    loop {
        for node in &page.nodes {
            out.push(map(node));
        }
        count += page.nodes.len() as i64;

        if !page.page_info.has_next_page {
            break;
        }

        let cursor = page.page_info.end_cursor.clone();
        page = client
            .connection_page(
                desc,
                &vars,
                per_page(desc, page.total_count, count),
                cursor.as_deref(),
            )
            .await
            .with_context(|| format!("{} query failed", desc.name))?;
    }

    Ok(out)
}
