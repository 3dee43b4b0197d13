//! Reading the records a feed needs from the store.

use std::collections::BTreeSet;

use tracing::warn;

use super::event::FeedData;
use crate::error::LensResult;
use crate::store::FeedStore;
use crate::window::FeedWindow;

/// Fetch dates in `window`, then their projects, then those projects'
/// clients. With `owner` set, only dates of that owner's projects are kept.
///
/// Only the date read is fatal. A failed project or client lookup leaves
/// the join empty and the events fall back to default titles.
pub async fn collect_feed_data(
    store: &dyn FeedStore,
    window: &FeedWindow,
    owner: Option<&str>,
    limit: usize,
) -> LensResult<FeedData> {
    let dates = store.dates_in_window(window, limit).await?;

    let project_ids = distinct(dates.iter().map(|d| d.project_id.as_str()));
    let projects = if project_ids.is_empty() {
        Vec::new()
    } else {
        store.projects_by_ids(&project_ids).await.unwrap_or_else(|e| {
            warn!(error = %e, "Project lookup failed, continuing without projects");
            Vec::new()
        })
    };

    let mut data = FeedData::new(dates, projects, []);

    if let Some(owner) = owner {
        let projects = &data.projects;
        data.dates.retain(|d| {
            projects
                .get(&d.project_id)
                .and_then(|p| p.owner_id.as_deref())
                == Some(owner)
        });
    }

    let client_ids = distinct(
        data.dates
            .iter()
            .filter_map(|d| data.projects.get(&d.project_id))
            .filter_map(|p| p.client_id.as_deref()),
    );
    if !client_ids.is_empty() {
        match store.clients_by_ids(&client_ids).await {
            Ok(clients) => {
                data.clients = clients.into_iter().map(|c| (c.id.clone(), c)).collect();
            }
            Err(e) => warn!(error = %e, "Client lookup failed, continuing without clients"),
        }
    }

    Ok(data)
}

/// Non-empty ids, deduplicated, in a stable order.
fn distinct<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    ids.filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
