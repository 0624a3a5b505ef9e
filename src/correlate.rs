//! Cross-provider correlation
//!
//! Walks repository search results and pairs each project with the posts
//! that mention it. Requests stay strictly sequential and the two
//! provider sessions share no state.

use crate::error::SearchError;
use crate::providers::{github, twitter};
use crate::results::{ResultSet, SearchHit};
use crate::search::SearchClient;
use tracing::{debug, info};

/// A repository paired with the posts that mention it
#[derive(Debug)]
pub struct ProjectBuzz {
    pub project: SearchHit,
    pub posts: ResultSet,
}

/// Collect up to `max_projects` projects that have at least one post
/// talking about them, padding each project's posts toward
/// `max_posts_per_project`.
///
/// The repository iteration keeps pulling result pages as long as they
/// exist, so the walk ends either at the project cap or at the end of
/// the repository results.
pub async fn collect_buzz(
    repos: &SearchClient,
    posts: &SearchClient,
    query: &str,
    max_projects: usize,
    max_posts_per_project: usize,
) -> Result<Vec<ProjectBuzz>, SearchError> {
    let mut projects = repos.search(github::SEARCH_REPOSITORIES, query).await?;
    let mut buzz = Vec::new();

    while buzz.len() < max_projects && projects.has_next().await? {
        let project = projects.next().await?;
        let post_query = format!("github {}", project.name().replace('/', " "));
        let mut commentary = posts
            .search(twitter::SEARCH_RECENT_POSTS, &post_query)
            .await?;

        if commentary.is_empty() {
            debug!("no commentary found for {}", project.name());
            continue;
        }

        while commentary.size() < max_posts_per_project {
            if commentary.fetch_next_page().await? == 0 {
                break;
            }
        }

        info!(
            "collected {} posts for {}",
            commentary.size(),
            project.name()
        );
        buzz.push(ProjectBuzz {
            project,
            posts: commentary,
        });
    }

    Ok(buzz)
}
