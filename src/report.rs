//! Console report for collected buzz

use crate::correlate::ProjectBuzz;
use crate::error::SearchError;

/// Print each project followed by up to `max_posts` of its posts, either
/// as full JSON payloads or as `id: text` summaries.
///
/// Iterating a project's posts may still pull further pages when the
/// buffered records run out before the cap is reached.
pub async fn print_buzz(
    buzz: Vec<ProjectBuzz>,
    max_posts: usize,
    summaries: bool,
) -> Result<(), SearchError> {
    for ProjectBuzz { project, mut posts } in buzz {
        println!("GitHub project:");
        println!("{}", project);

        let mut printed = 0;
        while printed < max_posts && posts.has_next().await? {
            let post = posts.next().await?;
            println!("----------------");
            if summaries {
                let text = post
                    .field("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                println!("{}: {}", post.name(), text);
            } else {
                println!("{}", post.to_json_string());
            }
            printed += 1;
        }
        println!("==================");
    }

    Ok(())
}
