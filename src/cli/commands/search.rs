//! Search command implementation.

use super::ensure_ready;
use crate::cli::preflight::Operation;
use crate::cli::{Output, SearchSection};
use crate::config::{Credentials, Settings};
use crate::orchestrator::search_aggregator;
use crate::search::SearchAggregate;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    only: SearchSection,
    max_results: Option<u32>,
    mut settings: Settings,
) -> Result<()> {
    let credentials = Credentials::from_env();
    ensure_ready(Operation::Search, &credentials)?;

    if let Some(n) = max_results {
        settings.search.max_results = n;
        settings.video.max_results = n;
    }

    let aggregator = search_aggregator(&settings, &credentials)?;

    let spinner = Output::spinner("Searching...");
    let aggregate = aggregator.search(query).await;
    spinner.finish_and_clear();

    if aggregate.all_failed() {
        for error in [&aggregate.web_error, &aggregate.video_error].into_iter().flatten() {
            Output::error(error);
        }
        anyhow::bail!("Search failed for '{}'", query);
    }

    print_aggregate(&aggregate, only);
    Ok(())
}

/// The summarized answer, if the web search produced a usable one.
fn direct_answer(aggregate: &SearchAggregate) -> Option<&str> {
    aggregate
        .answer
        .as_deref()
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
}

fn print_aggregate(aggregate: &SearchAggregate, only: SearchSection) {
    if only.shows(SearchSection::Web) {
        Output::header("Answer");
        match direct_answer(aggregate) {
            Some(answer) => println!("{}", answer),
            None => Output::info("No direct answer found."),
        }

        Output::header("Web");
        match &aggregate.web_error {
            Some(e) => Output::warning(e),
            None if aggregate.web_results.is_empty() => Output::info("No web results found."),
            None => {
                for (i, result) in aggregate.web_results.iter().enumerate() {
                    Output::web_result(i + 1, result);
                }
            }
        }
    }

    if only.shows(SearchSection::Images) {
        Output::header("Images");
        if aggregate.images.is_empty() {
            Output::info("No images found.");
        }
        for image in &aggregate.images {
            Output::list_item(image);
        }
    }

    if only.shows(SearchSection::Videos) {
        Output::header("Videos");
        match &aggregate.video_error {
            Some(e) => Output::warning(e),
            None if aggregate.video_results.is_empty() => Output::info("No videos found."),
            None => {
                for (i, video) in aggregate.video_results.iter().enumerate() {
                    Output::video_result(i + 1, video);
                }
            }
        }
    }

    println!();
}
