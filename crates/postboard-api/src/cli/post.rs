//! Post CLI commands: list, show, delete.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use postboard_types::listing::{ListingRequest, PageResult};
use postboard_types::post::PostId;
use postboard_types::user::Caller;

use crate::cli::contact::truncate;
use crate::state::AppState;

/// Listing flags as given on the command line.
#[derive(Debug, Default)]
pub struct ListPostsArgs {
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub cursor: Option<i64>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub author: Option<String>,
}

impl ListPostsArgs {
    fn to_request(&self) -> ListingRequest {
        let mut request = ListingRequest {
            skip: self.skip.map(Into::into),
            take: self.take.map(Into::into),
            ..Default::default()
        };
        if let Some(cursor) = self.cursor {
            request = request.with_cursor(cursor);
        }
        if let Some(filter) = &self.filter {
            request = request.with_filter(filter.clone());
        }
        if let Some(sort) = &self.sort {
            let order = self.order.clone().unwrap_or_else(|| "desc".to_string());
            request = request.with_order(sort.clone(), order);
        }
        request
    }
}

pub async fn list_posts(state: &AppState, args: ListPostsArgs, json: bool) -> Result<()> {
    let request = args.to_request();
    let take = args.take;

    let page = match &args.author {
        Some(username) => {
            let author = state.user_service.get_user_by_username(username).await?;
            state
                .post_service
                .list_posts_by_author(author.id, &request)
                .await?
        }
        None => state.post_service.list_posts(&request).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        println!();
        println!("  {} No posts found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Score").fg(Color::White),
        Cell::new("Author").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for post in &page.items {
        let score = if post.score < 0 {
            Cell::new(post.score).fg(Color::Red)
        } else {
            Cell::new(post.score).fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(post.id).fg(Color::DarkGrey),
            Cell::new(truncate(&post.title, 50)).fg(Color::Cyan),
            score,
            Cell::new(post.author_id),
            Cell::new(post.created_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} post{}{}",
        style(page.count).bold(),
        if page.count == 1 { "" } else { "s" },
        next_page_hint(&page, take)
            .map(|hint| format!(" (next page: {hint})"))
            .unwrap_or_default()
    );
    println!();

    Ok(())
}

/// Flags that fetch the page after `page`. The cursor row itself is the
/// first row of a cursor seek, so it is skipped.
fn next_page_hint<T>(page: &PageResult<T>, take: Option<i64>) -> Option<String> {
    match (page.end, page.cursor.id, take) {
        (false, Some(id), Some(take)) => Some(format!("--cursor {id} --skip 1 --take {take}")),
        _ => None,
    }
}

pub async fn show_post(state: &AppState, id: i64, json: bool) -> Result<()> {
    let id = PostId(id);
    let post = state.post_service.require_post(id).await?;
    let author = state.post_service.author(id).await?;
    let comments = state.post_service.comments(id).await?;

    if json {
        let out = serde_json::json!({
            "post": post,
            "author": author,
            "comments": comments,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&post.title).cyan().bold());
    println!();
    println!("  {}", style("── Details ──").dim());
    println!(
        "  {}  {}",
        style("Author:").bold(),
        author.map(|a| a.username).unwrap_or_else(|| "(deleted)".to_string())
    );
    println!("  {}  {}", style("Score:").bold(), post.score);
    println!("  {}  {}", style("Comments:").bold(), comments.len());
    if let Some(url) = &post.header_image_url {
        println!("  {}  {}", style("Image:").bold(), style(url).dim());
    }
    println!("  {}  {}", style("Created:").bold(), post.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("  {}  {}", style("Updated:").bold(), post.updated_at.format("%Y-%m-%d %H:%M UTC"));
    println!();
    println!("  {}", style("── Body ──").dim());
    println!("  {}", truncate(&post.body, 400));
    println!();

    Ok(())
}

pub async fn delete_post(state: &AppState, caller: &Caller, id: i64, json: bool) -> Result<()> {
    let deleted = state.post_service.delete_post(caller, PostId(id)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&deleted)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Deleted '{}' ({} vote{} removed).",
        style("✓").red().bold(),
        deleted.post.title,
        deleted.votes.len(),
        if deleted.votes.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
