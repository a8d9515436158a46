//! draft-post - Draft, AI-polish, and track short social-media posts

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use libdraftcast::provider::HttpRewriteProvider;
use libdraftcast::service::posts::{ListQuery, NewPost, PostPage, PostUpdate};
use libdraftcast::service::transform::GenerateRequest;
use libdraftcast::service::DraftcastService;
use libdraftcast::{Config, DraftcastError, Post};

#[derive(Parser, Debug)]
#[command(name = "draft-post")]
#[command(version, about = "Draft, AI-polish, and track short social-media posts")]
#[command(long_about = r#"Draft, AI-polish, and track short social-media posts.

Posts are scoped to an owner identity resolved from --owner, DRAFTCAST_OWNER,
or the [identity] section of the config file (default: "local").

EXAMPLES:
    # Save a draft targeting two platforms
    draft-post new "we shipped v2 today" --platforms twitter,linkedin

    # Publish immediately, with tags
    draft-post new "we hit 1k users" --platforms twitter --tags milestone --publish

    # Rewrite content in a tone (falls back to a canned template offline)
    draft-post polish "we shipped v2 today" --tone hype --platform twitter

    # Ask for improvement suggestions (requires the rewrite provider)
    draft-post suggest "we shipped v2 today"

    # Browse and edit
    draft-post list --status draft --page 1 --limit 10
    draft-post show <id>
    draft-post edit <id> --status published
    draft-post delete <id>

    # Aggregates, JSON output for scripting
    draft-post stats --format json | jq .platform_breakdown

EXIT CODES:
    0 - Success
    1 - Error (configuration, database, provider)
    2 - Not found
    3 - Invalid input
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Owner identity (defaults to [identity].owner from config)
    #[arg(long, env = "DRAFTCAST_OWNER", global = true)]
    owner: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a post (reads content from stdin if not provided)
    New {
        content: Option<String>,

        /// Target platform(s), comma-separated (twitter, linkedin, instagram)
        #[arg(short, long, value_delimiter = ',', required = true)]
        platforms: Vec<String>,

        /// Tone the AI content was generated with
        #[arg(long)]
        tone: Option<String>,

        /// AI-generated content to store alongside the original
        #[arg(long)]
        ai_content: Option<String>,

        /// Tags, comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Media reference
        #[arg(long)]
        media: Option<String>,

        /// Create as published instead of draft
        #[arg(long)]
        publish: bool,
    },

    /// List posts, newest first
    List {
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Posts per page
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Filter by status (draft or published)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show a single post
    Show { id: String },

    /// Edit fields of a post; omitted flags leave fields unchanged
    Edit {
        id: String,

        /// Replace the original content
        #[arg(long)]
        content: Option<String>,

        /// Replace the AI-generated content
        #[arg(long)]
        ai_content: Option<String>,

        /// Replace the tone
        #[arg(long, conflicts_with = "clear_tone")]
        tone: Option<String>,

        /// Clear the stored tone
        #[arg(long)]
        clear_tone: bool,

        /// Replace the platform set, comma-separated
        #[arg(long, value_delimiter = ',')]
        platforms: Option<Vec<String>>,

        /// Replace the tags, comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Replace the media reference
        #[arg(long)]
        media: Option<String>,

        /// Change the status (draft or published)
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a post permanently
    Delete { id: String },

    /// Show per-status and per-platform statistics
    Stats,

    /// Rewrite content in a tone for a platform
    Polish {
        content: Option<String>,

        /// Rewrite tone (professional, funny, hype)
        #[arg(short, long)]
        tone: String,

        /// Target platform for the character budget
        #[arg(short, long, default_value = "twitter")]
        platform: String,
    },

    /// Ask the rewrite provider for improvement suggestions
    Suggest { content: Option<String> },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("error")
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<DraftcastError>()
            .map(DraftcastError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let owner = cli
        .owner
        .clone()
        .unwrap_or_else(|| config.identity.owner.clone());

    let provider = HttpRewriteProvider::from_config(&config.rewrite)
        .map_err(|e| DraftcastError::Transformation(e.to_string()))?;
    let service = DraftcastService::from_config(config, Arc::new(provider)).await?;

    let json = cli.format == "json";

    match cli.command {
        Command::New {
            content,
            platforms,
            tone,
            ai_content,
            tags,
            media,
            publish,
        } => {
            let fields = NewPost {
                original_content: read_content(content)?,
                ai_generated_content: ai_content,
                tone,
                platforms,
                tags: if tags.is_empty() { None } else { Some(tags) },
                media,
                status: publish.then(|| "published".to_string()),
            };
            let post = service.posts().create(&owner, fields).await?;

            if json {
                print_json(&post)?;
            } else if publish {
                println!("Post published: {}", post.id);
            } else {
                println!("Draft saved: {}", post.id);
            }
        }

        Command::List { page, limit, status } => {
            let query = ListQuery {
                page,
                limit,
                status,
            };
            let response = service.posts().list(&owner, query).await?;

            if json {
                print_json(&response)?;
            } else {
                print_post_page(&response);
            }
        }

        Command::Show { id } => {
            let post = service.posts().get(&owner, &id).await?;

            if json {
                print_json(&post)?;
            } else {
                print_post(&post);
            }
        }

        Command::Edit {
            id,
            content,
            ai_content,
            tone,
            clear_tone,
            platforms,
            tags,
            media,
            status,
        } => {
            let update = PostUpdate {
                original_content: content,
                ai_generated_content: ai_content,
                tone: if clear_tone {
                    Some(None)
                } else {
                    tone.map(Some)
                },
                platforms,
                tags,
                media,
                status,
            };
            let post = service.posts().update(&owner, &id, update).await?;

            if json {
                print_json(&post)?;
            } else {
                println!("Post updated: {}", post.id);
            }
        }

        Command::Delete { id } => {
            service.posts().delete(&owner, &id).await?;

            if json {
                println!("{{\"deleted\": \"{}\"}}", id);
            } else {
                println!("Post deleted: {}", id);
            }
        }

        Command::Stats => {
            let stats = service.posts().stats(&owner).await?;

            if json {
                print_json(&stats)?;
            } else {
                println!("Total posts: {}", stats.total_posts);
                println!("By status:");
                for (status, count) in &stats.status_breakdown {
                    println!("  {:<12} {}", status, count);
                }
                println!("By platform:");
                for (platform, count) in &stats.platform_breakdown {
                    println!("  {:<12} {}", platform, count);
                }
            }
        }

        Command::Polish {
            content,
            tone,
            platform,
        } => {
            let request = GenerateRequest {
                content: read_content(content)?,
                tone,
                platform,
            };
            let generated = service.transform().generate(request).await?;

            if json {
                print_json(&generated)?;
            } else {
                println!("{}", generated.generated_content);
                eprintln!(
                    "({}/{} characters, {} tone for {})",
                    generated.character_count,
                    generated.character_limit,
                    generated.tone,
                    generated.platform
                );
            }
        }

        Command::Suggest { content } => {
            let suggestion = service
                .transform()
                .suggest(&read_content(content)?)
                .await?;

            if json {
                print_json(&suggestion)?;
            } else {
                println!("{}", suggestion.suggestions);
            }
        }
    }

    Ok(())
}

/// Take content from the argument or fall back to stdin
fn read_content(arg: Option<String>) -> anyhow::Result<String> {
    match arg {
        Some(content) => Ok(content),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read content from stdin")?;
            Ok(buffer.trim_end().to_string())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn print_post_page(page: &PostPage) {
    for post in &page.posts {
        let platforms: Vec<&str> = post.platforms.iter().map(|p| p.as_str()).collect();
        println!(
            "{}  [{}]  {}  {}",
            post.id,
            post.status,
            platforms.join(","),
            snippet(&post.original_content, 50)
        );
    }
    println!(
        "Page {}/{} ({} total)",
        page.current_page,
        page.total_pages.max(1),
        page.total
    );
}

fn print_post(post: &Post) {
    println!("ID:        {}", post.id);
    println!("Status:    {}", post.status);
    let platforms: Vec<&str> = post.platforms.iter().map(|p| p.as_str()).collect();
    println!("Platforms: {}", platforms.join(", "));
    if let Some(tone) = post.tone {
        println!("Tone:      {}", tone);
    }
    if !post.tags.is_empty() {
        println!("Tags:      {}", post.tags.join(", "));
    }
    if !post.media.is_empty() {
        println!("Media:     {}", post.media);
    }
    println!("Created:   {}", format_timestamp(post.created_at));
    println!("Updated:   {}", format_timestamp(post.updated_at));
    println!();
    println!("{}", post.original_content);
    if !post.ai_generated_content.is_empty() {
        println!();
        println!("--- AI version ---");
        println!("{}", post.ai_generated_content);
    }
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn snippet(text: &str, max_chars: usize) -> String {
    let flattened = text.replace('\n', " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let truncated: String = flattened.chars().take(max_chars).collect();
    format!("{truncated}…")
}
