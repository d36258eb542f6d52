//! Command-line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};

use blog_core::domain::EntityId;
use blog_core::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

#[derive(Debug, Parser)]
#[command(name = "blog-console", version, about = "Manage blog posts and comments")]
pub struct Cli {
    /// Where entities are stored.
    #[arg(long, env = "BLOG_BACKEND", value_enum, default_value_t = BackendKind::Http)]
    pub backend: BackendKind,

    #[command(subcommand)]
    pub resource: Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// REST API at `BLOG_API_URL`.
    Http,
    /// Process-local storage, discarded on exit.
    Memory,
}

#[derive(Debug, Subcommand)]
pub enum Resource {
    /// Blog posts
    #[command(subcommand)]
    Posts(EntityCommand),
    /// Comments on posts
    #[command(subcommand)]
    Comments(EntityCommand),
}

#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// List one page of the collection
    List(PageArgs),
    /// Full-text search
    Search {
        query: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one entity
    Get { id: EntityId },
    /// Create (without --id) or update (with --id) from field values
    Save {
        #[arg(long)]
        id: Option<String>,
        /// Field value as `path=value`, e.g. `creationDate=2020-01-01` or `post.id=3`
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete one entity
    Delete { id: EntityId },
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub size: u32,
    /// Sort expression, e.g. `id,asc`
    #[arg(long)]
    pub sort: Option<String>,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            page: args.page,
            size: args.size.max(1),
            sort: args.sort,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| format!("expected `field=value`, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_save_command() {
        let cli = Cli::try_parse_from([
            "blog-console",
            "--backend",
            "memory",
            "comments",
            "save",
            "-f",
            "text=hi there",
            "--field",
            "post.id=",
        ])
        .unwrap();

        assert_eq!(cli.backend, BackendKind::Memory);
        match cli.resource {
            Resource::Comments(EntityCommand::Save { id, fields }) => {
                assert_eq!(id, None);
                assert_eq!(
                    fields,
                    vec![
                        ("text".to_string(), "hi there".to_string()),
                        ("post.id".to_string(), String::new()),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_list_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["blog-console", "--backend", "http", "posts", "list"]).unwrap();
        let Resource::Posts(EntityCommand::List(args)) = cli.resource else {
            panic!("expected posts list");
        };
        assert_eq!(PageRequest::from(args), PageRequest::default());
    }

    #[test]
    fn test_field_without_separator_is_rejected() {
        assert!(parse_field("text").is_err());
        assert!(parse_field("=x").is_err());
        assert_eq!(parse_field("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
    }
}
