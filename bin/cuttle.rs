use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use cuttle::{
    create_router, AppState, Document, SearchEngine, SearchMode, SearchOptions, ServerConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "cuttle")]
#[command(about = "Embedded full-text search engine with BM25 ranking", long_about = None)]
struct Cli {
    /// Data directory for storage
    #[arg(long, global = true, default_value = "./data/search.db")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Insert a document
    Insert {
        /// Document id
        #[arg(long)]
        id: String,

        /// Document title
        #[arg(long)]
        title: String,

        /// Document content
        #[arg(long)]
        content: String,

        /// Document URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Search for documents
    Search {
        /// Search query
        #[arg(long)]
        query: String,

        /// Maximum results
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Use BM25 ranking
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        ranked: bool,

        /// Search mode: and | or
        #[arg(long, default_value = "and")]
        mode: String,
    },
    /// Get a document by id
    Get {
        /// Document id
        #[arg(long)]
        id: String,
    },
    /// Delete a document
    Delete {
        /// Document id
        #[arg(long)]
        id: String,
    },
    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => serve(cli.data_dir, host, port).await,
        Command::Insert {
            id,
            title,
            content,
            url,
        } => insert(cli.data_dir, id, title, content, url),
        Command::Search {
            query,
            limit,
            ranked,
            mode,
        } => run_search(cli.data_dir, query, limit, ranked, mode),
        Command::Get { id } => get(cli.data_dir, id),
        Command::Delete { id } => delete(cli.data_dir, id),
        Command::Stats => stats(cli.data_dir),
    }
}

async fn serve(data_dir: PathBuf, host: String, port: u16) -> Result<()> {
    let config = ServerConfig {
        host,
        port,
        data_path: data_dir,
    };
    info!(
        "Starting cuttle v{} with data: {}",
        cuttle::VERSION,
        config.data_path.display()
    );

    let engine = Arc::new(SearchEngine::open(&config.data_path)?);
    let app = create_router(AppState {
        engine: engine.clone(),
    });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Received shutdown signal, exiting");
    if let Ok(engine) = Arc::try_unwrap(engine) {
        engine.close()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn insert(
    data_dir: PathBuf,
    id: String,
    title: String,
    content: String,
    url: Option<String>,
) -> Result<()> {
    let engine = SearchEngine::open(&data_dir)?;

    let mut doc = Document::new(id.clone(), title, content);
    doc.url = url;
    engine.upsert_document(doc)?;
    engine.close()?;

    println!("Document '{id}' inserted successfully");
    Ok(())
}

fn run_search(
    data_dir: PathBuf,
    query: String,
    limit: usize,
    ranked: bool,
    mode: String,
) -> Result<()> {
    let engine = SearchEngine::open(&data_dir)?;

    let options = SearchOptions {
        mode: if mode == "or" {
            SearchMode::Or
        } else {
            SearchMode::And
        },
        use_ranking: ranked,
        limit,
        ..SearchOptions::default()
    };

    let start = Instant::now();
    let result = engine.search(&query, &options)?;
    let elapsed = start.elapsed();
    engine.close()?;

    println!("\nSearch results for: \"{query}\"");
    println!("Found {} documents in {elapsed:?}\n", result.total);

    for (i, doc) in result.documents.iter().enumerate() {
        match result.scores.as_ref().and_then(|scores| scores.get(i)) {
            Some(score) => println!("{}. [score {score:.4}] {}", i + 1, doc.title),
            None => println!("{}. {}", i + 1, doc.title),
        }
        println!("   id: {}", doc.id);
        if let Some(url) = &doc.url {
            println!("   url: {url}");
        }
        println!("   content: {}\n", preview(&doc.content, 100));
    }
    Ok(())
}

fn get(data_dir: PathBuf, id: String) -> Result<()> {
    let engine = SearchEngine::open(&data_dir)?;
    let doc = engine.get_document(&id)?;
    engine.close()?;

    let Some(doc) = doc else {
        println!("Document '{id}' not found");
        return Ok(());
    };

    println!("\nDocument");
    println!("id:      {}", doc.id);
    println!("title:   {}", doc.title);
    if let Some(url) = &doc.url {
        println!("url:     {url}");
    }
    println!("content: {}\n", doc.content);
    Ok(())
}

fn delete(data_dir: PathBuf, id: String) -> Result<()> {
    let engine = SearchEngine::open(&data_dir)?;
    engine.delete_document(&id)?;
    engine.close()?;

    println!("Document '{id}' deleted successfully");
    Ok(())
}

fn stats(data_dir: PathBuf) -> Result<()> {
    let engine = SearchEngine::open(&data_dir)?;
    let stats = engine.stats();
    engine.close()?;

    println!("\nIndex statistics");
    println!("Total documents:     {}", stats.total_documents);
    println!("Total unique tokens: {}", stats.total_tokens);
    println!("Avg docs per token:  {:.2}\n", stats.avg_docs_per_token);
    Ok(())
}

fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_chars).collect();
    format!("{truncated}...")
}
