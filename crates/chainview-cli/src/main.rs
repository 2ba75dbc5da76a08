use anyhow::Result;
use chainview_core::chain::Blockchain;
use chainview_core::constants::DEFAULT_DIFFICULTY;
use chainview_render::{ChainView, HtmlContainer};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chainview-cli")]
#[command(about = "Build a demo blockchain and render it as an HTML page")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine a small demo chain and export it as a JSON document
    Generate {
        /// Output path for the exported chain
        #[arg(long, default_value = "blockchain_data.json")]
        output: PathBuf,
        /// Leading zero hex digits required of each mined block hash
        #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,
        /// Search the nonce space across threads
        #[arg(long)]
        parallel: bool,
    },
    /// Fetch a chain document and render it as an HTML page
    Render {
        /// URL of the chain document (e.g. http://127.0.0.1:8000/blockchain_data.json)
        #[arg(long)]
        url: String,
        /// Write the page here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate {
            output,
            difficulty,
            parallel,
        } => {
            let mut chain = Blockchain::new(difficulty);
            chain.add_transaction("Alice", "Bob", 50);
            chain.add_transaction("Bob", "Charlie", 30);
            info!("mining block 1");
            mine(&mut chain, parallel);
            chain.add_transaction("Charlie", "Alice", 20);
            info!("mining block 2");
            mine(&mut chain, parallel);

            tokio::fs::write(&output, chain.to_json()?).await?;
            println!(
                "wrote {} blocks to {}",
                chain.blocks().len(),
                output.display()
            );
        }
        Command::Render { url, output } => {
            let view = ChainView::new(url);
            let mut container = HtmlContainer::new("blockchain");
            view.load_and_render(&mut container).await;
            let page = container.into_page();
            match output {
                Some(path) => {
                    tokio::fs::write(&path, page).await?;
                    println!("wrote page to {}", path.display());
                }
                None => println!("{page}"),
            }
        }
    }
    Ok(())
}

fn mine(chain: &mut Blockchain, parallel: bool) {
    if parallel {
        chain.add_block_parallel();
    } else {
        chain.add_block();
    }
}
