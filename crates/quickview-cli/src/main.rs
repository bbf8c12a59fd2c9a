mod commands;
mod view;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quickview")]
#[command(about = "Storefront product quick view")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a product and print what the quick view would show
    Show {
        /// Product handle, or a title when `--title` is given
        product: String,

        /// Treat PRODUCT as a title and derive the handle from it
        #[arg(long)]
        title: bool,
    },
    /// Select options and add the product to the cart
    Add {
        /// Product handle, or a title when `--title` is given
        product: String,

        /// Option choice such as `Color=Black`; repeat for each option
        #[arg(long = "option", value_name = "NAME=VALUE", value_parser = parse_option_pair)]
        options: Vec<(String, String)>,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Treat PRODUCT as a title and derive the handle from it
        #[arg(long)]
        title: bool,
    },
}

fn parse_option_pair(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected NAME=VALUE, got '{raw}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

fn product_handle(product: &str, is_title: bool) -> String {
    if is_title {
        quickview_core::handleize(product)
    } else {
        product.to_owned()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = quickview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let controller = commands::build_controller(&config)?;

    match cli.command {
        Commands::Show { product, title } => {
            commands::run_show(&controller, &product_handle(&product, title)).await
        }
        Commands::Add {
            product,
            options,
            quantity,
            title,
        } => {
            commands::run_add(
                &controller,
                &product_handle(&product, title),
                &options,
                quantity,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests;
