use anyhow::Context;

use crate::{
    BuildArgs,
    build::{Builder, base_path_from_config},
    config::Config,
};

use super::config_path;

/// Build the site, returning whether every document made it to the output.
pub async fn run(args: &BuildArgs) -> Result<bool, anyhow::Error> {
    let config_path = config_path(args.config_file.as_deref())?;
    let config = Config::load_from_arg(Some(config_path.as_path())).await?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    // The pipeline itself is synchronous
    let builder = Builder::new(config, base_path);
    let report = tokio::task::spawn_blocking(move || builder.build())
        .await
        .context("build task panicked")??;

    for page in &report.succeeded {
        println!(
            "  ok    {} -> {} ({} bytes)",
            page.source_path.display(),
            page.output_path.display(),
            page.html.len()
        );
    }
    for error in &report.failed {
        println!("  FAIL  {error}");
    }
    for failure in &report.index_failed {
        println!("  FAIL  index page {}: {}", failure.url, failure.error);
    }

    println!(
        "Built site to {} ({} pages, {} failed, {} index pages)",
        report.output_dir.display(),
        report.succeeded.len(),
        report.failed.len(),
        report.index_written.len()
    );

    Ok(!report.has_failures())
}
