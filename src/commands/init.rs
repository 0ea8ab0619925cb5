use crate::{
    InitArgs,
    config::{Config, ContentConfig, DEFAULT_CONFIG_FILE, MarkdownConfig, SiteConfig, ThemeConfig},
};

const SAMPLE_POST: &str = r#"---
title: Hello, quire
date: 2024-01-01
description: A first article
tags: [meta]
---
# Hello

This article lives in `posts/hello.md`. Run `quire build` and open
`_site/index.html` to see it.
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    let config_file = path.join(DEFAULT_CONFIG_FILE);
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "Config file already exists: {config_file}",
            config_file = config_file.display()
        ));
    }

    let default_config = Config {
        site: SiteConfig {
            name: "My quire site".into(),
            url: None,
            output: "_site".into(),
        },
        content: ContentConfig::default(),
        theme: ThemeConfig::default(),
        markdown: MarkdownConfig::default(),
    };

    println!("Initializing project in {}", path.display());

    let config_text = serde_yaml::to_string(&default_config)?;
    tokio::fs::write(&config_file, config_text).await?;
    println!(
        "Created config file {config_file}",
        config_file = config_file.display()
    );

    let content_dir = path.join(&default_config.content.path);
    let sample = content_dir.join("hello.md");
    if !sample.exists() {
        tokio::fs::create_dir_all(&content_dir).await?;
        tokio::fs::write(&sample, SAMPLE_POST).await?;
        println!("Created sample post {}", sample.display());
    }

    Ok(())
}
