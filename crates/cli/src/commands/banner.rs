//! Banner command - hero carousel slides

use anyhow::{Context, Result};
use gazette_domain::usecases::{Carousel, Slide};
use std::path::PathBuf;
use std::time::Duration;

use crate::args::BannerArgs;
use crate::commands::{build_gateway, build_session};
use crate::config::AppConfig;

pub async fn execute(args: BannerArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);
    let gateway = build_gateway(&config, &session).await?;

    let carousel = Carousel::new(config.carousel.banner_url.clone());
    carousel
        .load(gateway.as_ref())
        .await
        .context("Failed to load carousel")?;

    if args.json {
        let json = serde_json::to_string_pretty(&carousel.slides())
            .context("Failed to serialize slides")?;
        println!("{}", json);
        return Ok(());
    }

    for (i, slide) in carousel.slides().iter().enumerate() {
        print_slide(i, slide, i == carousel.active());
    }

    if args.cycles > 0 {
        let period = Duration::from_secs(config.carousel.rotation_secs.max(1));
        let handle = carousel.spawn_rotation(period);
        // Sample just after each tick
        tokio::time::sleep(Duration::from_millis(100)).await;
        for _ in 0..args.cycles {
            tokio::time::sleep(period).await;
            let active = carousel.active();
            print_slide(active, &carousel.current(), true);
        }
        handle.stop();
    }

    Ok(())
}

fn print_slide(index: usize, slide: &Slide, active: bool) {
    let marker = if active { ">" } else { " " };
    println!(
        "{} {}. {} - {} ({})",
        marker,
        index + 1,
        slide.title,
        slide.subtitle,
        slide.accent
    );
}
