//! Fetch favicons over the network and save them as PNG files.
//!
//! Resolution runs on the shared thread pool; results arrive on the
//! dispatch thread, which here just signals the main thread.
//!
//! Run with: cargo run -p horizon-favicon --example fetch_favicons -- github.com www.rust-lang.org

use std::collections::HashSet;
use std::sync::mpsc;
use std::time::Duration;

use horizon_favicon::{FaviconImage, FaviconRef, FaviconSupport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horizon_favicon=debug".into()),
        )
        .init();

    let mut domains: Vec<String> = std::env::args().skip(1).collect();
    if domains.is_empty() {
        domains = vec!["www.rust-lang.org".into(), "docs.rs".into()];
    }
    let size = 32;

    let (sender, receiver) = mpsc::channel();
    let support = FaviconSupport::builder()
        .on_update(move |favicon: &FaviconRef| {
            let _ = sender.send(favicon.clone());
        })
        .build()?;

    let fallback = FaviconImage::solid(size, [200, 200, 200, 255]);
    let mut waiting = HashSet::new();
    for domain in &domains {
        let favicon = FaviconRef::parse(domain, size)?;
        support.get_or_default(&favicon, &fallback);
        waiting.insert(favicon);
    }

    while !waiting.is_empty() {
        let favicon = receiver.recv_timeout(Duration::from_secs(60))?;
        waiting.remove(&favicon);

        match support.state(&favicon).as_ref().and_then(|state| state.image()) {
            Some(image) => {
                let path = format!("{}-{}.png", favicon.domain(), favicon.size());
                std::fs::write(&path, image.encode_png()?)?;
                println!("{favicon}: saved {path}");
            }
            None => println!("{favicon}: no favicon"),
        }
    }

    Ok(())
}
