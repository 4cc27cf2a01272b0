//! `bucketzip list` – show matching archives without downloading.

use anyhow::Result;
use bucketzip_core::config::HarvestConfig;
use bucketzip_core::control::AbortToken;
use bucketzip_core::harvest;

pub async fn run_list(cfg: &HarvestConfig, json: bool) -> Result<()> {
    let listed = harvest::scan(cfg, &AbortToken::new()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }
    if listed.is_empty() {
        println!("No archives in {} match {:?}.", cfg.listing_url, cfg.pattern);
    } else {
        println!("{:<5} {:<40} {}", "#", "NAME", "URL");
        for (i, item) in listed.iter().enumerate() {
            println!("{:<5} {:<40} {}", i + 1, item.name, item.url);
        }
    }
    Ok(())
}
