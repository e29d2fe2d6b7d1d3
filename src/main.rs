use image_fetcher::cli::{parse_args, print_catalog};
use image_fetcher::{Downloader, FetchError};

const RULE: &str = "============================================================";

fn main() -> Result<(), FetchError> {
    let args = parse_args()?;

    if args.list_only {
        print_catalog(&args.catalog);
        return Ok(());
    }

    tracing::debug!(settings = ?args.settings, log_level = %args.log_level, "Resolved settings");

    let downloader = Downloader::new(&args.settings)?;

    println!("{}", RULE);
    println!("Downloading {} images into {}", args.catalog.len(), downloader.root().display());
    println!("{}", RULE);

    let result = downloader.run(&args.catalog)?;

    println!("{}", RULE);
    println!(
        "done! succeeded: {}, failed: {}",
        result.success_count, result.fail_count
    );
    println!("{}", RULE);

    Ok(())
}
