use clap::{Parser, Subcommand};
use inkpress::config::{self, load_content_config, load_ftp_config};
use inkpress::output;
use inkpress::pipeline;
use inkpress::publish::FtpPublisher;
use inkpress::scan;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inkpress", version, about = "Static content pipeline with themed image derivatives")]
struct Cli {
    /// Project root (holds content-config.yaml)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Staging directory for build output
    #[arg(short, long, default_value = ".temp")]
    staging: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site into the staging directory
    Build,
    /// Build, then upload the staging directory over FTP
    Deploy,
    /// Validate configuration and content without building
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let staging = if cli.staging.is_absolute() {
        cli.staging.clone()
    } else {
        cli.root.join(&cli.staging)
    };

    match cli.command {
        Command::Build => {
            let config = load_content_config(&cli.root)?;
            let summary = pipeline::build(&cli.root, &staging, &config)?;
            output::print_build_summary(&summary);
        }
        Command::Deploy => {
            let config = load_content_config(&cli.root)?;
            let ftp = load_ftp_config(&cli.root)?;
            let summary = pipeline::build(&cli.root, &staging, &config)?;
            output::print_build_summary(&summary);
            output::print_stage(&format!("Uploading to {}", ftp.host));
            let uploaded = FtpPublisher::new(ftp).publish(&staging)?;
            output::print_stage(&format!("Uploaded {uploaded} files"));
        }
        Command::Check => {
            let config = load_content_config(&cli.root)?;
            let posts = scan::posts(
                &cli.root.join(&config.posts_folder),
                &config.contents_folder,
                &config.posts_folder,
            )?;
            let pages_root = cli.root.join(&config.pages_folder);
            let pages = if pages_root.is_dir() {
                scan::pages(&pages_root)?
            } else {
                Vec::new()
            };
            println!(
                "{} posts, {} pages, {} themes",
                posts.len(),
                pages.len(),
                config.theme_image_resolutions.len()
            );
            if cli.root.join(config::FTP_CONFIG_FILE).is_file() {
                load_ftp_config(&cli.root)?;
            }
            output::print_stage("Content is valid");
        }
    }

    Ok(())
}
