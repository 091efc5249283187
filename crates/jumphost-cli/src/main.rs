use anyhow::Context;
use clap::{Parser, Subcommand};
use jumphost::{DoApi, DropletManager};
use jumphost_core::{Error, JumpHostConfig, NameFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jumphost", version)]
#[command(about = "Deploy, inspect and drop one jump host droplet per region", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// DigitalOcean API token
    #[arg(long, env = "DIGITALOCEAN_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Droplet name template with one `%s` for the region
    #[arg(long, env = "JUMPHOST_NAME_FORMAT", global = true)]
    name_format: Option<String>,

    /// Image used when deploy gets no --image
    #[arg(long, env = "JUMPHOST_DEFAULT_IMAGE", global = true)]
    default_image: Option<String>,

    /// API base URL
    #[arg(long, env = "DIGITALOCEAN_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Create the jump host for a region
    Deploy {
        /// Region slug, e.g. ams3
        region: String,
        /// Private image name
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Print status and public IP of the jump host
    Show {
        /// Region slug
        region: String,
    },
    /// Delete the jump host for a region
    Drop {
        /// Region slug
        region: String,
    },
    /// List private images
    Images,
}

impl Cli {
    /// File config (if any) with command line values layered on top.
    fn load_config(&self) -> anyhow::Result<JumpHostConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                JumpHostConfig::from_json(&raw)?
            }
            None => JumpHostConfig::default(),
        };

        if let Some(url) = &self.api_url {
            config.api.api_url.clone_from(url);
        }
        if let Some(format) = &self.name_format {
            config.droplet.name_format = Some(NameFormat::parse(format.as_str())?);
        }
        if let Some(image) = &self.default_image {
            config.droplet.default_image_name = Some(image.clone());
        }

        Ok(config.validated()?)
    }
}

fn manager(cli: &Cli) -> anyhow::Result<DropletManager> {
    let config = cli.load_config()?;
    debug!(api_url = %config.api.api_url, "Loaded configuration");

    let mut api = DoApi::new(config.api);
    if let Some(token) = &cli.token {
        api.set_token(token.as_str());
    }
    Ok(DropletManager::new(api, config.droplet))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut manager = manager(&cli)?;

    match cli.command {
        Commands::Deploy { region, image } => {
            let state = manager.deploy(&region, image.as_deref()).await?;
            println!("{state}");
        }
        Commands::Show { region } => {
            let state = manager.show(&region).await?;
            println!("{state}");
        }
        Commands::Drop { region } => {
            manager.drop(&region).await?;
        }
        Commands::Images => {
            for image in manager.list_images().await? {
                println!("{}\t{}", image.id, image.name);
            }
        }
    }

    Ok(())
}

/// Exit status for a failed command: 2 for usage errors, 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(api_err) if api_err.is_usage_error() => 2,
        _ => 1,
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        Some(api_err) => eprintln!("error[{}]: {api_err}", api_err.error_code()),
        None => eprintln!("error: {err:#}"),
    }
    ExitCode::from(exit_status(err))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deploy_with_image() {
        let cli = Cli::try_parse_from([
            "jumphost",
            "--token",
            "dop_v1_test",
            "--name-format",
            "jump-%s.example.net",
            "deploy",
            "ams3",
            "--image",
            "bastion",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("dop_v1_test"));
        assert_eq!(
            cli.command,
            Commands::Deploy {
                region: "ams3".to_string(),
                image: Some("bastion".to_string()),
            }
        );
    }

    #[test]
    fn region_is_required() {
        assert!(Cli::try_parse_from(["jumphost", "show"]).is_err());
        assert!(Cli::try_parse_from(["jumphost"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "jumphost",
            "images",
            "--name-format",
            "bastion-%s",
            "--default-image",
            "golden",
            "--api-url",
            "http://127.0.0.1:8080/v2",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.api.api_url, "http://127.0.0.1:8080/v2");
        assert_eq!(
            config.droplet.name_format.unwrap().render("ams3"),
            "bastion-ams3"
        );
        assert_eq!(
            config.droplet.default_image_name.as_deref(),
            Some("golden")
        );
        assert_eq!(config.droplet.size, "512mb");
    }

    #[test]
    fn bad_name_format_is_rejected() {
        let cli =
            Cli::try_parse_from(["jumphost", "--name-format", "jump", "show", "ams3"]).unwrap();
        let err = cli.load_config().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ConfigError(_))
        ));
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let cli =
            Cli::try_parse_from(["jumphost", "--api-url", "not a url", "images"]).unwrap();
        let err = cli.load_config().unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().map(Error::error_code),
            Some("CONFIG_ERROR")
        );
    }

    #[test]
    fn usage_errors_exit_with_two() {
        let usage = anyhow::Error::from(Error::NotDeployed("jump-ams3".to_string()));
        assert_eq!(exit_status(&usage), 2);
        assert_eq!(exit_status(&anyhow::Error::from(Error::TokenNotSet)), 2);

        let api = anyhow::Error::from(Error::ServiceUnavailable("503".to_string()));
        assert_eq!(exit_status(&api), 1);
        assert_eq!(exit_status(&anyhow::anyhow!("reading config file")), 1);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli::try_parse_from([
            "jumphost",
            "--config",
            "/nonexistent/jumphost.json",
            "images",
        ])
        .unwrap();
        let err = cli.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }
}
