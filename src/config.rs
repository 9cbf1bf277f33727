use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

use crate::view::{RenderOptions, DEFAULT_PROFILE_IMAGE};

#[derive(Parser, Debug)]
#[command(
    name = "comment-thread",
    about = "Render and manage the comment thread of a post"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the comment backend, e.g. http://127.0.0.1:8080
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the rendered thread for a page path such as /posts/42
    Show { page: String },

    /// Post a new comment
    Comment { page: String, content: String },

    /// Reply to a comment
    Reply {
        page: String,
        comment_id: String,
        content: String,
    },

    /// Replace the content of a comment
    EditComment {
        page: String,
        comment_id: String,
        content: String,
    },

    /// Replace the content of a reply
    EditReply {
        page: String,
        reply_id: String,
        content: String,
    },

    DeleteComment { page: String, comment_id: String },

    DeleteReply { page: String, reply_id: String },

    /// Serve the widget over HTTP
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub render: RenderConfig,
    pub server: ServerConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub default_profile_image: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| Self::data_dir(cli).join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref base_url) = cli.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Command::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".comment-thread")
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            default_profile_image: self.render.default_profile_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(data_dir: Option<PathBuf>, command: Command) -> Cli {
        Cli {
            config: None,
            base_url: None,
            data_dir,
            command,
        }
    }

    fn show() -> Command {
        Command::Show {
            page: "/posts/42".to_string(),
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.render.default_profile_image, "/image/profile/profile.png");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli(Some(PathBuf::from("/tmp/test-thread")), show());
        assert_eq!(Config::data_dir(&cli), PathBuf::from("/tmp/test-thread"));
    }

    #[test]
    fn data_dir_defaults_to_dot_comment_thread() {
        let dir = Config::data_dir(&cli(None, show()));
        assert!(dir.ends_with(".comment-thread"));
    }

    #[test]
    fn load_with_no_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&cli(Some(tmp.path().to_path_buf()), show())).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[api]
base_url = "http://backend.internal:9090"

[render]
default_profile_image = "/static/anon.png"
"#,
        )
        .unwrap();

        let mut cli = cli(Some(tmp.path().to_path_buf()), show());
        cli.config = Some(config_path);
        let config = Config::load(&cli).unwrap();

        assert_eq!(config.api.base_url, "http://backend.internal:9090");
        assert_eq!(config.render_options().default_profile_image, "/static/anon.png");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn config_file_in_data_dir_is_picked_up() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[server]\nport = 4100\n",
        )
        .unwrap();

        let config = Config::load(&cli(Some(tmp.path().to_path_buf()), show())).unwrap();
        assert_eq!(config.server.port, 4100);
    }

    #[test]
    fn cli_overrides_beat_toml_values() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[api]
base_url = "http://from-file:1"

[server]
host = "192.168.1.1"
port = 9000
"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(config_path),
            base_url: Some("http://from-cli:2".to_string()),
            data_dir: Some(tmp.path().to_path_buf()),
            command: Command::Serve {
                host: Some("10.0.0.1".to_string()),
                port: Some(4000),
            },
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.api.base_url, "http://from-cli:2");
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from([
            "comment-thread",
            "--base-url",
            "http://b:1",
            "reply",
            "/posts/42",
            "7",
            "hello",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://b:1"));
        assert_eq!(
            cli.command,
            Command::Reply {
                page: "/posts/42".into(),
                comment_id: "7".into(),
                content: "hello".into(),
            }
        );
    }
}
