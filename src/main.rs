use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use comment_thread::api::{HttpThreadApi, ThreadApi};
use comment_thread::config::{Cli, Command, Config};
use comment_thread::context::ThreadContext;
use comment_thread::html::render_fragment;
use comment_thread::model::{CommentId, ReplyId};
use comment_thread::renderer::{Outcome, ThreadRenderer};
use comment_thread::routes;
use comment_thread::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered HTML on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let api: Arc<dyn ThreadApi> = Arc::new(HttpThreadApi::parse(&config.api.base_url)?);
    tracing::debug!("Using backend at {}", config.api.base_url);

    let page = match &cli.command {
        Command::Serve { .. } => return serve(&config, api).await,
        Command::Show { page }
        | Command::Comment { page, .. }
        | Command::Reply { page, .. }
        | Command::EditComment { page, .. }
        | Command::EditReply { page, .. }
        | Command::DeleteComment { page, .. }
        | Command::DeleteReply { page, .. } => page.clone(),
    };

    let mut renderer = ThreadRenderer::new(
        api,
        ThreadContext::from_page_path(&page),
        config.render_options(),
    );

    let outcome = match cli.command {
        Command::Show { .. } | Command::Serve { .. } => Outcome::Abandoned,
        Command::Comment { content, .. } => renderer.create_comment(&content).await,
        Command::Reply {
            comment_id,
            content,
            ..
        } => {
            renderer
                .create_reply(&CommentId::new(comment_id), &content)
                .await
        }
        Command::EditComment {
            comment_id,
            content,
            ..
        } => {
            renderer
                .update_comment(&CommentId::new(comment_id), &content)
                .await
        }
        Command::EditReply {
            reply_id, content, ..
        } => {
            renderer
                .update_reply(&ReplyId::new(reply_id), &content)
                .await
        }
        Command::DeleteComment { comment_id, .. } => {
            renderer.delete_comment(&CommentId::new(comment_id)).await
        }
        Command::DeleteReply { reply_id, .. } => {
            renderer.delete_reply(&ReplyId::new(reply_id)).await
        }
    };

    // Nothing was fetched yet when the command was a plain show or failed
    if outcome == Outcome::Abandoned {
        renderer.list_comments().await;
    }

    println!("{}", render_fragment(&renderer.view(), &page)?);
    Ok(())
}

async fn serve(config: &Config, api: Arc<dyn ThreadApi>) -> anyhow::Result<()> {
    let state = AppState {
        api,
        render: config.render_options(),
    };
    let app = routes::app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Serving comment threads on http://{}/posts/<id>", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
