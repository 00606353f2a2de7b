use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use futures::future::BoxFuture;
use tokio::{fs, process::Command};
use url::Url;

/// Keeps a local copy of a listings dataset current.
pub trait DatasetMirror: Send + Sync {
    fn refresh(&self) -> BoxFuture<'_, Result<()>>;
    fn root(&self) -> &Path;
}

/// Shallow `git` checkout of a remote repository.
pub struct GitMirror {
    remote: Url,
    local: PathBuf,
}

impl GitMirror {
    pub fn new(remote: Url, local: PathBuf) -> Self {
        Self { remote, local }
    }

    async fn clone_fresh(&self) -> Result<()> {
        let local = self.local.display().to_string();
        run_git(None, &["clone", "--depth", "1", self.remote.as_str(), &local]).await?;
        tracing::info!(target: "mirror", remote = %self.remote, path = %local, "repository cloned fresh");
        Ok(())
    }

    async fn update(&self) -> Result<()> {
        run_git(Some(&self.local), &["fetch", "--depth", "1", "origin"]).await?;
        run_git(Some(&self.local), &["reset", "--hard", "FETCH_HEAD"]).await?;
        tracing::info!(target: "mirror", path = %self.local.display(), "repository updated");
        Ok(())
    }

    async fn is_repository(&self) -> bool {
        run_git(Some(&self.local), &["rev-parse", "--is-inside-work-tree"])
            .await
            .is_ok()
            && fs::metadata(self.local.join(".git")).await.is_ok()
    }
}

impl DatasetMirror for GitMirror {
    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if fs::metadata(&self.local).await.is_err() {
                return self.clone_fresh().await;
            }
            if self.is_repository().await {
                return self.update().await;
            }
            tracing::warn!(
                target: "mirror",
                path = %self.local.display(),
                "mirror directory is not a repository; re-cloning"
            );
            fs::remove_dir_all(&self.local)
                .await
                .with_context(|| format!("failed to remove {}", self.local.display()))?;
            self.clone_fresh().await
        })
    }

    fn root(&self) -> &Path {
        &self.local
    }
}

async fn run_git(cwd: Option<&Path>, args: &[&str]) -> Result<()> {
    let mut command = Command::new("git");
    if let Some(dir) = cwd {
        command.arg("-C").arg(dir);
    }
    command.args(args).env("GIT_TERMINAL_PROMPT", "0");

    let output = command
        .output()
        .await
        .with_context(|| format!("failed to spawn git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} exited with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
