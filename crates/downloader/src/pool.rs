use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::downloader::Downloader;

/// Bounded pool of downloaders (one per token) shared by concurrent
/// top-level downloads. The lifecycle is begin → with_downloader* → end;
/// begin and end snapshot the per-token rate limits so a run can report how
/// much of the API budget it burned.
pub struct DownloaderPool {
    all: Vec<Arc<Downloader>>,
    available: std::sync::Mutex<Vec<Arc<Downloader>>>,
    slots: Semaphore,
    state: Mutex<PoolState>,
}

#[derive(Debug)]
enum PoolState {
    Idle,
    Active { started: Instant, rates: Vec<i64> },
    Ended,
}

#[derive(Debug)]
pub struct PoolStats {
    pub elapsed: Duration,
    pub rates: Vec<RateUsage>,
}

/// Per-token API usage between begin and end. The numbers are off when a
/// rate reset happens inside the run.
#[derive(Debug)]
pub struct RateUsage {
    pub used: i64,
    pub per_minute: f64,
}

impl DownloaderPool {
    pub fn new(downloaders: Vec<Arc<Downloader>>) -> Self {
        Self {
            slots: Semaphore::new(downloaders.len()),
            available: std::sync::Mutex::new(downloaders.clone()),
            all: downloaders,
            state: Mutex::new(PoolState::Idle),
        }
    }

    pub fn size(&self) -> usize {
        self.all.len()
    }

    pub async fn begin(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !matches!(*state, PoolState::Idle) {
            return Err(anyhow!("invalid pool state for begin: {:?}", *state));
        }

        let started = Instant::now();
        let rates = self.snapshot().await?;
        *state = PoolState::Active { started, rates };
        Ok(())
    }

    /// Runs `f` with a downloader checked out of the pool; blocks until one
    /// is free. The downloader returns to the pool even when the future is
    /// dropped mid-flight.
    pub async fn with_downloader<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Arc<Downloader>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let state = self.state.lock().await;
            if !matches!(*state, PoolState::Active { .. }) {
                return Err(anyhow!(
                    "invalid pool state for with_downloader: {:?}",
                    *state
                ));
            }
        }

        let _permit = self
            .slots
            .acquire()
            .await
            .context("downloader pool closed")?;

        let downloader = self
            .available
            .lock()
            .expect("downloader pool poisoned")
            .pop()
            .expect("a held permit guarantees an available downloader");

        let _checkout = Checkout {
            available: &self.available,
            downloader: Some(downloader.clone()),
        };

        f(downloader).await
    }

    pub async fn end(&self) -> Result<PoolStats> {
        let mut state = self.state.lock().await;
        let (started, rates_before) = match &*state {
            PoolState::Active { started, rates } => (*started, rates.clone()),
            other => return Err(anyhow!("invalid pool state for end: {other:?}")),
        };

        let elapsed = started.elapsed();
        let rates_after = self.snapshot().await?;
        *state = PoolState::Ended;

        let minutes = elapsed.as_secs_f64() / 60.0;
        let rates = rates_before
            .into_iter()
            .zip(rates_after)
            .map(|(before, after)| {
                let used = before - after;
                RateUsage {
                    used,
                    per_minute: if minutes > 0.0 {
                        used as f64 / minutes
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        Ok(PoolStats { elapsed, rates })
    }

    async fn snapshot(&self) -> Result<Vec<i64>> {
        let mut rates = Vec::with_capacity(self.all.len());
        for downloader in &self.all {
            rates.push(downloader.rate_remaining().await?);
        }
        Ok(rates)
    }
}

struct Checkout<'a> {
    available: &'a std::sync::Mutex<Vec<Arc<Downloader>>>,
    downloader: Option<Arc<Downloader>>,
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if let Some(downloader) = self.downloader.take() {
            self.available
                .lock()
                .expect("downloader pool poisoned")
                .push(downloader);
        }
    }
}

/// Downloads every repository of `owner` with one worker per repository,
/// bounded by the pool capacity. The first failure aborts the remaining
/// workers and is returned.
pub async fn download_repositories(
    pool: Arc<DownloaderPool>,
    owner: &str,
    repositories: &[String],
    version: i32,
) -> Result<()> {
    let mut join_set = JoinSet::new();

    for repository in repositories {
        let pool = pool.clone();
        let owner = owner.to_string();
        let repository = repository.clone();
        join_set.spawn(async move {
            let label = format!("{owner}/{repository}");
            pool.with_downloader(move |d| async move {
                d.download_repository(&owner, &repository, version).await
            })
            .await
            .with_context(|| format!("failed to download repository {label}"))
        });
    }

    let mut first_err = None;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                if first_err.is_none() {
                    first_err = Some(err);
                    join_set.abort_all();
                }
            }
            Err(join_err) => {
                if !join_err.is_cancelled() && first_err.is_none() {
                    first_err = Some(anyhow!("download worker panicked: {join_err}"));
                    join_set.abort_all();
                }
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
