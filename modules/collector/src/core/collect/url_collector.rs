use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::FutureExt as _;
use reqwest::Method;
use tokio::sync::{Mutex as TokioMutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    base::{Logger, WaitGroup},
    core::UrlFetcher,
    model::{FetchResult, UrlCollectionData},
    prelude::*,
};

use super::CollectOption;

/// Fans a list of URLs out to a fixed pool of workers and gathers one
/// [`UrlCollectionData`] per input URL.
///
/// The work queue holds at most `worker_count` pending URLs, so the caller is
/// throttled while every worker is busy. Results come back in completion
/// order. Duplicate URLs are fetched and reported independently.
pub struct UrlCollector {
    fetcher: Arc<dyn UrlFetcher + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl UrlCollector {
    pub fn new(fetcher: Arc<dyn UrlFetcher + Send + Sync>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self { fetcher, logger }
    }

    pub async fn collect(&self, urls: &[String], timeout: Duration, method: &Method, worker_count: usize) -> Result<Vec<UrlCollectionData>> {
        self.collect_with_cancel(urls, timeout, method, worker_count, CancellationToken::new()).await
    }

    pub async fn collect_with_option(&self, urls: &[String], option: &CollectOption) -> Result<Vec<UrlCollectionData>> {
        let method: Method = option.method.into();
        self.collect(urls, option.timeout, &method, option.worker_count).await
    }

    /// Like [`UrlCollector::collect`], but stops fetching once `token` is
    /// cancelled. URLs not fetched by then, and fetches interrupted by the
    /// cancellation, are reported with [`ErrorKind::Canceled`].
    pub async fn collect_with_cancel(
        &self,
        urls: &[String],
        timeout: Duration,
        method: &Method,
        worker_count: usize,
        token: CancellationToken,
    ) -> Result<Vec<UrlCollectionData>> {
        if worker_count == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument).message("worker_count must be greater than zero"));
        }
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let (task_sender, task_receiver) = mpsc::channel::<String>(worker_count);
        let task_receiver = Arc::new(TokioMutex::new(task_receiver));
        let (result_sender, mut result_receiver) = mpsc::channel::<UrlCollectionData>(urls.len());

        let wg = WaitGroup::new();
        let panicked = Arc::new(AtomicBool::new(false));

        for _ in 0..worker_count {
            let worker = Worker {
                fetcher: self.fetcher.clone(),
                tasks: task_receiver.clone(),
                results: result_sender.clone(),
                timeout,
                method: method.clone(),
                token: token.clone(),
            };
            let guard = wg.worker();
            let panicked = panicked.clone();
            tokio::spawn(async move {
                let _guard = guard;
                if AssertUnwindSafe(worker.run()).catch_unwind().await.is_err() {
                    panicked.store(true, Ordering::SeqCst);
                }
            });
        }
        drop(task_receiver);

        for url in urls {
            // Fails only if every worker is gone.
            if task_sender.send(url.clone()).await.is_err() {
                break;
            }
        }
        drop(task_sender);

        wg.wait().await;
        drop(result_sender);

        if panicked.load(Ordering::SeqCst) {
            return Err(Error::new(ErrorKind::UnexpectedError).message("collect worker panicked"));
        }

        let mut results = Vec::with_capacity(urls.len());
        while let Some(data) = result_receiver.recv().await {
            match &data.error {
                Some(e) => self.logger.debug(&format!("collect url: {}, error: {}", data.url, e)),
                None => self.logger.debug(&format!("collect url: {}, error: none", data.url)),
            }
            results.push(data);
        }

        Ok(results)
    }
}

struct Worker {
    fetcher: Arc<dyn UrlFetcher + Send + Sync>,
    tasks: Arc<TokioMutex<mpsc::Receiver<String>>>,
    results: mpsc::Sender<UrlCollectionData>,
    timeout: Duration,
    method: Method,
    token: CancellationToken,
}

impl Worker {
    async fn run(self) {
        loop {
            let url = self.tasks.lock().await.recv().await;
            let Some(url) = url else {
                break;
            };

            let res = if self.token.is_cancelled() {
                Self::canceled("batch canceled before fetch")
            } else {
                tokio::select! {
                    res = self.fetcher.fetch(&url, self.timeout, &self.method) => res,
                    _ = self.token.cancelled() => Self::canceled("batch canceled during fetch"),
                }
            };

            if self.results.send(res.into_collection_data(url)).await.is_err() {
                break;
            }
        }
    }

    fn canceled(message: &str) -> FetchResult {
        FetchResult::failed(None, Error::new(ErrorKind::Canceled).message(message))
    }
}
