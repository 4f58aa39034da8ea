use crate::{
    config::Config,
    error::Error,
    fetch::Fetcher,
    log_error,
    state::{dispatcher, Completion, Dispatch, Snapshot, Ticket, ViewState},
    urls::Endpoints,
};
use miette::Report;
use time::OffsetDateTime;
use tokio::task::JoinHandle;

/// Shows when it last rained.
///
/// State lives in a dispatcher task; fetches run as their own tasks and report back through it.
/// At most one fetch is in flight, and a torn down view ignores whatever arrives late.
pub struct RainStatusView {
    dispatch: Dispatch<ViewState>,
    fetcher: Fetcher,
    url: String,
    inflight: Option<JoinHandle<()>>,
}

impl RainStatusView {
    /// Must be called from within a tokio runtime.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_clock(config, OffsetDateTime::now_utc)
    }

    pub fn with_clock(config: &Config, clock: fn() -> OffsetDateTime) -> Result<Self, Error> {
        let url = Endpoints::new(&config.base_url)?.last_rain();
        let fetcher = Fetcher::new(config.timeout)?;

        let (dispatch, state_loop) = dispatcher(ViewState::new(config.placeholder.clone(), clock));
        tokio::spawn(state_loop);

        Ok(Self {
            dispatch,
            fetcher,
            url,
            inflight: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue the first fetch. Returns `false` if one is already in flight.
    pub async fn initialize(&mut self) -> bool {
        let ticket = self.dispatch.run(ViewState::begin_fetch).await;
        self.spawn_fetch(ticket)
    }

    /// Refetch if the last load brought a new raw timestamp.
    pub async fn on_update(&mut self) -> bool {
        let ticket = self.dispatch.run(ViewState::begin_update).await;
        self.spawn_fetch(ticket)
    }

    /// Wait for the in-flight fetch, if any, to settle.
    pub async fn wait(&mut self) {
        if let Some(task) = self.inflight.take() {
            if let Err(e) = task.await {
                log::error!("fetch task failed: {e}");
            }
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.dispatch.run(|s| s.snapshot()).await
    }

    /// Mark the view torn down and return its final state.
    ///
    /// A fetch still in flight is left to finish; its result is ignored. No further fetches
    /// are issued.
    pub async fn teardown(&mut self) -> Snapshot {
        self.dispatch
            .run(|s| {
                s.tear_down();
                s.snapshot()
            })
            .await
    }

    fn spawn_fetch(&mut self, ticket: Option<Ticket>) -> bool {
        let Some(ticket) = ticket else {
            log::debug!("fetch not issued for {}", self.url);
            return false;
        };

        let dispatch = self.dispatch.clone();
        let fetcher = self.fetcher.clone();
        let url = self.url.clone();
        log::info!("Fetching last rain from {url}");

        self.inflight = Some(tokio::spawn(async move {
            let result = fetcher.last_rain(&url).await;
            match dispatch.run(move |s| s.complete(ticket, result)).await {
                Completion::Loaded => log::info!("Fetched latest rain event"),
                Completion::Failed(e) => log_error(Report::new(e).wrap_err(format!("URL: {url}"))),
                Completion::Ignored => log::debug!("dropped stale result from {url}"),
            }
        }));

        true
    }
}
