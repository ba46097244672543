use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use crate::models::{
    error::{FetchError, FetchErrorClass},
    snapshot::{parse, Snapshot},
};
use crate::utils::upstream::Upstream;

pub const PAST_WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Today,
    PastWeek,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanOutResult {
    pub today: Snapshot,
    pub past_week: Snapshot,
}

#[derive(Debug)]
enum FanOutState {
    Pending,
    PartialSuccess(Role, Snapshot),
    Success(FanOutResult),
    Failed(FetchError),
}

impl FanOutState {
    fn fill(self, role: Role, snapshot: Snapshot) -> Self {
        match self {
            FanOutState::Pending => FanOutState::PartialSuccess(role, snapshot),
            FanOutState::PartialSuccess(held, other) if held != role => {
                let (today, past_week) = match role {
                    Role::Today => (snapshot, other),
                    Role::PastWeek => (other, snapshot),
                };
                FanOutState::Success(FanOutResult { today, past_week })
            }
            FanOutState::PartialSuccess(_, _) => FanOutState::PartialSuccess(role, snapshot),
            terminal => terminal,
        }
    }

    fn fail(self, err: FetchError) -> Self {
        match self {
            FanOutState::Success(_) | FanOutState::Failed(_) => self,
            _ => FanOutState::Failed(err),
        }
    }

    fn awaits(&self, role: Role) -> bool {
        match self {
            FanOutState::Pending => true,
            FanOutState::PartialSuccess(held, _) => *held != role,
            _ => false,
        }
    }
}

/// Fetches the "today" and "seven days ago" snapshots concurrently. The first failing leg
/// decides the outcome; the other leg is left to finish on its own and its result is dropped.
#[derive(Clone)]
pub struct FanOutCoordinator {
    upstream: Arc<dyn Upstream>,
    tracked_unit: String,
    leg_timeout: Duration,
}

impl FanOutCoordinator {
    pub fn new(upstream: Arc<dyn Upstream>, tracked_unit: &str, leg_timeout: Duration) -> Self {
        Self {
            upstream,
            tracked_unit: tracked_unit.to_string(),
            leg_timeout,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> Result<FanOutResult, FetchError> {
        let past_week = today - chrono::Duration::days(PAST_WEEK_DAYS);

        let (today_tx, mut today_rx) = mpsc::channel::<Snapshot>(1);
        let (past_tx, mut past_rx) = mpsc::channel::<Snapshot>(1);
        // Room for both legs so an abandoned leg never blocks on send.
        let (err_tx, mut err_rx) = mpsc::channel::<FetchError>(2);

        self.spawn_leg(today, today_tx, err_tx.clone());
        self.spawn_leg(past_week, past_tx, err_tx);

        let mut state = FanOutState::Pending;
        loop {
            let wants_today = state.awaits(Role::Today);
            let wants_past = state.awaits(Role::PastWeek);

            state = tokio::select! {
                Some(err) = err_rx.recv() => state.fail(err),
                Some(snapshot) = today_rx.recv(), if wants_today => {
                    debug!("today leg resolved for {} ({} base)", snapshot.date, snapshot.base_unit);
                    state.fill(Role::Today, snapshot)
                }
                Some(snapshot) = past_rx.recv(), if wants_past => {
                    debug!("past week leg resolved for {} ({} base)", snapshot.date, snapshot.base_unit);
                    state.fill(Role::PastWeek, snapshot)
                }
                else => state.fail(FetchError::new(
                    FetchErrorClass::Transport,
                    "fetch leg ended without reporting a result",
                )),
            };

            match state {
                FanOutState::Success(result) => return Ok(result),
                FanOutState::Failed(err) => return Err(err),
                _ => {}
            }
        }
    }

    fn spawn_leg(
        &self,
        date: NaiveDate,
        out: mpsc::Sender<Snapshot>,
        errs: mpsc::Sender<FetchError>,
    ) {
        let upstream = self.upstream.clone();
        let unit = self.tracked_unit.clone();
        let deadline = self.leg_timeout;

        tokio::spawn(async move {
            // Sends fail only once the request has already resolved, so they are ignored.
            match fetch_snapshot(upstream.as_ref(), date, &unit, deadline).await {
                Ok(snapshot) => {
                    let _ = out.send(snapshot).await;
                }
                Err(err) => {
                    let _ = errs.send(err).await;
                }
            }
        });
    }
}

/// One leg: fetch within `deadline`, then decode and validate.
pub async fn fetch_snapshot(
    upstream: &dyn Upstream,
    date: NaiveDate,
    unit: &str,
    deadline: Duration,
) -> Result<Snapshot, FetchError> {
    let raw = match timeout(deadline, upstream.fetch(date, deadline)).await {
        Ok(res) => res?,
        Err(_) => {
            debug!("request for {} exceeded {:?}", date, deadline);
            return Err(FetchError::new(
                FetchErrorClass::Transport,
                format!("request for {} exceeded deadline of {:?}", date, deadline),
            ));
        }
    };

    let mut snapshot = parse(&raw, unit).map_err(|mut err| {
        err.detail = format!("{} (date {})", err.detail, date);
        err
    })?;
    if snapshot.date.is_empty() {
        snapshot.date = date.format("%Y-%m-%d").to_string();
    }
    Ok(snapshot)
}
