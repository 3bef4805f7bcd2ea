//! Retrieval operations: one day, a range of days, or every location.
//!
//! # Design
//! `DiningClient` pairs the sans-IO `MenuClient` with an `HttpTransport` and
//! an immutable `Config`. Fan-out calls spawn one tokio task per key, each
//! holding a permit from a semaphore sized to `Config::concurrent`, so a
//! single call never has more requests in flight than that.
//!
//! Every spawned task runs to completion; a failure does not abort the
//! others. Each task hands back its own result, and once all have finished
//! the failure with the earliest key in dispatch order is returned (smallest
//! offset, or registry order for locations). Remaining failures are logged.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::MenuClient;
use crate::error::DiningError;
use crate::http::HttpTransport;
use crate::registry::Config;
use crate::settings::Settings;
use crate::transport::UreqTransport;
use crate::types::DiningInfo;

#[derive(Debug)]
pub struct DiningClient<T = UreqTransport> {
    client: MenuClient,
    transport: Arc<T>,
    config: Arc<Config>,
}

impl<T> Clone for DiningClient<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

impl DiningClient<UreqTransport> {
    /// Build a client over ureq from `settings`, fetching the registry.
    pub async fn from_settings(settings: &Settings) -> Result<Self, DiningError> {
        Self::connect(settings.menu_client()?, UreqTransport::new(), settings.concurrent).await
    }
}

impl<T: HttpTransport> DiningClient<T> {
    /// Fetch the location registry from upstream and build a client around it.
    pub async fn connect(
        client: MenuClient,
        transport: T,
        concurrent: usize,
    ) -> Result<Self, DiningError> {
        let config = Config::fetch(&client, &transport, concurrent).await?;
        Ok(Self::with_config(client, transport, config))
    }

    /// Use a registry obtained elsewhere.
    pub fn with_config(client: MenuClient, transport: T, config: Config) -> Self {
        Self {
            client,
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Menu for one location on one date.
    ///
    /// The location is checked against the registry before any request is
    /// made.
    pub async fn get_dining(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<DiningInfo, DiningError> {
        self.config.validate_location(location)?;
        fetch_day(&self.client, self.transport.as_ref(), location, date).await
    }

    /// Menus for `location` on `date + offset` for every offset in
    /// `day_start..=day_end`, keyed by offset.
    pub async fn get_dining_days(
        &self,
        location: &str,
        date: NaiveDate,
        day_start: i64,
        day_end: i64,
    ) -> Result<BTreeMap<i64, DiningInfo>, DiningError> {
        self.config.ensure_initialized()?;
        if day_end < day_start {
            return Err(DiningError::InvalidDayRange {
                start: day_start,
                end: day_end,
            });
        }
        self.config.validate_location(location)?;

        let jobs = (day_start..=day_end)
            .map(|offset| {
                offset_date(date, offset).map(|day| {
                    let location = location.to_string();
                    let job = move |dining: Self| async move {
                        fetch_day(&dining.client, dining.transport.as_ref(), &location, day).await
                    };
                    (offset, job)
                })
            })
            .collect::<Result<Vec<_>, DiningError>>()?;

        let results = self.fan_out(jobs).await?;
        Ok(results.into_iter().collect())
    }

    /// Menus for every registry location on `date`, keyed by the location
    /// name each response reports.
    pub async fn get_dining_locations(
        &self,
        date: NaiveDate,
    ) -> Result<HashMap<String, DiningInfo>, DiningError> {
        self.config.ensure_initialized()?;

        let jobs = self
            .config
            .registry()
            .iter()
            .enumerate()
            .map(|(index, location)| {
                let location = location.to_string();
                let job = move |dining: Self| async move {
                    fetch_day(&dining.client, dining.transport.as_ref(), &location, date).await
                };
                (index, job)
            })
            .collect();

        let results = self.fan_out(jobs).await?;
        let mut by_location = HashMap::with_capacity(results.len());
        for (_, info) in results {
            if by_location.contains_key(&info.location) {
                return Err(DiningError::DuplicateLocation(info.location));
            }
            by_location.insert(info.location.clone(), info);
        }
        Ok(by_location)
    }

    /// Walk every registry location forward from `date` until its first
    /// unavailable day, at most `days` days out.
    ///
    /// Each location's walk is sequential and holds one permit for its whole
    /// duration, so at most `concurrent` locations are walked at once. The
    /// result is keyed by registry name; a location unavailable on `date`
    /// maps to an empty range. Any failed walk fails the call.
    pub async fn get_dining_full(
        &self,
        date: NaiveDate,
        days: i64,
    ) -> Result<HashMap<String, BTreeMap<i64, DiningInfo>>, DiningError> {
        self.config.ensure_initialized()?;

        let jobs = self
            .config
            .registry()
            .iter()
            .map(|location| {
                let name = location.to_string();
                let job = move |dining: Self| async move {
                    dining.get_dining_until_unavailable(&name, date, days).await
                };
                (location.to_string(), job)
            })
            .collect();

        let results = self.fan_out(jobs).await?;
        Ok(results.into_iter().collect())
    }

    /// Walk from `date` toward `date + days` one day at a time (backward when
    /// `days` is negative), stopping before the first unavailable day.
    ///
    /// Requests are issued sequentially, so a walk that hits an unlisted day
    /// early costs only as many calls as it needed.
    pub async fn get_dining_until_unavailable(
        &self,
        location: &str,
        date: NaiveDate,
        days: i64,
    ) -> Result<BTreeMap<i64, DiningInfo>, DiningError> {
        self.config.validate_location(location)?;

        let step = if days < 0 { -1 } else { 1 };
        let mut infos = BTreeMap::new();
        for i in 0..=days.unsigned_abs() {
            let offset = step * i as i64;
            let info = fetch_day(
                &self.client,
                self.transport.as_ref(),
                location,
                offset_date(date, offset)?,
            )
            .await?;
            if !info.available {
                debug!(location, offset, "stopping walk at unavailable day");
                break;
            }
            infos.insert(offset, info);
        }
        Ok(infos)
    }

    /// Run one job per key with at most `concurrent` in flight.
    ///
    /// A permit is taken before each task is spawned, so pending jobs wait
    /// here as data and never more than `concurrent` tasks are alive. Results
    /// come back in job order. Keys must be distinct.
    async fn fan_out<K, V, F, Fut>(&self, jobs: Vec<(K, F)>) -> Result<Vec<(K, V)>, DiningError>
    where
        K: Debug + Send + 'static,
        V: Send + 'static,
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Result<V, DiningError>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent()));
        let total = jobs.len();

        let mut handles: Vec<(K, JoinHandle<Result<V, DiningError>>)> = Vec::with_capacity(total);
        for (key, job) in jobs {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|closed| DiningError::Task(closed.to_string()))?;
            let work = job(self.clone());
            let handle = tokio::spawn(async move {
                let _permit = permit;
                work.await
            });
            handles.push((key, handle));
        }

        let mut successes = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (key, handle) in handles {
            match handle.await {
                Ok(Ok(info)) => successes.push((key, info)),
                Ok(Err(err)) => failures.push((key, err)),
                Err(join_err) => failures.push((key, DiningError::Task(join_err.to_string()))),
            }
        }

        let mut failures = failures.into_iter();
        match failures.next() {
            None => {
                info!(requests = total, concurrent = self.config.concurrent(), "fan-out complete");
                Ok(successes)
            }
            Some((key, first)) => {
                for (other, err) in failures {
                    warn!(key = ?other, error = %err, "additional fan-out failure");
                }
                warn!(key = ?key, error = %first, requests = total, "fan-out failed");
                Err(first)
            }
        }
    }
}

async fn fetch_day<T: HttpTransport>(
    client: &MenuClient,
    transport: &T,
    location: &str,
    date: NaiveDate,
) -> Result<DiningInfo, DiningError> {
    let request = client.build_day(location, date);
    debug!(location, %date, url = %request.url, "fetching dining day");
    let response = transport.execute(request).await?;
    client.parse_day(response, location, date)
}

fn offset_date(date: NaiveDate, offset: i64) -> Result<NaiveDate, DiningError> {
    Duration::try_days(offset)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(DiningError::DateOutOfRange { offset })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_cross_month_and_year() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(
            offset_date(date, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
        assert_eq!(
            offset_date(date, -30).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()
        );
    }

    #[test]
    fn huge_offset_is_out_of_range() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert!(matches!(
            offset_date(date, i64::MAX),
            Err(DiningError::DateOutOfRange { offset: i64::MAX })
        ));
    }
}
