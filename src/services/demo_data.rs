//! Bulk demo-data generator. Peripheral to the ledger core: it exists so a
//! fresh database can be filled with plausible wallets for demos. Work is
//! fanned out over concurrent workers, each on its own pooled connection,
//! the whole batch is bounded by a deadline, and worker errors are collected
//! into the report instead of being dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::Connection;
use tracing::info;

use crate::clock::Clock;
use crate::database::DatabasePool;

const DEFAULT_WORKERS: usize = 20;
const DEFAULT_DEADLINE: Duration = Duration::from_secs(25 * 60);

#[derive(Debug, Default, Serialize)]
pub struct DemoDataReport {
    pub requested: usize,
    pub created: usize,
    pub errors: Vec<String>,
}

pub struct DemoDataService {
    pool: DatabasePool,
    clock: Arc<dyn Clock>,
    workers: usize,
    deadline: Duration,
}

impl DemoDataService {
    pub fn new(pool: DatabasePool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            workers: DEFAULT_WORKERS,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_limits(mut self, workers: usize, deadline: Duration) -> Self {
        self.workers = workers.max(1);
        self.deadline = deadline;
        self
    }

    /// Insert `records` wallets named `<prefix>_<n>` with random balances in
    /// [1, 1200), each committed atomically with its initial deposit entry.
    pub async fn generate(&self, records: usize, prefix: &str) -> DemoDataReport {
        let mut report = DemoDataReport {
            requested: records,
            ..Default::default()
        };
        if records == 0 {
            return report;
        }

        let workers = self.workers.min(records);
        let per_worker = records / workers;
        let remainder = records % workers;

        let mut tasks = Vec::with_capacity(workers);
        let mut next_index = 1usize;
        for worker in 0..workers {
            let count = per_worker + usize::from(worker < remainder);
            let start = next_index;
            next_index += count;

            let pool = self.pool.clone();
            let clock = self.clock.clone();
            let prefix = prefix.to_owned();
            tasks.push(async move {
                let mut created = 0usize;
                let mut errors = Vec::new();

                let mut conn = match pool.acquire().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        errors.push(format!("worker {worker}: acquiring connection: {e}"));
                        return (created, errors);
                    }
                };

                for n in start..start + count {
                    let name = format!("{prefix}_{n}");
                    let cents = rand::thread_rng().gen_range(100i64..120_000);
                    let balance = Decimal::new(cents, 2);
                    match insert_demo_wallet(&mut conn, &name, balance, clock.now()).await {
                        Ok(_) => created += 1,
                        Err(e) => errors.push(format!("wallet '{name}': {e}")),
                    }
                }

                (created, errors)
            });
        }

        // The workers are not detached tasks: when the deadline cancels the
        // join, every in-flight insert is dropped and its transaction rolls
        // back, leaving no partial wallet/entry pairs behind.
        match tokio::time::timeout(self.deadline, join_all(tasks)).await {
            Ok(results) => {
                for (created, errors) in results {
                    report.created += created;
                    report.errors.extend(errors);
                }
            }
            Err(_) => {
                report
                    .errors
                    .push(format!("deadline of {:?} exceeded", self.deadline));
            }
        }

        info!(
            "demo data: created {}/{} wallets, {} errors",
            report.created,
            report.requested,
            report.errors.len()
        );
        report
    }
}

async fn insert_demo_wallet(
    conn: &mut sqlx::pool::PoolConnection<sqlx::Postgres>,
    name: &str,
    balance: Decimal,
    now: DateTime<Utc>,
) -> sqlx::Result<i64> {
    let mut tx = conn.begin().await?;

    let id: i64 =
        sqlx::query_scalar("INSERT INTO wallet (name, balance) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(balance)
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query(
        "INSERT INTO transaction (sender_id, receiver_id, amount, date, tran_type) \
         VALUES ($1, $1, $2, $3, 'deposit')",
    )
    .bind(id)
    .bind(balance)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}
