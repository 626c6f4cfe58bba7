use std::time::Duration;

use crate::{
    account::{Account, AccountRegistry, AccountStatus},
    api::{DepinedClient, Stats},
    config::Config,
    display::Dashboard,
    errors::Result,
    utils::timestamp,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Polls every account once per cycle, strictly in registry order.
pub struct Scheduler<D> {
    api: DepinedClient,
    registry: AccountRegistry,
    dashboard: D,
    account_delay: Duration,
    cycle_delay: Duration,
}

impl<D: Dashboard> Scheduler<D> {
    pub fn new(config: &Config, registry: AccountRegistry, dashboard: D) -> Self {
        Self {
            api: DepinedClient::new(config.base_url.clone(), config.request_timeout()),
            registry,
            dashboard,
            account_delay: config.account_delay(),
            cycle_delay: config.cycle_delay(),
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    #[cfg(test)]
    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    /// Never returns; the process ends on an external signal.
    pub async fn run(mut self) {
        loop {
            self.render();

            let report = self.run_cycle().await;
            tracing::info!(
                "Cycle finished: {} ok, {} failed. Next cycle in {}s",
                report.succeeded,
                report.failed,
                self.cycle_delay.as_secs()
            );

            tokio::time::sleep(self.cycle_delay).await;
        }
    }

    /// Hands the dashboard a snapshot taken between cycles.
    pub fn render(&mut self) {
        let snapshot = self.registry.snapshot();
        self.dashboard.render(&snapshot);
    }

    /// One pass over every account. A failing account is marked errored and
    /// never stops the accounts after it.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        for (i, account) in self.registry.iter_mut().enumerate() {
            let number = i + 1;

            match refresh_account(&self.api, account).await {
                Ok(stats) => {
                    report.succeeded += 1;
                    tracing::info!(
                        "Account {number}: heartbeat ok | {} | {} | today: {:.2} | total: {:.2}",
                        account.username.as_deref().unwrap_or_default(),
                        account.email.as_deref().unwrap_or_default(),
                        stats.points_today,
                        stats.total_points,
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    account.status = AccountStatus::Errored;
                    account.last_update = Some(timestamp());
                    account.last_error = Some(e.to_string());
                    tracing::error!("Account {number}: {e}");
                }
            }

            tokio::time::sleep(self.account_delay).await;
        }

        report
    }
}

async fn refresh_account(api: &DepinedClient, account: &mut Account) -> Result<Stats> {
    if account.needs_profile() {
        let profile = api.fetch_profile(account.token(), account.proxy()).await?;
        account.username = Some(profile.username);
        account.email = Some(profile.email);
    }

    api.send_heartbeat(account.token(), account.proxy()).await?;
    account.status = AccountStatus::Connected;

    let stats = api.fetch_stats(account.token(), account.proxy()).await?;
    account.points_today = stats.points_today;
    account.total_points = stats.total_points;
    account.last_update = Some(timestamp());
    account.last_error = None;

    Ok(stats)
}
