//! Status board: withdrawal status per animal, alerts and herd statistics.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{ReportStatus, Treatment};
use crate::withdrawal::{WithdrawalError, WithdrawalSnapshot, WithdrawalStatus};

/// Board errors.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Withdrawal error: {0}")]
    Withdrawal(#[from] WithdrawalError),

    #[error("Trend of {0} days is out of range")]
    TrendOutOfRange(u32),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Longest treatment trend the board will build.
pub const MAX_TREND_DAYS: u32 = 366;

/// Board tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardConfig {
    /// Treatments clearing within this many days are "expiring soon"
    pub expiring_soon_days: i64,
    /// Length of the treatment trend, in days
    pub trend_days: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: 2,
            trend_days: 7,
        }
    }
}

/// Withdrawal state of one animal, taken from its latest treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimalStatus {
    pub animal_id: String,
    pub status: WithdrawalStatus,
    /// Raw countdown; zero for animals never treated
    pub days_remaining: i64,
    pub latest_treatment_id: Option<String>,
}

impl AnimalStatus {
    /// Countdown for display, never negative.
    pub fn days_left(&self) -> i64 {
        self.days_remaining.max(0)
    }
}

/// A treatment with its status at the board's "now".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentStatus {
    pub treatment: Treatment,
    pub withdrawal: WithdrawalSnapshot,
}

/// Treatments still in withdrawal, and the subset about to clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalAlerts {
    pub in_withdrawal: Vec<TreatmentStatus>,
    pub expiring_soon: Vec<TreatmentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesCount {
    pub species: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub total_animals: usize,
    pub total_users: usize,
    pub total_treatments: usize,
    pub open_reports: usize,
    pub alerts: WithdrawalAlerts,
    pub species: Vec<SpeciesCount>,
    pub treatment_trend: Vec<TrendPoint>,
}

/// Most recent treatment by administration time; the earliest recorded wins
/// a tie.
pub fn latest_treatment(treatments: &[Treatment]) -> BoardResult<Option<&Treatment>> {
    let mut latest: Option<(&Treatment, DateTime<Utc>)> = None;
    for treatment in treatments {
        let at = treatment.treatment_time()?;
        match latest {
            Some((_, best)) if at <= best => {}
            _ => latest = Some((treatment, at)),
        }
    }
    Ok(latest.map(|(t, _)| t))
}

impl Database {
    /// Withdrawal status of one animal at `now`.
    pub fn animal_status(&self, animal_id: &str, now: DateTime<Utc>) -> BoardResult<AnimalStatus> {
        let treatments = self.treatments_for_animal(animal_id)?;
        let Some(latest) = latest_treatment(&treatments)? else {
            return Ok(AnimalStatus {
                animal_id: animal_id.to_string(),
                status: WithdrawalStatus::Clear,
                days_remaining: 0,
                latest_treatment_id: None,
            });
        };

        let snap = latest.withdrawal_at(now)?;
        Ok(AnimalStatus {
            animal_id: animal_id.to_string(),
            status: snap.status,
            days_remaining: snap.days_remaining,
            latest_treatment_id: Some(latest.id.clone()),
        })
    }

    /// Status of every animal, in store order.
    pub fn herd_status(&self, now: DateTime<Utc>) -> BoardResult<Vec<AnimalStatus>> {
        self.list_animals()?
            .iter()
            .map(|animal| self.animal_status(&animal.id, now))
            .collect()
    }

    /// Every treatment with its status at `now`.
    pub fn treatment_statuses(&self, now: DateTime<Utc>) -> BoardResult<Vec<TreatmentStatus>> {
        self.list_treatments()?
            .into_iter()
            .map(|treatment| {
                let withdrawal = treatment.withdrawal_at(now)?;
                Ok(TreatmentStatus {
                    treatment,
                    withdrawal,
                })
            })
            .collect()
    }

    /// Treatments in withdrawal, and those clearing within the configured
    /// number of days.
    pub fn withdrawal_alerts(
        &self,
        now: DateTime<Utc>,
        config: &BoardConfig,
    ) -> BoardResult<WithdrawalAlerts> {
        let mut alerts = WithdrawalAlerts::default();
        for entry in self.treatment_statuses(now)? {
            if entry.withdrawal.status != WithdrawalStatus::InWithdrawal {
                continue;
            }
            let days = entry.withdrawal.days_remaining;
            if days > 0 && days <= config.expiring_soon_days {
                alerts.expiring_soon.push(entry.clone());
            }
            alerts.in_withdrawal.push(entry);
        }
        Ok(alerts)
    }

    /// Animal count per species, in order of first appearance.
    pub fn species_distribution(&self) -> BoardResult<Vec<SpeciesCount>> {
        let mut counts: Vec<SpeciesCount> = Vec::new();
        for animal in self.list_animals()? {
            match counts.iter_mut().find(|c| c.species == animal.species) {
                Some(entry) => entry.count += 1,
                None => counts.push(SpeciesCount {
                    species: animal.species,
                    count: 1,
                }),
            }
        }
        Ok(counts)
    }

    /// Treatments per UTC calendar day for the `days` days ending `today`,
    /// oldest first. At most [`MAX_TREND_DAYS`] days.
    pub fn treatment_trend(&self, today: NaiveDate, days: u32) -> BoardResult<Vec<TrendPoint>> {
        if days > MAX_TREND_DAYS {
            return Err(BoardError::TrendOutOfRange(days));
        }
        let Some(first) = today.checked_sub_signed(Duration::days(i64::from(days) - 1)) else {
            return Err(BoardError::TrendOutOfRange(days));
        };

        let mut dates = Vec::new();
        for treatment in self.list_treatments()? {
            dates.push(treatment.treatment_time()?.date_naive());
        }

        Ok(first
            .iter_days()
            .take(days as usize)
            .map(|date| TrendPoint {
                date,
                count: dates.iter().filter(|d| **d == date).count(),
            })
            .collect())
    }

    /// Assemble the dashboard.
    pub fn dashboard(&self, now: DateTime<Utc>, config: &BoardConfig) -> BoardResult<Dashboard> {
        let dashboard = Dashboard {
            generated_at: now,
            total_animals: self.list_animals()?.len(),
            total_users: self.list_users()?.len(),
            total_treatments: self.list_treatments()?.len(),
            open_reports: self.reports_with_status(ReportStatus::Open)?.len(),
            alerts: self.withdrawal_alerts(now, config)?,
            species: self.species_distribution()?,
            treatment_trend: self.treatment_trend(now.date_naive(), config.trend_days)?,
        };
        tracing::debug!(
            in_withdrawal = dashboard.alerts.in_withdrawal.len(),
            expiring_soon = dashboard.alerts.expiring_soon.len(),
            "Dashboard assembled"
        );
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Drug;
    use crate::withdrawal::parse_timestamp;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.seed_demo().unwrap();
        db
    }

    fn treat(db: &Database, animal_id: &str, drug_id: &str, at: &str) -> Treatment {
        let drug: Drug = db.get_drug(drug_id).unwrap().unwrap();
        let treatment = Treatment::administer(
            animal_id.into(),
            &drug,
            "3".into(),
            "Test".into(),
            "1ml".into(),
            ts(at),
        );
        db.insert_treatment(&treatment).unwrap();
        treatment
    }

    #[test]
    fn test_untreated_animal_is_clear() {
        let db = seeded();
        let status = db.animal_status("1", ts("2024-09-15T10:00:00Z")).unwrap();
        assert_eq!(status.status, WithdrawalStatus::Clear);
        assert_eq!(status.days_remaining, 0);
        assert!(status.latest_treatment_id.is_none());
    }

    #[test]
    fn test_seeded_animal_in_withdrawal() {
        let db = seeded();
        let status = db.animal_status("2", ts("2024-09-15T10:00:00Z")).unwrap();
        assert_eq!(status.status, WithdrawalStatus::InWithdrawal);
        assert_eq!(status.days_remaining, 2);
        assert_eq!(status.latest_treatment_id, Some("1".into()));

        let later = db.animal_status("2", ts("2024-09-20T10:00:00Z")).unwrap();
        assert_eq!(later.status, WithdrawalStatus::Clear);
        assert_eq!(later.days_left(), 0);
    }

    #[test]
    fn test_herd_status_covers_every_animal() {
        let db = seeded();
        treat(&db, "3", "1", "2024-09-14T10:00:00Z");

        let herd = db.herd_status(ts("2024-09-15T10:00:00Z")).unwrap();
        let ids: Vec<&str> = herd.iter().map(|s| s.animal_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        assert_eq!(herd[0].status, WithdrawalStatus::Clear);
        assert_eq!(herd[0].days_remaining, 0);
        assert_eq!(herd[1].status, WithdrawalStatus::InWithdrawal);
        assert_eq!(herd[1].days_remaining, 2);
        // Penicillin from 09-14T10 ends 09-17T10
        assert_eq!(herd[2].status, WithdrawalStatus::InWithdrawal);
        assert_eq!(herd[2].days_remaining, 2);

        let later = db.herd_status(ts("2024-09-18T00:00:00Z")).unwrap();
        assert!(later.iter().all(|s| s.status.is_clear()));
    }

    #[test]
    fn test_latest_treatment_decides() {
        let db = seeded();
        // Oxytetracycline ends 09-15T00, the later Penicillin ends 09-16T00
        treat(&db, "1", "3", "2024-09-10T00:00:00Z");
        let latest = treat(&db, "1", "1", "2024-09-13T00:00:00Z");

        let status = db.animal_status("1", ts("2024-09-14T12:00:00Z")).unwrap();
        assert_eq!(status.latest_treatment_id, Some(latest.id));
        assert_eq!(status.days_remaining, 2);
    }

    #[test]
    fn test_latest_treatment_tie_keeps_first() {
        let db = seeded();
        let first = treat(&db, "3", "1", "2024-09-12T00:00:00Z");
        treat(&db, "3", "3", "2024-09-12T00:00:00Z");

        let treatments = db.treatments_for_animal("3").unwrap();
        let latest = latest_treatment(&treatments).unwrap().unwrap();
        assert_eq!(latest.id, first.id);
    }

    #[test]
    fn test_alerts_expiring_soon() {
        let db = seeded();
        // Seeded Tylosin treatment ends 2024-09-17T10:00Z
        let alerts = db
            .withdrawal_alerts(ts("2024-09-15T10:00:00Z"), &BoardConfig::default())
            .unwrap();
        assert_eq!(alerts.in_withdrawal.len(), 1);
        assert_eq!(alerts.expiring_soon.len(), 1);

        let alerts = db
            .withdrawal_alerts(ts("2024-09-14T09:00:00Z"), &BoardConfig::default())
            .unwrap();
        assert_eq!(alerts.in_withdrawal.len(), 1);
        assert!(alerts.expiring_soon.is_empty());

        let alerts = db
            .withdrawal_alerts(ts("2024-09-18T00:00:00Z"), &BoardConfig::default())
            .unwrap();
        assert!(alerts.in_withdrawal.is_empty());
    }

    #[test]
    fn test_species_distribution_order() {
        let db = seeded();
        let species = db.species_distribution().unwrap();
        assert_eq!(
            species,
            vec![
                SpeciesCount {
                    species: "Cattle".into(),
                    count: 2
                },
                SpeciesCount {
                    species: "Pig".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_treatment_trend() {
        let db = seeded();
        treat(&db, "1", "1", "2024-09-15T23:30:00Z");
        treat(&db, "3", "1", "2024-09-15T01:00:00Z");

        let today = NaiveDate::from_ymd_opt(2024, 9, 16).unwrap();
        let trend = db.treatment_trend(today, 7).unwrap();
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2024, 9, 10).unwrap());
        assert_eq!(trend[6].date, today);

        let counts: Vec<usize> = trend.iter().map(|p| p.count).collect();
        // 09-13 seeded, 09-15 two new
        assert_eq!(counts, vec![0, 0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_treatment_trend_bounds() {
        let db = seeded();
        let today = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
        assert!(matches!(
            db.treatment_trend(today, 200_000_000),
            Err(BoardError::TrendOutOfRange(200_000_000))
        ));
        assert!(db.treatment_trend(today, 0).unwrap().is_empty());

        let trend = db.treatment_trend(today, MAX_TREND_DAYS).unwrap();
        assert_eq!(trend.len(), MAX_TREND_DAYS as usize);
        assert_eq!(trend.last().unwrap().date, today);

        // Near the start of the calendar the window cannot be built
        assert!(matches!(
            db.treatment_trend(NaiveDate::MIN, 2),
            Err(BoardError::TrendOutOfRange(2))
        ));
    }

    #[test]
    fn test_dashboard_totals() {
        let db = seeded();
        let dashboard = db
            .dashboard(ts("2024-09-15T10:00:00Z"), &BoardConfig::default())
            .unwrap();
        assert_eq!(dashboard.total_animals, 3);
        assert_eq!(dashboard.total_users, 4);
        assert_eq!(dashboard.total_treatments, 1);
        assert_eq!(dashboard.open_reports, 1);
        assert_eq!(dashboard.alerts.in_withdrawal.len(), 1);
        assert_eq!(dashboard.treatment_trend.len(), 7);
    }

    #[test]
    fn test_malformed_treatment_date_surfaces() {
        let db = seeded();
        let mut bad = Treatment::administer(
            "3".into(),
            &db.get_drug("1").unwrap().unwrap(),
            "3".into(),
            "Test".into(),
            "1ml".into(),
            ts("2024-09-12T00:00:00Z"),
        );
        bad.withdrawal_end_date = "someday".into();
        db.insert_treatment(&bad).unwrap();

        assert!(matches!(
            db.animal_status("3", Utc::now()),
            Err(BoardError::Withdrawal(_))
        ));
    }
}
