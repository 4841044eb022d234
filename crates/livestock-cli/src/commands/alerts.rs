//! Alerts command - treatments still in withdrawal.

use livestock_core::Database;

use super::{evaluation_time, print_json};
use crate::cli::args::ReportArgs;
use crate::config::Config;

pub fn execute(args: ReportArgs, db: &Database, config: &Config) -> anyhow::Result<()> {
    let now = evaluation_time(args.at.as_deref())?;
    let alerts = db.withdrawal_alerts(now, &config.board)?;

    if args.json {
        return print_json(&alerts);
    }

    if alerts.in_withdrawal.is_empty() {
        println!("All animals clear.");
        return Ok(());
    }

    println!("In withdrawal ({}):", alerts.in_withdrawal.len());
    for entry in &alerts.in_withdrawal {
        let animal = db
            .get_animal(&entry.treatment.animal_id)?
            .map(|a| a.name)
            .unwrap_or_else(|| entry.treatment.animal_id.clone());
        let soon = alerts
            .expiring_soon
            .iter()
            .any(|e| e.treatment.id == entry.treatment.id);
        println!(
            "  {:<10} until {} ({} days left){}",
            animal,
            entry.treatment.withdrawal_end_date,
            entry.withdrawal.days_left(),
            if soon { " - expiring soon" } else { "" }
        );
    }
    Ok(())
}
