//! Dashboard command - herd overview.

use livestock_core::Database;

use super::{evaluation_time, print_json};
use crate::cli::args::ReportArgs;
use crate::config::Config;

pub fn execute(args: ReportArgs, db: &Database, config: &Config) -> anyhow::Result<()> {
    let now = evaluation_time(args.at.as_deref())?;
    let dashboard = db.dashboard(now, &config.board)?;

    if args.json {
        return print_json(&dashboard);
    }

    println!("Animals:         {}", dashboard.total_animals);
    println!("Users:           {}", dashboard.total_users);
    println!("Treatments:      {}", dashboard.total_treatments);
    println!("Open reports:    {}", dashboard.open_reports);
    println!("In withdrawal:   {}", dashboard.alerts.in_withdrawal.len());
    println!("Expiring soon:   {}", dashboard.alerts.expiring_soon.len());

    println!();
    println!("Species:");
    for entry in &dashboard.species {
        println!("  {:<12} {}", entry.species, entry.count);
    }

    println!();
    println!("Treatments, last {} days:", config.board.trend_days);
    for point in &dashboard.treatment_trend {
        println!("  {} {}", point.date.format("%a %d %b"), "#".repeat(point.count));
    }
    Ok(())
}
