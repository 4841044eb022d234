//! Status command - withdrawal status of one animal or the herd.

use livestock_core::Database;

use super::{evaluation_time, print_json};
use crate::cli::args::StatusArgs;

pub fn execute(args: StatusArgs, db: &Database) -> anyhow::Result<()> {
    let now = evaluation_time(args.report.at.as_deref())?;

    let rows: Vec<_> = match &args.animal_id {
        Some(id) => {
            let animal = db
                .get_animal(id)?
                .ok_or_else(|| anyhow::anyhow!("Animal {} not found", id))?;
            let status = db.animal_status(&animal.id, now)?;
            vec![(animal, status)]
        }
        // Both lists come back in store order
        None => db
            .list_animals()?
            .into_iter()
            .zip(db.herd_status(now)?)
            .collect(),
    };

    if args.report.json {
        let statuses: Vec<_> = rows.iter().map(|(_, status)| status).collect();
        return print_json(&statuses);
    }

    if rows.is_empty() {
        println!("No animals on record.");
        return Ok(());
    }
    for (animal, status) in &rows {
        if status.status.is_clear() {
            println!("{:<8} {:<10} {}", animal.animal_tag, animal.name, status.status);
        } else {
            println!(
                "{:<8} {:<10} {} ({} days left)",
                animal.animal_tag,
                animal.name,
                status.status,
                status.days_left()
            );
        }
    }
    Ok(())
}
