//! Treat command - record a treatment as the signed-in user.

use chrono::Utc;
use livestock_core::{Database, RecordsService, SessionManager, TreatmentRequest};

use super::print_json;
use crate::cli::args::TreatArgs;
use crate::config::Config;
use crate::storage::FileStorage;

pub fn execute(args: TreatArgs, db: &Database, config: &Config) -> anyhow::Result<()> {
    let mut session = SessionManager::new(FileStorage::load(&config.session_path)?);
    let Some(actor) = session.restore(db)?.cloned() else {
        anyhow::bail!("Not signed in; run `livestock login` first");
    };
    // restore may have discarded an unreadable session
    session.storage().save()?;

    let request = TreatmentRequest {
        animal_id: args.animal,
        drug_id: args.drug,
        diagnosis: args.diagnosis,
        dosage: args.dosage,
        linked_report_id: args.report,
    };
    let treatment = RecordsService::new(db, &actor).record_treatment(request, Utc::now())?;

    if args.json {
        return print_json(&treatment);
    }
    println!(
        "Recorded treatment {} - withdrawal ends {}",
        treatment.id, treatment.withdrawal_end_date
    );
    Ok(())
}
