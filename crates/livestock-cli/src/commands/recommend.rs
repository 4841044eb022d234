//! Recommend command - drug suggestion for a diagnosis.

use livestock_core::{Database, Recommender};

use crate::cli::args::RecommendArgs;

pub fn execute(args: RecommendArgs, db: &Database) -> anyhow::Result<()> {
    let diagnosis = args.diagnosis.join(" ");
    let recommender = Recommender::default();
    let suggested = recommender.recommend(&diagnosis);

    match db.recommend_for_diagnosis(&recommender, &diagnosis)? {
        Some(drug) => println!(
            "{} (milk withdrawal {}h, meat withdrawal {}d)",
            drug.name, drug.milk_withdrawal_hours, drug.meat_withdrawal_days
        ),
        None => println!("{} (not in the drug catalog)", suggested),
    }
    Ok(())
}
