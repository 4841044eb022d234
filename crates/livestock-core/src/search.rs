//! List-screen filters.
//!
//! Every search is a case-insensitive substring match over a fixed set of
//! fields, some of which belong to related records (an animal's owner, a
//! treatment's drug). The term is used as typed, surrounding whitespace
//! included; an empty term matches everything.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};
use crate::models::{Animal, Drug, ReportStatus, SymptomReport, Treatment, User};

/// Status filter for the report list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Treated,
}

impl StatusFilter {
    pub fn admits(&self, status: ReportStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => status == ReportStatus::Open,
            StatusFilter::Treated => status == ReportStatus::Treated,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(StatusFilter::All),
            "OPEN" => Ok(StatusFilter::Open),
            "TREATED" => Ok(StatusFilter::Treated),
            other => Err(format!("Unknown report filter: {other}")),
        }
    }
}

/// Lowercased search term.
struct Needle(String);

impl Needle {
    fn new(term: &str) -> Self {
        Self(term.to_lowercase())
    }

    fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    fn hit(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.0)
    }

    fn hit_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        self.is_blank() || fields.into_iter().flatten().any(|f| self.hit(f))
    }
}

fn index_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &str) -> HashMap<String, T> {
    items
        .into_iter()
        .map(|item| (id(&item).to_string(), item))
        .collect()
}

impl Database {
    /// Animals by species, breed or owner name.
    pub fn search_animals(&self, term: &str) -> DbResult<Vec<Animal>> {
        let needle = Needle::new(term);
        let users = index_by_id(self.list_users()?, |u| u.id.as_str());

        Ok(self
            .list_animals()?
            .into_iter()
            .filter(|animal| {
                needle.hit_any([
                    Some(animal.species.as_str()),
                    Some(animal.breed.as_str()),
                    users.get(&animal.owner_id).map(|u| u.name.as_str()),
                ])
            })
            .collect())
    }

    /// Treatments by the animal's species or breed, drug name, diagnosis or
    /// administering vet's name.
    pub fn search_treatments(&self, term: &str) -> DbResult<Vec<Treatment>> {
        let needle = Needle::new(term);
        let animals = index_by_id(self.list_animals()?, |a| a.id.as_str());
        let drugs = index_by_id(self.list_drugs()?, |d| d.id.as_str());
        let users = index_by_id(self.list_users()?, |u| u.id.as_str());

        Ok(self
            .list_treatments()?
            .into_iter()
            .filter(|t| {
                let animal = animals.get(&t.animal_id);
                needle.hit_any([
                    animal.map(|a| a.species.as_str()),
                    animal.map(|a| a.breed.as_str()),
                    drugs.get(&t.drug_id).map(|d| d.name.as_str()),
                    Some(t.diagnosis.as_str()),
                    users.get(&t.administered_by_id).map(|u| u.name.as_str()),
                ])
            })
            .collect())
    }

    /// Reports by the animal's species or breed, reporter name or
    /// description, restricted to `filter`.
    pub fn search_reports(&self, term: &str, filter: StatusFilter) -> DbResult<Vec<SymptomReport>> {
        let needle = Needle::new(term);
        let animals = index_by_id(self.list_animals()?, |a| a.id.as_str());
        let users = index_by_id(self.list_users()?, |u| u.id.as_str());

        Ok(self
            .list_reports()?
            .into_iter()
            .filter(|r| filter.admits(r.status))
            .filter(|r| {
                let animal = animals.get(&r.animal_id);
                needle.hit_any([
                    animal.map(|a| a.species.as_str()),
                    animal.map(|a| a.breed.as_str()),
                    users.get(&r.reported_by_id).map(|u| u.name.as_str()),
                    Some(r.description.as_str()),
                ])
            })
            .collect())
    }

    /// Users by name, email or role.
    pub fn search_users(&self, term: &str) -> DbResult<Vec<User>> {
        let needle = Needle::new(term);
        Ok(self
            .list_users()?
            .into_iter()
            .filter(|u| {
                needle.hit_any([
                    Some(u.name.as_str()),
                    Some(u.email.as_str()),
                    Some(u.role.as_str()),
                ])
            })
            .collect())
    }

    pub fn search_drugs(&self, term: &str) -> DbResult<Vec<Drug>> {
        let needle = Needle::new(term);
        Ok(self
            .list_drugs()?
            .into_iter()
            .filter(|d| needle.hit_any([Some(d.name.as_str())]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.seed_demo().unwrap();
        db
    }

    fn names(animals: &[Animal]) -> Vec<&str> {
        animals.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_empty_term_matches_all() {
        let db = seeded();
        assert_eq!(db.search_animals("").unwrap().len(), 3);
        assert_eq!(db.search_users("").unwrap().len(), 4);
        assert_eq!(db.search_reports("", StatusFilter::All).unwrap().len(), 2);
    }

    #[test]
    fn test_search_animals_by_owner_and_breed() {
        let db = seeded();
        assert_eq!(names(&db.search_animals("mike").unwrap()), vec!["Bessie", "Thunder"]);
        assert_eq!(names(&db.search_animals("YORK").unwrap()), vec!["Porky"]);
        // Name and tag are not searched
        assert!(db.search_animals("bessie").unwrap().is_empty());
    }

    #[test]
    fn test_search_treatments_across_records() {
        let db = seeded();
        assert_eq!(db.search_treatments("tylosin").unwrap().len(), 1);
        assert_eq!(db.search_treatments("angus").unwrap().len(), 1);
        assert_eq!(db.search_treatments("dr. smith").unwrap().len(), 1);
        assert!(db.search_treatments("penicillin").unwrap().is_empty());
    }

    #[test]
    fn test_search_reports_with_filter() {
        let db = seeded();
        let open = db.search_reports("", StatusFilter::Open).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "1");

        let treated = db.search_reports("", StatusFilter::Treated).unwrap();
        assert_eq!(treated.len(), 1);
        assert_eq!(treated[0].id, "2");

        assert_eq!(db.search_reports("mastitis", StatusFilter::All).unwrap().len(), 1);
        assert!(db.search_reports("mastitis", StatusFilter::Treated).unwrap().is_empty());
    }

    #[test]
    fn test_search_users_by_role() {
        let db = seeded();
        let staff = db.search_users("staff").unwrap();
        // "Jane Staff" by name, "Mike Farmer" by role
        assert_eq!(staff.len(), 2);
        assert_eq!(db.search_users("veterinarian").unwrap()[0].name, "Dr. Smith");
    }

    #[test]
    fn test_whitespace_is_part_of_the_term() {
        let db = seeded();
        let found = db.search_users(" smith").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dr. Smith");

        assert!(db.search_users("   ").unwrap().is_empty());
        assert!(db.search_drugs(" penicillin").unwrap().is_empty());
    }

    #[test]
    fn test_search_drugs() {
        let db = seeded();
        let found = db.search_drugs("cyc").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Oxytetracycline");
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("open".parse::<StatusFilter>().unwrap(), StatusFilter::Open);
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert!("closed".parse::<StatusFilter>().is_err());
    }
}
