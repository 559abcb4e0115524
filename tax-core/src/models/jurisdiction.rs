use std::collections::{BTreeMap, HashMap};

use crate::models::{BracketTable, FilingStatus};

/// Income-tax schedules for every jurisdiction the estimator knows about.
///
/// Built once by a loader and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JurisdictionTaxData {
    federal: HashMap<FilingStatus, BracketTable>,
    states: BTreeMap<String, BracketTable>,
    cities: BTreeMap<String, BTreeMap<String, BracketTable>>,
}

impl JurisdictionTaxData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_federal(
        &mut self,
        status: FilingStatus,
        table: BracketTable,
    ) {
        self.federal.insert(status, table);
    }

    pub fn insert_state(
        &mut self,
        state: &str,
        table: BracketTable,
    ) {
        self.states.insert(state.to_string(), table);
    }

    pub fn insert_city(
        &mut self,
        state: &str,
        city: &str,
        table: BracketTable,
    ) {
        self.cities
            .entry(state.to_string())
            .or_default()
            .insert(city.to_string(), table);
    }

    pub fn federal(
        &self,
        status: FilingStatus,
    ) -> Option<&BracketTable> {
        self.federal.get(&status)
    }

    pub fn state(
        &self,
        state: &str,
    ) -> Option<&BracketTable> {
        self.states.get(state)
    }

    pub fn city(
        &self,
        state: &str,
        city: &str,
    ) -> Option<&BracketTable> {
        self.cities.get(state).and_then(|cities| cities.get(city))
    }

    pub fn has_state(
        &self,
        state: &str,
    ) -> bool {
        self.states.contains_key(state)
    }

    /// State codes in alphabetical order.
    pub fn state_codes(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// City names with their own schedule in `state`, alphabetical.
    pub fn cities_in(
        &self,
        state: &str,
    ) -> Vec<&str> {
        self.cities
            .get(state)
            .map(|cities| cities.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every table with its display name, for load-time diagnostics.
    pub fn tables(&self) -> Vec<(String, &BracketTable)> {
        let mut tables: Vec<(String, &BracketTable)> = Vec::new();
        for status in FilingStatus::all() {
            if let Some(table) = self.federal.get(status) {
                tables.push((format!("federal/{}", status.as_str()), table));
            }
        }
        for (state, table) in &self.states {
            tables.push((format!("state/{state}"), table));
        }
        for (state, cities) in &self.cities {
            for (city, table) in cities {
                tables.push((format!("city/{state}/{city}"), table));
            }
        }
        tables
    }
}
