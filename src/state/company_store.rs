use std::sync::Arc;

use dashmap::DashMap;

use crate::types::Company;

// ---------------------------------------------------------------------------
// CompanyStore
// ---------------------------------------------------------------------------

/// Company directory shared by all handlers. Keyed by upper-cased symbol so
/// lookups from URL paths are case-insensitive.
#[derive(Default)]
pub struct CompanyStore {
    companies: DashMap<String, Company>,
}

impl CompanyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    fn key(symbol: &str) -> String {
        symbol.trim().to_ascii_uppercase()
    }

    pub fn add_company(&self, company: Company) {
        self.companies.insert(Self::key(&company.symbol), company);
    }

    pub fn add_companies(&self, companies: Vec<Company>) {
        for company in companies {
            self.add_company(company);
        }
    }

    pub fn get(&self, symbol: &str) -> Option<Company> {
        self.companies.get(&Self::key(symbol)).map(|c| c.clone())
    }

    /// All companies ordered by id.
    pub fn list(&self) -> Vec<Company> {
        let mut out: Vec<Company> = self.companies.iter().map(|e| e.value().clone()).collect();
        out.sort_by_key(|c| c.id);
        out
    }

    /// Case-insensitive substring match on name, symbol or sector, ordered by id.
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<Company> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.list();
        }
        let mut out: Vec<Company> = self
            .companies
            .iter()
            .filter(|e| {
                let c = e.value();
                c.name.to_lowercase().contains(&needle)
                    || c.symbol.to_lowercase().contains(&needle)
                    || c.sector.to_lowercase().contains(&needle)
            })
            .map(|e| e.value().clone())
            .collect();
        out.sort_by_key(|c| c.id);
        out
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
