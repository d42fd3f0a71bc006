pub mod company_store;
pub mod simulator;

pub use company_store::CompanyStore;
pub use simulator::MarketSimulator;
