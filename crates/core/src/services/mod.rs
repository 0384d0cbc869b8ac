pub mod currency_service;
pub mod ledger_service;
pub mod recurring_service;
