pub mod budget;
pub mod category;
pub mod currency;
pub mod ledger;
pub mod recurring;
pub mod settings;
pub mod transaction;
