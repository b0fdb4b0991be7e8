pub mod caching;
pub mod yahoo_finance;
