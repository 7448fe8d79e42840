// Market data acquisition: provider trait, implementations and the retrying fetcher.
pub mod csv_parser;
pub mod fetcher;
pub mod market_data;
pub mod provider;
pub mod upbit;

pub use fetcher::SeriesFetcher;
pub use market_data::MarketDataStore;
pub use provider::MarketDataProvider;
pub use upbit::UpbitClient;

#[cfg(test)]
pub(crate) mod mock;
