pub mod settings;

pub use settings::{AlertSetting, CsvFeed, EngineSettings, ProviderSettings, RankingSettings, RetrySettings};
