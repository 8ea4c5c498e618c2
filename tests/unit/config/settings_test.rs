// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use leadrs::config::settings::Settings;
    use leadrs::domain::models::job::ScrapeMode;

    #[test]
    fn test_environment_overrides_defaults() {
        std::env::set_var("LEADRS__SERVER__PORT", "8123");
        std::env::set_var("LEADRS__SCRAPER__DEFAULT_MODE", "detail");
        std::env::set_var("LEADRS__SCRAPER__STABLE_CHECKS", "7");

        let settings = Settings::new().expect("settings should load");

        std::env::remove_var("LEADRS__SERVER__PORT");
        std::env::remove_var("LEADRS__SCRAPER__DEFAULT_MODE");
        std::env::remove_var("LEADRS__SCRAPER__STABLE_CHECKS");

        assert_eq!(settings.server.port, 8123);
        assert_eq!(settings.scraper.default_mode, ScrapeMode::Detail);
        assert_eq!(settings.scraper.stable_checks, 7);
        assert_eq!(settings.scraper.detail_limit, 10);
        assert_eq!(settings.jobs.log_tail, 20);
    }
}
