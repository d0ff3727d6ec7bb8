pub mod constant {
    pub const ZONE_COUNT: usize = 4;
    pub const ROUTE_COUNT: usize = ZONE_COUNT * (ZONE_COUNT - 1);
    pub const SECONDS_PER_HOUR: u32 = 3600;
    pub const HOURS_PER_DAY: usize = 24;

    pub(crate) const DEFAULT_CONFIG_PATH: &str = "config.txt";
    pub(crate) const RAW_FLOW_PREFIX: &str = "raw_";
    pub(crate) const HOURLY_SUMMARY_SUFFIX: &str = "_hourly.json";

    pub(crate) const CONFIG_PATH_ENV: &str = "FLOW_CONFIG";
    pub(crate) const SEED_ENV: &str = "FLOW_SEED";
}
