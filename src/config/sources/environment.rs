//! Environment source: `TWIGGY_<KEY>` with `__` between nested keys,
//! e.g. `TWIGGY_OUTPUT_FORMAT=tree` or `TWIGGY_WATCH__DEBOUNCE_MS=250`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "TWIGGY";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
