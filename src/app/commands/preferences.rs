//! User preferences stored in the config document.

use std::fmt;
use std::str::FromStr;

use crate::app::AppContext;
use crate::app::format::render_pairs;
use crate::domain::config::parse_switch;
use crate::domain::{AppError, BytesUnit, ColorMode, CohctlConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Debug,
    Color,
    Timeout,
    IgnoreCerts,
    BytesFormat,
    DefaultHeap,
    UseGradle,
}

impl Preference {
    pub const ALL: [Preference; 7] = [
        Preference::Debug,
        Preference::Color,
        Preference::Timeout,
        Preference::IgnoreCerts,
        Preference::BytesFormat,
        Preference::DefaultHeap,
        Preference::UseGradle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preference::Debug => "debug",
            Preference::Color => "color",
            Preference::Timeout => "timeout",
            Preference::IgnoreCerts => "ignore-certs",
            Preference::BytesFormat => "bytes-format",
            Preference::DefaultHeap => "default-heap",
            Preference::UseGradle => "use-gradle",
        }
    }

    fn current(&self, config: &CohctlConfig) -> String {
        match self {
            Preference::Debug => on_off(config.debug),
            Preference::Color => config.color.clone(),
            Preference::Timeout => config.request_timeout.to_string(),
            Preference::IgnoreCerts => config.ignore_invalid_certs.to_string(),
            Preference::BytesFormat => config.default_bytes_format.clone(),
            Preference::DefaultHeap => config.default_heap.clone(),
            Preference::UseGradle => config.use_gradle.to_string(),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preference::ALL.into_iter().find(|p| p.name() == s).ok_or_else(|| {
            let names: Vec<&str> = Preference::ALL.iter().map(Preference::name).collect();
            AppError::invalid(format!("preference must be one of {}, not '{s}'", names.join(", ")))
        })
    }
}

fn on_off(value: bool) -> String {
    (if value { "on" } else { "off" }).to_string()
}

/// Validated change to apply to the config document.
enum Change {
    Debug(bool),
    Color(ColorMode),
    Timeout(i32),
    IgnoreCerts(bool),
    BytesFormat(BytesUnit),
    DefaultHeap(String),
    UseGradle(bool),
}

fn parse_change(preference: Preference, value: &str) -> Result<Change, AppError> {
    Ok(match preference {
        Preference::Debug => Change::Debug(parse_switch(value)?),
        Preference::Color => Change::Color(value.parse()?),
        Preference::Timeout => {
            let timeout = value.parse::<i32>().ok().filter(|t| *t > 0).ok_or_else(|| {
                AppError::invalid(format!("timeout must be greater than zero, not '{value}'"))
            })?;
            Change::Timeout(timeout)
        }
        Preference::IgnoreCerts => Change::IgnoreCerts(parse_switch(value)?),
        Preference::BytesFormat => Change::BytesFormat(value.parse()?),
        Preference::DefaultHeap => {
            if value.trim().is_empty() {
                return Err(AppError::invalid("default heap must not be empty"));
            }
            Change::DefaultHeap(value.to_string())
        }
        Preference::UseGradle => Change::UseGradle(parse_switch(value)?),
    })
}

pub fn set_preference(
    ctx: &mut AppContext,
    preference: Preference,
    value: &str,
) -> Result<String, AppError> {
    let change = parse_change(preference, value)?;
    ctx.store_mut().update(|config| match change {
        Change::Debug(on) => config.debug = on,
        Change::Color(mode) => config.color = mode.to_string(),
        Change::Timeout(secs) => config.request_timeout = secs,
        Change::IgnoreCerts(on) => config.ignore_invalid_certs = on,
        Change::BytesFormat(unit) => config.default_bytes_format = unit.code().to_string(),
        Change::DefaultHeap(heap) => config.default_heap = heap,
        Change::UseGradle(on) => config.use_gradle = on,
    })?;
    tracing::info!(%preference, value, "preference updated");
    Ok(format!(
        "{preference} is now set to {}\n",
        preference.current(ctx.store().config())
    ))
}

pub fn get_preference(ctx: &AppContext, preference: Preference) -> String {
    let value = preference.current(ctx.store().config());
    if value.is_empty() {
        format!("{preference} is not set\n")
    } else {
        format!("{preference}: {value}\n")
    }
}

/// Only the optional preferences can be cleared.
pub fn clear_preference(ctx: &mut AppContext, preference: Preference) -> Result<String, AppError> {
    match preference {
        Preference::DefaultHeap => ctx.store_mut().update(|c| c.default_heap.clear())?,
        Preference::BytesFormat => ctx.store_mut().update(|c| c.default_bytes_format.clear())?,
        other => {
            return Err(AppError::invalid(format!(
                "only default-heap and bytes-format can be cleared, not {other}"
            )));
        }
    }
    Ok(format!("{preference} has been cleared\n"))
}

/// Every preference plus the config location as one describe block.
pub fn get_config(ctx: &AppContext) -> String {
    let config = ctx.store().config();
    let mut pairs = vec![
        ("Config File".to_string(), ctx.store().path().display().to_string()),
        ("Version".to_string(), config.version.clone()),
        ("Current Context".to_string(), config.current_context.clone()),
    ];
    pairs.extend(Preference::ALL.iter().map(|p| (p.name().to_string(), p.current(config))));
    pairs.push(("Clusters".to_string(), config.clusters.len().to_string()));
    pairs.push(("Profiles".to_string(), config.profiles.len().to_string()));
    render_pairs(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ConfigStore;
    use crate::testing::{FakeFetcher, test_context};

    #[test]
    fn preference_names_parse() {
        for preference in Preference::ALL {
            assert_eq!(preference.name().parse::<Preference>().unwrap(), preference);
        }
        assert!("colour".parse::<Preference>().is_err());
    }

    #[test]
    fn set_persists_immediately() {
        let (dir, mut ctx) = test_context(&FakeFetcher::new());
        let out = set_preference(&mut ctx, Preference::Debug, "on").unwrap();
        assert_eq!(out, "debug is now set to on\n");
        set_preference(&mut ctx, Preference::Timeout, "45").unwrap();
        set_preference(&mut ctx, Preference::BytesFormat, "m").unwrap();
        set_preference(&mut ctx, Preference::IgnoreCerts, "true").unwrap();

        let reloaded = ConfigStore::load(dir.path(), None).unwrap();
        assert!(reloaded.config().debug);
        assert_eq!(reloaded.config().request_timeout, 45);
        assert_eq!(reloaded.config().default_bytes_format, "m");
        assert!(reloaded.config().ignore_invalid_certs);
        assert_eq!(ctx.bytes_unit(), BytesUnit::Mega);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let (_dir, mut ctx) = test_context(&FakeFetcher::new());
        for (preference, value) in [
            (Preference::Timeout, "0"),
            (Preference::Timeout, "abc"),
            (Preference::Color, "blue"),
            (Preference::BytesFormat, "p"),
            (Preference::UseGradle, "maybe"),
            (Preference::DefaultHeap, " "),
        ] {
            let err = set_preference(&mut ctx, preference, value).unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "{preference}={value}");
        }
        assert_eq!(ctx.store().config().request_timeout, 30);
    }

    #[test]
    fn only_optional_preferences_clear() {
        let (_dir, mut ctx) = test_context(&FakeFetcher::new());
        set_preference(&mut ctx, Preference::DefaultHeap, "2g").unwrap();
        assert_eq!(get_preference(&ctx, Preference::DefaultHeap), "default-heap: 2g\n");
        clear_preference(&mut ctx, Preference::DefaultHeap).unwrap();
        assert_eq!(get_preference(&ctx, Preference::DefaultHeap), "default-heap is not set\n");
        assert!(clear_preference(&mut ctx, Preference::Debug).is_err());
    }

    #[test]
    fn config_block_lists_every_preference() {
        let (_dir, ctx) = test_context(&FakeFetcher::new());
        let out = get_config(&ctx);
        for preference in Preference::ALL {
            assert!(out.contains(preference.name()), "missing {preference}");
        }
        assert!(out.lines().any(|l| l.starts_with("Current Context") && l.ends_with(":  test")));
    }
}
