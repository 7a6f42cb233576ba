//=========================================================================
// Global Constants
//=========================================================================
//
// Read-only, sectioned game constants loaded from INI.
//
//   [player]
//   speed = 4.5
//   lives = 3
//
//   [dispatcher]
//   require_listener = true
//
// Section and key names are case-insensitive. Keys outside any section
// land in the `default` section.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use configparser::ini::Ini;
use log::debug;

//=== Internal Dependencies ===============================================

use super::GlobalsError;
use crate::core::dispatcher::DispatcherConfig;

/// Section read by [`GlobalConsts::dispatcher_config`].
pub const DISPATCHER_SECTION: &str = "dispatcher";

//=========================================================================

type Sections = HashMap<String, HashMap<String, Option<String>>>;

/// Immutable set of constants grouped by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConsts {
    sections: Sections,
}

impl GlobalConsts {
    /// Constants with no sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses constants from INI text.
    pub fn parse(text: &str) -> Result<Self, GlobalsError> {
        let sections = Ini::new()
            .read(text.to_string())
            .map_err(|message| GlobalsError::Parse { message })?;

        Ok(Self { sections })
    }

    /// Loads constants from an INI file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GlobalsError> {
        let path = path.as_ref();
        let sections = Ini::new()
            .load(path)
            .map_err(|message| GlobalsError::Load {
                path: path.to_path_buf(),
                message,
            })?;

        debug!("Loaded {} constant section(s) from {}", sections.len(), path.display());
        Ok(Self { sections })
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if the section exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&section.to_lowercase())
    }

    /// Names of all sections, unordered.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Raw value of `key` in `section`. A key without a value reads as `None`.
    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_lowercase())?
            .get(&key.to_lowercase())?
            .as_deref()
    }

    /// Signed integer value.
    pub fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, GlobalsError> {
        self.get_parsed(section, key)
    }

    /// Unsigned integer value.
    pub fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, GlobalsError> {
        self.get_parsed(section, key)
    }

    /// Floating point value.
    pub fn get_float(&self, section: &str, key: &str) -> Result<Option<f64>, GlobalsError> {
        self.get_parsed(section, key)
    }

    /// Boolean value. Accepts `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, GlobalsError> {
        let Some(raw) = self.get_str(section, key) else {
            return Ok(None);
        };

        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            _ => Err(invalid(section, key, raw)),
        }
    }

    /// Dispatcher switches from the `[dispatcher]` section.
    ///
    /// Missing keys keep their default (`false`).
    ///
    /// ```
    /// use aetheric_messenger::core::globals::GlobalConsts;
    ///
    /// let consts = GlobalConsts::parse("[dispatcher]\nrequire_listener = true\n").unwrap();
    /// let config = consts.dispatcher_config().unwrap();
    /// assert!(config.require_listener);
    /// assert!(!config.log_broadcasts);
    /// ```
    pub fn dispatcher_config(&self) -> Result<DispatcherConfig, GlobalsError> {
        let flag = |key: &str| -> Result<bool, GlobalsError> {
            Ok(self.get_bool(DISPATCHER_SECTION, key)?.unwrap_or(false))
        };

        Ok(DispatcherConfig {
            log_lifecycle: flag("log_lifecycle")?,
            log_subscriptions: flag("log_subscriptions")?,
            log_broadcasts: flag("log_broadcasts")?,
            require_listener: flag("require_listener")?,
        })
    }

    fn get_parsed<T: FromStr>(&self, section: &str, key: &str) -> Result<Option<T>, GlobalsError> {
        let Some(raw) = self.get_str(section, key) else {
            return Ok(None);
        };

        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, raw))
    }
}

fn invalid(section: &str, key: &str, raw: &str) -> GlobalsError {
    GlobalsError::Invalid {
        section: section.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[Player]
speed = 4.5
lives = 3
invincible = no
name = Kirra

[enemy]
spawn_offset = -12
";

    #[test]
    fn typed_getters_parse_values() {
        let consts = GlobalConsts::parse(SAMPLE).unwrap();

        assert_eq!(consts.get_float("player", "speed").unwrap(), Some(4.5));
        assert_eq!(consts.get_uint("player", "lives").unwrap(), Some(3));
        assert_eq!(consts.get_bool("player", "invincible").unwrap(), Some(false));
        assert_eq!(consts.get_str("player", "name"), Some("Kirra"));
        assert_eq!(consts.get_int("enemy", "spawn_offset").unwrap(), Some(-12));
    }

    #[test]
    fn lookups_ignore_case() {
        let consts = GlobalConsts::parse(SAMPLE).unwrap();
        assert!(consts.has_section("PLAYER"));
        assert_eq!(consts.get_uint("Player", "Lives").unwrap(), Some(3));
    }

    #[test]
    fn missing_keys_are_none() {
        let consts = GlobalConsts::parse(SAMPLE).unwrap();
        assert_eq!(consts.get_int("player", "ammo").unwrap(), None);
        assert_eq!(consts.get_bool("boss", "enraged").unwrap(), None);
        assert!(!consts.has_section("boss"));
    }

    #[test]
    fn malformed_values_are_errors() {
        let consts = GlobalConsts::parse(SAMPLE).unwrap();

        let err = consts.get_uint("enemy", "spawn_offset").unwrap_err();
        assert!(matches!(err, GlobalsError::Invalid { .. }));
        assert!(consts.get_bool("player", "name").is_err());
    }

    #[test]
    fn dispatcher_config_reads_all_keys() {
        let consts = GlobalConsts::parse(
            "[dispatcher]\n\
             log_lifecycle = true\n\
             log_subscriptions = false\n\
             log_broadcasts = yes\n\
             require_listener = on\n",
        )
        .unwrap();

        assert_eq!(
            consts.dispatcher_config().unwrap(),
            DispatcherConfig {
                log_lifecycle: true,
                log_subscriptions: false,
                log_broadcasts: true,
                require_listener: true,
            }
        );
    }

    #[test]
    fn dispatcher_config_rejects_malformed_flag() {
        let consts = GlobalConsts::parse("[dispatcher]\nlog_broadcasts = maybe\n").unwrap();
        assert!(consts.dispatcher_config().is_err());
    }

    #[test]
    fn dispatcher_config_defaults_without_section() {
        let consts = GlobalConsts::parse(SAMPLE).unwrap();
        assert_eq!(consts.dispatcher_config().unwrap(), DispatcherConfig::default());
    }

    #[test]
    fn load_missing_file_fails() {
        let err = GlobalConsts::load("/definitely/not/here/consts.ini").unwrap_err();
        assert!(matches!(err, GlobalsError::Load { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("aetheric_consts_{}.ini", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();

        let consts = GlobalConsts::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(consts, GlobalConsts::parse(SAMPLE).unwrap());
        assert!(consts.sections().any(|section| section == "enemy"));
    }
}
