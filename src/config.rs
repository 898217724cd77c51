use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Which optimizer backend runs the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Builtin,
    Glpk,
}

/// Which used-condition items are allowed: none, an explicit allow-list of
/// item keys, or every used item (modeled as the literal `"all"` entry in
/// the wire format, per spec §6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UsedPolicy {
    #[default]
    None,
    Allow(HashSet<String>),
    AllowAll,
}

impl UsedPolicy {
    fn from_strings(entries: &[String]) -> Self {
        if entries.iter().any(|s| s == "all") {
            UsedPolicy::AllowAll
        } else if entries.is_empty() {
            UsedPolicy::None
        } else {
            UsedPolicy::Allow(entries.iter().cloned().collect())
        }
    }

    fn allows(&self, item_key: &str, excluded: &HashSet<String>) -> bool {
        let allowed = match self {
            UsedPolicy::None => false,
            UsedPolicy::AllowAll => true,
            UsedPolicy::Allow(set) => set.contains(item_key),
        };
        allowed && !excluded.contains(item_key)
    }
}

/// Every recognized configuration option from spec §6, immutable once
/// built and threaded explicitly through filtering, selection, and
/// optimization — there is no ambient/global configuration state.
#[derive(Debug, Clone)]
pub struct Options {
    pub mode: Mode,
    pub multiple: u32,
    pub include_shops: HashSet<String>,
    pub exclude_shops: HashSet<String>,
    pub dont_exclude_shops: HashSet<String>,
    pub include_countries: HashSet<String>,
    pub exclude_countries: HashSet<String>,
    pub include_used: Vec<String>,
    pub exclude_used: HashSet<String>,
    pub shop_fix_cost: Decimal,
    pub max_shops: usize,
    pub consider_shops: usize,
    pub jobs: usize,
    pub rerun_solver: bool,
    pub glpk_limit_seconds: u32,
    pub cachedir: PathBuf,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    fn used_policy(&self) -> UsedPolicy {
        UsedPolicy::from_strings(&self.include_used)
    }

    /// Whether a used offer for `item_key` is acceptable under
    /// `include_used`/`exclude_used`.
    pub fn allows_used(&self, item_key: &str) -> bool {
        self.used_policy().allows(item_key, &self.exclude_used)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        let raw: RawOptions = toml::from_str(s)?;
        Ok(raw.into())
    }
}

/// Wire-format mirror of `Options` for TOML config files — plain strings
/// and primitives only, with the same defaults as the CLI flags in the
/// original tool's options table.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawOptions {
    mode: ModeString,
    multiple: u32,
    include_shops: Vec<String>,
    exclude_shops: Vec<String>,
    dont_exclude_shops: Vec<String>,
    include_countries: Vec<String>,
    exclude_countries: Vec<String>,
    include_used: Vec<String>,
    exclude_used: Vec<String>,
    shop_fix_cost: String,
    max_shops: usize,
    consider_shops: usize,
    jobs: usize,
    rerun_solver: bool,
    glpk_limit_seconds: u32,
    cachedir: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ModeString {
    Builtin,
    Glpk,
}

impl Default for ModeString {
    fn default() -> Self {
        ModeString::Builtin
    }
}

impl Default for RawOptions {
    fn default() -> Self {
        RawOptions {
            mode: ModeString::Builtin,
            multiple: 1,
            include_shops: Vec::new(),
            exclude_shops: Vec::new(),
            dont_exclude_shops: Vec::new(),
            include_countries: Vec::new(),
            exclude_countries: Vec::new(),
            include_used: Vec::new(),
            exclude_used: Vec::new(),
            shop_fix_cost: "5.0".to_string(),
            max_shops: 8,
            consider_shops: 20,
            jobs: 1,
            rerun_solver: false,
            glpk_limit_seconds: 30,
            cachedir: ".".to_string(),
        }
    }
}

impl From<RawOptions> for Options {
    fn from(raw: RawOptions) -> Self {
        Options {
            mode: match raw.mode {
                ModeString::Builtin => Mode::Builtin,
                ModeString::Glpk => Mode::Glpk,
            },
            multiple: raw.multiple,
            include_shops: raw.include_shops.into_iter().collect(),
            exclude_shops: raw.exclude_shops.into_iter().collect(),
            dont_exclude_shops: raw.dont_exclude_shops.into_iter().collect(),
            include_countries: raw.include_countries.into_iter().collect(),
            exclude_countries: raw.exclude_countries.into_iter().collect(),
            include_used: raw.include_used,
            exclude_used: raw.exclude_used.into_iter().collect(),
            shop_fix_cost: raw.shop_fix_cost.parse().unwrap_or_default(),
            max_shops: raw.max_shops,
            consider_shops: raw.consider_shops,
            jobs: raw.jobs.max(1),
            rerun_solver: raw.rerun_solver,
            glpk_limit_seconds: raw.glpk_limit_seconds,
            cachedir: PathBuf::from(raw.cachedir),
        }
    }
}

/// Chained-setter builder for `Options`, in the teacher's `VarBuilder` style:
/// every call consumes and returns `self`, defaults match the original
/// tool's flag defaults.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    mode: Mode,
    multiple: u32,
    include_shops: HashSet<String>,
    exclude_shops: HashSet<String>,
    dont_exclude_shops: HashSet<String>,
    include_countries: HashSet<String>,
    exclude_countries: HashSet<String>,
    include_used: Vec<String>,
    exclude_used: HashSet<String>,
    shop_fix_cost: Decimal,
    max_shops: usize,
    consider_shops: usize,
    jobs: usize,
    rerun_solver: bool,
    glpk_limit_seconds: u32,
    cachedir: PathBuf,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        OptionsBuilder {
            mode: Mode::Builtin,
            multiple: 1,
            include_shops: HashSet::new(),
            exclude_shops: HashSet::new(),
            dont_exclude_shops: HashSet::new(),
            include_countries: HashSet::new(),
            exclude_countries: HashSet::new(),
            include_used: Vec::new(),
            exclude_used: HashSet::new(),
            shop_fix_cost: Decimal::new(50, 1),
            max_shops: 8,
            consider_shops: 20,
            jobs: 1,
            rerun_solver: false,
            glpk_limit_seconds: 30,
            cachedir: PathBuf::from("."),
        }
    }
}

impl OptionsBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn multiple(mut self, multiple: u32) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn include_shops(mut self, shops: impl IntoIterator<Item = String>) -> Self {
        self.include_shops = shops.into_iter().collect();
        self
    }

    pub fn exclude_shops(mut self, shops: impl IntoIterator<Item = String>) -> Self {
        self.exclude_shops = shops.into_iter().collect();
        self
    }

    pub fn dont_exclude_shops(mut self, shops: impl IntoIterator<Item = String>) -> Self {
        self.dont_exclude_shops = shops.into_iter().collect();
        self
    }

    pub fn include_countries(mut self, countries: impl IntoIterator<Item = String>) -> Self {
        self.include_countries = countries.into_iter().collect();
        self
    }

    pub fn exclude_countries(mut self, countries: impl IntoIterator<Item = String>) -> Self {
        self.exclude_countries = countries.into_iter().collect();
        self
    }

    pub fn include_used(mut self, entries: impl IntoIterator<Item = String>) -> Self {
        self.include_used = entries.into_iter().collect();
        self
    }

    pub fn exclude_used(mut self, entries: impl IntoIterator<Item = String>) -> Self {
        self.exclude_used = entries.into_iter().collect();
        self
    }

    pub fn shop_fix_cost(mut self, cost: Decimal) -> Self {
        self.shop_fix_cost = cost;
        self
    }

    pub fn max_shops(mut self, n: usize) -> Self {
        self.max_shops = n;
        self
    }

    pub fn consider_shops(mut self, n: usize) -> Self {
        self.consider_shops = n;
        self
    }

    pub fn jobs(mut self, n: usize) -> Self {
        self.jobs = n.max(1);
        self
    }

    pub fn rerun_solver(mut self, rerun: bool) -> Self {
        self.rerun_solver = rerun;
        self
    }

    pub fn glpk_limit_seconds(mut self, seconds: u32) -> Self {
        self.glpk_limit_seconds = seconds;
        self
    }

    pub fn cachedir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cachedir = dir.into();
        self
    }

    pub fn build(self) -> Options {
        Options {
            mode: self.mode,
            multiple: self.multiple,
            include_shops: self.include_shops,
            exclude_shops: self.exclude_shops,
            dont_exclude_shops: self.dont_exclude_shops,
            include_countries: self.include_countries,
            exclude_countries: self.exclude_countries,
            include_used: self.include_used,
            exclude_used: self.exclude_used,
            shop_fix_cost: self.shop_fix_cost,
            max_shops: self.max_shops,
            consider_shops: self.consider_shops,
            jobs: self.jobs,
            rerun_solver: self.rerun_solver,
            glpk_limit_seconds: self.glpk_limit_seconds,
            cachedir: self.cachedir,
        }
    }
}
