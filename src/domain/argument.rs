//! Typed command arguments and their coercion rules
//!
//! An [`Argument`] describes one unit of command input: its aliases, arity,
//! help text, default and how raw tokens are turned into an [`ArgValue`].
//! Coercion happens once, at binding time, through the `parse_*` functions.
//! A value that was not supplied yields the default and skips coercion;
//! a supplied value is always coerced, even if it equals the default.

use std::collections::BTreeMap;

use crate::domain::error::{DomainError, DomainResult};

/// Coercion rule applied to raw tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Boolean switch, arity 0
    Flag,
    /// Free-form string
    Value,
    /// Signed integer
    Int,
    /// `key=value` pairs collected into a map
    KeyValue,
    /// `section.key=value` configuration overrides
    ConfigOverride,
}

/// A single `section.key=value` configuration write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
    pub section: String,
    pub key: String,
    pub value: String,
}

/// Coerced argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Flag(bool),
    Text(Option<String>),
    List(Vec<String>),
    Int(Option<i64>),
    Map(BTreeMap<String, String>),
    Overrides(Vec<ConfigOverride>),
}

/// Declaration of a command argument.
///
/// Arguments without aliases are positional and bind in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: &'static str,
    kind: ArgKind,
    aliases: Vec<&'static str>,
    help: &'static str,
    default: Option<ArgValue>,
    repeatable: bool,
    required: bool,
}

impl Argument {
    fn new(
        name: &'static str,
        kind: ArgKind,
        aliases: &[&'static str],
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            aliases: aliases.to_vec(),
            help,
            default: None,
            repeatable: false,
            required: false,
        }
    }

    /// Boolean switch (`--shared`).
    pub fn flag(name: &'static str, aliases: &[&'static str], help: &'static str) -> Self {
        Self::new(name, ArgKind::Flag, aliases, help)
    }

    /// String option (`--name NAME`).
    pub fn value(name: &'static str, aliases: &[&'static str], help: &'static str) -> Self {
        Self::new(name, ArgKind::Value, aliases, help)
    }

    /// Integer option (`--page-size 10`).
    pub fn int(name: &'static str, aliases: &[&'static str], help: &'static str) -> Self {
        Self::new(name, ArgKind::Int, aliases, help)
    }

    /// Key-value option (`--meta a=1 --meta b=2`).
    pub fn key_value(name: &'static str, aliases: &[&'static str], help: &'static str) -> Self {
        Self::new(name, ArgKind::KeyValue, aliases, help).repeatable()
    }

    /// Configuration override option (`-o section.key=value`).
    pub fn config_override(
        name: &'static str,
        aliases: &[&'static str],
        help: &'static str,
    ) -> Self {
        Self::new(name, ArgKind::ConfigOverride, aliases, help).repeatable()
    }

    /// Required positional argument.
    pub fn positional(name: &'static str, help: &'static str) -> Self {
        let mut arg = Self::new(name, ArgKind::Value, &[], help);
        arg.required = true;
        arg
    }

    /// Override the default used when no value is supplied.
    pub fn with_default(mut self, default: ArgValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Accept the argument several times (positional: one or more values).
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn is_positional(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Number of tokens consumed per occurrence.
    pub fn arity(&self) -> usize {
        match self.kind {
            ArgKind::Flag => 0,
            _ => 1,
        }
    }

    /// Value used when the argument is not supplied.
    pub fn default_value(&self) -> ArgValue {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match self.kind {
            ArgKind::Flag => ArgValue::Flag(false),
            ArgKind::Value if self.repeatable => ArgValue::List(Vec::new()),
            ArgKind::Value => ArgValue::Text(None),
            ArgKind::Int => ArgValue::Int(None),
            ArgKind::KeyValue => ArgValue::Map(BTreeMap::new()),
            ArgKind::ConfigOverride => ArgValue::Overrides(Vec::new()),
        }
    }

    /// Coerce raw tokens into a typed value.
    ///
    /// `None` means the argument was not supplied at all; only then is the
    /// default returned. For flags, `Some(_)` means the switch was present.
    pub fn bind<S: AsRef<str>>(&self, raw: Option<&[S]>) -> DomainResult<ArgValue> {
        let Some(tokens) = raw else {
            if self.required {
                return Err(DomainError::MissingArgument(self.name.to_string()));
            }
            return Ok(self.default_value());
        };

        match self.kind {
            ArgKind::Flag => Ok(ArgValue::Flag(true)),
            ArgKind::Value if self.repeatable => Ok(ArgValue::List(
                tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            )),
            ArgKind::Value => Ok(ArgValue::Text(
                tokens.last().map(|t| t.as_ref().to_string()),
            )),
            ArgKind::Int => tokens
                .last()
                .map(|t| parse_int(t.as_ref()))
                .transpose()
                .map(ArgValue::Int),
            ArgKind::KeyValue => parse_key_values(tokens).map(ArgValue::Map),
            ArgKind::ConfigOverride => parse_config_overrides(tokens).map(ArgValue::Overrides),
        }
    }
}

/// Parse a signed integer.
pub fn parse_int(raw: &str) -> DomainResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::syntax(raw, format!("value {raw} not an int")))
}

/// Parse a boolean written as true/false, yes/no, on/off or 1/0.
pub fn parse_bool(raw: &str) -> DomainResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(DomainError::syntax(
            raw,
            format!("value {raw} not a boolean (use true/false)"),
        )),
    }
}

/// Parse `key=value` tokens into a map.
///
/// A token may hold several whitespace-separated pairs. Each pair is split
/// on its first `=`; keys and values are trimmed. On duplicate keys the last
/// value wins.
pub fn parse_key_values<S: AsRef<str>>(tokens: &[S]) -> DomainResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for token in tokens.iter().flat_map(|t| t.as_ref().split_whitespace()) {
        let Some((key, value)) = token.split_once('=') else {
            return Err(DomainError::syntax(
                token,
                format!("missing \"=\" in \"{token}\" (use \"key1=val1 key2=val2 ...\")"),
            ));
        };
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

/// Parse one `section.key=value` override.
pub fn parse_config_override(token: &str) -> DomainResult<ConfigOverride> {
    let Some((keypath, value)) = token.split_once('=') else {
        return Err(DomainError::syntax(
            token,
            "missing = between key and value: -o section.key=val",
        ));
    };
    let Some((section, key)) = keypath.split_once('.') else {
        return Err(DomainError::syntax(
            token,
            "missing . between section and key: -o section.key=val",
        ));
    };
    Ok(ConfigOverride {
        section: section.trim().to_string(),
        key: key.trim().to_string(),
        value: value.trim().to_string(),
    })
}

/// Parse all overrides; fails on the first malformed token without
/// returning any of the others.
pub fn parse_config_overrides<S: AsRef<str>>(tokens: &[S]) -> DomainResult<Vec<ConfigOverride>> {
    tokens
        .iter()
        .map(|t| parse_config_override(t.as_ref()))
        .collect()
}

/// Values of a bound argument set, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgValues {
    values: BTreeMap<&'static str, ArgValue>,
}

impl ArgValues {
    /// Bind every declared argument using `raw` to look up supplied tokens.
    pub fn bind<F>(arguments: &[Argument], mut raw: F) -> DomainResult<Self>
    where
        F: FnMut(&Argument) -> Option<Vec<String>>,
    {
        let mut values = BTreeMap::new();
        for arg in arguments {
            let tokens = raw(arg);
            values.insert(arg.name(), arg.bind(tokens.as_deref())?);
        }
        Ok(Self { values })
    }

    pub fn insert(&mut self, name: &'static str, value: ArgValue) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Flag(true)))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(v)) => v.as_deref(),
            Some(ArgValue::List(v)) => v.last().map(String::as_str),
            _ => None,
        }
    }

    pub fn required_text(&self, name: &str) -> DomainResult<&str> {
        self.text(name)
            .ok_or_else(|| DomainError::MissingArgument(name.to_string()))
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ArgValue::List(v)) => v,
            _ => &[],
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(v)) => *v,
            _ => None,
        }
    }

    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.values.get(name) {
            Some(ArgValue::Map(v)) => Some(v),
            _ => None,
        }
    }

    pub fn overrides(&self, name: &str) -> &[ConfigOverride] {
        match self.values.get(name) {
            Some(ArgValue::Overrides(v)) => v,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_flag_when_not_supplied_then_defaults_to_false() {
        let arg = Argument::flag("shared", &["--shared"], "shared network");
        assert_eq!(arg.arity(), 0);
        assert_eq!(arg.bind::<String>(None).unwrap(), ArgValue::Flag(false));
    }

    #[test]
    fn given_flag_with_true_default_when_not_supplied_then_keeps_default() {
        let arg = Argument::flag("admin", &["--admin"], "").with_default(ArgValue::Flag(true));
        assert_eq!(arg.bind::<String>(None).unwrap(), ArgValue::Flag(true));
    }

    #[test]
    fn given_int_equal_to_default_when_supplied_then_still_coerced() {
        let arg = Argument::int("page_size", &["-n"], "").with_default(ArgValue::Int(Some(10)));
        assert_eq!(arg.bind(Some(&["10"][..])).unwrap(), ArgValue::Int(Some(10)));

        let err = arg.bind(Some(&["x"][..])).unwrap_err();
        assert!(matches!(err, DomainError::Syntax { .. }));
    }

    #[test]
    fn given_non_numeric_int_when_parsing_then_error_names_value() {
        let err = parse_int("ten").unwrap_err();
        assert_eq!(err.to_string(), "syntax error: value ten not an int");
    }

    #[test]
    fn given_missing_required_positional_when_binding_then_fails() {
        let arg = Argument::positional("network_id", "network id");
        assert_eq!(
            arg.bind::<String>(None).unwrap_err(),
            DomainError::MissingArgument("network_id".into())
        );
    }

    #[test]
    fn given_override_with_spaces_when_parsing_then_trims_all_parts() {
        let o = parse_config_override(" compute . token = abc ").unwrap();
        assert_eq!(o.section, "compute");
        assert_eq!(o.key, "token");
        assert_eq!(o.value, "abc");
    }

    #[test]
    fn given_value_containing_separators_when_parsing_override_then_splits_on_first() {
        let o = parse_config_override("network.url=https://net.example.org/v2.0?a=b").unwrap();
        assert_eq!(o.section, "network");
        assert_eq!(o.key, "url");
        assert_eq!(o.value, "https://net.example.org/v2.0?a=b");
    }

    #[test]
    fn given_bool_words_when_parsing_then_accepts_common_spellings() {
        assert!(parse_bool("Yes").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn given_arg_values_when_querying_wrong_type_then_returns_empty() {
        let args = [
            Argument::flag("details", &["-l", "--details"], ""),
            Argument::value("name", &["--name"], ""),
        ];
        let values = ArgValues::bind(&args, |a| match a.name() {
            "details" => Some(vec![]),
            _ => None,
        })
        .unwrap();
        assert!(values.flag("details"));
        assert_eq!(values.text("name"), None);
        assert_eq!(values.int("details"), None);
        assert!(values.list("name").is_empty());
    }
}
