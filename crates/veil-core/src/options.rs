#![forbid(unsafe_code)]

//! Per-instance modal options and process-wide configuration.
//!
//! Options resolve once, at registration, by overlaying a
//! [`ModalOptionsPatch`] on the configured defaults. The resolved
//! [`ModalOptions`] never change for the life of the instance.
//!
//! # Declarative attribute syntax
//!
//! Markup may carry options as `key: value, key: value`. Every field has an
//! explicit type: booleans must be spelled `true` or `false`, string fields
//! take the raw text. Unknown and duplicated keys are rejected instead of
//! being silently stored.
//!
//! ```
//! use veil_core::options::{ModalOptions, ModalOptionsPatch};
//!
//! let patch = ModalOptionsPatch::parse_attribute("hashTracking: false, modifier: dark")?;
//! let opts = ModalOptions::default().merged(&patch);
//! assert!(!opts.hash_tracking);
//! assert_eq!(opts.modifier, "dark");
//! # Ok::<(), veil_core::options::OptionsError>(())
//! ```

use core::fmt;

use crate::namespace::Namespace;

/// Error from parsing a declarative option string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// A `key` with no `:value` part.
    MissingSeparator(String),
    /// A key that names no option.
    UnknownKey(String),
    /// The same key given twice.
    DuplicateKey(String),
    /// A boolean option whose value is not `true`/`false`.
    InvalidBool { key: String, value: String },
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator(entry) => write!(f, "option {entry:?} has no ':' separator"),
            Self::UnknownKey(key) => write!(f, "unknown modal option {key:?}"),
            Self::DuplicateKey(key) => write!(f, "modal option {key:?} given more than once"),
            Self::InvalidBool { key, value } => {
                write!(f, "option {key:?} expects true or false, got {value:?}")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

/// Resolved, immutable options of one modal instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ModalOptions {
    /// Mirror open state into the location hash.
    #[cfg_attr(feature = "policy-config", serde(alias = "hashTracking"))]
    pub hash_tracking: bool,
    /// Close after a confirm action.
    #[cfg_attr(feature = "policy-config", serde(alias = "closeOnConfirm"))]
    pub close_on_confirm: bool,
    /// Close after a cancel action.
    #[cfg_attr(feature = "policy-config", serde(alias = "closeOnCancel"))]
    pub close_on_cancel: bool,
    /// Close the focused modal on Escape.
    #[cfg_attr(feature = "policy-config", serde(alias = "closeOnEscape"))]
    pub close_on_escape: bool,
    /// Close when the wrapper itself (outside the content) is clicked.
    #[cfg_attr(feature = "policy-config", serde(alias = "closeOnOutsideClick"))]
    pub close_on_outside_click: bool,
    /// Space-separated style modifier classes.
    pub modifier: String,
    /// Host-defined mount point for the wrapper and overlay; body when `None`.
    #[cfg_attr(feature = "policy-config", serde(alias = "appendTo"))]
    pub append_to: Option<String>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            hash_tracking: true,
            close_on_confirm: true,
            close_on_cancel: true,
            close_on_escape: true,
            close_on_outside_click: true,
            modifier: String::new(),
            append_to: None,
        }
    }
}

impl ModalOptions {
    pub fn hash_tracking(mut self, on: bool) -> Self {
        self.hash_tracking = on;
        self
    }

    pub fn close_on_confirm(mut self, on: bool) -> Self {
        self.close_on_confirm = on;
        self
    }

    pub fn close_on_cancel(mut self, on: bool) -> Self {
        self.close_on_cancel = on;
        self
    }

    pub fn close_on_escape(mut self, on: bool) -> Self {
        self.close_on_escape = on;
        self
    }

    pub fn close_on_outside_click(mut self, on: bool) -> Self {
        self.close_on_outside_click = on;
        self
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = modifier.into();
        self
    }

    pub fn append_to(mut self, mount: impl Into<String>) -> Self {
        self.append_to = Some(mount.into());
        self
    }

    /// Overlay `patch` on a copy of these options.
    #[must_use]
    pub fn merged(&self, patch: &ModalOptionsPatch) -> Self {
        let mut out = self.clone();
        if let Some(v) = patch.hash_tracking {
            out.hash_tracking = v;
        }
        if let Some(v) = patch.close_on_confirm {
            out.close_on_confirm = v;
        }
        if let Some(v) = patch.close_on_cancel {
            out.close_on_cancel = v;
        }
        if let Some(v) = patch.close_on_escape {
            out.close_on_escape = v;
        }
        if let Some(v) = patch.close_on_outside_click {
            out.close_on_outside_click = v;
        }
        if let Some(v) = &patch.modifier {
            out.modifier.clone_from(v);
        }
        if let Some(v) = &patch.append_to {
            out.append_to = Some(v.clone());
        }
        out
    }
}

/// Instance-specific overrides; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalOptionsPatch {
    pub hash_tracking: Option<bool>,
    pub close_on_confirm: Option<bool>,
    pub close_on_cancel: Option<bool>,
    pub close_on_escape: Option<bool>,
    pub close_on_outside_click: Option<bool>,
    pub modifier: Option<String>,
    pub append_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKey {
    HashTracking,
    CloseOnConfirm,
    CloseOnCancel,
    CloseOnEscape,
    CloseOnOutsideClick,
    Modifier,
    AppendTo,
}

impl OptionKey {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "hashTracking" | "hash_tracking" => Self::HashTracking,
            "closeOnConfirm" | "close_on_confirm" => Self::CloseOnConfirm,
            "closeOnCancel" | "close_on_cancel" => Self::CloseOnCancel,
            "closeOnEscape" | "close_on_escape" => Self::CloseOnEscape,
            "closeOnOutsideClick" | "close_on_outside_click" => Self::CloseOnOutsideClick,
            "modifier" => Self::Modifier,
            "appendTo" | "append_to" => Self::AppendTo,
            _ => return None,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OptionsError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionsError::InvalidBool {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), OptionsError> {
    if slot.is_some() {
        return Err(OptionsError::DuplicateKey(key.to_owned()));
    }
    *slot = Some(value);
    Ok(())
}

impl ModalOptionsPatch {
    /// Parse the declarative `key: value, key: value` attribute form.
    ///
    /// Whitespace around `:` and `,` is ignored; empty entries (a trailing
    /// comma) are skipped. An empty string yields an empty patch.
    pub fn parse_attribute(attr: &str) -> Result<Self, OptionsError> {
        let mut patch = Self::default();

        for entry in attr.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry
                .split_once(':')
                .ok_or_else(|| OptionsError::MissingSeparator(entry.to_owned()))?;
            let key = key.trim();
            let value = value.trim();
            let option =
                OptionKey::from_name(key).ok_or_else(|| OptionsError::UnknownKey(key.to_owned()))?;

            match option {
                OptionKey::HashTracking => {
                    set_once(&mut patch.hash_tracking, key, parse_bool(key, value)?)?;
                }
                OptionKey::CloseOnConfirm => {
                    set_once(&mut patch.close_on_confirm, key, parse_bool(key, value)?)?;
                }
                OptionKey::CloseOnCancel => {
                    set_once(&mut patch.close_on_cancel, key, parse_bool(key, value)?)?;
                }
                OptionKey::CloseOnEscape => {
                    set_once(&mut patch.close_on_escape, key, parse_bool(key, value)?)?;
                }
                OptionKey::CloseOnOutsideClick => {
                    set_once(
                        &mut patch.close_on_outside_click,
                        key,
                        parse_bool(key, value)?,
                    )?;
                }
                OptionKey::Modifier => set_once(&mut patch.modifier, key, value.to_owned())?,
                OptionKey::AppendTo => set_once(&mut patch.append_to, key, value.to_owned())?,
            }
        }

        Ok(patch)
    }

    /// Whether no field is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Process-wide settings shared by every instance of one manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct VeilConfig {
    /// Class-name namespace.
    #[cfg_attr(feature = "policy-config", serde(deserialize_with = "de_namespace"))]
    pub namespace: Namespace,
    /// Defaults every instance's patch is merged over.
    pub defaults: ModalOptions,
}

#[cfg(feature = "policy-config")]
fn de_namespace<'de, D>(de: D) -> Result<Namespace, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let raw = String::deserialize(de)?;
    if raw.trim().is_empty() {
        return Err(serde::de::Error::custom("namespace must not be empty"));
    }
    Ok(Namespace::new(raw))
}

/// Error from loading a [`VeilConfig`] document.
#[cfg(feature = "policy-config")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Toml(String),
    Json(String),
}

#[cfg(feature = "policy-config")]
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(msg) => write!(f, "invalid TOML config: {msg}"),
            Self::Json(msg) => write!(f, "invalid JSON config: {msg}"),
        }
    }
}

#[cfg(feature = "policy-config")]
impl std::error::Error for ConfigError {}

impl VeilConfig {
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn defaults(mut self, defaults: ModalOptions) -> Self {
        self.defaults = defaults;
        self
    }

    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        toml::from_str(doc).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    #[cfg(feature = "policy-config")]
    pub fn from_json_str(doc: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(doc).map_err(|e| ConfigError::Json(e.to_string()))
    }
}
