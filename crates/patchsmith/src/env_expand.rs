//! `${VAR}` and `${VAR:-default}` expansion for config text.
//!
//! Expansion runs on the raw file before TOML parsing, so a reference can
//! appear anywhere a value can.

use std::borrow::Cow;

use anyhow::{bail, Result};

/// Expand every `${...}` reference in `text`.
///
/// `${VAR}` fails when `VAR` is unset. `${VAR:-default}` falls back to
/// `default` when `VAR` is unset or empty. A `$` not followed by `{` is kept.
pub fn expand_env_vars(text: &str) -> Result<Cow<'_, str>> {
    if !text.contains("${") {
        return Ok(Cow::Borrowed(text));
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            let preview: String = after.chars().take(20).collect();
            bail!("unclosed environment variable reference: ${{{preview}...");
        };
        out.push_str(&expand_reference(&after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(Cow::Owned(out))
}

fn expand_reference(reference: &str) -> Result<String> {
    if let Some((name, default)) = reference.split_once(":-") {
        validate_var_name(name)?;
        return Ok(match std::env::var(name) {
            Ok(value) if !value.is_empty() => value,
            _ => default.to_string(),
        });
    }

    validate_var_name(reference)?;
    match std::env::var(reference) {
        Ok(value) => Ok(value),
        Err(_) => bail!(
            "environment variable '{reference}' is not set; \
             use ${{{reference}:-default}} to provide a fallback"
        ),
    }
}

fn validate_var_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        bail!("empty environment variable name in ${{}}");
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        bail!("invalid environment variable name '{name}': must start with a letter or underscore");
    }
    if let Some(bad) = chars.find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        bail!("invalid environment variable name '{name}': contains '{bad}'");
    }
    Ok(())
}
