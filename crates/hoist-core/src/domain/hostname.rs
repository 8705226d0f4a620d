//! Hostname derivation for application routes.
//!
//! Pure functions only; the random word pair used by `--random-route` is
//! passed in by the caller so this module stays deterministic.

use crate::domain::entities::ApplicationParameters;

/// Turn an arbitrary application name into a DNS-label-safe hostname.
///
/// Lowercases, collapses each run of ASCII whitespace or underscores into a
/// single `-`, then drops every character outside `[a-z0-9-]`.
///
/// ```
/// use hoist_core::domain::hostname::normalize;
///
/// assert_eq!(normalize("My Cool_App!"), "my-cool-app");
/// ```
pub fn normalize(name: &str) -> String {
    let mut host = String::with_capacity(name.len());
    let mut in_separator_run = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_whitespace() || c == '_' {
            if !in_separator_run {
                host.push('-');
                in_separator_run = true;
            }
            continue;
        }

        in_separator_run = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            host.push(c);
        }
    }

    host
}

/// Choose the hostname for an application's route.
///
/// Precedence: `no_hostname` maps the bare domain (empty host), then an
/// explicit host verbatim, then `normalize(name)-<word pair>` in random mode,
/// else `normalize(name)`. `word_pair` is only invoked in random mode.
pub fn hostname_for_app(
    params: &ApplicationParameters,
    app_name: &str,
    no_hostname: bool,
    word_pair: impl FnOnce() -> String,
) -> String {
    if no_hostname {
        return String::new();
    }

    if let Some(host) = &params.host {
        return host.clone();
    }

    if params.use_random_hostname() {
        format!("{}-{}", normalize(app_name), word_pair())
    } else {
        normalize(app_name)
    }
}
