//! Route pattern checks shared by the registry and dispatchers.
//!
//! Patterns are `/`-separated segments. A segment is either literal text,
//! a named parameter `{name}`, or a trailing catch-all `{*name}`.

use shared::{Error, Result};

/// Reject patterns a router could not register
pub fn validate(route: &str) -> Result<()> {
    let invalid = || Error::InvalidRoute(route.to_string());

    if !route.starts_with('/') || route.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let segments: Vec<&str> = route[1..].split('/').collect();
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') {
            return Err(invalid());
        }

        match param_name(segment) {
            Some(Param::Named(name)) if !name.is_empty() => {}
            Some(Param::CatchAll(name)) if !name.is_empty() && i == last => {}
            Some(_) => return Err(invalid()),
            None if segment.contains(['{', '}']) => return Err(invalid()),
            None => {}
        }
    }

    Ok(())
}

/// The pattern with parameter names erased.
///
/// Two patterns with the same shape match the same request paths, so they
/// collide in the router even when their parameter names differ.
pub fn shape(route: &str) -> String {
    route
        .split('/')
        .map(|segment| match param_name(segment) {
            Some(Param::Named(_)) => "{}",
            Some(Param::CatchAll(_)) => "{*}",
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

enum Param<'a> {
    Named(&'a str),
    CatchAll(&'a str),
}

fn param_name(segment: &str) -> Option<Param<'_>> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    if inner.contains(['{', '}', '/']) {
        // Reported as malformed by `validate`
        return Some(Param::Named(""));
    }

    Some(match inner.strip_prefix('*') {
        Some(name) => Param::CatchAll(name),
        None => Param::Named(inner),
    })
}
